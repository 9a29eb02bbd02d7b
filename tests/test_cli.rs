mod helpers;

use anyhow::Result;
use clap::Parser;
use helpers::{sample_notes, sample_tags, sample_user};
use notedesk::application::Workspace;
use notedesk::cli::args::{Args, Command};
use notedesk::cli::commands::{execute, init_config};
use notedesk::domain::{Credentials, NoteId};
use notedesk::infrastructure::Config;
use notedesk::util::testing::{ApiCall, MockNotesApi};
use std::io::Cursor;
use tempfile::TempDir;

fn run_command(
    api: MockNotesApi,
    command: Command,
    credentials: Option<Credentials>,
    input: &str,
) -> (Workspace<MockNotesApi>, Result<()>, String) {
    let mut workspace = Workspace::new(api);
    workspace.load();
    let mut input = Cursor::new(input.as_bytes().to_vec());
    let mut out = Vec::new();
    let result = execute(&mut workspace, &command, credentials.as_ref(), &mut input, &mut out);
    (workspace, result, String::from_utf8(out).expect("utf8 output"))
}

#[test]
fn given_no_subcommand_when_parsing_then_fails() {
    // Arrange
    let args = vec!["notedesk"];

    // Act & Assert
    let result = Args::try_parse_from(args);
    assert!(result.is_err(), "Should fail without subcommand");
}

#[test]
fn given_list_with_query_and_tags_when_parsing_then_succeeds() {
    // Arrange
    let args = vec!["notedesk", "list", "milk", "--tag", "t1", "-t", "t2"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    assert_eq!(
        parsed.command,
        Command::List {
            query: Some("milk".to_string()),
            tags: vec!["t1".to_string(), "t2".to_string()],
        }
    );
}

#[test]
fn given_global_flags_after_subcommand_when_parsing_then_succeeds() {
    // Arrange
    let args = vec![
        "notedesk",
        "delete",
        "42",
        "--yes",
        "--api-url",
        "https://notes.example.com",
        "-c",
        "/tmp/notedesk.toml",
        "-vv",
    ];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    assert_eq!(
        parsed.command,
        Command::Delete {
            note_id: "42".to_string(),
            yes: true
        }
    );
    assert_eq!(parsed.api_url.as_deref(), Some("https://notes.example.com"));
    assert_eq!(
        parsed.config,
        Some(std::path::PathBuf::from("/tmp/notedesk.toml"))
    );
    assert_eq!(parsed.verbose, 2);
}

#[test]
fn given_create_with_tags_when_parsing_then_collects_repeated_flags() {
    // Arrange
    let args = vec![
        "notedesk", "create", "-t", "Plan", "-b", "steps", "--tag", "t1", "--new-tag", "ideas",
        "--new-tag", "later",
    ];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Create {
            title,
            content,
            tags,
            new_tags,
        } => {
            assert_eq!(title, "Plan");
            assert_eq!(content, "steps");
            assert_eq!(tags, vec!["t1"]);
            assert_eq!(new_tags, vec!["ideas", "later"]);
        }
        other => panic!("Expected Create command, got {:?}", other),
    }
}

#[test]
fn given_password_when_debug_formatting_args_then_hides_it() {
    // Arrange
    let args = vec!["notedesk", "whoami", "--email", "me@example.com", "--password", "hunter2"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();
    let debug = format!("{:?}", parsed);

    // Assert
    assert!(debug.contains("me@example.com"));
    assert!(!debug.contains("hunter2"));
}

#[test]
fn given_tag_filter_when_executing_list_then_prints_tagged_notes() {
    // Arrange
    let api = MockNotesApi::builder().with_notes(sample_notes()).build();
    let command = Command::List {
        query: None,
        tags: vec!["t1".to_string()],
    };

    // Act
    let (_, result, out) = run_command(api, command, None, "");

    // Assert
    assert!(result.is_ok());
    assert!(out.contains("Groceries"));
    assert!(!out.contains("Work plan"));
}

#[test]
fn given_note_when_executing_show_json_then_prints_note_json() -> Result<()> {
    // Arrange
    let api = MockNotesApi::builder().with_notes(sample_notes()).build();
    let command = Command::Show {
        note_id: "2".to_string(),
        json: true,
    };

    // Act
    let (_, result, out) = run_command(api, command, None, "");

    // Assert
    result?;
    let value: serde_json::Value = serde_json::from_str(&out)?;
    assert_eq!(value["title"], "Work plan");
    Ok(())
}

#[test]
fn given_unknown_note_when_executing_show_then_fails_with_not_found() {
    // Arrange
    let api = MockNotesApi::builder().with_notes(sample_notes()).build();
    let command = Command::Show {
        note_id: "99".to_string(),
        json: false,
    };

    // Act
    let (_, result, _) = run_command(api, command, None, "");

    // Assert
    assert_eq!(result.unwrap_err().to_string(), "Note not found: 99");
}

#[test]
fn given_no_credentials_when_executing_create_then_asks_to_sign_in() {
    // Arrange
    let api = MockNotesApi::builder().with_notes(sample_notes()).build();
    let command = Command::Create {
        title: "Plan".to_string(),
        content: String::new(),
        tags: vec![],
        new_tags: vec![],
    };

    // Act
    let (workspace, result, _) = run_command(api, command, None, "");

    // Assert
    assert_eq!(result.unwrap_err().to_string(), "Please sign in to save notes.");
    assert!(!workspace.api().was_called(|c| matches!(c, ApiCall::CreateNote)));
}

#[test]
fn given_credentials_when_executing_create_then_signs_in_and_creates() {
    // Arrange
    let api = MockNotesApi::builder()
        .with_account("me@example.com", "secret")
        .with_tags(sample_tags())
        .build();
    let command = Command::Create {
        title: "Plan".to_string(),
        content: "steps".to_string(),
        tags: vec!["t2".to_string()],
        new_tags: vec!["ideas".to_string()],
    };

    // Act
    let (workspace, result, out) = run_command(
        api,
        command,
        Some(Credentials::new("me@example.com", "secret")),
        "",
    );

    // Assert
    assert!(result.is_ok());
    assert!(out.starts_with("Created note "));
    assert!(out.contains("#work #ideas"));
    assert!(workspace.tags().iter().any(|t| t.name == "ideas"));
}

#[test]
fn given_edit_flags_when_executing_edit_then_updates_fields_and_tags() {
    // Arrange
    let api = MockNotesApi::builder()
        .with_user(sample_user())
        .with_notes(sample_notes())
        .with_tags(sample_tags())
        .build();
    let command = Command::Edit {
        note_id: "1".to_string(),
        title: Some("Groceries (weekly)".to_string()),
        content: None,
        tags: vec!["t2".to_string()],
        untags: vec!["t1".to_string()],
        new_tags: vec![],
    };

    // Act
    let (workspace, result, _) = run_command(api, command, None, "");

    // Assert
    assert!(result.is_ok());
    let note = workspace.selected_note().unwrap();
    assert_eq!(note.title, "Groceries (weekly)");
    assert_eq!(note.content, "milk,eggs");
    assert_eq!(note.tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(), vec!["work"]);
}

#[test]
fn given_declined_prompt_when_executing_delete_then_keeps_note() {
    // Arrange
    let api = MockNotesApi::builder()
        .with_user(sample_user())
        .with_notes(sample_notes())
        .build();
    let command = Command::Delete {
        note_id: "1".to_string(),
        yes: false,
    };

    // Act
    let (workspace, result, out) = run_command(api, command, None, "no\n");

    // Assert
    assert!(result.is_ok());
    assert!(out.contains("Delete note \"Groceries\"? [y/N] "));
    assert!(out.contains("Cancelled"));
    assert_eq!(workspace.notes().len(), 2);
}

#[test]
fn given_yes_flag_when_executing_delete_then_deletes_without_prompt() {
    // Arrange
    let api = MockNotesApi::builder()
        .with_user(sample_user())
        .with_notes(sample_notes())
        .build();
    let command = Command::Delete {
        note_id: "1".to_string(),
        yes: true,
    };

    // Act
    let (workspace, result, out) = run_command(api, command, None, "");

    // Assert
    assert!(result.is_ok());
    assert_eq!(out, "Deleted note 1\n");
    assert_eq!(workspace.selection().current(), Some(&NoteId::new("2")));
}

#[test]
fn given_no_session_when_executing_delete_then_refuses_before_prompting() {
    // Arrange
    let api = MockNotesApi::builder().with_notes(sample_notes()).build();
    let command = Command::Delete {
        note_id: "1".to_string(),
        yes: false,
    };

    // Act
    let (workspace, result, out) = run_command(api, command, None, "y\n");

    // Assert
    assert_eq!(result.unwrap_err().to_string(), "Please sign in to delete notes.");
    assert!(!out.contains("[y/N]"));
    assert!(!workspace.api().was_called(|c| matches!(c, ApiCall::DeleteNote(_))));
}

#[test]
fn given_init_with_force_when_parsing_then_succeeds() {
    // Arrange
    let args = vec!["notedesk", "init", "--force", "-c", "/tmp/notedesk.toml"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    assert_eq!(parsed.command, Command::Init { force: true });
}

#[test]
fn given_config_path_when_initializing_then_writes_defaults() -> Result<()> {
    // Arrange
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("nested").join("config.toml");
    let mut out = Vec::new();

    // Act
    init_config(Some(path.as_path()), false, &mut out)?;

    // Assert
    assert_eq!(Config::load(&path)?, Config::default());
    assert!(String::from_utf8(out)?.starts_with("Wrote default config to "));
    Ok(())
}

#[test]
fn given_existing_config_when_initializing_then_requires_force() -> Result<()> {
    // Arrange
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[api]\nbase_url = \"https://mine.example.com\"\n")?;

    // Act
    let refused = init_config(Some(path.as_path()), false, &mut Vec::<u8>::new());
    let kept = Config::load(&path)?;
    init_config(Some(path.as_path()), true, &mut Vec::<u8>::new())?;

    // Assert
    assert!(refused.unwrap_err().to_string().contains("already exists"));
    assert_eq!(kept.api.base_url, "https://mine.example.com");
    assert_eq!(Config::load(&path)?, Config::default());
    Ok(())
}
