// src/cli/commands.rs
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::application::{NotesApi, Workspace};
use crate::cli::args::Command;
use crate::cli::shell;
use crate::domain::{Credentials, NoteId, TagId, TagRef};
use crate::infrastructure::Config;
use crate::ports::TextPresenter;

/// Ask a yes/no question; anything but `y`/`yes` is a no.
pub fn confirm<R: BufRead, W: Write>(question: &str, input: &mut R, out: &mut W) -> Result<bool> {
    write!(out, "{} [y/N] ", question)?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer).context("Failed to read answer")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Writes a default config file to `path`, or to the platform default location.
pub fn init_config<W: Write>(path: Option<&Path>, force: bool, out: &mut W) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path().context("No config directory on this platform")?,
    };
    if path.exists() && !force {
        bail!("Config file {} already exists (use --force to overwrite)", path.display());
    }
    Config::create_default(&path)?;
    info!(path = %path.display(), "Created config file");
    writeln!(out, "Wrote default config to {}", path.display())?;
    Ok(())
}

/// Signs in with `credentials` when a write needs a session and none exists.
fn ensure_signed_in<A: NotesApi>(
    workspace: &mut Workspace<A>,
    credentials: Option<&Credentials>,
) -> Result<()> {
    if workspace.user().is_some() {
        return Ok(());
    }
    if let Some(credentials) = credentials {
        debug!(email = %credentials.email, "Signing in before write");
        workspace.sign_in(credentials)?;
    }
    Ok(())
}

/// Runs one command against an already loaded workspace.
pub fn execute<A: NotesApi, R: BufRead, W: Write>(
    workspace: &mut Workspace<A>,
    command: &Command,
    credentials: Option<&Credentials>,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let presenter = TextPresenter::new();

    match command {
        Command::List { query, tags } => {
            workspace.set_query(query.clone().unwrap_or_default());
            for tag in tags {
                workspace.toggle_tag_filter(TagId::new(tag.as_str()));
            }
            let notes = workspace.filtered_notes();
            write!(out, "{}", presenter.render_list(&notes, workspace.selection().current()))?;
        }

        Command::Show { note_id, json } => {
            let id = NoteId::new(note_id.as_str());
            workspace.select(&id)?;
            let note = workspace.selected_note().context("Selected note vanished")?;
            if *json {
                writeln!(out, "{}", serde_json::to_string_pretty(note)?)?;
            } else {
                write!(out, "{}", presenter.render_detail(Some(note), false))?;
            }
        }

        Command::Tags => {
            write!(out, "{}", presenter.render_tags(workspace.tags(), &[]))?;
        }

        Command::Whoami => {
            write!(out, "{}", presenter.render_user(workspace.user()))?;
        }

        Command::Create {
            title,
            content,
            tags,
            new_tags,
        } => {
            ensure_signed_in(workspace, credentials)?;
            workspace.open_create();
            if let Some(editor) = workspace.editor_mut() {
                editor.title = title.clone();
                editor.content = content.clone();
                for tag in tags {
                    let id = TagId::new(tag.as_str());
                    if !editor.contains(&TagRef::Existing(id.clone())) {
                        editor.toggle_tag(id);
                    }
                }
                for name in new_tags {
                    editor.add_pending_name(name);
                }
            }
            let note = workspace.save()?;
            info!(note_id = %note.id, "Created note");
            writeln!(out, "Created note {}", note.id)?;
            write!(out, "{}", presenter.render_detail(Some(&note), false))?;
        }

        Command::Edit {
            note_id,
            title,
            content,
            tags,
            untags,
            new_tags,
        } => {
            ensure_signed_in(workspace, credentials)?;
            workspace.open_edit(&NoteId::new(note_id.as_str()))?;
            if let Some(editor) = workspace.editor_mut() {
                if let Some(title) = title {
                    editor.title = title.clone();
                }
                if let Some(content) = content {
                    editor.content = content.clone();
                }
                for tag in tags {
                    let id = TagId::new(tag.as_str());
                    if !editor.contains(&TagRef::Existing(id.clone())) {
                        editor.toggle_tag(id);
                    }
                }
                for tag in untags {
                    editor.remove(&TagRef::Existing(TagId::new(tag.as_str())));
                }
                for name in new_tags {
                    editor.add_pending_name(name);
                }
            }
            let note = workspace.save()?;
            info!(note_id = %note.id, "Updated note");
            writeln!(out, "Updated note {}", note.id)?;
            write!(out, "{}", presenter.render_detail(Some(&note), false))?;
        }

        Command::Delete { note_id, yes } => {
            let id = NoteId::new(note_id.as_str());
            ensure_signed_in(workspace, credentials)?;
            workspace.ensure_can_delete()?;
            let title = workspace
                .notes()
                .iter()
                .find(|n| n.id == id)
                .map(|n| n.display_title().to_string())
                .unwrap_or_else(|| id.to_string());
            if !*yes && !confirm(&format!("Delete note \"{}\"?", title), input, out)? {
                writeln!(out, "Cancelled")?;
                return Ok(());
            }
            workspace.delete(&id)?;
            writeln!(out, "Deleted note {}", id)?;
        }

        Command::Shell => {
            if let Some(credentials) = credentials {
                if workspace.user().is_none() {
                    // A failed sign-in is not fatal here; the shell can retry.
                    if let Err(e) = workspace.sign_in(credentials) {
                        writeln!(out, "error: {}", e)?;
                    }
                }
            }
            shell::run(workspace, input, out)?;
        }

        Command::Init { .. } => bail!("'init' runs before connecting to the notes API"),
    }

    Ok(())
}
