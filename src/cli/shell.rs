// src/cli/shell.rs
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::application::{NotesApi, Workspace};
use crate::cli::commands::confirm;
use crate::domain::{Credentials, DomainError, NoteId, TagId};
use crate::ports::TextPresenter;

const PROMPT: &str = "notes> ";

const HELP: &str = "\
Browsing
  list                 notes matching the current search and tags
  search [TEXT]        set the search text (empty clears it)
  tag TAG_ID           toggle a tag in the filter
  all                  clear the tag filter
  tags                 tag list
  select NOTE_ID       make a note current and show it
  show                 show the current note
  reload               fetch notes and tags again
Editing
  new                  open the form for a new note
  edit [NOTE_ID]       open the form for a note (default: current)
  title TEXT           set the form title
  content TEXT         set the form content
  toggle TAG_ID        attach or detach an existing tag
  addtag NAME          attach a tag by name, created on save if needed
  form                 show the form
  save                 save the form
  cancel               close the form
  delete [NOTE_ID]     delete a note (default: current)
Session
  signin | signup | signout | whoami
  help | quit
";

enum Flow {
    Continue,
    Quit,
}

fn prompt_line<R: BufRead, W: Write>(label: &str, input: &mut R, out: &mut W) -> Result<String> {
    write!(out, "{}", label)?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read input")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn read_credentials<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Credentials> {
    let email = prompt_line("email: ", input, out)?;
    let password = prompt_line("password: ", input, out)?;
    Ok(Credentials::new(email.trim(), password))
}

fn target_note<A: NotesApi>(workspace: &Workspace<A>, arg: &str) -> Result<NoteId, DomainError> {
    if arg.is_empty() {
        workspace
            .selection()
            .current()
            .cloned()
            .ok_or_else(|| DomainError::InvalidInput("No note selected".to_string()))
    } else {
        Ok(NoteId::new(arg))
    }
}

fn required<'a>(arg: &'a str, what: &str) -> Result<&'a str, DomainError> {
    if arg.is_empty() {
        Err(DomainError::InvalidInput(format!("Missing {}", what)))
    } else {
        Ok(arg)
    }
}

/// Reads commands until `quit` or end of input. Errors are printed and the
/// session continues with its state untouched.
#[instrument(level = "debug", skip_all)]
pub fn run<A: NotesApi, R: BufRead, W: Write>(
    workspace: &mut Workspace<A>,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let presenter = TextPresenter::new();
    write!(out, "{}", presenter.render_user(workspace.user()))?;
    writeln!(out, "{} notes, {} tags. Type 'help' for commands.", workspace.notes().len(), workspace.tags().len())?;

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("Failed to read command")? == 0 {
            writeln!(out)?;
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };
        debug!(command, arg, "Shell command");

        match dispatch(workspace, &presenter, command, arg, input, out) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => writeln!(out, "error: {}", e)?,
        }
    }
    Ok(())
}

fn dispatch<A: NotesApi, R: BufRead, W: Write>(
    workspace: &mut Workspace<A>,
    presenter: &TextPresenter,
    command: &str,
    arg: &str,
    input: &mut R,
    out: &mut W,
) -> Result<Flow> {
    match command {
        "help" | "?" => write!(out, "{}", HELP)?,
        "quit" | "exit" => return Ok(Flow::Quit),

        "list" | "ls" => {
            let notes = workspace.filtered_notes();
            write!(out, "{}", presenter.render_list(&notes, workspace.selection().current()))?;
        }
        "search" => {
            workspace.set_query(arg);
            let notes = workspace.filtered_notes();
            write!(out, "{}", presenter.render_list(&notes, workspace.selection().current()))?;
        }
        "tag" => {
            let id = TagId::new(required(arg, "tag id")?);
            let on = workspace.toggle_tag_filter(id.clone());
            writeln!(out, "Filter {} tag {}", if on { "includes" } else { "no longer includes" }, id)?;
        }
        "all" => {
            workspace.clear_tag_filter();
            writeln!(out, "Showing all notes")?;
        }
        "tags" => write!(out, "{}", presenter.render_tags(workspace.tags(), workspace.selected_tag_ids()))?,
        "select" => {
            workspace.select(&NoteId::new(required(arg, "note id")?))?;
            write!(out, "{}", presenter.render_detail(workspace.selected_note(), false))?;
        }
        "show" => write!(out, "{}", presenter.render_detail(workspace.selected_note(), workspace.is_loading()))?,
        "reload" => {
            workspace.load();
            writeln!(out, "{} notes, {} tags", workspace.notes().len(), workspace.tags().len())?;
        }

        "new" => {
            workspace.open_create();
            write!(out, "{}", render_form(workspace, presenter)?)?;
        }
        "edit" => {
            let id = target_note(workspace, arg)?;
            workspace.open_edit(&id)?;
            write!(out, "{}", render_form(workspace, presenter)?)?;
        }
        "title" => {
            editor(workspace)?.title = arg.to_string();
        }
        "content" => {
            editor(workspace)?.content = arg.to_string();
        }
        "toggle" => {
            let id = TagId::new(required(arg, "tag id")?);
            editor(workspace)?.toggle_tag(id);
            write!(out, "{}", render_form(workspace, presenter)?)?;
        }
        "addtag" => {
            let name = required(arg, "tag name")?;
            if !editor(workspace)?.add_pending_name(name) {
                writeln!(out, "Tag {} is already on this note", name)?;
            }
            write!(out, "{}", render_form(workspace, presenter)?)?;
        }
        "form" => write!(out, "{}", render_form(workspace, presenter)?)?,
        "save" => {
            let note = workspace.save()?;
            writeln!(out, "Saved note {}", note.id)?;
            write!(out, "{}", presenter.render_detail(Some(&note), false))?;
        }
        "cancel" => {
            workspace.close_editor();
            writeln!(out, "Form closed")?;
        }
        "delete" | "rm" => {
            let id = target_note(workspace, arg)?;
            workspace.ensure_can_delete()?;
            if confirm(&format!("Delete note {}?", id), input, out)? {
                workspace.delete(&id)?;
                writeln!(out, "Deleted note {}", id)?;
            } else {
                writeln!(out, "Cancelled")?;
            }
        }

        "signin" | "signup" => {
            let credentials = read_credentials(input, out)?;
            let user = if command == "signin" {
                workspace.sign_in(&credentials)?
            } else {
                workspace.sign_up(&credentials)?
            };
            writeln!(out, "Signed in as {}", user.email)?;
        }
        "signout" => {
            workspace.sign_out()?;
            writeln!(out, "Signed out.")?;
        }
        "whoami" => write!(out, "{}", presenter.render_user(workspace.user()))?,

        other => writeln!(out, "Unknown command '{}'. Type 'help' for commands.", other)?,
    }
    Ok(Flow::Continue)
}

fn editor<A: NotesApi>(workspace: &mut Workspace<A>) -> Result<&mut crate::application::NoteEditor, DomainError> {
    workspace.editor_mut().ok_or(DomainError::NoEditorOpen)
}

fn render_form<A: NotesApi>(workspace: &Workspace<A>, presenter: &TextPresenter) -> Result<String, DomainError> {
    let editor = workspace.editor().ok_or(DomainError::NoEditorOpen)?;
    Ok(presenter.render_editor(editor, workspace.tags()))
}
