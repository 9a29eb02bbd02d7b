// src/ports/text.rs
use tracing::instrument;

use crate::application::{EditorMode, NoteEditor};
use crate::constants::{NO_CONTENT, SNIPPET_CHARS};
use crate::domain::{Note, NoteId, Tag, TagId, User};
use crate::util::text::{fit, snippet};

const TITLE_WIDTH: usize = 32;
const INDENT: &str = "           ";

/// Plain-text views of the workspace: list, detail, tag sidebar, editor.
#[derive(Debug, Default)]
pub struct TextPresenter;

impl TextPresenter {
    pub fn new() -> Self {
        Self
    }

    fn tag_line(tags: &[Tag]) -> String {
        tags.iter()
            .map(|t| format!("#{}", t.name))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn join(lines: Vec<String>) -> String {
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn date(note: &Note) -> String {
        note.last_modified()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    #[instrument(level = "trace", skip_all)]
    pub fn render_list(&self, notes: &[&Note], selected: Option<&NoteId>) -> String {
        if notes.is_empty() {
            return "No notes match your filters.\n".to_string();
        }

        let mut lines = Vec::new();
        for note in notes {
            let marker = if Some(&note.id) == selected { '>' } else { ' ' };
            lines.push(format!(
                "{} {:<8} {} {}",
                marker,
                note.id,
                fit(note.display_title(), TITLE_WIDTH),
                Self::date(note)
            ));
            let body = snippet(&note.content, SNIPPET_CHARS);
            lines.push(format!("{}{}", INDENT, if body.is_empty() { NO_CONTENT } else { body.as_str() }));
            if !note.tags.is_empty() {
                lines.push(format!("{}{}", INDENT, Self::tag_line(&note.tags)));
            }
        }
        Self::join(lines)
    }

    pub fn render_detail(&self, note: Option<&Note>, loading: bool) -> String {
        if loading {
            return "Loading...\n".to_string();
        }
        let Some(note) = note else {
            return "Select a note to see details.\n".to_string();
        };

        let mut lines = vec![note.display_title().to_string()];
        if !note.tags.is_empty() {
            lines.push(Self::tag_line(&note.tags));
        }
        let date = Self::date(note);
        lines.push(if date.is_empty() {
            format!("id: {}", note.id)
        } else {
            format!("id: {}  updated: {}", note.id, date)
        });
        lines.push(String::new());
        lines.push(if note.content.is_empty() { NO_CONTENT.to_string() } else { note.content.clone() });
        Self::join(lines)
    }

    pub fn render_tags(&self, tags: &[Tag], selected: &[TagId]) -> String {
        let all_marker = if selected.is_empty() { 'x' } else { ' ' };
        let mut lines = vec![format!("[{}] All notes ({} tags)", all_marker, tags.len())];
        if tags.is_empty() {
            lines.push("No tags. Tags are created when saving a note.".to_string());
        }
        for tag in tags {
            let marker = if selected.contains(&tag.id) { 'x' } else { ' ' };
            let count = tag.count.map(|c| format!(" {}", c)).unwrap_or_default();
            lines.push(format!("[{}] #{} ({}){}", marker, tag.name, tag.id, count));
        }
        Self::join(lines)
    }

    pub fn render_editor(&self, editor: &NoteEditor, all_tags: &[Tag]) -> String {
        let heading = match editor.mode() {
            EditorMode::Create => "Create note".to_string(),
            EditorMode::Edit(id) => format!("Edit note {}", id),
        };
        let chips: Vec<String> = editor.chips(all_tags).into_iter().map(|c| c.label).collect();
        let mut lines = vec![
            heading,
            format!("  title:   {}", editor.title),
            format!("  content: {}", snippet(&editor.content, SNIPPET_CHARS)),
            format!("  tags:    {}", if chips.is_empty() { "-".to_string() } else { chips.join(", ") }),
        ];

        let suggestions: Vec<String> = editor
            .suggested_tags(all_tags)
            .into_iter()
            .map(|t| format!("{} ({})", t.name, t.id))
            .collect();
        if !suggestions.is_empty() {
            lines.push(format!("  add:     {}", suggestions.join(", ")));
        }
        Self::join(lines)
    }

    pub fn render_user(&self, user: Option<&User>) -> String {
        match user {
            Some(user) => format!("Signed in as {}\n", user.email),
            None => "Not signed in\n".to_string(),
        }
    }
}
