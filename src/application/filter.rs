// src/application/filter.rs
use crate::domain::{Note, TagId};

/// Query text plus selected tags, applied as an AND of both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    needle: String,
    tag_ids: Vec<TagId>,
}

impl NoteFilter {
    pub fn new(query: &str, tag_ids: &[TagId]) -> Self {
        Self {
            needle: query.trim().to_lowercase(),
            tag_ids: tag_ids.to_vec(),
        }
    }

    pub fn matches(&self, note: &Note) -> bool {
        self.matches_query(note) && self.matches_tags(note)
    }

    fn matches_query(&self, note: &Note) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        note.title.to_lowercase().contains(&self.needle)
            || note.content.to_lowercase().contains(&self.needle)
            || note
                .tags
                .iter()
                .any(|t| t.name.to_lowercase().contains(&self.needle))
    }

    fn matches_tags(&self, note: &Note) -> bool {
        self.tag_ids.is_empty() || self.tag_ids.iter().any(|id| note.has_tag(id))
    }

    /// Matching notes, in their original order.
    pub fn apply<'a>(&self, notes: &'a [Note]) -> Vec<&'a Note> {
        notes.iter().filter(|n| self.matches(n)).collect()
    }
}

/// Owned convenience over [`NoteFilter::apply`].
pub fn filter_notes(notes: &[Note], query: &str, tag_ids: &[TagId]) -> Vec<Note> {
    NoteFilter::new(query, tag_ids)
        .apply(notes)
        .into_iter()
        .cloned()
        .collect()
}
