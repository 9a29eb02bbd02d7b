// src/application/selection.rs
use crate::domain::{Note, NoteId};
use tracing::debug;

/// The "current" note, tracked by id against the unfiltered note list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<NoteId>,
}

impl Selection {
    pub fn current(&self) -> Option<&NoteId> {
        self.current.as_ref()
    }

    pub fn is_selected(&self, id: &NoteId) -> bool {
        self.current.as_ref() == Some(id)
    }

    /// After the initial fetch: first note of the source list, if any.
    pub fn on_load(&mut self, notes: &[Note]) {
        self.current = notes.first().map(|n| n.id.clone());
        debug!(current = ?self.current, "Selection after load");
    }

    pub fn select(&mut self, id: NoteId) {
        self.current = Some(id);
    }

    /// A note was just created or updated.
    pub fn on_saved(&mut self, note: &Note) {
        self.current = Some(note.id.clone());
    }

    /// `notes_before` is the list as it was before `deleted` was removed.
    pub fn on_deleted(&mut self, deleted: &NoteId, notes_before: &[Note]) {
        if !self.is_selected(deleted) {
            return;
        }
        self.current = notes_before
            .iter()
            .find(|n| &n.id != deleted)
            .map(|n| n.id.clone());
        debug!(current = ?self.current, "Selection after delete");
    }

    pub fn resolve<'a>(&self, notes: &'a [Note]) -> Option<&'a Note> {
        let id = self.current.as_ref()?;
        notes.iter().find(|n| &n.id == id)
    }
}
