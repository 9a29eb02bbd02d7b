// src/application/editor.rs
use crate::constants::{SUGGESTED_TAGS_LIMIT, UNTITLED};
use crate::domain::{Note, NoteId, NotePayload, Tag, TagId, TagRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(NoteId),
}

/// A tag reference as the form displays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChip {
    pub tag_ref: TagRef,
    pub label: String,
}

/// The note form: title, content and the tag references to save.
///
/// References never repeat. Existing ids are toggled from the known tag list,
/// free-text names are kept as pending until the server resolves them on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEditor {
    mode: EditorMode,
    pub title: String,
    pub content: String,
    tag_refs: Vec<TagRef>,
}

impl NoteEditor {
    pub fn create() -> Self {
        Self {
            mode: EditorMode::Create,
            title: String::new(),
            content: String::new(),
            tag_refs: vec![],
        }
    }

    pub fn edit(note: &Note) -> Self {
        let mut editor = Self {
            mode: EditorMode::Edit(note.id.clone()),
            title: note.title.clone(),
            content: note.content.clone(),
            tag_refs: vec![],
        };
        for tag in &note.tags {
            editor.insert(TagRef::Existing(tag.id.clone()));
        }
        editor
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn tag_refs(&self) -> &[TagRef] {
        &self.tag_refs
    }

    pub fn contains(&self, tag_ref: &TagRef) -> bool {
        self.tag_refs.contains(tag_ref)
    }

    fn insert(&mut self, tag_ref: TagRef) -> bool {
        if self.contains(&tag_ref) {
            return false;
        }
        self.tag_refs.push(tag_ref);
        true
    }

    pub fn remove(&mut self, tag_ref: &TagRef) -> bool {
        let before = self.tag_refs.len();
        self.tag_refs.retain(|r| r != tag_ref);
        self.tag_refs.len() != before
    }

    /// Adds the tag if absent, removes it otherwise. Returns whether it is now referenced.
    pub fn toggle_tag(&mut self, id: TagId) -> bool {
        let tag_ref = TagRef::Existing(id);
        if self.remove(&tag_ref) {
            false
        } else {
            self.insert(tag_ref)
        }
    }

    /// Returns false for blank input or a name already pending.
    pub fn add_pending_name(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.insert(TagRef::PendingName(name.to_string()))
    }

    /// Known tags not yet referenced, in list order.
    pub fn available_tags<'a>(&self, all: &'a [Tag]) -> Vec<&'a Tag> {
        all.iter()
            .filter(|t| !self.contains(&TagRef::Existing(t.id.clone())))
            .collect()
    }

    pub fn suggested_tags<'a>(&self, all: &'a [Tag]) -> Vec<&'a Tag> {
        let mut available = self.available_tags(all);
        available.truncate(SUGGESTED_TAGS_LIMIT);
        available
    }

    /// Labels for the current references. Ids missing from `all` are skipped.
    pub fn chips(&self, all: &[Tag]) -> Vec<TagChip> {
        self.tag_refs
            .iter()
            .filter_map(|tag_ref| {
                let label = match tag_ref {
                    TagRef::Existing(id) => all.iter().find(|t| &t.id == id)?.name.clone(),
                    TagRef::PendingName(name) => name.clone(),
                };
                Some(TagChip {
                    tag_ref: tag_ref.clone(),
                    label,
                })
            })
            .collect()
    }

    pub fn to_payload(&self) -> NotePayload {
        let title = self.title.trim();
        NotePayload {
            title: if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title.to_string()
            },
            content: self.content.clone(),
            tags: self.tag_refs.clone(),
        }
    }
}
