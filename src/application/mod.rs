// src/application/mod.rs
pub mod api;
pub mod editor;
pub mod filter;
pub mod selection;
pub mod session;
pub mod workspace;

pub use api::NotesApi;
pub use editor::{EditorMode, NoteEditor, TagChip};
pub use filter::{filter_notes, NoteFilter};
pub use selection::Selection;
pub use session::Session;
pub use workspace::{DeleteRequest, SaveRequest, Workspace};
