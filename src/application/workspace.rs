// src/application/workspace.rs
use std::collections::HashSet;

use tracing::{debug, info, instrument, warn};

use crate::application::editor::{EditorMode, NoteEditor};
use crate::application::filter::NoteFilter;
use crate::application::selection::Selection;
use crate::application::session::Session;
use crate::application::NotesApi;
use crate::domain::{
    Action, Credentials, DomainError, Note, NoteId, NotePayload, Tag, TagId, User,
};

/// A save that passed the session and busy checks and awaits the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub mode: EditorMode,
    pub payload: NotePayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub id: NoteId,
}

/// Client-side state for one session: the note list mirrored from the
/// server, the tag list, the filter inputs, the current note and the open
/// editor.
///
/// Writes come in two halves. `begin_*` runs the client-side checks and marks
/// the action in flight; `finish_*` applies the server's answer. The one-call
/// forms (`save`, `delete`) do both around a request through the owned API.
pub struct Workspace<A: NotesApi> {
    api: A,
    session: Session,
    notes: Vec<Note>,
    tags: Vec<Tag>,
    query: String,
    selected_tag_ids: Vec<TagId>,
    selection: Selection,
    editor: Option<NoteEditor>,
    in_flight: HashSet<Action>,
    loading: bool,
}

impl<A: NotesApi> Workspace<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            session: Session::default(),
            notes: vec![],
            tags: vec![],
            query: String::new(),
            selected_tag_ids: vec![],
            selection: Selection::default(),
            editor: None,
            in_flight: HashSet::new(),
            loading: true,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_busy(&self, action: Action) -> bool {
        self.in_flight.contains(&action)
    }

    fn begin(&mut self, action: Action) -> Result<(), DomainError> {
        if !self.in_flight.insert(action) {
            debug!(%action, "Rejected duplicate submission");
            return Err(DomainError::Busy(action));
        }
        Ok(())
    }

    fn finish(&mut self, action: Action) {
        self.in_flight.remove(&action);
    }

    /// Fetches user, tags and notes. Failures degrade to "no user" and empty lists.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&mut self) {
        if self.begin(Action::Load).is_err() {
            return;
        }
        self.loading = true;

        let user = self.api.current_user().unwrap_or_else(|e| {
            warn!(error = %e, "Could not fetch current user");
            None
        });
        self.session.set_user(user);
        self.tags = self.fetch_tags().unwrap_or_default();
        self.notes = self.api.list_notes().unwrap_or_else(|e| {
            warn!(error = %e, "Could not fetch notes");
            vec![]
        });
        self.selection.on_load(&self.notes);

        info!(
            notes = self.notes.len(),
            tags = self.tags.len(),
            signed_in = self.session.is_signed_in(),
            "Workspace loaded"
        );
        self.loading = false;
        self.finish(Action::Load);
    }

    fn fetch_tags(&mut self) -> Option<Vec<Tag>> {
        match self.api.list_tags() {
            Ok(tags) => Some(tags),
            Err(e) => {
                warn!(error = %e, "Could not fetch tags");
                None
            }
        }
    }

    /// Re-fetches tags, keeping the current list when the request fails.
    pub fn refresh_tags(&mut self) {
        if let Some(tags) = self.fetch_tags() {
            self.tags = tags;
        }
    }

    // Filtering

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn selected_tag_ids(&self) -> &[TagId] {
        &self.selected_tag_ids
    }

    /// Returns whether the tag is selected afterwards.
    pub fn toggle_tag_filter(&mut self, id: TagId) -> bool {
        if let Some(pos) = self.selected_tag_ids.iter().position(|t| t == &id) {
            self.selected_tag_ids.remove(pos);
            false
        } else {
            self.selected_tag_ids.push(id);
            true
        }
    }

    pub fn clear_tag_filter(&mut self) {
        self.selected_tag_ids.clear();
    }

    pub fn filtered_notes(&self) -> Vec<&Note> {
        NoteFilter::new(&self.query, &self.selected_tag_ids).apply(&self.notes)
    }

    // Selection

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select(&mut self, id: &NoteId) -> Result<(), DomainError> {
        if !self.notes.iter().any(|n| &n.id == id) {
            return Err(DomainError::NoteNotFound(id.to_string()));
        }
        self.selection.select(id.clone());
        Ok(())
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.selection.resolve(&self.notes)
    }

    // Editor

    pub fn open_create(&mut self) {
        self.editor = Some(NoteEditor::create());
    }

    pub fn open_edit(&mut self, id: &NoteId) -> Result<(), DomainError> {
        let note = self
            .notes
            .iter()
            .find(|n| &n.id == id)
            .ok_or_else(|| DomainError::NoteNotFound(id.to_string()))?;
        self.editor = Some(NoteEditor::edit(note));
        Ok(())
    }

    pub fn editor(&self) -> Option<&NoteEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut NoteEditor> {
        self.editor.as_mut()
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    // Save

    pub fn begin_save(&mut self) -> Result<SaveRequest, DomainError> {
        let editor = self.editor.as_ref().ok_or(DomainError::NoEditorOpen)?;
        let request = SaveRequest {
            mode: editor.mode().clone(),
            payload: editor.to_payload(),
        };
        self.session.require_user("save notes")?;
        self.begin(Action::Save)?;
        Ok(request)
    }

    /// Applies the server's answer to a save. On error nothing but the busy flag changes.
    #[instrument(level = "debug", skip(self, request, result))]
    pub fn finish_save(
        &mut self,
        request: SaveRequest,
        result: Result<Note, DomainError>,
    ) -> Result<Note, DomainError> {
        self.finish(Action::Save);
        let saved = result.inspect_err(|e| warn!(error = %e, "Save failed"))?;

        // An update whose note vanished meanwhile is reinserted at the front.
        match self.notes.iter().position(|n| n.id == saved.id) {
            Some(index) => self.notes[index] = saved.clone(),
            None => self.notes.insert(0, saved.clone()),
        }
        self.selection.on_saved(&saved);
        self.editor = None;
        info!(note_id = %saved.id, "Saved note");

        if request.payload.has_pending_names() {
            self.refresh_tags();
        }
        Ok(saved)
    }

    pub fn save(&mut self) -> Result<Note, DomainError> {
        let request = self.begin_save()?;
        let result = match &request.mode {
            EditorMode::Create => self.api.create_note(&request.payload),
            EditorMode::Edit(id) => self.api.update_note(id, &request.payload),
        };
        self.finish_save(request, result)
    }

    // Delete

    /// The session check of `begin_delete`, for callers that ask before deleting.
    pub fn ensure_can_delete(&self) -> Result<(), DomainError> {
        self.session.require_user("delete notes")?;
        Ok(())
    }

    pub fn begin_delete(&mut self, id: &NoteId) -> Result<DeleteRequest, DomainError> {
        self.ensure_can_delete()?;
        if !self.notes.iter().any(|n| &n.id == id) {
            return Err(DomainError::NoteNotFound(id.to_string()));
        }
        self.begin(Action::Delete)?;
        Ok(DeleteRequest { id: id.clone() })
    }

    #[instrument(level = "debug", skip(self, result))]
    pub fn finish_delete(
        &mut self,
        request: DeleteRequest,
        result: Result<(), DomainError>,
    ) -> Result<(), DomainError> {
        self.finish(Action::Delete);
        result.inspect_err(|e| warn!(error = %e, "Delete failed"))?;

        let before = std::mem::take(&mut self.notes);
        self.notes = before
            .iter()
            .filter(|n| n.id != request.id)
            .cloned()
            .collect();
        self.selection.on_deleted(&request.id, &before);
        info!(note_id = %request.id, "Deleted note");
        Ok(())
    }

    pub fn delete(&mut self, id: &NoteId) -> Result<(), DomainError> {
        let request = self.begin_delete(id)?;
        let result = self.api.delete_note(&request.id);
        self.finish_delete(request, result)
    }

    // Session

    pub fn sign_in(&mut self, credentials: &Credentials) -> Result<User, DomainError> {
        self.authenticate(Action::SignIn, credentials)
    }

    pub fn sign_up(&mut self, credentials: &Credentials) -> Result<User, DomainError> {
        self.authenticate(Action::SignUp, credentials)
    }

    #[instrument(level = "debug", skip(self))]
    fn authenticate(&mut self, action: Action, credentials: &Credentials) -> Result<User, DomainError> {
        credentials.validate()?;
        self.begin(action)?;
        let result = self.request_session(action, credentials);
        self.finish(action);

        let user = result?;
        info!(email = %user.email, %action, "Authenticated");
        self.session.set_user(Some(user.clone()));

        // What the anonymous load returned may not be this user's view.
        self.refresh_tags();
        match self.api.list_notes() {
            Ok(notes) => {
                self.notes = notes;
                self.selection.on_load(&self.notes);
            }
            Err(e) => warn!(error = %e, "Could not refresh notes after sign in"),
        }
        Ok(user)
    }

    fn request_session(&mut self, action: Action, credentials: &Credentials) -> Result<User, DomainError> {
        let sent = match action {
            Action::SignUp => self.api.sign_up(credentials),
            _ => self.api.sign_in(credentials),
        };
        sent.map_err(|e| match e {
            DomainError::Api { message, .. } => DomainError::Authentication(message),
            other => other,
        })?;
        self.api
            .current_user()?
            .ok_or_else(|| DomainError::Authentication("Session was not established".to_string()))
    }

    pub fn sign_out(&mut self) -> Result<(), DomainError> {
        self.begin(Action::SignOut)?;
        let result = self.api.sign_out();
        self.finish(Action::SignOut);
        result?;
        self.session.clear();
        info!("Signed out");
        Ok(())
    }
}
