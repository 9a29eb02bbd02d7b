// src/util/testing.rs

use anyhow::Result;
use std::env;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::NotesApi;
use crate::domain::{
    Credentials, DomainError, Note, NoteId, NotePayload, Tag, TagId, TagRef, User, UserId,
};

/// One request made against [`MockNotesApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    CurrentUser,
    SignIn,
    SignUp,
    SignOut,
    ListNotes,
    CreateNote,
    UpdateNote(NoteId),
    DeleteNote(NoteId),
    ListTags,
}

/// In-memory stand-in for the notes service.
///
/// Keeps server-side state (notes, tags, accounts, the signed-in user),
/// records every call, and can be told to fail specific calls.
///
/// # Examples
///
/// ```
/// use notedesk::application::{NotesApi, Workspace};
/// use notedesk::domain::Note;
/// use notedesk::util::testing::{ApiCall, MockNotesApi};
///
/// let mock = MockNotesApi::builder()
///     .with_notes(vec![Note::new("1", "Groceries", "milk")])
///     .build();
/// let mut workspace = Workspace::new(mock);
/// workspace.load();
///
/// assert_eq!(workspace.notes().len(), 1);
/// assert!(workspace.api().was_called(|c| matches!(c, ApiCall::ListNotes)));
/// ```
pub struct MockNotesApi {
    notes: Vec<Note>,
    tags: Vec<Tag>,
    accounts: Vec<Credentials>,
    user: Option<User>,
    failures: Vec<(ApiCall, DomainError)>,
    calls: Vec<ApiCall>,
    next_id: usize,
}

impl MockNotesApi {
    pub fn builder() -> MockNotesApiBuilder {
        MockNotesApiBuilder::new()
    }

    pub fn calls(&self) -> &[ApiCall] {
        &self.calls
    }

    pub fn was_called(&self, predicate: impl Fn(&ApiCall) -> bool) -> bool {
        self.calls.iter().any(predicate)
    }

    /// Server-side notes, as they stand after the calls so far.
    pub fn stored_notes(&self) -> &[Note] {
        &self.notes
    }

    fn record(&mut self, call: ApiCall) -> Result<(), DomainError> {
        debug!(?call, "Mock API call");
        let failure = self
            .failures
            .iter()
            .find(|(c, _)| c == &call)
            .map(|(_, e)| e.clone());
        self.calls.push(call);
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn require_session(&self) -> Result<(), DomainError> {
        if self.user.is_none() {
            return Err(DomainError::Api {
                status: 401,
                message: "Not authenticated".to_string(),
            });
        }
        Ok(())
    }

    fn not_found(id: &NoteId) -> DomainError {
        DomainError::Api {
            status: 404,
            message: format!("Note {} not found", id),
        }
    }

    fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }

    /// Create-if-absent resolution of the payload's references.
    fn resolve_tags(&mut self, refs: &[TagRef]) -> Vec<Tag> {
        let mut resolved: Vec<Tag> = vec![];
        for tag_ref in refs {
            let tag = match tag_ref {
                TagRef::Existing(id) => match self.tags.iter().find(|t| &t.id == id) {
                    Some(tag) => tag.clone(),
                    None => continue,
                },
                TagRef::PendingName(name) => {
                    match self.tags.iter().find(|t| &t.name == name) {
                        Some(tag) => tag.clone(),
                        None => {
                            let tag = Tag {
                                id: TagId::new(self.allocate_id("t")),
                                name: name.clone(),
                                count: None,
                            };
                            self.tags.push(tag.clone());
                            tag
                        }
                    }
                }
            };
            if !resolved.iter().any(|t| t.id == tag.id) {
                resolved.push(tag);
            }
        }
        resolved
    }

    fn sign_in_as(&mut self, email: &str) {
        self.user = Some(User {
            id: UserId(format!("user-{}", email)),
            email: email.to_string(),
        });
    }
}

impl NotesApi for MockNotesApi {
    fn current_user(&mut self) -> Result<Option<User>, DomainError> {
        self.record(ApiCall::CurrentUser)?;
        Ok(self.user.clone())
    }

    fn sign_in(&mut self, credentials: &Credentials) -> Result<(), DomainError> {
        self.record(ApiCall::SignIn)?;
        if !self.accounts.contains(credentials) {
            return Err(DomainError::Api {
                status: 401,
                message: "Invalid credentials".to_string(),
            });
        }
        self.sign_in_as(&credentials.email);
        Ok(())
    }

    fn sign_up(&mut self, credentials: &Credentials) -> Result<(), DomainError> {
        self.record(ApiCall::SignUp)?;
        if self.accounts.iter().any(|a| a.email == credentials.email) {
            return Err(DomainError::Api {
                status: 409,
                message: "Email already registered".to_string(),
            });
        }
        self.accounts.push(credentials.clone());
        self.sign_in_as(&credentials.email);
        Ok(())
    }

    fn sign_out(&mut self) -> Result<(), DomainError> {
        self.record(ApiCall::SignOut)?;
        self.user = None;
        Ok(())
    }

    fn list_notes(&mut self) -> Result<Vec<Note>, DomainError> {
        self.record(ApiCall::ListNotes)?;
        Ok(self.notes.clone())
    }

    fn create_note(&mut self, payload: &NotePayload) -> Result<Note, DomainError> {
        self.record(ApiCall::CreateNote)?;
        self.require_session()?;
        let id = self.allocate_id("n");
        let tags = self.resolve_tags(&payload.tags);
        let note = Note::new(id, payload.title.clone(), payload.content.clone()).with_tags(tags);
        self.notes.insert(0, note.clone());
        Ok(note)
    }

    fn update_note(&mut self, id: &NoteId, payload: &NotePayload) -> Result<Note, DomainError> {
        self.record(ApiCall::UpdateNote(id.clone()))?;
        self.require_session()?;
        let tags = self.resolve_tags(&payload.tags);
        let note = self
            .notes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        note.title = payload.title.clone();
        note.content = payload.content.clone();
        note.tags = tags;
        Ok(note.clone())
    }

    fn delete_note(&mut self, id: &NoteId) -> Result<(), DomainError> {
        self.record(ApiCall::DeleteNote(id.clone()))?;
        self.require_session()?;
        let before = self.notes.len();
        self.notes.retain(|n| &n.id != id);
        if self.notes.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    fn list_tags(&mut self) -> Result<Vec<Tag>, DomainError> {
        self.record(ApiCall::ListTags)?;
        Ok(self.tags.clone())
    }
}

/// Builder for MockNotesApi
///
/// Provides a fluent interface for configuring mock behavior.
pub struct MockNotesApiBuilder {
    notes: Vec<Note>,
    tags: Vec<Tag>,
    accounts: Vec<Credentials>,
    user: Option<User>,
    failures: Vec<(ApiCall, DomainError)>,
}

impl MockNotesApiBuilder {
    pub fn new() -> Self {
        Self {
            notes: vec![],
            tags: vec![],
            accounts: vec![],
            user: None,
            failures: vec![],
        }
    }

    pub fn with_notes(mut self, notes: Vec<Note>) -> Self {
        self.notes.extend(notes);
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Register credentials that `sign_in` accepts
    pub fn with_account(mut self, email: &str, password: &str) -> Self {
        self.accounts.push(Credentials::new(email, password));
        self
    }

    /// Start with this user already signed in
    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    /// Make every matching call fail with `error`
    pub fn with_failure(mut self, call: ApiCall, error: DomainError) -> Self {
        self.failures.push((call, error));
        self
    }

    pub fn build(self) -> MockNotesApi {
        MockNotesApi {
            notes: self.notes,
            tags: self.tags,
            accounts: self.accounts,
            user: self.user,
            failures: self.failures,
            calls: vec![],
            next_id: 100,
        }
    }
}

impl Default for MockNotesApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["ureq", "rustls", "cookie_store"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
