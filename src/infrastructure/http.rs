// src/infrastructure/http.rs
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use crate::application::NotesApi;
use crate::domain::{Credentials, DomainError, Note, NoteId, NotePayload, Tag, User};
use crate::infrastructure::config::ApiConfig;

/// `NotesApi` over HTTP+JSON.
///
/// The session lives in the agent's cookie store, so it lasts as long as
/// this value does.
pub struct HttpNotesApi {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpNotesApi {
    pub fn new(config: &ApiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout())
            .user_agent(concat!("notedesk/", env!("CARGO_PKG_VERSION")))
            .build();
        debug!(base_url = %config.base_url, "Created HTTP notes client");
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn note_url(&self, id: &NoteId) -> String {
        self.url(&format!("/notes/{}", urlencoding::encode(id.as_str())))
    }
}

fn read_json<T: DeserializeOwned>(response: ureq::Response) -> Result<T, DomainError> {
    response
        .into_json::<T>()
        .map_err(|e| DomainError::Transport(format!("Invalid response body: {}", e)))
}

fn map_error(err: ureq::Error) -> DomainError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            let message = error_message(status, &body);
            debug!(status, %message, "API returned an error");
            DomainError::Api { status, message }
        }
        ureq::Error::Transport(transport) => DomainError::Transport(transport.to_string()),
    }
}

/// The human-readable part of an error response.
///
/// JSON bodies are searched for a `detail`, `message` or `error` string;
/// anything else is used as plain text.
pub fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.trim().is_empty() {
                    return text.trim().to_string();
                }
            }
        }
    }
    let text = body.trim();
    if text.is_empty() || text.starts_with('{') {
        format!("Request failed with status {}", status)
    } else {
        text.to_string()
    }
}

impl NotesApi for HttpNotesApi {
    #[instrument(level = "debug", skip(self))]
    fn current_user(&mut self) -> Result<Option<User>, DomainError> {
        match self.agent.get(&self.url("/auth/me")).call() {
            Ok(response) => read_json::<Option<User>>(response),
            Err(ureq::Error::Status(401 | 403, _)) => Ok(None),
            Err(e) => Err(map_error(e)),
        }
    }

    #[instrument(level = "debug", skip(self))]
    fn sign_in(&mut self, credentials: &Credentials) -> Result<(), DomainError> {
        self.agent
            .post(&self.url("/auth/signin"))
            .send_json(credentials)
            .map_err(map_error)?;
        info!(email = %credentials.email, "Signed in");
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn sign_up(&mut self, credentials: &Credentials) -> Result<(), DomainError> {
        self.agent
            .post(&self.url("/auth/signup"))
            .send_json(credentials)
            .map_err(map_error)?;
        info!(email = %credentials.email, "Signed up");
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn sign_out(&mut self) -> Result<(), DomainError> {
        self.agent
            .post(&self.url("/auth/signout"))
            .call()
            .map_err(map_error)?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn list_notes(&mut self) -> Result<Vec<Note>, DomainError> {
        let response = self.agent.get(&self.url("/notes")).call().map_err(map_error)?;
        let notes: Vec<Note> = read_json(response)?;
        debug!(count = notes.len(), "Fetched notes");
        Ok(notes)
    }

    #[instrument(level = "debug", skip(self, payload))]
    fn create_note(&mut self, payload: &NotePayload) -> Result<Note, DomainError> {
        let response = self
            .agent
            .post(&self.url("/notes"))
            .send_json(payload)
            .map_err(map_error)?;
        read_json(response)
    }

    #[instrument(level = "debug", skip(self, payload))]
    fn update_note(&mut self, id: &NoteId, payload: &NotePayload) -> Result<Note, DomainError> {
        let response = self
            .agent
            .put(&self.note_url(id))
            .send_json(payload)
            .map_err(map_error)?;
        read_json(response)
    }

    #[instrument(level = "debug", skip(self))]
    fn delete_note(&mut self, id: &NoteId) -> Result<(), DomainError> {
        self.agent
            .delete(&self.note_url(id))
            .call()
            .map_err(map_error)?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn list_tags(&mut self) -> Result<Vec<Tag>, DomainError> {
        let response = self.agent.get(&self.url("/tags")).call().map_err(map_error)?;
        let tags: Vec<Tag> = read_json(response)?;
        debug!(count = tags.len(), "Fetched tags");
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_json_detail_when_extracting_message_then_returns_detail() {
        let message = error_message(400, r#"{"detail":"Email already registered"}"#);

        assert_eq!(message, "Email already registered");
    }

    #[test]
    fn given_json_message_field_when_extracting_then_returns_it() {
        assert_eq!(error_message(401, r#"{"message":"Invalid credentials"}"#), "Invalid credentials");
        assert_eq!(error_message(500, r#"{"error":"boom"}"#), "boom");
    }

    #[test]
    fn given_plain_text_body_when_extracting_then_returns_trimmed_text() {
        assert_eq!(error_message(502, "  Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn given_empty_or_unknown_json_body_when_extracting_then_falls_back_to_status() {
        assert_eq!(error_message(500, ""), "Request failed with status 500");
        assert_eq!(error_message(422, r#"{"detail":[]}"#), "Request failed with status 422");
    }

    #[test]
    fn given_reserved_characters_in_id_when_building_note_url_then_escapes_them() {
        let api = HttpNotesApi::new(&ApiConfig::default());

        assert_eq!(api.note_url(&NoteId::new("abc-123_~.")), "http://localhost:3001/notes/abc-123_~.");
        assert_eq!(api.note_url(&NoteId::new("a/b c")), "http://localhost:3001/notes/a%2Fb%20c");
    }

    #[test]
    fn given_trailing_slash_in_config_when_building_client_then_trims_it() {
        let config = ApiConfig {
            base_url: "http://localhost:3001/".to_string(),
            timeout_secs: 1,
        };

        let api = HttpNotesApi::new(&config);

        assert_eq!(api.base_url(), "http://localhost:3001");
        assert_eq!(api.note_url(&NoteId::new("n 1")), "http://localhost:3001/notes/n%201");
    }
}
