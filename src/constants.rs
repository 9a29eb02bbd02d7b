// src/constants.rs
//
// Application-wide constants. Each one notes where it is used.

/// Placeholder shown, and saved, for notes without a title.
///
/// Used in: `domain/note.rs`, `application/editor.rs`
pub const UNTITLED: &str = "Untitled";

/// Placeholder shown for notes without content.
///
/// Used in: `ports/text.rs`
pub const NO_CONTENT: &str = "No content";

/// Number of content characters shown in a note list row.
///
/// Used in: `ports/text.rs`
pub const SNIPPET_CHARS: usize = 120;

/// Number of unselected tags the edit form offers as suggestions.
///
/// Used in: `application/editor.rs`
pub const SUGGESTED_TAGS_LIMIT: usize = 12;

/// API base URL used when neither the config file nor the command line sets one.
///
/// Used in: `infrastructure/config.rs`
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// HTTP timeout for a single API request.
///
/// Used in: `infrastructure/config.rs`
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Directory under the platform config dir holding `config.toml`.
///
/// Used in: `infrastructure/config.rs`
pub const CONFIG_DIR_NAME: &str = "notedesk";
