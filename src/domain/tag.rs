// src/domain/tag.rs
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub String);

impl TagId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TagId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A label shared across notes. `count` is only present when the server reports usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl Tag {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: TagId::new(id),
            name: name.into(),
            count: None,
        }
    }
}

/// A tag reference held by the edit form.
///
/// `PendingName` is a name typed by the user that is not known to exist yet;
/// the server resolves it (creating the tag if needed) when the note is saved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagRef {
    Existing(TagId),
    PendingName(String),
}

impl TagRef {
    pub fn is_pending(&self) -> bool {
        matches!(self, TagRef::PendingName(_))
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum TagRefWire<'a> {
    Id { id: &'a TagId },
    Name { name: &'a str },
}

impl Serialize for TagRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TagRef::Existing(id) => TagRefWire::Id { id }.serialize(serializer),
            TagRef::PendingName(name) => TagRefWire::Name { name }.serialize(serializer),
        }
    }
}
