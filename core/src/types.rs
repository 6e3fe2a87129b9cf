//! Domain DTOs for the todo API and the list entries built from them.
//!
//! # Design
//! Wire types mirror the mock-server's schema but are defined independently;
//! integration tests catch any schema drift between the two crates.
//!
//! Confirmed and provisional identifiers are separate types. A provisional
//! id is minted locally for an optimistic add and can never compare equal to
//! a server-assigned `TodoId`, so the two namespaces cannot collide.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Opaque, server-assigned todo identifier.
///
/// Backends disagree on id shape (UUID strings, document ids, integers), so
/// the id is kept as text. Integer ids are accepted on input and stored in
/// their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => TodoId(s),
            RawId::Signed(n) => TodoId(n.to_string()),
            RawId::Unsigned(n) => TodoId(n.to_string()),
        })
    }
}

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    #[serde(alias = "_id")]
    pub id: TodoId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Locally minted id for an add that the server has not confirmed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProvisionalId(Uuid);

impl ProvisionalId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ProvisionalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tmp-{}", self.0)
    }
}

/// Identity of a list entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryId {
    Confirmed(TodoId),
    Provisional(ProvisionalId),
}

impl EntryId {
    pub fn confirmed(&self) -> Option<&TodoId> {
        match self {
            EntryId::Confirmed(id) => Some(id),
            EntryId::Provisional(_) => None,
        }
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self, EntryId::Provisional(_))
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Confirmed(id) => id.fmt(f),
            EntryId::Provisional(id) => id.fmt(f),
        }
    }
}

/// One row of the displayed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub text: String,
    pub completed: bool,
}

impl Entry {
    pub fn provisional(id: ProvisionalId, text: String) -> Self {
        Self {
            id: EntryId::Provisional(id),
            text,
            completed: false,
        }
    }

    pub fn is_provisional(&self) -> bool {
        self.id.is_provisional()
    }
}

impl From<Todo> for Entry {
    fn from(todo: Todo) -> Self {
        Self {
            id: EntryId::Confirmed(todo.id),
            text: todo.text,
            completed: todo.completed,
        }
    }
}
