//! Error types for the todo API client and their user-facing classification.
//!
//! # Design
//! `ApiError` describes what went wrong on the wire. The controller never
//! shows it directly: `ApiError::classify` maps it onto one of three kinds
//! and a message suitable for the list's error banner.
//!
//! - status 5xx is a `Server` error with a fixed apology,
//! - a JSON body carrying `message` (or `error`) is surfaced verbatim,
//! - anything else gets the generic "Failed to ..." line for the operation.

use serde::Deserialize;
use thiserror::Error;

pub const SERVER_ERROR_MESSAGE: &str = "Server error occurred. Please try again later.";

/// Errors returned by `TodoClient` parse methods and `TodoService` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 404 — the requested todo does not exist.
    #[error("resource not found")]
    NotFound { body: String },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// The remote operation an error came from. Picks the generic fallback line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Add,
    Update,
    Delete,
}

impl Operation {
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Fetch => "Failed to fetch todos",
            Operation::Add => "Failed to add todo",
            Operation::Update => "Failed to update todo",
            Operation::Delete => "Failed to delete todo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Server,
    ClientReported,
    Transport,
}

/// A classified failure: what the user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn body(&self) -> Option<&str> {
        match self {
            ApiError::NotFound { body } | ApiError::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn classify(&self, op: Operation) -> Classified {
        if self.status().is_some_and(|s| s >= 500) {
            return Classified {
                kind: ErrorKind::Server,
                message: SERVER_ERROR_MESSAGE.to_string(),
            };
        }
        if let Some(message) = self.body().and_then(reported_message) {
            return Classified {
                kind: ErrorKind::ClientReported,
                message,
            };
        }
        Classified {
            kind: ErrorKind::Transport,
            message: op.fallback_message().to_string(),
        }
    }
}

fn reported_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
}
