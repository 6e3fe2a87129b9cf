//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only the collection URL and carries no mutable state
//! between calls. Each CRUD operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`, so the core stays deterministic and free of I/O.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

/// Characters escaped when an id is placed in a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone)]
pub struct TodoClient {
    collection_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_prefix(base_url, "")
    }

    /// Builds a client whose collection lives at `{base_url}{prefix}/todos`.
    /// `prefix` may be given with or without slashes (`"api"`, `"/api/"`).
    pub fn with_prefix(base_url: &str, prefix: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let prefix = prefix.trim_matches('/');
        let collection_url = if prefix.is_empty() {
            format!("{base}/todos")
        } else {
            format!("{base}/{prefix}/todos")
        };
        Self { collection_url }
    }

    fn item_url(&self, id: &TodoId) -> String {
        format!(
            "{}/{}",
            self.collection_url,
            utf8_percent_encode(id.as_str(), SEGMENT)
        )
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest::bodiless(HttpMethod::Get, self.collection_url.clone())
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest::json(
            HttpMethod::Post,
            self.collection_url.clone(),
            body,
        ))
    }

    pub fn build_update_todo(&self, id: &TodoId, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest::json(HttpMethod::Put, self.item_url(id), body))
    }

    pub fn build_delete_todo(&self, id: &TodoId) -> HttpRequest {
        HttpRequest::bodiless(HttpMethod::Delete, self.item_url(id))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response, &[200])?;
        decode(&response)
    }

    /// Document stores commonly answer a create with 200; both are accepted.
    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, &[201, 200])?;
        decode(&response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, &[200])?;
        decode(&response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[204, 200])?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<(), ApiError> {
    if expected.contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound {
            body: response.body.clone(),
        });
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}
