//! Client-side controller for a REST-backed todo list.
//!
//! # Overview
//! `TodoListController` owns the list the view renders and turns user
//! actions (load, add, edit, remove) into tickets for a `TodoService`.
//! Outcomes are fed back with `resolve`, which applies, rolls back or
//! records an error. The controller itself never touches the network.
//!
//! # Design
//! - `TodoClient` is stateless: `build_*` produces a request, `parse_*`
//!   consumes a response. `HttpTodoService` drives it over ureq.
//! - Adds can be optimistic (provisional entry, rolled back on failure) or
//!   confirmed; edits and deletes are always confirmed.
//! - Errors reach the user as one classified `pending_error` line; delete
//!   failures are only logged.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod service;
pub mod state;
pub mod types;

pub use client::TodoClient;
pub use config::{AddStrategy, ConfigError, ControllerConfig};
pub use controller::{
    Dispatch, EditPrompt, Outcome, Resolution, ServiceCall, Ticket, TicketId, TodoListController,
};
pub use error::{ApiError, Classified, ErrorKind, Operation};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::{HttpTodoService, TodoService};
pub use state::TodoListState;
pub use types::{CreateTodo, Entry, EntryId, ProvisionalId, Todo, TodoId, UpdateTodo};
