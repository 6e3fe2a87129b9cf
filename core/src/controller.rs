//! The todo list controller.
//!
//! # Design
//! The controller owns the list state and never performs I/O. Every
//! operation that needs the server returns a `Ticket` naming the call to
//! make; the host runs it against a `TodoService` (see `Ticket::execute`)
//! and hands the `Outcome` back through `resolve`. Tickets may come back in
//! any order, and each one is applied as it arrives.
//!
//! Per-operation strategy:
//! - `load`: replace on success, keep items on failure.
//! - `add`: optimistic (provisional entry, rolled back on failure) or
//!   confirmed, chosen by `AddStrategy`.
//! - `edit` and `remove`: applied only after the server confirms.
//!
//! A target id with a mutation in flight is busy; further `edit`/`remove`
//! calls on it return `Blocked` instead of queueing. The add input is
//! locked the same way while a create is in flight.
//!
//! Failures are classified into `pending_error`, except `remove`, whose
//! failures are only logged so a retry is never hidden behind a banner.

use std::collections::{HashMap, HashSet};

use crate::config::AddStrategy;
use crate::error::{ApiError, Operation};
use crate::service::TodoService;
use crate::state::TodoListState;
use crate::types::{Entry, ProvisionalId, Todo, TodoId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketId(u64);

/// The remote call a ticket stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    FetchAll,
    Create { text: String, completed: bool },
    Update { id: TodoId, text: String },
    Delete { id: TodoId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: TicketId,
    pub call: ServiceCall,
}

impl Ticket {
    /// Run this ticket's call. The result goes back through
    /// `TodoListController::resolve`.
    pub fn execute<S: TodoService + ?Sized>(&self, service: &S) -> Outcome {
        match &self.call {
            ServiceCall::FetchAll => Outcome::Listed(service.fetch_all()),
            ServiceCall::Create { text, completed } => {
                Outcome::Created(service.create(text, *completed))
            }
            ServiceCall::Update { id, text } => Outcome::Updated(service.update(id, text)),
            ServiceCall::Delete { id } => Outcome::Deleted(service.delete(id)),
        }
    }
}

/// What the service answered for a ticket.
#[derive(Debug)]
pub enum Outcome {
    Listed(Result<Vec<Todo>, ApiError>),
    Created(Result<Todo, ApiError>),
    Updated(Result<Todo, ApiError>),
    Deleted(Result<(), ApiError>),
}

/// Result of asking the controller to do something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// State was updated as needed; the ticket must be executed.
    Sent(Ticket),
    /// Input rejected. Nothing changed, nothing to send.
    Ignored,
    /// The triggering control is disabled by a mutation in flight.
    Blocked,
}

impl Dispatch {
    pub fn ticket(self) -> Option<Ticket> {
        match self {
            Dispatch::Sent(ticket) => Some(ticket),
            _ => None,
        }
    }
}

/// How a resolved ticket landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// An optimistic add was undone.
    RolledBack,
    Failed,
    /// Unknown ticket, already resolved, or controller torn down.
    Stale,
}

/// The `awaiting-edit-input` state: the view shows a dialog for `id` and
/// answers through `finish_edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPrompt {
    pub id: TodoId,
    pub current: String,
}

#[derive(Debug)]
enum Pending {
    Fetch,
    Add { provisional: Option<ProvisionalId> },
    Edit { id: TodoId },
    Remove { id: TodoId },
}

#[derive(Debug, Default)]
pub struct TodoListController {
    state: TodoListState,
    strategy: AddStrategy,
    input: String,
    adding: bool,
    busy: HashSet<TodoId>,
    edit_prompt: Option<EditPrompt>,
    pending: HashMap<TicketId, Pending>,
    next_ticket: u64,
    torn_down: bool,
}

impl TodoListController {
    pub fn new(strategy: AddStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &TodoListState {
        &self.state
    }

    pub fn items(&self) -> &[Entry] {
        &self.state.items
    }

    pub fn pending_error(&self) -> Option<&str> {
        self.state.pending_error.as_deref()
    }

    pub fn strategy(&self) -> AddStrategy {
        self.strategy
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// True while a create is in flight; the input and submit control are
    /// disabled.
    pub fn is_adding(&self) -> bool {
        self.adding
    }

    /// True while `id` has an edit or delete in flight.
    pub fn is_busy(&self, id: &TodoId) -> bool {
        self.busy.contains(id)
    }

    pub fn edit_prompt(&self) -> Option<&EditPrompt> {
        self.edit_prompt.as_ref()
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn issue(&mut self, pending: Pending, call: ServiceCall) -> Dispatch {
        let id = TicketId(self.next_ticket);
        self.next_ticket += 1;
        tracing::debug!(ticket = id.0, call = ?call, "dispatching");
        self.pending.insert(id, pending);
        Dispatch::Sent(Ticket { id, call })
    }

    pub fn load(&mut self) -> Dispatch {
        if self.torn_down {
            return Dispatch::Ignored;
        }
        self.state.pending_error = None;
        self.issue(Pending::Fetch, ServiceCall::FetchAll)
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        if !self.adding && !self.torn_down {
            self.input = text.into();
        }
    }

    /// Submit the input box.
    pub fn submit(&mut self) -> Dispatch {
        let text = self.input.clone();
        self.add(&text)
    }

    pub fn add(&mut self, text: &str) -> Dispatch {
        if self.torn_down || text.trim().is_empty() {
            return Dispatch::Ignored;
        }
        if self.adding {
            return Dispatch::Blocked;
        }
        self.state.pending_error = None;
        self.input.clear();
        self.adding = true;

        let provisional = match self.strategy {
            AddStrategy::Optimistic => {
                let provisional = ProvisionalId::generate();
                self.state
                    .push_front(Entry::provisional(provisional, text.to_string()));
                Some(provisional)
            }
            AddStrategy::Confirmed => None,
        };
        self.issue(
            Pending::Add { provisional },
            ServiceCall::Create {
                text: text.to_string(),
                completed: false,
            },
        )
    }

    /// Enter `awaiting-edit-input` for `id`. Returns None when `id` is not a
    /// confirmed entry or is busy.
    pub fn begin_edit(&mut self, id: &TodoId) -> Option<&EditPrompt> {
        if self.torn_down || self.is_busy(id) {
            return None;
        }
        let current = self.state.get(id)?.text.clone();
        self.edit_prompt = Some(EditPrompt {
            id: id.clone(),
            current,
        });
        self.edit_prompt.as_ref()
    }

    /// Answer the open edit prompt. `None` means the user cancelled.
    pub fn finish_edit(&mut self, reply: Option<&str>) -> Dispatch {
        let Some(prompt) = self.edit_prompt.take() else {
            return Dispatch::Ignored;
        };
        match reply {
            Some(text) => self.edit(&prompt.id, text),
            None => Dispatch::Ignored,
        }
    }

    pub fn edit(&mut self, id: &TodoId, new_text: &str) -> Dispatch {
        if self.torn_down || new_text.trim().is_empty() || !self.state.contains(id) {
            return Dispatch::Ignored;
        }
        if !self.busy.insert(id.clone()) {
            return Dispatch::Blocked;
        }
        self.state.pending_error = None;
        self.issue(
            Pending::Edit { id: id.clone() },
            ServiceCall::Update {
                id: id.clone(),
                text: new_text.to_string(),
            },
        )
    }

    pub fn remove(&mut self, id: &TodoId) -> Dispatch {
        if self.torn_down || !self.state.contains(id) {
            return Dispatch::Ignored;
        }
        if !self.busy.insert(id.clone()) {
            return Dispatch::Blocked;
        }
        self.state.pending_error = None;
        self.issue(
            Pending::Remove { id: id.clone() },
            ServiceCall::Delete { id: id.clone() },
        )
    }

    /// Apply the outcome of a ticket.
    pub fn resolve(&mut self, ticket: TicketId, outcome: Outcome) -> Resolution {
        if self.torn_down {
            tracing::debug!(ticket = ticket.0, "late response after teardown ignored");
            return Resolution::Stale;
        }
        let Some(pending) = self.pending.remove(&ticket) else {
            tracing::debug!(ticket = ticket.0, "unknown ticket ignored");
            return Resolution::Stale;
        };

        match pending {
            Pending::Fetch => {
                let result = match outcome {
                    Outcome::Listed(result) => result,
                    other => Err(mismatch(&other)),
                };
                self.finish_fetch(result)
            }
            Pending::Add { provisional } => {
                self.adding = false;
                let result = match outcome {
                    Outcome::Created(result) => result,
                    other => Err(mismatch(&other)),
                };
                self.finish_add(provisional, result)
            }
            Pending::Edit { id } => {
                self.busy.remove(&id);
                let result = match outcome {
                    Outcome::Updated(result) => result,
                    other => Err(mismatch(&other)),
                };
                self.finish_edit_call(&id, result)
            }
            Pending::Remove { id } => {
                self.busy.remove(&id);
                let result = match outcome {
                    Outcome::Deleted(result) => result,
                    other => Err(mismatch(&other)),
                };
                self.finish_remove(&id, result)
            }
        }
    }

    /// Execute `dispatch` against `service` right away and resolve it.
    /// Returns None when nothing was sent.
    pub fn run<S: TodoService + ?Sized>(
        &mut self,
        dispatch: Dispatch,
        service: &S,
    ) -> Option<Resolution> {
        let ticket = dispatch.ticket()?;
        let outcome = ticket.execute(service);
        Some(self.resolve(ticket.id, outcome))
    }

    /// Drop all state. Responses still in flight resolve as `Stale`.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.state = TodoListState::default();
        self.pending.clear();
        self.busy.clear();
        self.edit_prompt = None;
        self.input.clear();
        self.adding = false;
    }

    fn fail(&mut self, op: Operation, err: &ApiError) -> Resolution {
        let classified = err.classify(op);
        tracing::warn!(error = %err, kind = ?classified.kind, "{}", classified.message);
        self.state.pending_error = Some(classified.message);
        Resolution::Failed
    }

    fn finish_fetch(&mut self, result: Result<Vec<Todo>, ApiError>) -> Resolution {
        match result {
            Ok(todos) => {
                tracing::info!(count = todos.len(), "todos loaded");
                self.state.replace_all(todos);
                self.state.pending_error = None;
                Resolution::Applied
            }
            Err(err) => self.fail(Operation::Fetch, &err),
        }
    }

    fn finish_add(
        &mut self,
        provisional: Option<ProvisionalId>,
        result: Result<Todo, ApiError>,
    ) -> Resolution {
        match (provisional, result) {
            (Some(tmp), Ok(todo)) => {
                tracing::info!(%tmp, id = %todo.id, "provisional todo confirmed");
                self.state.confirm_provisional(tmp, todo);
                Resolution::Applied
            }
            (None, Ok(todo)) => {
                tracing::info!(id = %todo.id, "todo added");
                self.state.upsert_back(todo);
                Resolution::Applied
            }
            (Some(tmp), Err(err)) => {
                self.state.discard_provisional(tmp);
                tracing::warn!(%tmp, "optimistic add rolled back");
                self.fail(Operation::Add, &err);
                Resolution::RolledBack
            }
            (None, Err(err)) => self.fail(Operation::Add, &err),
        }
    }

    fn finish_edit_call(&mut self, id: &TodoId, result: Result<Todo, ApiError>) -> Resolution {
        match result {
            Ok(todo) => {
                if self.state.replace_confirmed(id, todo) {
                    tracing::info!(%id, "todo updated");
                } else {
                    tracing::debug!(%id, "updated todo no longer listed");
                }
                Resolution::Applied
            }
            Err(err) => self.fail(Operation::Update, &err),
        }
    }

    fn finish_remove(&mut self, id: &TodoId, result: Result<(), ApiError>) -> Resolution {
        match result {
            Ok(()) => {
                self.state.remove_confirmed(id);
                tracing::info!(%id, "todo deleted");
                Resolution::Applied
            }
            Err(err) => {
                let classified = err.classify(Operation::Delete);
                tracing::warn!(%id, error = %err, "{}", classified.message);
                Resolution::Failed
            }
        }
    }
}

fn mismatch(outcome: &Outcome) -> ApiError {
    let got = match outcome {
        Outcome::Listed(_) => "list",
        Outcome::Created(_) => "create",
        Outcome::Updated(_) => "update",
        Outcome::Deleted(_) => "delete",
    };
    ApiError::Deserialization(format!("unexpected {got} outcome for ticket"))
}
