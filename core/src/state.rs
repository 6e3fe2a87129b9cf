//! The list as the view sees it.
//!
//! `TodoListState` is plain data plus the handful of edits the controller
//! makes to it. Every edit keeps one rule: a confirmed id appears at most
//! once in `items`.

use std::collections::HashSet;

use crate::types::{Entry, EntryId, ProvisionalId, Todo, TodoId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoListState {
    pub items: Vec<Entry>,
    pub pending_error: Option<String>,
}

impl TodoListState {
    pub fn position(&self, id: &EntryId) -> Option<usize> {
        self.items.iter().position(|e| &e.id == id)
    }

    fn position_confirmed(&self, id: &TodoId) -> Option<usize> {
        self.items
            .iter()
            .position(|e| e.id.confirmed() == Some(id))
    }

    pub fn get(&self, id: &TodoId) -> Option<&Entry> {
        self.position_confirmed(id).map(|i| &self.items[i])
    }

    pub fn contains(&self, id: &TodoId) -> bool {
        self.position_confirmed(id).is_some()
    }

    /// Replace the list with a server snapshot, in the server's order.
    ///
    /// Provisional entries are unresolved adds; they stay on top so their
    /// resolution still finds them. Repeated ids keep the first occurrence.
    pub fn replace_all(&mut self, todos: Vec<Todo>) {
        let mut items: Vec<Entry> = self
            .items
            .drain(..)
            .filter(Entry::is_provisional)
            .collect();
        let mut seen = HashSet::with_capacity(todos.len());
        for todo in todos {
            if seen.insert(todo.id.clone()) {
                items.push(todo.into());
            }
        }
        self.items = items;
    }

    pub fn push_front(&mut self, entry: Entry) {
        self.items.insert(0, entry);
    }

    /// Append a confirmed todo, or refresh it in place if a reload already
    /// brought it in.
    pub fn upsert_back(&mut self, todo: Todo) {
        match self.position_confirmed(&todo.id) {
            Some(i) => self.items[i] = todo.into(),
            None => self.items.push(todo.into()),
        }
    }

    /// Swap a provisional entry for its confirmed todo, in place. If the
    /// confirmed id is already listed, the provisional entry is dropped.
    pub fn confirm_provisional(&mut self, provisional: ProvisionalId, todo: Todo) {
        let slot = self.position(&EntryId::Provisional(provisional));
        match (slot, self.position_confirmed(&todo.id)) {
            (Some(i), None) => self.items[i] = todo.into(),
            (Some(i), Some(existing)) => {
                self.items[existing] = todo.into();
                self.items.remove(i);
            }
            (None, Some(existing)) => self.items[existing] = todo.into(),
            (None, None) => self.push_front(todo.into()),
        }
    }

    pub fn discard_provisional(&mut self, provisional: ProvisionalId) -> bool {
        match self.position(&EntryId::Provisional(provisional)) {
            Some(i) => {
                self.items.remove(i);
                true
            }
            None => false,
        }
    }

    /// Replace the entry for `id` with `todo`, keeping its position.
    /// Returns false when `id` is no longer listed.
    pub fn replace_confirmed(&mut self, id: &TodoId, todo: Todo) -> bool {
        let Some(i) = self.position_confirmed(id) else {
            return false;
        };
        if &todo.id != id {
            // Server renamed the id; do not leave a second copy behind.
            if let Some(dup) = self.position_confirmed(&todo.id) {
                self.items.remove(dup);
                let i = if dup < i { i - 1 } else { i };
                self.items[i] = todo.into();
                return true;
            }
        }
        self.items[i] = todo.into();
        true
    }

    pub fn remove_confirmed(&mut self, id: &TodoId) -> bool {
        match self.position_confirmed(id) {
            Some(i) => {
                self.items.remove(i);
                true
            }
            None => false,
        }
    }
}
