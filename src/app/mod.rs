//! Application state and main event loop.
//!
//! Follows The Elm Architecture:
//! - [`Model`]: the complete application state
//! - [`Message`]: all user-visible events and actions
//! - [`update`]: pure state transitions
//! - [`App::run`]: the terminal event loop
//!
//! Store access happens only in the effects step that runs after each
//! `update`, so every navigation transition stays synchronous and testable
//! without a terminal or a database.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use effects::run_effects;
pub use model::{Model, PendingFetch, Prompt, PromptKind, StatusLevel, WriteOp};
pub use update::{Message, update};

use crate::store::DocumentStore;

/// Documents fetched per query, matching the original browser's cap.
pub const DEFAULT_LIMIT: usize = 20;

/// Owns the store connection and runs the event loop.
pub struct App<S> {
    store: S,
    limit: usize,
}

impl<S: DocumentStore> App<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Cap query results at `limit` documents.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }
}
