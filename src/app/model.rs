use std::time::{Duration, Instant};

use serde_json::Value;

use crate::nav::{Fetch, NavError, NavigationController};

use super::DEFAULT_LIMIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Status {
    level: StatusLevel,
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Query filter for the focused collection.
    Filter,
    /// New value for the addressed leaf.
    Edit,
    /// A new document to insert.
    Insert,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Edit => "edit",
            Self::Insert => "insert",
        }
    }
}

/// An active text input at the bottom of the screen. Cancelling it leaves
/// every piece of navigation state exactly as it was.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: String,
    pub error: Option<String>,
}

impl Prompt {
    pub fn new(kind: PromptKind, buffer: impl Into<String>) -> Self {
        Self {
            kind,
            buffer: buffer.into(),
            error: None,
        }
    }
}

/// A store read queued by `update`, tagged with the viewport generation it
/// was issued under. The effects step drops it if the generation has moved
/// on by the time the result is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub fetch: Fetch,
    pub generation: u64,
    /// Resume the deferred half of a move-right after the result applies.
    pub resume_focus: bool,
}

/// A store write queued by `update`. Executed store-first: navigation state
/// is only touched after the write is confirmed.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Replace {
        db: String,
        collection: String,
        id: Value,
        doc: Value,
    },
    Insert {
        db: String,
        collection: String,
        doc: Value,
    },
    Delete {
        db: String,
        collection: String,
        id: Value,
        doc: Value,
    },
}

/// The complete application state. All of it lives here; nothing global.
#[derive(Debug)]
pub struct Model {
    pub nav: NavigationController,
    /// Raw filter text, re-shown when the prompt opens again.
    pub filter: String,
    pub limit: usize,
    pub prompt: Option<Prompt>,
    pub pending_fetch: Option<PendingFetch>,
    pub pending_write: Option<WriteOp>,
    pub should_quit: bool,
    /// A protocol violation that must abort the session.
    pub fatal: Option<NavError>,
    status: Option<Status>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl Model {
    pub fn new(limit: usize) -> Self {
        Self {
            nav: NavigationController::new(),
            filter: "{}".to_string(),
            limit,
            prompt: None,
            pending_fetch: None,
            pending_write: None,
            should_quit: false,
            fatal: None,
            status: None,
        }
    }

    pub fn queue_fetch(&mut self, fetch: Fetch, resume_focus: bool) {
        self.pending_fetch = Some(PendingFetch {
            fetch,
            generation: self.nav.generation(),
            resume_focus,
        });
    }

    /// Route a navigation error: lookup failures become a status message,
    /// protocol violations end the session.
    pub fn fail_nav(&mut self, err: NavError) {
        match err {
            NavError::LookupFailure(_) => {
                self.show_status(StatusLevel::Warning, err.to_string());
            }
            NavError::ProtocolViolation(_) => {
                tracing::error!(%err, "protocol violation");
                self.fatal = Some(err);
            }
        }
    }

    pub fn show_status(&mut self, level: StatusLevel, message: impl Into<String>) {
        self.status = Some(Status {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub fn active_status(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.message.as_str(), status.level))
    }

    pub fn expire_status(&mut self, now: Instant) -> bool {
        if self
            .status
            .as_ref()
            .is_some_and(|status| status.expires_at <= now)
        {
            self.status = None;
            return true;
        }
        false
    }
}
