//! Hierarchical cursor navigation and the column viewport engine.
//!
//! The navigation hierarchy is addressed by *levels*:
//! - level 0: databases
//! - level 1: collections of the selected database
//! - level 2: documents of the selected collection ([`DOCUMENT_BASE`])
//! - level 3+: nested fields/elements inside the selected document
//!
//! Below [`DOCUMENT_BASE`] a selection means "pick a different external
//! resource" and triggers a store fetch; at or above it a selection is a
//! pure traversal of the already-loaded document tree.

mod browser;
mod column;
mod controller;
mod format;

pub use browser::DocumentBrowser;
pub use column::{Column, ColumnCache, ColumnEntry, ColumnState};
pub use controller::{Advance, Fetch, NavigationController, VIEW_COLUMNS};
pub use format::{column_entries, display_value, document_entries, name_entries};

use std::fmt;

use thiserror::Error;

/// Depth in the navigation hierarchy.
pub type Level = usize;

/// Level of the database list.
pub const DATABASES: Level = 0;
/// Level of the collection list.
pub const COLLECTIONS: Level = 1;
/// First level addressing nodes inside loaded documents.
pub const DOCUMENT_BASE: Level = 2;

/// One step of a path into a document tree: an array index or an object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Seg {
    Index(usize),
    Key(String),
}

impl Seg {
    /// The object key, if this segment is one.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(k) => Some(k),
            Self::Index(_) => None,
        }
    }
}

impl fmt::Display for Seg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(k) => f.write_str(k),
        }
    }
}

impl From<usize> for Seg {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

impl From<&str> for Seg {
    fn from(k: &str) -> Self {
        Self::Key(k.to_string())
    }
}

impl From<String> for Seg {
    fn from(k: String) -> Self {
        Self::Key(k)
    }
}

/// Failures inside the navigation engine.
///
/// [`NavError::ProtocolViolation`] means the viewport and cursor have
/// desynchronized. That is a logic defect, not bad user input: the current
/// operation is fatal and the error must be surfaced loudly rather than
/// swallowed. [`NavError::LookupFailure`] is recoverable — the triggering
/// operation is aborted with prior state retained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("navigation desynchronized: {0}")]
    ProtocolViolation(String),

    #[error("no cached column for level {0}")]
    LookupFailure(Level),
}
