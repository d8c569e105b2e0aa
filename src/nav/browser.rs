//! Cursor/tree addressing over a loaded document set.
//!
//! [`DocumentBrowser`] owns the documents fetched for one collection and a
//! cursor — the path of segments from the selected document down to the node
//! currently being viewed. It is loaded with documents once per query and
//! then navigated one level at a time through [`DocumentBrowser::traverse`].

use serde_json::Value;

use crate::store::doc_id;

use super::{DOCUMENT_BASE, Level, NavError, Seg};

static NULL: Value = Value::Null;

/// The loaded document set plus the cursor addressing a node inside it.
#[derive(Debug, Clone)]
pub struct DocumentBrowser {
    /// Always a `Value::Array`; the documents of the current query.
    docs: Value,
    cursor: Vec<Seg>,
}

impl Default for DocumentBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBrowser {
    pub fn new() -> Self {
        Self {
            docs: Value::Array(Vec::new()),
            cursor: Vec::new(),
        }
    }

    /// Replace the document set and reset the cursor.
    pub fn load(&mut self, docs: Vec<Value>) {
        self.docs = Value::Array(docs);
        self.cursor.clear();
    }

    /// Drop all documents, e.g. when the user leaves the collection level.
    pub fn clear(&mut self) {
        self.load(Vec::new());
    }

    pub fn docs(&self) -> &[Value] {
        match &self.docs {
            Value::Array(items) => items,
            _ => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.docs().is_empty()
    }

    pub fn cursor(&self) -> &[Seg] {
        &self.cursor
    }

    /// Update the cursor for a selection the user just made at `level`.
    ///
    /// Three cases, distinguished by how deep the cursor already is:
    /// backing out one level (the last segment is discarded, and the
    /// re-selected segment must match the branch we were inside), moving to
    /// a sibling at the same depth (the last segment is overwritten), or
    /// descending one new level (the segment is appended). Anything else —
    /// a skipped level, or a backtrack onto a different branch — means the
    /// viewport no longer reflects the cursor and is a protocol violation.
    pub fn traverse(&mut self, level: Level, selection: &Seg) -> Result<&Value, NavError> {
        let depth = level.checked_sub(DOCUMENT_BASE).ok_or_else(|| {
            NavError::ProtocolViolation(format!("traverse below the document base (level {level})"))
        })?;

        if depth + 2 == self.cursor.len() {
            if self.cursor[depth] != *selection {
                return Err(NavError::ProtocolViolation(format!(
                    "backtrack to level {level} re-selected '{selection}', cursor held '{}'",
                    self.cursor[depth]
                )));
            }
            self.cursor.pop();
            return Ok(self.get(None));
        }

        if depth + 1 == self.cursor.len() {
            self.cursor[depth] = selection.clone();
            return Ok(self.get(None));
        }

        if depth != self.cursor.len() {
            return Err(NavError::ProtocolViolation(format!(
                "selection at level {level} skipped a level (cursor depth {})",
                self.cursor.len()
            )));
        }
        self.cursor.push(selection.clone());
        Ok(self.get(None))
    }

    /// Replay the cursor against the document set up to `level` (or the full
    /// cursor when `level` is `None`) and return the node reached.
    ///
    /// For any level at or below [`DOCUMENT_BASE`] this is the whole
    /// document set. An absent path element resolves to `Null`.
    pub fn get(&self, level: Option<Level>) -> &Value {
        let max_depth = level.map_or(self.cursor.len(), |l| l.saturating_sub(DOCUMENT_BASE));
        let mut node = &self.docs;
        for seg in self.cursor.iter().take(max_depth) {
            node = index_value(node, seg);
        }
        node
    }

    /// Whether the node at the cursor can be descended into: a non-empty
    /// object or array. Scalars, `null`, empty containers, and an empty
    /// document set are all leaves for navigation purposes.
    pub fn can_advance(&self) -> bool {
        if self.is_empty() {
            return false;
        }
        is_expandable(self.get(None))
    }

    /// Replace the loaded document sharing `doc`'s identifier. The write has
    /// already been committed externally; this only keeps later `get` and
    /// `traverse` calls consistent with it. The cursor is untouched.
    pub fn update(&mut self, doc: Value) {
        let Some(id) = doc_id(&doc).cloned() else {
            debug_assert!(false, "updated document without an id");
            return;
        };
        if let Value::Array(items) = &mut self.docs {
            if let Some(slot) = items.iter_mut().find(|d| doc_id(d) == Some(&id)) {
                *slot = doc;
            }
        }
    }

    /// Append an externally-inserted document to the set.
    pub fn insert(&mut self, doc: Value) {
        debug_assert!(doc_id(&doc).is_some(), "inserted document without an id");
        if let Value::Array(items) = &mut self.docs {
            items.push(doc);
        }
    }

    /// Remove the loaded document sharing `doc`'s identifier.
    pub fn delete(&mut self, doc: &Value) {
        let id = doc_id(doc);
        if let Value::Array(items) = &mut self.docs {
            items.retain(|d| doc_id(d) != id);
        }
    }

    /// Clone of the document owning the cursor position, with the node at
    /// the cursor replaced by `new_value`. `None` when no document is
    /// selected or the path no longer resolves.
    pub fn patched_document(&self, new_value: Value) -> Option<Value> {
        let idx = match self.cursor.first()? {
            Seg::Index(i) => *i,
            Seg::Key(_) => return None,
        };
        let mut doc = self.docs().get(idx)?.clone();
        let mut node = &mut doc;
        for seg in &self.cursor[1..] {
            node = match seg {
                Seg::Index(i) => node.as_array_mut()?.get_mut(*i)?,
                Seg::Key(k) => node.as_object_mut()?.get_mut(k)?,
            };
        }
        *node = new_value;
        Some(doc)
    }

    /// The document currently being edited, i.e. the document owning the
    /// cursor position.
    pub fn selected_document(&self) -> Option<&Value> {
        if self.cursor.is_empty() {
            return None;
        }
        match self.get(Some(DOCUMENT_BASE + 1)) {
            Value::Null => None,
            doc => Some(doc),
        }
    }
}

fn index_value<'a>(node: &'a Value, seg: &Seg) -> &'a Value {
    match (node, seg) {
        (Value::Array(items), Seg::Index(i)) => items.get(*i).unwrap_or(&NULL),
        (Value::Object(map), Seg::Key(k)) => map.get(k).unwrap_or(&NULL),
        _ => &NULL,
    }
}

/// Non-empty objects and arrays are the only values navigation can enter.
pub(super) fn is_expandable(value: &Value) -> bool {
    match value {
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => false,
    }
}
