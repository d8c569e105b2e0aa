//! The navigation controller: a fixed window of columns sliding over the
//! level hierarchy, plus mutation propagation after external writes.
//!
//! All navigation state — the loaded documents, the cursor, the visible
//! columns, and the off-screen column cache — lives in one
//! [`NavigationController`] instance. Store access stays outside: whenever
//! a transition needs external data the controller returns a [`Fetch`]
//! describing it, and the caller feeds the result back through one of the
//! `apply_*` methods. Each externally-driven operation bumps a generation
//! counter so results of superseded fetches can be recognized and dropped.

use serde_json::Value;

use super::browser::is_expandable;
use super::{
    COLLECTIONS, Column, ColumnCache, DATABASES, DOCUMENT_BASE, DocumentBrowser, Level, NavError,
    Seg, format,
};

/// Number of simultaneously visible columns.
pub const VIEW_COLUMNS: usize = 3;

/// External data a transition needs before it can complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    /// The database list: startup, or refilling the leftmost column.
    Databases,
    /// The collection list of a just-selected database.
    Collections { db: String },
    /// Refill the collection-list column without touching the selection.
    CollectionNames { db: String },
    /// The documents of `collection` under the active filter.
    Documents { db: String, collection: String },
}

/// What a move-right did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Nothing to act on (empty column).
    None,
    /// Focus moved one column right without shifting.
    Moved,
    /// The viewport shifted one level deeper; a follow-up fetch may be
    /// needed to repopulate a column.
    Shifted(Option<Fetch>),
    /// The selection needs store data; focus motion resumes once the
    /// result is applied (see [`NavigationController::advance_focus`]).
    Fetch(Fetch),
    /// Focus is on a leaf with nothing more to reveal: edit it.
    EditLeaf,
}

#[derive(Debug, Clone)]
pub struct NavigationController {
    browser: DocumentBrowser,
    cache: ColumnCache,
    columns: Vec<Column>,
    focused: usize,
    db: Option<String>,
    collection: Option<String>,
    generation: u64,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationController {
    pub fn new() -> Self {
        Self {
            browser: DocumentBrowser::new(),
            cache: ColumnCache::new(),
            columns: (0..VIEW_COLUMNS).map(Column::new).collect(),
            focused: 0,
            db: None,
            collection: None,
            generation: 0,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn focused_column(&self) -> &Column {
        &self.columns[self.focused]
    }

    pub fn leftmost_level(&self) -> Level {
        self.columns[0].level
    }

    pub fn browser(&self) -> &DocumentBrowser {
        &self.browser
    }

    pub fn db(&self) -> Option<&str> {
        self.db.as_deref()
    }

    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    /// The selected database and collection, once both exist.
    pub fn location(&self) -> Option<(&str, &str)> {
        Some((self.db.as_deref()?, self.collection.as_deref()?))
    }

    /// Current viewport generation. A fetch issued under an older
    /// generation no longer describes what the viewport shows and its
    /// result must be discarded.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `db / collection / #doc / field / ...` for the status line.
    pub fn breadcrumb(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(db) = &self.db {
            parts.push(db.clone());
        }
        if let Some(coll) = &self.collection {
            parts.push(coll.clone());
        }
        for (i, seg) in self.browser.cursor().iter().enumerate() {
            if i == 0 {
                parts.push(format!("#{seg}"));
            } else {
                parts.push(seg.to_string());
            }
        }
        parts.join(" / ")
    }

    // ---- fetch results ----------------------------------------------------

    pub fn apply_databases(&mut self, names: &[String]) {
        if let Some(idx) = self.visible_index(DATABASES) {
            self.columns[idx].set_entries(format::name_entries(names));
        }
    }

    /// Refill the collection-list column after a shift-left found no cached
    /// copy. Unlike [`Self::apply_collections`] this leaves the selected
    /// collection, the loaded documents, and every other column alone.
    pub fn apply_collection_names(&mut self, names: &[String]) {
        if let Some(idx) = self.visible_index(COLLECTIONS) {
            self.columns[idx].set_entries(format::name_entries(names));
        }
    }

    /// Commit a database selection together with its collection list.
    pub fn apply_collections(&mut self, db: String, names: &[String]) {
        self.db = Some(db);
        self.collection = None;
        self.browser.clear();
        self.cache.invalidate_deeper_than(COLLECTIONS);
        if let Some(idx) = self.visible_index(COLLECTIONS) {
            self.columns[idx].set_entries(format::name_entries(names));
            self.clear_beyond(idx + 1);
        }
    }

    /// Commit a collection selection together with its query result.
    pub fn apply_documents(&mut self, db: String, collection: String, docs: Vec<Value>) {
        self.db = Some(db);
        self.collection = Some(collection);
        self.browser.load(docs);
        self.cache.invalidate_deeper_than(DOCUMENT_BASE);
        if let Some(idx) = self.visible_index(DOCUMENT_BASE) {
            self.columns[idx].set_entries(format::document_entries(self.browser.docs()));
            self.clear_beyond(idx + 1);
        }
    }

    // ---- user-driven transitions ------------------------------------------

    /// Move the highlight inside the focused column and re-derive from the
    /// new selection.
    pub fn move_selection(&mut self, down: bool) -> Result<Option<Fetch>, NavError> {
        self.generation += 1;
        let col = &mut self.columns[self.focused];
        if col.is_empty() {
            return Ok(None);
        }
        if down {
            col.select_next();
        } else {
            col.select_prev();
        }
        self.select_current()
    }

    /// Move right: commit the focused selection, then shift, move focus, or
    /// ask for a leaf edit.
    pub fn advance(&mut self) -> Result<Advance, NavError> {
        self.generation += 1;
        if self.columns[self.focused].is_empty() {
            return Ok(Advance::None);
        }
        if self.columns[self.focused].level < DOCUMENT_BASE {
            // selection needs store data; the caller resumes with
            // advance_focus once the result has been applied
            return Ok(match self.select_current()? {
                Some(fetch) => Advance::Fetch(fetch),
                None => Advance::None,
            });
        }
        self.select_current()?;
        self.advance_focus()
    }

    /// The focus-motion half of a move-right. Runs immediately for
    /// in-document levels, or after the fetch result for a store-level
    /// selection has been applied.
    pub fn advance_focus(&mut self) -> Result<Advance, NavError> {
        if self.focused == VIEW_COLUMNS - 2 && self.browser.can_advance() {
            self.slide_right();
            return Ok(Advance::Shifted(self.reselect()?));
        }
        if self.focused < VIEW_COLUMNS - 1 {
            self.focused += 1;
            return Ok(Advance::Moved);
        }
        if self.browser.can_advance() {
            // the last column's selection opened a new branch; reveal its
            // children while keeping focus on the same level
            self.slide_right();
            self.focused -= 1;
            return Ok(Advance::Shifted(self.reselect()?));
        }
        Ok(Advance::EditLeaf)
    }

    /// Move left: shift the window back up, or just move focus.
    pub fn retreat(&mut self) -> Result<Option<Fetch>, NavError> {
        self.generation += 1;
        if self.focused == 1 && self.leftmost_level() > DATABASES {
            return self.shift_left();
        }
        if self.focused > 0 {
            self.focused -= 1;
            let col = &self.columns[self.focused];
            if col.level >= DOCUMENT_BASE && !col.is_empty() {
                // commit the backtrack so the cursor tracks the focused level
                self.select_current()?;
            }
        }
        Ok(None)
    }

    // ---- mutation propagation ---------------------------------------------

    /// Reflect an externally-committed document replacement in every
    /// visible and cached column.
    pub fn propagate_update(&mut self, doc: Value) -> Result<Option<Fetch>, NavError> {
        self.generation += 1;
        let was_advance = self.browser.can_advance();
        self.browser.update(doc);
        self.refresh_visible();
        self.refresh_cached();
        self.settle(was_advance)
    }

    /// Reflect an externally-committed insert in the document-root column.
    pub fn propagate_insert(&mut self, doc: Value) -> Result<Option<Fetch>, NavError> {
        self.generation += 1;
        let was_advance = self.browser.can_advance();
        self.browser.insert(doc);
        self.refresh_document_column();
        self.settle(was_advance)
    }

    /// Reflect an externally-committed delete in the document-root column.
    pub fn propagate_delete(&mut self, doc: &Value) -> Result<Option<Fetch>, NavError> {
        self.generation += 1;
        let was_advance = self.browser.can_advance();
        self.browser.delete(doc);
        self.refresh_document_column();
        self.settle(was_advance)
    }

    // ---- internals --------------------------------------------------------

    /// Re-derive whatever follows from the focused column's highlighted
    /// entry: a fetch for the store levels, a cursor commit plus next-column
    /// re-derivation for in-document levels.
    fn select_current(&mut self) -> Result<Option<Fetch>, NavError> {
        let focused = self.focused;
        let Some(entry) = self.columns[focused].selected_entry().cloned() else {
            return Ok(None);
        };
        let level = self.columns[focused].level;

        match level {
            DATABASES => {
                let db = entry
                    .seg
                    .as_key()
                    .ok_or_else(|| {
                        NavError::ProtocolViolation("database entry without a name".into())
                    })?
                    .to_string();
                self.clear_beyond(focused + 1);
                self.cache.invalidate_deeper_than(DATABASES);
                tracing::debug!(%db, "fetch collections");
                Ok(Some(Fetch::Collections { db }))
            }
            COLLECTIONS => {
                let db = self.db.clone().ok_or_else(|| {
                    NavError::ProtocolViolation("collection selected with no database".into())
                })?;
                let collection = entry
                    .seg
                    .as_key()
                    .ok_or_else(|| {
                        NavError::ProtocolViolation("collection entry without a name".into())
                    })?
                    .to_string();
                self.clear_beyond(focused + 1);
                self.cache.invalidate_deeper_than(COLLECTIONS);
                tracing::debug!(%db, %collection, "fetch documents");
                Ok(Some(Fetch::Documents { db, collection }))
            }
            _ => {
                if !is_expandable(self.browser.get(Some(level))) {
                    // synthetic leaf entry; nothing to commit
                    return Ok(None);
                }
                self.browser.traverse(level, &entry.seg)?;
                let next = focused + 1;
                if next < VIEW_COLUMNS {
                    let entries = self.derive_entries(self.columns[next].level);
                    self.columns[next].set_entries(entries);
                }
                self.clear_beyond(focused + 2);
                self.cache.invalidate_deeper_than(level);
                Ok(None)
            }
        }
    }

    /// Re-run the focused column's derivation, skipping store levels whose
    /// content is already present (the original re-fired the widget's
    /// selection event here and suppressed the duplicate fetch).
    fn reselect(&mut self) -> Result<Option<Fetch>, NavError> {
        if self.columns[self.focused].level >= DOCUMENT_BASE {
            self.select_current()
        } else {
            Ok(None)
        }
    }

    /// Slide every column one slot left; the leftmost is saved to the
    /// cache and the freed rightmost is cleared one level deeper. Focus
    /// keeps its index, so it lands one level deeper in the hierarchy.
    fn slide_right(&mut self) {
        let leftmost = &self.columns[0];
        self.cache.save(leftmost.level, leftmost.state().clone());
        tracing::debug!(level = leftmost.level, "shift right");
        for i in 0..VIEW_COLUMNS - 1 {
            self.columns[i] = self.columns[i + 1].clone();
        }
        let last = &mut self.columns[VIEW_COLUMNS - 1];
        last.clear();
        last.level += 1;
    }

    /// Slide every column one slot right, restoring the new leftmost from
    /// the cache (or re-fetching it for the two top levels). A cache miss
    /// at a deeper level aborts with prior state retained.
    fn shift_left(&mut self) -> Result<Option<Fetch>, NavError> {
        let target = self.leftmost_level().checked_sub(1).ok_or_else(|| {
            NavError::ProtocolViolation("shift left at the minimum level".into())
        })?;

        let restored = match self.cache.take(target) {
            Ok(state) => Some(state),
            Err(NavError::LookupFailure(_)) if target < DOCUMENT_BASE => None,
            Err(e) => return Err(e),
        };
        tracing::debug!(level = target, cached = restored.is_some(), "shift left");

        let rightmost = &self.columns[VIEW_COLUMNS - 1];
        self.cache.save(rightmost.level, rightmost.state().clone());
        for i in (1..VIEW_COLUMNS).rev() {
            self.columns[i] = self.columns[i - 1].clone();
        }

        let fetch = match restored {
            Some(state) => {
                self.columns[0].restore(state);
                self.columns[0].level = target;
                None
            }
            None => {
                self.columns[0].clear();
                self.columns[0].level = target;
                match target {
                    DATABASES => Some(Fetch::Databases),
                    _ => {
                        let db = self.db.clone().ok_or_else(|| {
                            NavError::ProtocolViolation(
                                "collection level visible with no database".into(),
                            )
                        })?;
                        Some(Fetch::CollectionNames { db })
                    }
                }
            }
        };

        // backing out within the document commits the cursor backtrack
        if self.columns[self.focused].level >= DOCUMENT_BASE
            && !self.columns[self.focused].is_empty()
        {
            self.select_current()?;
        }
        Ok(fetch)
    }

    /// Post-propagation step: reveal a branch an edit just created, collapse
    /// a column an edit just emptied, or simply re-derive from the focused
    /// selection.
    fn settle(&mut self, was_advance: bool) -> Result<Option<Fetch>, NavError> {
        let now_advance = self.browser.can_advance();
        if self.focused == VIEW_COLUMNS - 1 && now_advance && !was_advance {
            self.slide_right();
            self.focused -= 1;
            return self.reselect();
        }
        if self.focused == VIEW_COLUMNS - 2
            && was_advance
            && !now_advance
            && self.leftmost_level() > DATABASES
        {
            return self.shift_left();
        }
        self.reselect()
    }

    /// Entries a column at `level` should show, derived from the loaded
    /// tree. Only meaningful at or above [`DOCUMENT_BASE`].
    fn derive_entries(&self, level: Level) -> Vec<super::ColumnEntry> {
        if level == DOCUMENT_BASE {
            format::document_entries(self.browser.docs())
        } else {
            format::column_entries(self.browser.get(Some(level)))
        }
    }

    /// Re-derive every visible in-document column from the focused index
    /// down to the leftmost.
    fn refresh_visible(&mut self) {
        for i in (0..=self.focused).rev() {
            let level = self.columns[i].level;
            if level >= DOCUMENT_BASE {
                let entries = self.derive_entries(level);
                self.columns[i].set_entries(entries);
            }
        }
    }

    /// Re-derive cached levels shallower than the viewport so a later
    /// shift-left surfaces current data; drop cached levels deeper than the
    /// viewport, which cannot be re-derived and would otherwise go stale.
    fn refresh_cached(&mut self) {
        let leftmost = self.leftmost_level();
        let rightmost = self.columns[VIEW_COLUMNS - 1].level;
        let levels: Vec<Level> = self.cache.levels().collect();
        for level in levels {
            if level >= DOCUMENT_BASE && level < leftmost {
                let entries = self.derive_entries(level);
                if let Some(state) = self.cache.get_mut(level) {
                    state.entries = entries;
                    state.clamp_selection();
                }
            } else if level > rightmost {
                let _ = self.cache.take(level);
            }
        }
    }

    /// Re-derive the document-root column, wherever it currently lives.
    fn refresh_document_column(&mut self) {
        let entries = format::document_entries(self.browser.docs());
        if let Some(idx) = self.visible_index(DOCUMENT_BASE) {
            self.columns[idx].set_entries(entries);
        } else if let Some(state) = self.cache.get_mut(DOCUMENT_BASE) {
            state.entries = entries;
            state.clamp_selection();
        }
    }

    fn visible_index(&self, level: Level) -> Option<usize> {
        self.columns.iter().position(|c| c.level == level)
    }

    fn clear_beyond(&mut self, from: usize) {
        for col in self.columns.iter_mut().skip(from) {
            col.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    /// Drives the controller the way the app's effect handler does,
    /// resolving fetches against fixed data.
    struct Rig {
        ctl: NavigationController,
        docs: Vec<Value>,
    }

    impl Rig {
        fn new(docs: Vec<Value>) -> Self {
            let mut ctl = NavigationController::new();
            ctl.apply_databases(&["db".to_string()]);
            Self { ctl, docs }
        }

        fn resolve(&mut self, fetch: Fetch) {
            match fetch {
                Fetch::Databases => self.ctl.apply_databases(&["db".to_string()]),
                Fetch::Collections { db } => {
                    self.ctl.apply_collections(db, &["coll".to_string()]);
                }
                Fetch::CollectionNames { .. } => {
                    self.ctl.apply_collection_names(&["coll".to_string()]);
                }
                Fetch::Documents { db, collection } => {
                    self.ctl.apply_documents(db, collection, self.docs.clone());
                }
            }
        }

        fn advance(&mut self) -> Advance {
            let adv = self.ctl.advance().unwrap();
            match &adv {
                Advance::Fetch(fetch) => {
                    self.resolve(fetch.clone());
                    if let Advance::Shifted(Some(follow)) = self.ctl.advance_focus().unwrap() {
                        self.resolve(follow);
                    }
                }
                Advance::Shifted(Some(fetch)) => self.resolve(fetch.clone()),
                _ => {}
            }
            adv
        }

        fn retreat(&mut self) {
            if let Some(fetch) = self.ctl.retreat().unwrap() {
                self.resolve(fetch);
            }
        }

        fn levels(&self) -> Vec<Level> {
            self.ctl.columns().iter().map(|c| c.level).collect()
        }
    }

    fn nested_doc() -> Value {
        json!({"_id": 1, "a": {"b": {"c": {"d": 1}}}})
    }

    #[test]
    fn test_bootstrap_descends_through_store_levels() {
        let mut rig = Rig::new(vec![json!({"_id": 1, "x": 1})]);
        assert_eq!(rig.levels(), vec![0, 1, 2]);
        assert_eq!(rig.ctl.focused_index(), 0);

        // select the database: collections land in the next column
        rig.advance();
        assert_eq!(rig.ctl.focused_index(), 1);
        assert_eq!(rig.ctl.columns()[1].entries()[0].text, "coll");

        // select the collection: documents load and the window slides so
        // the document column keeps focus index 1
        rig.advance();
        assert_eq!(rig.levels(), vec![1, 2, 3]);
        assert_eq!(rig.ctl.focused_index(), 1);
        assert_eq!(rig.ctl.location(), Some(("db", "coll")));
        assert_eq!(rig.ctl.browser().cursor(), &[Seg::Index(0)]);
        // rightmost column shows the document's fields
        assert_eq!(rig.ctl.columns()[2].entries()[0].text, "_id: 1");
    }

    #[test]
    fn test_advance_reaches_edit_at_scalar_leaf() {
        let mut rig = Rig::new(vec![json!({"_id": 1, "x": 1})]);
        rig.advance();
        rig.advance();
        // descend into the document's fields
        assert!(matches!(rig.advance(), Advance::Shifted(None)));
        assert_eq!(rig.levels(), vec![2, 3, 4]);
        // _id is a scalar: focus moves onto the synthetic leaf column
        assert!(matches!(rig.advance(), Advance::Moved));
        assert_eq!(rig.ctl.focused_index(), 2);
        // nothing more to reveal: edit
        assert!(matches!(rig.advance(), Advance::EditLeaf));
    }

    #[test]
    fn test_vertical_move_rederives_next_column() {
        let mut rig = Rig::new(vec![
            json!({"_id": 1, "x": 1}),
            json!({"_id": 2, "y": 2}),
        ]);
        rig.advance();
        rig.advance();
        assert_eq!(rig.ctl.columns()[2].entries()[0].text, "_id: 1");

        rig.ctl.move_selection(true).unwrap();
        assert_eq!(rig.ctl.browser().cursor(), &[Seg::Index(1)]);
        assert_eq!(rig.ctl.columns()[2].entries()[1].text, "y: 2");
    }

    #[test]
    fn test_shift_right_then_left_restores_every_column() {
        let mut rig = Rig::new(vec![nested_doc()]);
        rig.advance();
        rig.advance();
        rig.advance(); // (2,3,4)
        rig.ctl.move_selection(true).unwrap(); // select field "a"
        let before = rig.ctl.columns().to_vec();
        let cursor_before = rig.ctl.browser().cursor().to_vec();

        assert!(matches!(rig.advance(), Advance::Shifted(None)));
        assert_eq!(rig.levels(), vec![3, 4, 5]);
        rig.retreat();

        assert_eq!(rig.ctl.columns(), &before[..]);
        assert_eq!(rig.ctl.browser().cursor(), &cursor_before[..]);
        assert_eq!(rig.ctl.focused_index(), 1);
    }

    #[test]
    fn test_shift_left_refetches_top_levels_on_cache_miss() {
        let mut rig = Rig::new(vec![json!({"_id": 1, "x": 1})]);
        rig.advance();
        rig.advance(); // (1,2,3), database column cached at level 0
        rig.ctl.cache.clear();

        let fetch = rig.ctl.retreat().unwrap();
        assert_eq!(fetch, Some(Fetch::Databases));
        assert_eq!(rig.levels(), vec![0, 1, 2]);
    }

    #[test]
    fn test_shift_left_collection_refill_keeps_documents() {
        let mut rig = Rig::new(vec![json!({"_id": 1, "x": 1})]);
        rig.advance();
        rig.advance();
        rig.advance(); // (2,3,4)
        rig.ctl.cache.clear();

        let fetch = rig.ctl.retreat().unwrap();
        assert_eq!(
            fetch,
            Some(Fetch::CollectionNames {
                db: "db".to_string()
            })
        );
        rig.resolve(fetch.unwrap());

        assert_eq!(rig.levels(), vec![1, 2, 3]);
        assert_eq!(rig.ctl.columns()[0].entries()[0].text, "coll");
        // the loaded documents and the selection survive the refill
        assert_eq!(rig.ctl.location(), Some(("db", "coll")));
        assert_eq!(rig.ctl.browser().docs().len(), 1);
        assert!(!rig.ctl.columns()[1].is_empty());
    }

    #[test]
    fn test_shift_left_deep_cache_miss_aborts_with_state_retained() {
        let mut rig = Rig::new(vec![nested_doc()]);
        rig.advance();
        rig.advance();
        rig.advance();
        rig.ctl.move_selection(true).unwrap();
        rig.advance(); // (3,4,5)
        rig.ctl.cache.clear();
        let before = rig.ctl.columns().to_vec();

        let err = rig.ctl.retreat().unwrap_err();
        assert_eq!(err, NavError::LookupFailure(2));
        assert_eq!(rig.ctl.columns(), &before[..]);
        assert_eq!(rig.ctl.focused_index(), 1);
    }

    #[test]
    fn test_sibling_change_after_backing_out_is_not_a_violation() {
        let mut rig = Rig::new(vec![json!({
            "_id": 1,
            "a": {"x": 1},
            "b": {"y": 2}
        })]);
        rig.advance();
        rig.advance();
        rig.advance(); // (2,3,4), focus on the field column
        rig.ctl.move_selection(true).unwrap(); // field "a"
        rig.advance(); // descend into "a": (3,4,5)
        rig.retreat(); // back out: (2,3,4), cursor trimmed eagerly

        // picking the other branch is now a plain sibling move
        rig.ctl.move_selection(true).unwrap();
        assert_eq!(
            rig.ctl.browser().cursor(),
            &[Seg::Index(0), Seg::from("b")]
        );
    }

    #[test]
    fn test_propagate_insert_reveals_first_document() {
        let mut rig = Rig::new(Vec::new());
        rig.advance();
        rig.advance(); // empty result: focus ends on the empty document column
        assert_eq!(rig.levels(), vec![0, 1, 2]);
        assert_eq!(rig.ctl.focused_index(), 2);
        assert!(rig.ctl.focused_column().is_empty());

        let fetch = rig.ctl.propagate_insert(json!({"_id": 2})).unwrap();
        assert_eq!(fetch, None);
        // the window slid so the new document's contents are revealed and
        // focus stays on the document column, one index to the left
        assert_eq!(rig.levels(), vec![1, 2, 3]);
        assert_eq!(rig.ctl.focused_index(), 1);
        assert_eq!(rig.ctl.columns()[1].entries().len(), 1);
        assert_eq!(rig.ctl.columns()[2].entries()[0].text, "_id: 2");
    }

    #[test]
    fn test_propagate_delete_of_last_document_collapses_view() {
        let mut rig = Rig::new(vec![json!({"_id": 1, "x": 1})]);
        rig.advance();
        rig.advance(); // (1,2,3), focus on the document column
        assert_eq!(rig.ctl.focused_index(), 1);

        let fetch = rig.ctl.propagate_delete(&json!({"_id": 1})).unwrap();
        assert_eq!(fetch, None);
        assert_eq!(rig.levels(), vec![0, 1, 2]);
        assert!(rig.ctl.browser().docs().is_empty());
        assert!(rig.ctl.columns()[2].is_empty());
    }

    #[test]
    fn test_propagate_update_rederives_visible_and_cached_columns() {
        let mut rig = Rig::new(vec![nested_doc()]);
        rig.advance();
        rig.advance();
        rig.advance();
        rig.ctl.move_selection(true).unwrap();
        rig.advance(); // (3,4,5); levels 0..=2 sit in the cache
        assert!(rig.ctl.cache.contains(DOCUMENT_BASE));

        let updated = json!({"_id": 1, "a": {"b": {"c": {"d": 99}}}});
        rig.ctl.propagate_update(updated.clone()).unwrap();

        // visible column at the focused branch reflects the new value
        assert_eq!(rig.ctl.columns()[2].entries()[0].text, "c: {\"d\":99}");
        // the cached document column was re-derived the same way
        let cached = rig.ctl.cache.get_mut(DOCUMENT_BASE).unwrap();
        assert_eq!(cached.entries[0].text, format::display_value(&updated));
    }

    #[test]
    fn test_propagate_update_reveals_branch_created_by_edit() {
        let mut rig = Rig::new(vec![json!({"_id": 1, "x": 1})]);
        rig.advance();
        rig.advance();
        rig.advance(); // (2,3,4)
        rig.ctl.move_selection(true).unwrap(); // field "x"
        rig.advance(); // focus onto the synthetic leaf column
        assert_eq!(rig.ctl.focused_index(), 2);

        // the edit turned the scalar into a non-empty object
        rig.ctl
            .propagate_update(json!({"_id": 1, "x": {"deep": true}}))
            .unwrap();
        assert_eq!(rig.levels(), vec![3, 4, 5]);
        assert_eq!(rig.ctl.focused_index(), 1);
        assert_eq!(rig.ctl.columns()[1].entries()[0].text, "deep: true");
        assert_eq!(rig.ctl.columns()[2].entries()[0].text, "true");
    }

    #[test]
    fn test_propagate_update_collapses_emptied_column() {
        let mut rig = Rig::new(vec![json!({"_id": 1, "a": {"x": 1}})]);
        rig.advance();
        rig.advance();
        rig.advance(); // (2,3,4), focus on the field column
        rig.ctl.move_selection(true).unwrap(); // field "a": cursor addresses the object
        assert_eq!(rig.ctl.focused_index(), 1);
        assert!(rig.ctl.browser().can_advance());

        // the edit deleted the object's last entry: the addressed value is
        // now empty, so the window shifts back up
        rig.ctl.propagate_update(json!({"_id": 1, "a": {}})).unwrap();
        assert_eq!(rig.levels(), vec![1, 2, 3]);
        assert_eq!(rig.ctl.focused_index(), 1);
        let field_texts: Vec<&str> = rig.ctl.columns()[2]
            .entries()
            .iter()
            .map(|e| e.text.as_str())
            .collect();
        assert!(field_texts.contains(&"a: {}"));
    }

    #[test]
    fn test_generation_advances_on_every_operation() {
        let mut rig = Rig::new(vec![json!({"_id": 1, "x": 1})]);
        let g0 = rig.ctl.generation();
        rig.ctl.advance().unwrap();
        assert!(rig.ctl.generation() > g0);
        let g1 = rig.ctl.generation();
        rig.ctl.move_selection(true).unwrap();
        assert!(rig.ctl.generation() > g1);
    }
}
