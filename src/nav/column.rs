//! Column display state and the off-screen column cache.

use std::collections::HashMap;

use super::{Level, NavError, Seg};

/// One listed entry: the raw segment used to re-enter the next level, and
/// its human-formatted rendering. The two sequences a column holds are
/// parallel by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnEntry {
    pub seg: Seg,
    pub text: String,
}

impl ColumnEntry {
    pub fn new(seg: impl Into<Seg>, text: impl Into<String>) -> Self {
        Self {
            seg: seg.into(),
            text: text.into(),
        }
    }
}

/// The savable part of a column: entries plus the highlighted index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnState {
    pub entries: Vec<ColumnEntry>,
    pub selected: usize,
}

impl ColumnState {
    pub fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
    }
}

/// A display unit bound to exactly one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub level: Level,
    state: ColumnState,
}

impl Column {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            state: ColumnState::default(),
        }
    }

    pub fn entries(&self) -> &[ColumnEntry] {
        &self.state.entries
    }

    pub fn selected(&self) -> usize {
        self.state.selected
    }

    pub fn selected_entry(&self) -> Option<&ColumnEntry> {
        self.state.entries.get(self.state.selected)
    }

    pub fn is_empty(&self) -> bool {
        self.state.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.state.entries.len()
    }

    /// Replace the entries, keeping the highlighted index where possible.
    pub fn set_entries(&mut self, entries: Vec<ColumnEntry>) {
        self.state.entries = entries;
        self.state.clamp_selection();
    }

    pub fn clear(&mut self) {
        self.state = ColumnState::default();
    }

    pub fn select(&mut self, index: usize) {
        self.state.selected = index;
        self.state.clamp_selection();
    }

    pub fn select_next(&mut self) {
        if self.state.selected + 1 < self.state.entries.len() {
            self.state.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.state.selected = self.state.selected.saturating_sub(1);
    }

    pub fn state(&self) -> &ColumnState {
        &self.state
    }

    pub fn restore(&mut self, state: ColumnState) {
        self.state = state;
        self.state.clamp_selection();
    }
}

/// Saved display state for levels outside the viewport, keyed by level.
///
/// Entries are written when a level scrolls off either edge and read back
/// when it scrolls into view again; nothing here outlives the process.
#[derive(Debug, Clone, Default)]
pub struct ColumnCache {
    saved: HashMap<Level, ColumnState>,
}

impl ColumnCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self, level: Level, state: ColumnState) {
        self.saved.insert(level, state);
    }

    /// Remove and return the saved state for `level`.
    pub fn take(&mut self, level: Level) -> Result<ColumnState, NavError> {
        self.saved.remove(&level).ok_or(NavError::LookupFailure(level))
    }

    pub fn contains(&self, level: Level) -> bool {
        self.saved.contains_key(&level)
    }

    pub fn get_mut(&mut self, level: Level) -> Option<&mut ColumnState> {
        self.saved.get_mut(&level)
    }

    /// Levels with a saved entry, in no particular order.
    pub fn levels(&self) -> impl Iterator<Item = Level> + '_ {
        self.saved.keys().copied()
    }

    /// Drop every entry for a level deeper than `level`. Used when a
    /// selection change invalidates everything below it.
    pub fn invalidate_deeper_than(&mut self, level: Level) {
        self.saved.retain(|&l, _| l <= level);
    }

    pub fn clear(&mut self) {
        self.saved.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(names: &[&str]) -> Vec<ColumnEntry> {
        names.iter().map(|n| ColumnEntry::new(*n, *n)).collect()
    }

    #[test]
    fn test_set_entries_clamps_selection() {
        let mut col = Column::new(3);
        col.set_entries(entries(&["a", "b", "c"]));
        col.select(2);
        col.set_entries(entries(&["x"]));
        assert_eq!(col.selected(), 0);
    }

    #[test]
    fn test_select_next_stops_at_end() {
        let mut col = Column::new(0);
        col.set_entries(entries(&["a", "b"]));
        col.select_next();
        col.select_next();
        assert_eq!(col.selected(), 1);
    }

    #[test]
    fn test_selected_entry_on_empty_column() {
        let col = Column::new(0);
        assert!(col.selected_entry().is_none());
    }

    #[test]
    fn test_cache_round_trip() {
        let mut cache = ColumnCache::new();
        let mut col = Column::new(2);
        col.set_entries(entries(&["a", "b"]));
        col.select(1);

        cache.save(2, col.state().clone());
        let restored = cache.take(2).unwrap();
        assert_eq!(restored, *col.state());
        // consumed on load
        assert!(matches!(cache.take(2), Err(NavError::LookupFailure(2))));
    }

    #[test]
    fn test_cache_miss_is_lookup_failure() {
        let mut cache = ColumnCache::new();
        assert_eq!(cache.take(5), Err(NavError::LookupFailure(5)));
    }

    #[test]
    fn test_save_overwrites_prior_entry() {
        let mut cache = ColumnCache::new();
        cache.save(1, ColumnState { entries: entries(&["old"]), selected: 0 });
        cache.save(1, ColumnState { entries: entries(&["new"]), selected: 0 });
        assert_eq!(cache.take(1).unwrap().entries[0].text, "new");
    }

    #[test]
    fn test_invalidate_deeper_than() {
        let mut cache = ColumnCache::new();
        for level in 0..5 {
            cache.save(level, ColumnState::default());
        }
        cache.invalidate_deeper_than(2);
        assert!(cache.contains(0) && cache.contains(1) && cache.contains(2));
        assert!(!cache.contains(3) && !cache.contains(4));
    }
}
