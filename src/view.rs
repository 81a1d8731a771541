use std::cmp::Ordering;

use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::model::LabelRecord;
use crate::store::LabelStore;

/// Sort order applied to the visible rows.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Visible order follows source order.
    #[default]
    None,
    /// Names ascending.
    Ascending,
    /// Names descending.
    Descending,
}

impl SortMode {
    /// Maps the three-way selector index (0 ascending, 1 descending, 2 unsorted).
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Ascending),
            1 => Some(Self::Descending),
            2 => Some(Self::None),
            _ => None,
        }
    }

    /// Next mode in selector order: ascending, descending, unsorted.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::None,
            Self::None => Self::Ascending,
        }
    }

    #[inline]
    pub const fn is_sorted(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Filtered and sorted projection over a [`LabelStore`].
///
/// The projection never reorders the store. It caches a visible-to-source table (and its
/// inverse) which is rebuilt lazily: any filter, sort, or store change marks it stale, and
/// every index query rebuilds it first.
pub struct LabelView {
    filter_text: String,
    // Lowercased once per filter change.
    filter_folded: String,
    sort: SortMode,
    visible_rows: Vec<usize>,
    source_index: Vec<Option<usize>>,
    stale: bool,
}

impl Default for LabelView {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelView {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            filter_text: String::new(),
            filter_folded: String::new(),
            sort: SortMode::None,
            visible_rows: Vec::with_capacity(capacity),
            source_index: Vec::with_capacity(capacity),
            stale: true,
        }
    }

    /// Current filter text as entered.
    #[inline]
    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// Sets the substring filter. Empty text shows every row.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
        self.filter_folded = self.filter_text.to_lowercase();
        self.stale = true;
    }

    pub fn clear_filter(&mut self) {
        self.set_filter(String::new());
    }

    #[inline]
    pub const fn sort(&self) -> SortMode {
        self.sort
    }

    /// Sets the sort mode; the store order is left untouched.
    pub const fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
        self.stale = true;
    }

    /// Marks the cached mapping as stale.
    #[inline]
    pub const fn invalidate(&mut self) {
        self.stale = true;
    }

    #[inline]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// Case-insensitive substring test against the current filter.
    pub fn matches(&self, name: &str) -> bool {
        name_matches(&self.filter_folded, name)
    }

    /// Returns `true` if `record` passes the filter.
    #[inline]
    pub fn filter_predicate<S>(&self, record: &LabelRecord<S>) -> bool {
        self.matches(&record.name)
    }

    /// Orders two records by name for the current sort mode.
    pub fn sort_comparator<S>(&self, a: &LabelRecord<S>, b: &LabelRecord<S>) -> Ordering {
        compare_names(self.sort, &a.name, &b.name)
    }

    /// Rebuilds the mapping if it is stale.
    pub fn ensure_mapping<S>(&mut self, store: &LabelStore<S>) {
        if !self.stale {
            return;
        }
        self.rebuild(store);
    }

    /// Number of visible rows.
    pub fn visible_len<S>(&mut self, store: &LabelStore<S>) -> usize {
        self.ensure_mapping(store);
        self.visible_rows.len()
    }

    /// Visible-to-source table: entry `v` is the source row shown at visible row `v`.
    pub fn visible_rows<S>(&mut self, store: &LabelStore<S>) -> &[usize] {
        self.ensure_mapping(store);
        &self.visible_rows
    }

    /// Translates a visible row to its source row.
    pub fn map_to_source<S>(&mut self, store: &LabelStore<S>, visible_row: usize) -> Option<usize> {
        self.ensure_mapping(store);
        self.visible_rows.get(visible_row).copied()
    }

    /// Translates a source row to its visible row; `None` if it is filtered out.
    pub fn map_from_source<S>(&mut self, store: &LabelStore<S>, source_row: usize) -> Option<usize> {
        self.ensure_mapping(store);
        self.source_index.get(source_row).copied().flatten()
    }

    fn rebuild<S>(&mut self, store: &LabelStore<S>) {
        let records = store.records();
        let folded = self.filter_folded.as_str();
        self.visible_rows.clear();
        self.visible_rows.extend(
            records
                .iter()
                .enumerate()
                .filter(|(_, record)| name_matches(folded, &record.name))
                .map(|(row, _)| row),
        );

        if self.sort.is_sorted() {
            let sort = self.sort;
            // `sort_by` is stable: equal names keep source order.
            self.visible_rows
                .sort_by(|&a, &b| compare_names(sort, &records[a].name, &records[b].name));
        }

        self.source_index.clear();
        self.source_index.resize(records.len(), None);
        for (visible, &source) in self.visible_rows.iter().enumerate() {
            self.source_index[source] = Some(visible);
        }

        self.stale = false;
        debug!(
            visible = self.visible_rows.len(),
            total = records.len(),
            sort = ?self.sort,
            "label view mapping rebuilt"
        );
    }
}

fn name_matches(folded: &str, name: &str) -> bool {
    folded.is_empty() || name.to_lowercase().contains(folded)
}

fn compare_names(sort: SortMode, a: &str, b: &str) -> Ordering {
    match sort {
        SortMode::None => Ordering::Equal,
        SortMode::Ascending => a.cmp(b),
        SortMode::Descending => b.cmp(a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_of(names: &[&str]) -> LabelStore<usize> {
        let mut store = LabelStore::new();
        store.load(
            names
                .iter()
                .enumerate()
                .map(|(shape, name)| LabelRecord::new(shape, *name))
                .collect(),
        );
        store
    }

    fn visible_names<'a>(view: &mut LabelView, store: &'a LabelStore<usize>) -> Vec<&'a str> {
        view.visible_rows(store)
            .iter()
            .map(|&row| store.records()[row].name.as_str())
            .collect()
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let store = store_of(&["cat", "dog", "bird"]);
        let mut view = LabelView::new();

        view.set_filter("d");
        assert_eq!(visible_names(&mut view, &store), vec!["dog", "bird"]);

        view.set_filter("DO");
        assert_eq!(visible_names(&mut view, &store), vec!["dog"]);

        view.clear_filter();
        assert_eq!(visible_names(&mut view, &store), vec!["cat", "dog", "bird"]);
    }

    #[test]
    fn filter_keeps_every_match_and_nothing_else() {
        let store = store_of(&["Car", "scar", "cart", "boat", "CARGO", ""]);
        let mut view = LabelView::new();

        for text in ["car", "a", "x", "", "AR"] {
            view.set_filter(text);
            let visible = view.visible_rows(&store).to_vec();
            let folded = text.to_lowercase();
            for (row, record) in store.iter().enumerate() {
                let is_match = record.name.to_lowercase().contains(&folded);
                assert_eq!(visible.contains(&row), is_match, "{text:?} vs {:?}", record.name);
            }
        }
    }

    #[test]
    fn sort_ascending_and_descending() {
        let store = store_of(&["cat", "dog", "bird"]);
        let mut view = LabelView::new();

        view.set_sort(SortMode::Ascending);
        assert_eq!(visible_names(&mut view, &store), vec!["bird", "cat", "dog"]);

        view.set_sort(SortMode::Descending);
        assert_eq!(visible_names(&mut view, &store), vec!["dog", "cat", "bird"]);

        view.set_sort(SortMode::None);
        assert_eq!(visible_names(&mut view, &store), vec!["cat", "dog", "bird"]);
    }

    #[test]
    fn sort_is_case_sensitive_and_stable() {
        let store = store_of(&["b", "B", "a", "b"]);
        let mut view = LabelView::new();

        view.set_sort(SortMode::Ascending);

        assert_eq!(view.visible_rows(&store), &[1, 2, 0, 3]);
    }

    #[test]
    fn sort_never_touches_store_order() {
        let store = store_of(&["cat", "dog", "bird"]);
        let before: Vec<_> = store.records().to_vec();
        let mut view = LabelView::new();

        view.set_sort(SortMode::Descending);
        view.ensure_mapping(&store);

        assert_eq!(store.records(), before.as_slice());
    }

    #[test]
    fn mapping_round_trips() {
        let store = store_of(&["delta", "alpha", "dingo", "beta", "door"]);
        let mut view = LabelView::new();
        view.set_filter("d");
        view.set_sort(SortMode::Ascending);

        let len = view.visible_len(&store);
        assert_eq!(len, 3);
        for visible in 0..len {
            let source = view.map_to_source(&store, visible).unwrap();
            assert_eq!(view.map_from_source(&store, source), Some(visible));
        }
        for source in 0..store.len() {
            if let Some(visible) = view.map_from_source(&store, source) {
                assert_eq!(view.map_to_source(&store, visible), Some(source));
            }
        }
        assert_eq!(view.map_from_source(&store, 1), None);
        assert_eq!(view.map_from_source(&store, 99), None);
        assert_eq!(view.map_to_source(&store, len), None);
    }

    #[test]
    fn mapping_is_lazy() {
        let mut store = store_of(&["a", "b"]);
        let mut view = LabelView::new();
        assert!(view.is_stale());

        assert_eq!(view.visible_len(&store), 2);
        assert!(!view.is_stale());

        store.append(LabelRecord::new(2, "c"));
        view.invalidate();
        assert!(view.is_stale());
        assert_eq!(view.visible_len(&store), 3);

        view.set_filter("a");
        assert!(view.is_stale());
        assert_eq!(view.visible_len(&store), 1);
    }

    #[test]
    fn sort_mode_selector_order() {
        assert_eq!(SortMode::from_index(0), Some(SortMode::Ascending));
        assert_eq!(SortMode::from_index(1), Some(SortMode::Descending));
        assert_eq!(SortMode::from_index(2), Some(SortMode::None));
        assert_eq!(SortMode::from_index(3), None);
        assert_eq!(SortMode::None.next(), SortMode::Ascending);
        assert_eq!(SortMode::Ascending.next(), SortMode::Descending);
        assert_eq!(SortMode::Descending.next(), SortMode::None);
    }
}
