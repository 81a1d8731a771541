use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::error::{LabelTableError, Result};
use crate::model::{Column, LabelRecord, RecordUpdate};

/// Change recorded by [`LabelStore`] after a mutation has been applied.
///
/// Row ranges are inclusive and refer to source rows at the time of the change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreChange {
    /// All contents were replaced; previously held row indices are invalid.
    Reset,
    /// Rows `first..=last` were inserted.
    RowsInserted { first: usize, last: usize },
    /// Rows `first..=last` were removed.
    RowsRemoved { first: usize, last: usize },
    /// One column of rows `first..=last` changed in place.
    CellsChanged {
        first: usize,
        last: usize,
        column: Column,
    },
}

impl StoreChange {
    /// Returns `true` for changes that shift or invalidate row indices.
    #[inline]
    pub const fn is_structural(self) -> bool {
        !matches!(self, Self::CellsChanged { .. })
    }
}

/// Authoritative ordered list of label records.
///
/// Records are unique by position only; names may repeat. Every mutation appends a
/// [`StoreChange`] to an internal log which the owner drains with [`LabelStore::take_changes`].
pub struct LabelStore<S> {
    records: Vec<LabelRecord<S>>,
    changes: Vec<StoreChange>,
}

impl<S> Default for LabelStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> LabelStore<S> {
    /// Creates an empty store.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            changes: Vec::new(),
        }
    }

    /// Creates an empty store with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            changes: Vec::new(),
        }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns all records in source order.
    #[inline]
    pub fn records(&self) -> &[LabelRecord<S>] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabelRecord<S>> {
        self.records.iter()
    }

    /// Returns the record at `row`, if any.
    #[inline]
    pub fn get(&self, row: usize) -> Option<&LabelRecord<S>> {
        self.records.get(row)
    }

    /// Returns `true` if the store is non-empty and every record is checked.
    pub fn all_checked(&self) -> bool {
        !self.records.is_empty() && self.records.iter().all(|record| record.checked)
    }

    /// Replaces the entire contents.
    pub fn load(&mut self, records: Vec<LabelRecord<S>>) {
        debug!(rows = records.len(), "label store loaded");
        self.records = records;
        self.changes.push(StoreChange::Reset);
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        debug!(rows = self.records.len(), "label store cleared");
        self.records.clear();
        self.changes.push(StoreChange::Reset);
    }

    /// Appends a record and returns its source row.
    pub fn append(&mut self, record: LabelRecord<S>) -> usize {
        let row = self.records.len();
        self.records.push(record);
        debug!(row, "label appended");
        self.changes.push(StoreChange::RowsInserted {
            first: row,
            last: row,
        });
        row
    }

    /// Removes and returns the record at `row`.
    pub fn remove_at(&mut self, row: usize) -> Result<LabelRecord<S>> {
        self.check_row(row)?;
        let record = self.records.remove(row);
        debug!(row, "label removed");
        self.changes.push(StoreChange::RowsRemoved {
            first: row,
            last: row,
        });
        Ok(record)
    }

    /// Applies a partial update to the record at `row`.
    ///
    /// Each supplied field raises its own [`StoreChange::CellsChanged`] so observers can
    /// re-render only the affected column.
    pub fn set(&mut self, row: usize, update: RecordUpdate) -> Result<()> {
        self.check_row(row)?;
        let record = &mut self.records[row];
        if let Some(checked) = update.checked {
            record.checked = checked;
            self.changes.push(StoreChange::CellsChanged {
                first: row,
                last: row,
                column: Column::Check,
            });
        }
        if let Some(name) = update.name {
            record.name = name;
            self.changes.push(StoreChange::CellsChanged {
                first: row,
                last: row,
                column: Column::Name,
            });
        }
        Ok(())
    }

    /// Sets the check state of every record.
    pub fn set_all_checked(&mut self, checked: bool) {
        if self.records.is_empty() {
            return;
        }
        for record in &mut self.records {
            record.checked = checked;
        }
        debug!(rows = self.records.len(), checked, "label check state set for all rows");
        self.changes.push(StoreChange::CellsChanged {
            first: 0,
            last: self.records.len() - 1,
            column: Column::Check,
        });
    }

    /// Returns the display text of a cell (name column only).
    pub fn display(&self, row: usize, column: Column) -> Option<&str> {
        match column {
            Column::Name => self.records.get(row).map(|record| record.name.as_str()),
            Column::Check => None,
        }
    }

    /// Returns the check state of a cell (check column only).
    pub fn check_state(&self, row: usize, column: Column) -> Option<bool> {
        match column {
            Column::Check => self.records.get(row).map(|record| record.checked),
            Column::Name => None,
        }
    }

    /// Returns `true` if changes are waiting to be drained.
    #[inline]
    pub fn has_pending_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Drains recorded changes in the order the mutations happened.
    pub fn take_changes(&mut self) -> SmallVec<[StoreChange; 4]> {
        self.changes.drain(..).collect()
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row < self.records.len() {
            return Ok(());
        }
        warn!(row, len = self.records.len(), "label row out of range");
        Err(LabelTableError::RowOutOfRange {
            row,
            len: self.records.len(),
        })
    }
}

impl<S: PartialEq> LabelStore<S> {
    /// Returns the first record bound to `shape`.
    pub fn find_by_shape(&self, shape: &S) -> Option<&LabelRecord<S>> {
        self.records.iter().find(|record| record.is_bound_to(shape))
    }

    /// Returns the source row of the first record bound to `shape`.
    pub fn index_of_shape(&self, shape: &S) -> Option<usize> {
        self.records.iter().position(|record| record.is_bound_to(shape))
    }
}

impl<'a, S> IntoIterator for &'a LabelStore<S> {
    type Item = &'a LabelRecord<S>;
    type IntoIter = std::slice::Iter<'a, LabelRecord<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
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
        store.take_changes();
        store
    }

    fn names(store: &LabelStore<usize>) -> Vec<&str> {
        store.iter().map(|record| record.name.as_str()).collect()
    }

    #[test]
    fn load_and_clear_reset() {
        let mut store = LabelStore::new();
        store.load(vec![LabelRecord::new(0_usize, "a")]);
        store.clear();

        assert!(store.is_empty());
        assert_eq!(
            store.take_changes().as_slice(),
            &[StoreChange::Reset, StoreChange::Reset]
        );
    }

    #[test]
    fn append_reports_old_length() {
        let mut store = store_of(&["a", "b"]);

        let row = store.append(LabelRecord::new(7, "c"));

        assert_eq!(row, 2);
        assert_eq!(
            store.take_changes().as_slice(),
            &[StoreChange::RowsInserted { first: 2, last: 2 }]
        );
    }

    #[test]
    fn remove_at_middle_row() {
        let mut store = store_of(&["a", "b", "c"]);

        let removed = store.remove_at(1).unwrap();

        assert_eq!(removed.name, "b");
        assert_eq!(names(&store), vec!["a", "c"]);
        assert_eq!(
            store.take_changes().as_slice(),
            &[StoreChange::RowsRemoved { first: 1, last: 1 }]
        );
    }

    #[test]
    fn remove_out_of_range_leaves_store_untouched() {
        let mut store = store_of(&["a"]);

        let err = store.remove_at(1).unwrap_err();

        assert_eq!(err, LabelTableError::RowOutOfRange { row: 1, len: 1 });
        assert_eq!(names(&store), vec!["a"]);
        assert!(!store.has_pending_changes());
    }

    #[test]
    fn set_reports_each_touched_column() {
        let mut store = store_of(&["a", "b"]);

        store
            .set(
                1,
                RecordUpdate {
                    checked: Some(false),
                    name: Some("bee".to_string()),
                },
            )
            .unwrap();

        let record = store.get(1).unwrap();
        assert!(!record.checked);
        assert_eq!(record.name, "bee");
        assert_eq!(
            store.take_changes().as_slice(),
            &[
                StoreChange::CellsChanged {
                    first: 1,
                    last: 1,
                    column: Column::Check
                },
                StoreChange::CellsChanged {
                    first: 1,
                    last: 1,
                    column: Column::Name
                },
            ]
        );
        assert!(store.set(2, RecordUpdate::checked(true)).is_err());
    }

    #[test]
    fn set_all_checked_covers_every_row() {
        let mut store = store_of(&["a", "b", "c"]);

        store.set_all_checked(false);

        assert!(store.iter().all(|record| !record.checked));
        assert_eq!(
            store.take_changes().as_slice(),
            &[StoreChange::CellsChanged {
                first: 0,
                last: 2,
                column: Column::Check
            }]
        );

        let mut empty = LabelStore::<usize>::new();
        empty.set_all_checked(true);
        assert!(!empty.has_pending_changes());
    }

    #[test]
    fn shape_lookup_returns_first_match() {
        let mut store = store_of(&["a", "b"]);
        store.append(LabelRecord::new(1, "dup"));

        assert_eq!(store.index_of_shape(&1), Some(1));
        assert_eq!(store.find_by_shape(&1).map(|r| r.name.as_str()), Some("b"));
        assert_eq!(store.index_of_shape(&9), None);
        assert!(store.find_by_shape(&9).is_none());
    }

    #[test]
    fn cell_queries_are_column_scoped() {
        let store = store_of(&["a"]);

        assert_eq!(store.display(0, Column::Name), Some("a"));
        assert_eq!(store.display(0, Column::Check), None);
        assert_eq!(store.check_state(0, Column::Check), Some(true));
        assert_eq!(store.check_state(0, Column::Name), None);
        assert_eq!(store.check_state(3, Column::Check), None);
    }
}
