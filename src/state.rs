use std::hash::Hash;

use ratatui::widgets::TableState;
use rustc_hash::{FxBuildHasher, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "keymap")]
use crate::keymap::LabelKeyBindings;
#[cfg(feature = "keymap")]
use crossterm::event::KeyEvent;

use crate::action::{ActionOutcome, ActivationPolicy, Direction, LabelAction, SelectModifiers};
use crate::error::{LabelTableError, Result};
use crate::model::{Column, LabelRecord, RecordUpdate};
use crate::notify::{LabelNotification, Observers, SubscriptionId};
use crate::store::{LabelStore, StoreChange};
use crate::style::TableScrollPolicy;
use crate::view::{LabelView, SortMode};

/// Table state: label store, filtered/sorted view, selection, and observers.
///
/// Row arguments are visible rows unless the parameter is named `source_row`. Selection, cursor
/// and anchor are kept as source rows and shifted on structural changes, so they follow their
/// records through filtering, sorting and removal. Shape handles need not be unique.
pub struct LabelTableState<S> {
    store: LabelStore<S>,
    view: LabelView,
    // Only the scroll offset is authoritative; `selected` is rewritten from `cursor` each frame.
    table_state: TableState,
    selected: FxHashSet<usize>,
    // Last selection published to observers.
    announced: FxHashSet<usize>,
    cursor: Option<usize>,
    anchor: Option<usize>,
    activation: ActivationPolicy,
    observers: Observers<S>,
    #[cfg(feature = "keymap")]
    keymap: LabelKeyBindings,
}

/// Snapshot of view state (filter, sort, selection, scroll).
///
/// With the `serde` feature enabled, this type derives `Serialize`/`Deserialize`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelTableSnapshot<S> {
    pub filter_text: String,
    pub sort: SortMode,
    /// Selected shapes, in no particular order.
    pub selected: Vec<S>,
    pub cursor: Option<S>,
    /// Scroll offset within the visible rows.
    pub offset: usize,
}

pub(crate) struct RenderParts<'s, S> {
    pub(crate) store: &'s LabelStore<S>,
    pub(crate) rows: &'s [usize],
    pub(crate) selected: &'s FxHashSet<usize>,
    pub(crate) table_state: &'s mut TableState,
}

impl<S: Copy + Eq + Hash> Default for LabelTableState<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Copy + Eq + Hash> LabelTableState<S> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty table with room for `capacity` labels.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: LabelStore::with_capacity(capacity),
            view: LabelView::with_capacity(capacity),
            table_state: TableState::default(),
            selected: FxHashSet::with_capacity_and_hasher(capacity.min(16), FxBuildHasher),
            announced: FxHashSet::default(),
            cursor: None,
            anchor: None,
            activation: ActivationPolicy::default(),
            observers: Observers::new(),
            #[cfg(feature = "keymap")]
            keymap: LabelKeyBindings::new(),
        }
    }

    /// Creates a table holding `records`.
    pub fn from_records(records: Vec<LabelRecord<S>>) -> Self {
        let mut state = Self::with_capacity(records.len());
        state.load(records);
        state
    }

    /// Read access to the underlying store (source order).
    #[inline]
    pub const fn store(&self) -> &LabelStore<S> {
        &self.store
    }

    #[inline]
    pub const fn activation_policy(&self) -> ActivationPolicy {
        self.activation
    }

    /// Chooses which double clicks raise [`LabelNotification::RowActivated`].
    pub const fn set_activation_policy(&mut self, policy: ActivationPolicy) {
        self.activation = policy;
    }

    #[cfg(feature = "keymap")]
    /// Returns a mutable reference to the key binding set.
    pub const fn keymap_mut(&mut self) -> &mut LabelKeyBindings {
        &mut self.keymap
    }

    /// Registers an observer; it is called synchronously for every notification.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&LabelNotification<'_, S>) + 'static,
    {
        self.observers.subscribe(observer)
    }

    /// Removes an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Replaces all labels. Selection is cleared.
    pub fn load(&mut self, records: Vec<LabelRecord<S>>) {
        self.store.load(records);
        self.flush_store_changes();
    }

    /// Removes all labels.
    pub fn clear(&mut self) {
        self.store.clear();
        self.flush_store_changes();
    }

    /// Appends a label and returns its source row.
    pub fn append(&mut self, record: LabelRecord<S>) -> usize {
        let row = self.store.append(record);
        self.flush_store_changes();
        row
    }

    /// Removes the label at `source_row`.
    pub fn remove_at(&mut self, source_row: usize) -> Result<LabelRecord<S>> {
        let record = self.store.remove_at(source_row)?;
        self.flush_store_changes();
        Ok(record)
    }

    /// Applies a partial update to the label at `source_row`.
    pub fn set(&mut self, source_row: usize, update: RecordUpdate) -> Result<()> {
        self.store.set(source_row, update)?;
        self.flush_store_changes();
        Ok(())
    }

    pub fn set_all_checked(&mut self, checked: bool) {
        self.store.set_all_checked(checked);
        self.flush_store_changes();
    }

    /// Checks every label, or unchecks every label when all are already checked.
    pub fn toggle_all_checked(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let checked = !self.store.all_checked();
        self.set_all_checked(checked);
    }

    /// Flips the check state of the label at visible `row`.
    pub fn toggle_checked(&mut self, row: usize) -> Result<()> {
        let source = self.source_row(row)?;
        let checked = self.store.get(source).is_some_and(|record| record.checked);
        self.set(source, RecordUpdate::checked(!checked))
    }

    pub fn set_checked(&mut self, row: usize, checked: bool) -> Result<()> {
        let source = self.source_row(row)?;
        self.set(source, RecordUpdate::checked(checked))
    }

    /// Renames the label at visible `row`.
    pub fn rename_row(&mut self, row: usize, name: impl Into<String>) -> Result<()> {
        let source = self.source_row(row)?;
        self.set(source, RecordUpdate::name(name))
    }

    /// Entry point for text the user finished editing in the name column.
    pub fn commit_edit(&mut self, row: usize, text: impl Into<String>) -> Result<()> {
        self.rename_row(row, text)
    }

    /// Number of visible rows.
    pub fn visible_len(&mut self) -> usize {
        self.view.visible_len(&self.store)
    }

    pub fn map_to_source(&mut self, row: usize) -> Option<usize> {
        self.view.map_to_source(&self.store, row)
    }

    /// Returns `None` when the source row is filtered out or out of range.
    pub fn map_from_source(&mut self, source_row: usize) -> Option<usize> {
        self.view.map_from_source(&self.store, source_row)
    }

    /// Returns the label shown at visible `row`.
    pub fn visible_record(&mut self, row: usize) -> Option<&LabelRecord<S>> {
        let source = self.view.map_to_source(&self.store, row)?;
        self.store.get(source)
    }

    /// Iterates the visible labels in display order.
    pub fn visible_records(&mut self) -> impl Iterator<Item = &LabelRecord<S>> + '_ {
        let store = &self.store;
        self.view
            .visible_rows(store)
            .iter()
            .filter_map(move |&source| store.get(source))
    }

    #[inline]
    pub fn filter_text(&self) -> &str {
        self.view.filter_text()
    }

    /// Shows only labels whose name contains `text`, ignoring case.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.view.set_filter(text);
        debug!(filter = self.view.filter_text(), "label filter changed");
        self.sync_selection();
    }

    pub fn clear_filter(&mut self) {
        self.set_filter(String::new());
    }

    #[inline]
    pub const fn sort(&self) -> SortMode {
        self.view.sort()
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.view.set_sort(sort);
        debug!(?sort, "label sort changed");
        self.sync_selection();
    }

    /// Selected visible rows, ascending.
    pub fn selected_rows(&mut self) -> Vec<usize> {
        if self.selected.is_empty() {
            return Vec::new();
        }
        let store = &self.store;
        let selected = &self.selected;
        self.view
            .visible_rows(store)
            .iter()
            .enumerate()
            .filter(|&(_, source)| selected.contains(source))
            .map(|(row, _)| row)
            .collect()
    }

    /// Labels at the selected visible rows, in display order.
    pub fn selected_records(&mut self) -> Vec<&LabelRecord<S>> {
        if self.selected.is_empty() {
            return Vec::new();
        }
        let store = &self.store;
        let selected = &self.selected;
        self.view
            .visible_rows(store)
            .iter()
            .filter(|&source| selected.contains(source))
            .filter_map(|&source| store.get(source))
            .collect()
    }

    pub fn selected_shapes(&mut self) -> Vec<S> {
        self.selected_records()
            .into_iter()
            .map(|record| record.shape)
            .collect()
    }

    pub fn is_row_selected(&mut self, row: usize) -> bool {
        self.map_to_source(row)
            .is_some_and(|source| self.selected.contains(&source))
    }

    /// Visible row of the cursor, if the cursor label is visible.
    pub fn cursor_row(&mut self) -> Option<usize> {
        let source = self.cursor?;
        self.map_from_source(source)
    }

    /// Selects only the label at visible `row` and moves the cursor there.
    pub fn select_row(&mut self, row: usize) -> bool {
        let Some(source) = self.map_to_source(row) else {
            return false;
        };
        self.select_only(source);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.anchor = None;
        self.sync_selection();
    }

    /// Selects the first label bound to `shape` if it is visible; otherwise does nothing.
    pub fn select_by_shape(&mut self, shape: S) -> bool {
        let Some(source) = self
            .store
            .index_of_shape(&shape)
            .filter(|&source| self.view.map_from_source(&self.store, source).is_some())
        else {
            debug!("label for shape is missing or filtered out");
            return false;
        };
        self.select_only(source);
        true
    }

    /// Returns the first label bound to `shape`.
    pub fn find_by_shape(&self, shape: S) -> Option<&LabelRecord<S>> {
        self.store.find_by_shape(&shape)
    }

    /// Removes the first label bound to `shape`, visible or not.
    pub fn remove_by_shape(&mut self, shape: S) -> Option<LabelRecord<S>> {
        let source = self.store.index_of_shape(&shape)?;
        self.remove_at(source).ok()
    }

    /// Selects the row before the last selected row, or after the first selected row.
    ///
    /// Does nothing when nothing is selected or the target row does not exist.
    pub fn select_adjacent(&mut self, direction: Direction) -> bool {
        let rows = self.selected_rows();
        let target = match direction {
            Direction::Previous => rows.last().and_then(|row| row.checked_sub(1)),
            Direction::Next => rows.first().map(|row| row + 1),
        };
        target.is_some_and(|row| self.select_row(row))
    }

    /// Handles a click on a visible cell.
    ///
    /// Clicks outside the visible rows are ignored. A click in the check column also toggles the
    /// label's check state.
    pub fn handle_click(&mut self, row: usize, column: Column, modifiers: SelectModifiers) -> bool {
        let Some(source) = self.map_to_source(row) else {
            return false;
        };

        if modifiers.shift {
            let anchor_row = self
                .anchor
                .or(self.cursor)
                .and_then(|anchor| self.map_from_source(anchor))
                .unwrap_or(row);
            let (first, last) = (anchor_row.min(row), anchor_row.max(row));
            let sources: SmallVec<[usize; 8]> = (first..=last)
                .filter_map(|range_row| self.map_to_source(range_row))
                .collect();
            if !modifiers.ctrl {
                self.selected.clear();
            }
            self.selected.extend(sources);
        } else {
            if modifiers.ctrl {
                if !self.selected.remove(&source) {
                    self.selected.insert(source);
                }
            } else {
                self.selected.clear();
                self.selected.insert(source);
            }
            self.anchor = Some(source);
        }
        self.cursor = Some(source);
        self.sync_selection();

        if column.is_checkable() {
            self.toggle_sources(&[source]);
        }
        true
    }

    /// Handles a double click; raises [`LabelNotification::RowActivated`] for selected rows.
    pub fn handle_double_click(&mut self, row: usize, column: Column) -> bool {
        if self.activation == ActivationPolicy::NameColumnOnly && column != Column::Name {
            return false;
        }
        if !self.is_row_selected(row) {
            return false;
        }
        self.activate(row, column)
    }

    /// Handles a table action and returns the resulting outcome.
    pub fn handle_action<C>(&mut self, action: LabelAction<C>) -> ActionOutcome<C> {
        match action {
            LabelAction::Custom(_) => return ActionOutcome::Action(action),
            // Acts on the whole store, hidden labels included.
            LabelAction::ToggleAll => {
                if self.store.is_empty() {
                    return ActionOutcome::Unhandled;
                }
                self.toggle_all_checked();
                return ActionOutcome::Handled;
            }
            _ => {}
        }

        let len = self.visible_len();
        if len == 0 {
            return ActionOutcome::Unhandled;
        }

        match action {
            LabelAction::SelectPrev => {
                let target = self.cursor_row().map_or(0, |row| row.saturating_sub(1));
                self.select_row(target);
                ActionOutcome::Handled
            }
            LabelAction::SelectNext => {
                let target = self.cursor_row().map_or(0, |row| (row + 1).min(len - 1));
                self.select_row(target);
                ActionOutcome::Handled
            }
            LabelAction::SelectFirst => {
                self.select_row(0);
                ActionOutcome::Handled
            }
            LabelAction::SelectLast => {
                self.select_row(len - 1);
                ActionOutcome::Handled
            }
            LabelAction::ToggleChecked => {
                let mut rows = self.selected_rows();
                if rows.is_empty() {
                    rows.extend(self.cursor_row());
                }
                if rows.is_empty() {
                    return ActionOutcome::Unhandled;
                }
                let sources: SmallVec<[usize; 8]> = rows
                    .iter()
                    .filter_map(|&row| self.map_to_source(row))
                    .collect();
                self.toggle_sources(&sources);
                ActionOutcome::Handled
            }
            LabelAction::CycleSort => {
                self.set_sort(self.sort().next());
                ActionOutcome::Handled
            }
            LabelAction::Activate => {
                if let Some(row) = self.cursor_row()
                    && self.activate(row, Column::Name)
                {
                    return ActionOutcome::Handled;
                }
                ActionOutcome::Unhandled
            }
            LabelAction::EditName | LabelAction::RemoveLabel | LabelAction::Custom(_) => {
                ActionOutcome::Action(action)
            }
            LabelAction::ToggleAll => ActionOutcome::Handled,
        }
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event into an action and handles it.
    pub fn handle_key(&mut self, key: KeyEvent) -> ActionOutcome<()> {
        let Some(action) = self.keymap.resolve(key) else {
            return ActionOutcome::Unhandled;
        };
        self.handle_action(action)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event with a custom mapping and handles it.
    pub fn handle_key_with<C, F>(&mut self, key: KeyEvent, custom: F) -> ActionOutcome<C>
    where
        F: Fn(KeyEvent) -> Option<C>,
    {
        let Some(action) = self.keymap.resolve_with(key, custom) else {
            return ActionOutcome::Unhandled;
        };
        self.handle_action(action)
    }

    /// Scroll offset within the visible rows.
    #[inline]
    pub fn offset(&self) -> usize {
        self.table_state.offset()
    }

    /// Adjusts the scroll offset so the cursor row is within the viewport.
    pub fn ensure_cursor_visible(&mut self, viewport_height: usize) {
        let Some(cursor) = self.sync_table_cursor() else {
            return;
        };
        let viewport_height = viewport_height.max(1);
        let offset = self.table_state.offset();
        if cursor < offset {
            *self.table_state.offset_mut() = cursor;
        } else if cursor >= offset + viewport_height {
            *self.table_state.offset_mut() = cursor + 1 - viewport_height;
        }
    }

    /// Adjusts cursor visibility according to the provided scroll policy.
    pub fn ensure_cursor_visible_with_policy(
        &mut self,
        viewport_height: usize,
        policy: TableScrollPolicy,
    ) {
        match policy {
            TableScrollPolicy::KeepInView => self.ensure_cursor_visible(viewport_height),
            TableScrollPolicy::CenterOnSelect => self.ensure_cursor_centered(viewport_height),
        }
    }

    /// Captures filter, sort, selection and scroll state.
    pub fn snapshot(&self) -> LabelTableSnapshot<S> {
        LabelTableSnapshot {
            filter_text: self.view.filter_text().to_string(),
            sort: self.view.sort(),
            selected: self.shapes_of(self.selected.iter().copied()),
            cursor: self
                .cursor
                .and_then(|source| self.store.get(source))
                .map(|record| record.shape),
            offset: self.table_state.offset(),
        }
    }

    /// Restores a snapshot.
    ///
    /// Every label bound to a snapshot shape is selected; the cursor goes to the first label bound
    /// to the cursor shape. Labels that are not visible are dropped from the selection.
    pub fn restore(&mut self, snapshot: LabelTableSnapshot<S>) {
        self.view.set_filter(snapshot.filter_text);
        self.view.set_sort(snapshot.sort);
        let shapes: FxHashSet<S> = snapshot.selected.into_iter().collect();
        self.selected = self
            .store
            .iter()
            .enumerate()
            .filter(|(_, record)| shapes.contains(&record.shape))
            .map(|(source, _)| source)
            .collect();
        self.cursor = snapshot
            .cursor
            .and_then(|shape| self.store.index_of_shape(&shape));
        self.anchor = self.cursor;
        *self.table_state.offset_mut() = snapshot.offset;
        self.sync_selection();
    }

    pub(crate) fn prepare_render(&mut self, viewport_height: usize, policy: TableScrollPolicy) {
        self.view.ensure_mapping(&self.store);
        self.ensure_cursor_visible_with_policy(viewport_height, policy);
    }

    pub(crate) fn render_parts(&mut self) -> RenderParts<'_, S> {
        let store = &self.store;
        RenderParts {
            store,
            rows: self.view.visible_rows(store),
            selected: &self.selected,
            table_state: &mut self.table_state,
        }
    }

    fn ensure_cursor_centered(&mut self, viewport_height: usize) {
        let Some(cursor) = self.sync_table_cursor() else {
            return;
        };
        let viewport_height = viewport_height.max(1);
        let total = self.visible_len();
        if total <= viewport_height {
            *self.table_state.offset_mut() = 0;
            return;
        }

        // Center the cursor, then clamp to the valid scroll range.
        let half = viewport_height / 2;
        let max_offset = total - viewport_height;
        *self.table_state.offset_mut() = cursor.saturating_sub(half).min(max_offset);
    }

    fn sync_table_cursor(&mut self) -> Option<usize> {
        let cursor = self.cursor_row();
        self.table_state.select(cursor);
        cursor
    }

    fn source_row(&mut self, row: usize) -> Result<usize> {
        if let Some(source) = self.view.map_to_source(&self.store, row) {
            return Ok(source);
        }
        let len = self.view.visible_len(&self.store);
        warn!(row, len, "visible label row out of range");
        Err(LabelTableError::RowOutOfRange { row, len })
    }

    fn shapes_of(&self, sources: impl Iterator<Item = usize>) -> Vec<S> {
        let mut sources: Vec<usize> = sources.collect();
        sources.sort_unstable();
        sources
            .into_iter()
            .filter_map(|source| self.store.get(source))
            .map(|record| record.shape)
            .collect()
    }

    fn select_only(&mut self, source: usize) {
        self.selected.clear();
        self.selected.insert(source);
        self.cursor = Some(source);
        self.anchor = Some(source);
        self.sync_selection();
    }

    fn activate(&mut self, row: usize, column: Column) -> bool {
        let Some(source) = self.view.map_to_source(&self.store, row) else {
            return false;
        };
        let Some(record) = self.store.get(source) else {
            return false;
        };
        debug!(row, source, ?column, "label row activated");
        self.observers
            .notify(&LabelNotification::RowActivated { row, column, record });
        true
    }

    fn toggle_sources(&mut self, sources: &[usize]) {
        for &source in sources {
            let Some(checked) = self.store.get(source).map(|record| record.checked) else {
                continue;
            };
            if let Err(err) = self.store.set(source, RecordUpdate::checked(!checked)) {
                warn!(%err, "label toggle skipped");
            }
        }
        self.flush_store_changes();
    }

    fn flush_store_changes(&mut self) {
        // Drained into a local batch: observers never see a half-processed log.
        let changes = self.store.take_changes();
        for change in changes {
            self.view.invalidate();
            if change.is_structural() {
                self.remap_selection(change);
            }
            self.observers.notify(&LabelNotification::Model(change));
            if let StoreChange::CellsChanged { first, last, .. } = change {
                for row in first..=last {
                    if let Some(record) = self.store.get(row) {
                        self.observers
                            .notify(&LabelNotification::RecordChanged { row, record });
                    }
                }
            }
        }
        self.sync_selection();
    }

    // Moves selected source rows across a structural change, the way persistent indices follow
    // row insertion and removal. The announced set moves with them unless a selected row was
    // dropped, so a pure shift is not reported as a selection change.
    fn remap_selection(&mut self, change: StoreChange) {
        let remap = |rows: &FxHashSet<usize>| -> FxHashSet<usize> {
            rows.iter()
                .filter_map(|&row| shift_row(row, change))
                .collect()
        };
        let before = self.selected.len();
        self.selected = remap(&self.selected);
        if self.selected.len() == before {
            self.announced = remap(&self.announced);
        }
        self.cursor = self.cursor.and_then(|row| shift_row(row, change));
        self.anchor = self.anchor.and_then(|row| shift_row(row, change));
    }

    fn sync_selection(&mut self) {
        if !self.selected.is_empty() || self.cursor.is_some() || self.anchor.is_some() {
            let store = &self.store;
            let view = &mut self.view;
            let mut is_visible = |source: &usize| view.map_from_source(store, *source).is_some();
            self.selected.retain(&mut is_visible);
            self.cursor = self.cursor.filter(&mut is_visible);
            self.anchor = self.anchor.filter(&mut is_visible);
        }

        if self.selected == self.announced {
            return;
        }
        self.announced.clone_from(&self.selected);
        let rows = self.selected_rows();
        debug!(selected = rows.len(), "label selection changed");
        self.observers
            .notify(&LabelNotification::SelectionChanged { rows: &rows });
    }
}

// Source row after `change`; `None` when the row is gone.
const fn shift_row(row: usize, change: StoreChange) -> Option<usize> {
    match change {
        StoreChange::Reset => None,
        StoreChange::RowsInserted { first, last } if row >= first => Some(row + (last - first + 1)),
        StoreChange::RowsRemoved { first, last } if row > last => Some(row - (last - first + 1)),
        StoreChange::RowsRemoved { first, .. } if row >= first => None,
        StoreChange::RowsInserted { .. }
        | StoreChange::RowsRemoved { .. }
        | StoreChange::CellsChanged { .. } => Some(row),
    }
}
