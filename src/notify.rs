use tracing::trace;

use crate::model::{Column, LabelRecord};
use crate::store::StoreChange;

/// Notification published by [`crate::LabelTableState`] to its observers.
///
/// Notifications are delivered synchronously, in the order the underlying mutations happened,
/// after each mutation has been fully applied.
#[derive(Debug)]
pub enum LabelNotification<'a, S> {
    /// Structural or cell change in the store, for host re-rendering.
    Model(StoreChange),
    /// A record changed in place. `row` is its source row.
    RecordChanged {
        row: usize,
        record: &'a LabelRecord<S>,
    },
    /// The selection changed; `rows` are the selected visible rows, ascending.
    SelectionChanged { rows: &'a [usize] },
    /// A selected visible row was activated (double click or [`crate::LabelAction::Activate`]).
    RowActivated {
        row: usize,
        column: Column,
        record: &'a LabelRecord<S>,
    },
}

/// Handle returned by [`crate::LabelTableState::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<S> = Box<dyn FnMut(&LabelNotification<'_, S>)>;

pub(crate) struct Observers<S> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Observer<S>)>,
}

impl<S> Observers<S> {
    pub(crate) const fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&LabelNotification<'_, S>) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(observer)));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self, notification: &LabelNotification<'_, S>) {
        if self.entries.is_empty() {
            return;
        }
        trace!(observers = self.entries.len(), "dispatching label notification");
        for (_, observer) in &mut self.entries {
            observer(notification);
        }
    }
}
