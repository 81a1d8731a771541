pub use crate::{
    ActionOutcome, ActivationPolicy, CheckGlyphs, Column, Direction, LabelAction,
    LabelNotification, LabelRecord, LabelStore, LabelTableError, LabelTableSnapshot,
    LabelTableState, LabelTableStyle, LabelTableView, LabelView, RecordUpdate, SelectModifiers,
    SortMode, StoreChange, SubscriptionId, TableScrollPolicy,
};

#[cfg(feature = "keymap")]
pub use crate::{KeymapProfile, LabelKeyBindings};
