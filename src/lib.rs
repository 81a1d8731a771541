//! Checkable, filterable, sortable label table widget for ratatui.
//!
//! [`LabelTableState`] owns an ordered [`LabelStore`] of labels bound to shapes, a lazily
//! rebuilt [`LabelView`] (substring filter plus optional name sort), the selection, and a list
//! of observers. [`LabelTableView`] renders it as a checkbox column and a name column.
//!
//! Feature flags:
//! - `keymap`: crossterm-based key bindings and `LabelTableState::handle_key*` helpers.
//! - `serde`: serde support for records, sort mode and `LabelTableSnapshot`.

mod action;
mod error;
mod glyphs;
#[cfg(feature = "keymap")]
mod keymap;
mod model;
mod notify;
pub mod prelude;
mod state;
mod store;
mod style;
mod view;
mod widget;

pub use action::{ActionOutcome, ActivationPolicy, Direction, LabelAction, SelectModifiers};
pub use error::{LabelTableError, Result};
pub use glyphs::{CheckGlyphs, check_cell, name_cell};
#[cfg(feature = "keymap")]
pub use keymap::{KeymapProfile, LabelKeyBindings};
pub use model::{COLUMN_COUNT, Column, LabelRecord, RecordUpdate};
pub use notify::{LabelNotification, SubscriptionId};
pub use state::{LabelTableSnapshot, LabelTableState};
pub use store::{LabelStore, StoreChange};
pub use style::{LabelTableStyle, TableScrollPolicy};
pub use view::{LabelView, SortMode};
pub use widget::LabelTableView;
