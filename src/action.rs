/// Actions that a user or application can initiate on the label table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelAction<Custom = ()> {
    /// Move the cursor to the previous visible row and select it.
    SelectPrev,
    /// Move the cursor to the next visible row and select it.
    SelectNext,
    /// Select the first visible row.
    SelectFirst,
    /// Select the last visible row.
    SelectLast,
    /// Toggle the check state of the selected rows (or the cursor row).
    ToggleChecked,
    /// Check every label, or uncheck every label when all are already checked.
    ToggleAll,
    /// Cycle the sort mode: ascending, descending, unsorted.
    CycleSort,
    /// Activate the cursor row (same notification as a double click).
    Activate,
    /// Request editing the cursor row's name.
    EditName,
    /// Request removal of the selected labels and their shapes.
    RemoveLabel,
    /// Custom action forwarded to the caller without internal handling.
    Custom(Custom),
}

/// Result of handling an action or key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome<Custom = ()> {
    /// The action was handled internally and state was updated.
    Handled,
    /// The action was ignored (e.g., nothing selected / nothing to do).
    Unhandled,
    /// The action is forwarded to the caller for handling.
    Action(LabelAction<Custom>),
}

/// Direction for [`crate::LabelTableState::select_adjacent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Modifier state accompanying a click.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectModifiers {
    /// Toggle the clicked row within the selection.
    pub ctrl: bool,
    /// Extend the selection from the anchor row to the clicked row.
    pub shift: bool,
}

impl SelectModifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
    };
    pub const SHIFT: Self = Self {
        ctrl: false,
        shift: true,
    };
}

/// Which double clicks raise a row activation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActivationPolicy {
    /// Any column of a selected row.
    #[default]
    AnyColumn,
    /// Only the name column of a selected row.
    NameColumnOnly,
}
