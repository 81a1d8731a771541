#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of columns exposed to the host: checkbox and name.
pub const COLUMN_COUNT: usize = 2;

/// Table columns in host order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    /// Checkbox column (index 0).
    Check,
    /// Label name column (index 1).
    Name,
}

impl Column {
    /// All columns, in host order.
    pub const ALL: [Self; COLUMN_COUNT] = [Self::Check, Self::Name];

    /// Returns the host column index.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Check => 0,
            Self::Name => 1,
        }
    }

    /// Maps a host column index back to a column.
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Check),
            1 => Some(Self::Name),
            _ => None,
        }
    }

    /// Returns `true` if the user can toggle a check state in this column.
    #[inline]
    pub const fn is_checkable(self) -> bool {
        matches!(self, Self::Check)
    }

    /// Returns `true` if the user can edit text in this column.
    #[inline]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Name)
    }
}

/// A label bound to a shape owned by the host application.
///
/// `shape` is a non-owning identity handle (typically a shape id). Two records refer to the
/// same shape iff their handles compare equal; the record never keeps the shape alive.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelRecord<S> {
    pub checked: bool,
    pub name: String,
    pub shape: S,
}

impl<S> LabelRecord<S> {
    /// Creates a checked record for the given shape.
    pub fn new(shape: S, name: impl Into<String>) -> Self {
        Self {
            checked: true,
            name: name.into(),
            shape,
        }
    }

    /// Sets the initial check state.
    #[must_use]
    pub const fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }
}

impl<S: PartialEq> LabelRecord<S> {
    /// Returns `true` if this record is bound to `shape`.
    #[inline]
    pub fn is_bound_to(&self, shape: &S) -> bool {
        self.shape == *shape
    }
}

/// Partial update applied by [`crate::LabelStore::set`].
///
/// Each field that is `Some` overwrites the record and raises one cell notification for its
/// column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    pub checked: Option<bool>,
    pub name: Option<String>,
}

impl RecordUpdate {
    /// Update touching only the check state.
    pub const fn checked(checked: bool) -> Self {
        Self {
            checked: Some(checked),
            name: None,
        }
    }

    /// Update touching only the name.
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            checked: None,
            name: Some(name.into()),
        }
    }

    /// Returns `true` if the update changes nothing.
    pub const fn is_empty(&self) -> bool {
        self.checked.is_none() && self.name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_indices_round_trip() {
        for column in Column::ALL {
            assert_eq!(Column::from_index(column.index()), Some(column));
        }
        assert_eq!(Column::from_index(COLUMN_COUNT), None);
    }

    #[test]
    fn new_records_do_not_share_defaults() {
        let mut first = LabelRecord::new(1_u32, "cat");
        let second = LabelRecord::new(2_u32, "dog");
        first.checked = false;
        first.name.push_str("-edited");

        assert!(second.checked);
        assert_eq!(second.name, "dog");
        assert!(first.is_bound_to(&1));
        assert!(!first.is_bound_to(&2));
    }
}
