use thiserror::Error;

/// Errors returned by positional access into the label table.
///
/// Shape lookups never fail: they return `None` when no record is bound to the shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LabelTableError {
    /// The row index is outside `0..len`.
    #[error("row {row} is out of range (row count is {len})")]
    RowOutOfRange { row: usize, len: usize },
}

pub type Result<T, E = LabelTableError> = std::result::Result<T, E>;
