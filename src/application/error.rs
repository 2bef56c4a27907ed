use thiserror::Error;

use crate::domain::ValidationError;
use crate::storage::{HEADER_ROWS, StoreError};

#[derive(Error, Debug)]
pub enum AppError {
    /// The backing store could not be reached. Nothing is retried and no
    /// partial state is assumed committed.
    #[error("record store unavailable: {0}")]
    StoreUnavailable(String),

    /// A category sheet is absent. Reads normalize this to an empty
    /// sequence and appends auto-create the sheet, so this only surfaces
    /// when a mutation hits a sheet that vanished mid-operation.
    #[error("sheet '{0}' is missing from the workbook")]
    SchemaMissing(String),

    /// Caller-supplied data violates an invariant. Rejected before any I/O.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Already-persisted data violates an invariant. Never silently
    /// coerced; `position` is the 0-based data-row index.
    #[error("corrupt data in sheet '{sheet}', position {position}: {reason}")]
    DataIntegrity {
        sheet: String,
        position: usize,
        reason: String,
    },

    /// A positional operation targeted a stale or invalid index.
    #[error("position {index} is out of range ({count} entries)")]
    IndexOutOfRange { index: usize, count: usize },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => AppError::StoreUnavailable(msg),
            StoreError::MissingSheet(sheet) => AppError::SchemaMissing(sheet),
            // Only reachable when another writer shrank the sheet between
            // the repository's range check and the delete. No fresh count
            // is available at this point.
            StoreError::RowOutOfBounds { row, .. } => AppError::IndexOutOfRange {
                index: row.saturating_sub(HEADER_ROWS + 1),
                count: 0,
            },
        }
    }
}
