use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing collaborator could not be reached. Not retried here;
    /// surfaced to the caller as-is.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error("sheet '{0}' does not exist")]
    MissingSheet(String),

    #[error("row {row} is out of bounds for sheet '{sheet}'")]
    RowOutOfBounds { sheet: String, row: usize },
}

/// Contract of the backing tabular store: named sheets of rows, where row 1
/// is the header and rows are addressed with 1-based positions. The store
/// has no notion of row identity beyond position.
///
/// Calls may block on I/O; no timeouts or retries happen at this level.
#[allow(async_fn_in_trait)]
pub trait RowStore {
    /// Create a sheet with the given header row. Creating a sheet that
    /// already exists is success, not an error, so concurrent writers can
    /// race on creation safely.
    async fn create_sheet(&self, name: &str, header: &[&str]) -> Result<(), StoreError>;

    /// Append one data row to an existing sheet.
    async fn append_row(&self, name: &str, cells: &[String]) -> Result<(), StoreError>;

    /// Read every row of a sheet including the header, or `None` when the
    /// sheet does not exist.
    async fn read_rows(&self, name: &str) -> Result<Option<Vec<Vec<String>>>, StoreError>;

    /// Delete the row at the given 1-based position. Row 1 is the header.
    async fn delete_row(&self, name: &str, row: usize) -> Result<(), StoreError>;
}
