use crate::domain::TransactionKind;

use super::{RowStore, StoreError};

/// Number of header rows preceding data in every sheet.
pub const HEADER_ROWS: usize = 1;

/// Data rows of one sheet with cells addressable by header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSheet {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawSheet {
    fn empty(kind: TransactionKind) -> Self {
        Self {
            header: kind.header().iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Index of a named column, if the header carries it.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Cell at (data row, column). Short rows read as empty cells.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Number of data rows (the header does not count).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Uniform access to the backing store's sheets: owns the translation
/// between zero-based logical data-row indices and the store's 1-based,
/// header-offset addressing, and the idempotent sheet auto-creation.
#[derive(Debug)]
pub struct SheetAdapter<S> {
    store: S,
}

impl<S: RowStore> SheetAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Append one data row, creating the sheet with its header first if it
    /// does not exist yet. Creation tolerates concurrent writers.
    pub async fn append(&self, kind: TransactionKind, cells: &[String]) -> Result<(), StoreError> {
        self.store.create_sheet(kind.sheet_name(), kind.header()).await?;
        self.store.append_row(kind.sheet_name(), cells).await
    }

    /// Read all data rows of a kind's sheet. An absent sheet reads as an
    /// empty sheet with the kind's schema, never as an error.
    pub async fn read_all(&self, kind: TransactionKind) -> Result<RawSheet, StoreError> {
        match self.store.read_rows(kind.sheet_name()).await? {
            None => Ok(RawSheet::empty(kind)),
            Some(mut rows) => {
                if rows.is_empty() {
                    return Ok(RawSheet::empty(kind));
                }
                let header = rows.remove(0);
                Ok(RawSheet { header, rows })
            }
        }
    }

    /// Delete the data row at `logical_index` (0-based, data rows only).
    /// The store addresses rows 1-based with the header at row 1, so the
    /// translated target is `logical_index + 2`.
    pub async fn delete_at(
        &self,
        kind: TransactionKind,
        logical_index: usize,
    ) -> Result<(), StoreError> {
        self.store
            .delete_row(kind.sheet_name(), logical_index + HEADER_ROWS + 1)
            .await
    }
}
