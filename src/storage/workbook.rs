use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::TransactionKind;

use super::{RowStore, StoreError};

/// A workbook stored as a directory of CSV files, one file per sheet, with
/// the header in row 1. This is the on-disk [`RowStore`] the CLI uses.
#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    root: PathBuf,
}

impl CsvWorkbook {
    /// Open an existing workbook directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::Unavailable(format!(
                "workbook directory '{}' not found (run `init` first)",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Create the workbook directory with one sheet per transaction kind.
    /// Idempotent: an existing workbook is left untouched.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| unavailable(&root, &e))?;
        let workbook = Self { root };
        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            workbook.create_sheet_file(kind.sheet_name(), kind.header())?;
        }
        Ok(workbook)
    }

    fn sheet_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.csv"))
    }

    fn create_sheet_file(&self, name: &str, header: &[&str]) -> Result<(), StoreError> {
        let path = self.sheet_path(name);
        // create_new loses the race cleanly when another writer got there
        // first; AlreadyExists counts as success.
        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(()),
            Err(e) => return Err(unavailable(&path, &e)),
        };
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(header).map_err(|e| csv_unavailable(&path, &e))?;
        writer.flush().map_err(|e| unavailable(&path, &e))?;
        debug!(sheet = name, "created sheet");
        Ok(())
    }

    fn read_sheet(&self, name: &str) -> Result<Option<Vec<Vec<String>>>, StoreError> {
        let path = self.sheet_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(|e| csv_unavailable(&path, &e))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| csv_unavailable(&path, &e))?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }
        Ok(Some(rows))
    }

    fn write_sheet(&self, name: &str, rows: &[Vec<String>]) -> Result<(), StoreError> {
        let path = self.sheet_path(name);
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&path)
            .map_err(|e| csv_unavailable(&path, &e))?;
        for row in rows {
            writer.write_record(row).map_err(|e| csv_unavailable(&path, &e))?;
        }
        writer.flush().map_err(|e| unavailable(&path, &e))?;
        Ok(())
    }
}

impl RowStore for CsvWorkbook {
    async fn create_sheet(&self, name: &str, header: &[&str]) -> Result<(), StoreError> {
        self.create_sheet_file(name, header)
    }

    async fn append_row(&self, name: &str, cells: &[String]) -> Result<(), StoreError> {
        let path = self.sheet_path(name);
        if !path.exists() {
            return Err(StoreError::MissingSheet(name.to_string()));
        }
        let file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|e| unavailable(&path, &e))?;
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);
        writer.write_record(cells).map_err(|e| csv_unavailable(&path, &e))?;
        writer.flush().map_err(|e| unavailable(&path, &e))?;
        debug!(sheet = name, "appended row");
        Ok(())
    }

    async fn read_rows(&self, name: &str) -> Result<Option<Vec<Vec<String>>>, StoreError> {
        self.read_sheet(name)
    }

    async fn delete_row(&self, name: &str, row: usize) -> Result<(), StoreError> {
        let mut rows = self
            .read_sheet(name)?
            .ok_or_else(|| StoreError::MissingSheet(name.to_string()))?;
        if row == 0 || row > rows.len() {
            return Err(StoreError::RowOutOfBounds {
                sheet: name.to_string(),
                row,
            });
        }
        rows.remove(row - 1);
        self.write_sheet(name, &rows)?;
        debug!(sheet = name, row, "deleted row");
        Ok(())
    }
}

fn unavailable(path: &Path, err: &std::io::Error) -> StoreError {
    StoreError::Unavailable(format!("{}: {}", path.display(), err))
}

fn csv_unavailable(path: &Path, err: &csv::Error) -> StoreError {
    StoreError::Unavailable(format!("{}: {}", path.display(), err))
}
