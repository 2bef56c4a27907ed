use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{RowStore, StoreError};

/// In-memory [`RowStore`]. Useful for tests and throwaway sessions; it can
/// also be constructed permanently unreachable to exercise failure paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sheets: Mutex<BTreeMap<String, Vec<Vec<String>>>>,
    unreachable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails with [`StoreError::Unavailable`].
    pub fn unreachable() -> Self {
        Self {
            sheets: Mutex::new(BTreeMap::new()),
            unreachable: true,
        }
    }

    fn check_reachable(&self) -> Result<(), StoreError> {
        if self.unreachable {
            return Err(StoreError::Unavailable("in-memory store marked unreachable".into()));
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<Vec<String>>>> {
        self.sheets.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RowStore for MemoryStore {
    async fn create_sheet(&self, name: &str, header: &[&str]) -> Result<(), StoreError> {
        self.check_reachable()?;
        self.lock()
            .entry(name.to_string())
            .or_insert_with(|| vec![header.iter().map(|h| h.to_string()).collect()]);
        Ok(())
    }

    async fn append_row(&self, name: &str, cells: &[String]) -> Result<(), StoreError> {
        self.check_reachable()?;
        let mut sheets = self.lock();
        let rows = sheets
            .get_mut(name)
            .ok_or_else(|| StoreError::MissingSheet(name.to_string()))?;
        rows.push(cells.to_vec());
        Ok(())
    }

    async fn read_rows(&self, name: &str) -> Result<Option<Vec<Vec<String>>>, StoreError> {
        self.check_reachable()?;
        Ok(self.lock().get(name).cloned())
    }

    async fn delete_row(&self, name: &str, row: usize) -> Result<(), StoreError> {
        self.check_reachable()?;
        let mut sheets = self.lock();
        let rows = sheets
            .get_mut(name)
            .ok_or_else(|| StoreError::MissingSheet(name.to_string()))?;
        if row == 0 || row > rows.len() {
            return Err(StoreError::RowOutOfBounds {
                sheet: name.to_string(),
                row,
            });
        }
        rows.remove(row - 1);
        Ok(())
    }
}
