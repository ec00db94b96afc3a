//! Thread-safe handle around a [`Spreadsheet`]
//!
//! Mutations take the write lock for the whole parse/update/sort/evaluate
//! pipeline, so no reader ever sees a half-updated graph. Reads only touch
//! cached values and share the read lock.

use crate::error::Result;
use crate::spreadsheet::Spreadsheet;
use cellgraph_core::CellInput;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable, lock-protected spreadsheet
#[derive(Debug, Clone, Default)]
pub struct SharedSpreadsheet {
    inner: Arc<RwLock<Spreadsheet>>,
}

impl SharedSpreadsheet {
    /// Wrap an existing sheet
    pub fn new(sheet: Spreadsheet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(sheet)),
        }
    }

    /// Set a cell under the write lock
    pub fn set_cell_value(&self, address: &str, value: impl Into<CellInput>) -> Result<()> {
        self.write().set_cell_value(address, value)
    }

    /// Set a cell from raw entry text under the write lock
    pub fn set_cell_entry(&self, address: &str, text: &str) -> Result<()> {
        self.write().set_cell_entry(address, text)
    }

    /// Read a cell value under the read lock
    pub fn get_cell_value(&self, address: &str) -> Result<i64> {
        self.read().get_cell_value(address)
    }

    /// Acquire the read lock
    ///
    /// A lock poisoned by a panicking holder is recovered.
    pub fn read(&self) -> RwLockReadGuard<'_, Spreadsheet> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquire the write lock
    pub fn write(&self) -> RwLockWriteGuard<'_, Spreadsheet> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Spreadsheet> for SharedSpreadsheet {
    fn from(sheet: Spreadsheet) -> Self {
        Self::new(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_shared_across_threads() {
        let shared = SharedSpreadsheet::default();
        shared.set_cell_value("B1", "=A1+A2+A3+A4").unwrap();

        thread::scope(|scope| {
            for row in 1..=4 {
                let shared = shared.clone();
                scope.spawn(move || {
                    shared
                        .set_cell_value(&format!("A{}", row), row as i64 * 10)
                        .unwrap();
                });
            }
        });

        assert_eq!(shared.get_cell_value("B1").unwrap(), 100);
        assert_eq!(shared.read().len(), 5);
    }

    #[test]
    fn test_shared_reports_errors() {
        let shared: SharedSpreadsheet = Spreadsheet::new().into();
        assert!(shared.set_cell_value("A1", "=A1").is_err());
        assert!(shared.set_cell_entry("A1", "abc").is_err());
        assert_eq!(shared.get_cell_value("A1").unwrap(), 0);
    }
}
