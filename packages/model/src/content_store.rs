//! Side storage for dataset bytes.
//!
//! Dataset records in the document only carry metadata; the raw file
//! content is written here, keyed by dataset id, so that history and
//! autosave snapshots stay small.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Content not found for dataset: {0}")]
    NotFound(String),

    #[error("Content store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value store for dataset content
pub trait DatasetContentStore: Send {
    fn put(&mut self, id: &str, content: Vec<u8>) -> StoreResult<()>;

    /// Returns `Ok(None)` when nothing is stored under `id`
    fn get(&self, id: &str) -> StoreResult<Option<Vec<u8>>>;

    fn delete(&mut self, id: &str) -> StoreResult<()>;

    fn clear(&mut self) -> StoreResult<()>;
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DatasetContentStore for MemoryContentStore {
    fn put(&mut self, id: &str, content: Vec<u8>) -> StoreResult<()> {
        self.entries.insert(id.to_string(), content);
        Ok(())
    }

    fn get(&self, id: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.get(id).cloned())
    }

    fn delete(&mut self, id: &str) -> StoreResult<()> {
        self.entries.remove(id);
        Ok(())
    }

    fn clear(&mut self) -> StoreResult<()> {
        self.entries.clear();
        Ok(())
    }
}
