//! Durable key-value storage for the serialized cart.
//!
//! The cart only ever reads and overwrites a single string value under a
//! fixed key, the same contract a browser's `localStorage` offers. The
//! backing medium is a collaborator, injected into the cart store:
//!
//! - [`MemoryStore`] - process-local map (tests, ephemeral sessions)
//! - [`FileStore`] - JSON object on disk, written atomically

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors that can occur when reading or writing the durable store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object of strings.
    #[error("corrupt storage file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Object-safe string key/value store.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key` if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
