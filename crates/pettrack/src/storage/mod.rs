//! Storage layer for pettrack.
//!
//! The record store only ever talks to persistent storage through the
//! [`KeyValueStore`] trait: read a string blob by key, write a string blob by
//! key. Two backends are provided:
//!
//! - [`SqliteStore`]: a single-table `SQLite` file, the on-device backend.
//! - [`MemoryStore`]: an in-process map, for tests and throwaway sessions.

mod memory;
pub mod schema;
mod sqlite;

use async_trait::async_trait;

use crate::error::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key holding the serialized pet collection.
pub const PETS_KEY: &str = "pets";

/// Key holding the serialized vaccination collection.
pub const VACCINATIONS_KEY: &str = "vaccinations";

/// Key holding the theme flag.
pub const THEME_KEY: &str = "theme";

/// A persistent string-keyed blob store.
///
/// Implementations must be safe to share across tasks; the record store
/// issues independent keys concurrently during load and cascade deletes.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Short name of this backend (for logging/status output).
    fn backend_name(&self) -> &'static str;

    /// Read the blob stored under `key`, or `None` if the key was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write does not complete.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Release backend resources. The default does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if pending data could not be flushed.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
