//! The [`DurableStore`] trait defining the storage contract.

use crate::error::StoreResult;

/// A persistent, string-keyed store scoped to the client.
///
/// The store never interprets values. Implementations must be thread-safe
/// (`Send + Sync`) and each `set` must replace the value atomically, so a
/// reader observes either the old or the new value, never a mix.
pub trait DurableStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if no value has been written.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write (create or replace) the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Returns `Ok(true)` if a value existed.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// All keys currently present, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Returns `true` if a value is stored under `key`.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
