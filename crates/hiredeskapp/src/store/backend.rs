use crate::error::Result;

/// Abstract interface for raw key-value I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while `TieredStore` decides which backend is used and `RecordStore`
/// handles the "what" (collections, validation, backups).
pub trait KvBackend {
    /// Read a value. Returns Ok(None) when the key is absent.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Remove every key held by this backend.
    fn clear(&self) -> Result<()>;

    /// List keys starting with `prefix` (empty prefix lists everything).
    fn keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Check whether the backend can currently be written to.
    fn is_available(&self) -> bool;

    /// Short label used in log output.
    fn describe(&self) -> String;
}
