//! Cache Module
//!
//! TTL-aware key/value semantics implemented purely in terms of index
//! operations. An entry is valid iff its expiry is 0 (never expires) or lies
//! in the future; invalid entries are logically absent even while they are
//! still physically present, until garbage collection removes them.
//!
//! Two storage layouts:
//! - [`TableCache`]: one physical table per cache group, columns
//!   `key`/`expire`/`data`
//! - [`SharedCache`]: one table for all groups with an extra `type`
//!   discriminator column
//!
//! [`GroupCache`] pins any layout to a single group.

mod group;
mod shared;
mod table;

pub use group::GroupCache;
pub use shared::SharedCache;
pub use table::TableCache;

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::protocol::Row;

// Column names shared by both layouts
pub(crate) const COL_KEY: &str = "key";
pub(crate) const COL_EXPIRE: &str = "expire";
pub(crate) const COL_DATA: &str = "data";
pub(crate) const COL_TYPE: &str = "type";

/// Secondary index over the expiry column, used by gc
pub(crate) const INDEX_EXPIRE: &str = "expire";

/// Cache operations over (group, key) pairs
pub trait CacheStore {
    /// Whether a row for the key exists, expired or not
    fn exists(&self, group: &str, key: &str) -> Result<bool>;

    /// Whether a row exists and has not expired; cheaper than [`get`]
    /// when the payload is large
    ///
    /// [`get`]: CacheStore::get
    fn valid(&self, group: &str, key: &str) -> Result<bool>;

    /// The stored value, or `None` when absent or expired
    fn get(&self, group: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Batched lookup: one entry per requested key, `None` for keys that
    /// are absent or expired. Empty input returns an empty map without a
    /// round trip.
    fn get_many(&self, group: &str, keys: &[&str]) -> Result<HashMap<String, Option<Vec<u8>>>>;

    /// Store a value, creating or updating the row. `ttl_secs <= 0` means
    /// never expire. Returns whether the store took effect.
    fn set(&self, group: &str, key: &str, value: &[u8], ttl_secs: i64) -> Result<bool>;

    /// Store a value only if no row exists yet. A conflicting row reports
    /// `Ok(false)` instead of an error; infrastructure failures propagate.
    fn add(&self, group: &str, key: &str, value: &[u8], ttl_secs: i64) -> Result<bool>;

    /// Remove the row for a key; deleting an absent row is a success
    fn delete(&self, group: &str, key: &str) -> Result<bool>;

    /// Remove every expired row of the group, in bounded batches
    fn gc(&self, group: &str) -> Result<()>;

    /// Remove every row of the group, in bounded batches
    fn flush(&self, group: &str) -> Result<()>;
}

/// Current Unix timestamp in seconds
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Absolute expiry for a TTL: 0 for never, otherwise now + ttl
pub(crate) fn expire_at(ttl_secs: i64) -> u64 {
    if ttl_secs > 0 {
        unix_now() + ttl_secs as u64
    } else {
        0
    }
}

/// Expiry validity check
pub(crate) fn is_live(expire: u64, now: u64) -> bool {
    expire == 0 || expire > now
}

/// Numeric view of a reply field; NULL and non-numeric bytes read as 0
pub(crate) fn field_u64(field: Option<&Option<Vec<u8>>>) -> u64 {
    field
        .and_then(|f| f.as_deref())
        .and_then(|b| std::str::from_utf8(b).ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Affected-row count reported by a mutating request
pub(crate) fn affected_rows(rows: &[Row]) -> u64 {
    field_u64(rows.first().and_then(|row| row.first()))
}
