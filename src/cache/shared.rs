//! Shared-table cache layout
//!
//! All cache groups live in one physical table with columns `type` (the
//! group discriminator), `key`, `expire`, and `data`; the primary index
//! covers (`type`, `key`). Every operation matches on the group column in
//! addition to the key, and gc restricts its expiry scan to the requested
//! group with an extra filter clause.

use std::collections::HashMap;

use crate::client::{HandlerSocket, IndexSpec};
use crate::error::{HsError, Result};
use crate::protocol::{FilterType, Mutation, Operator, Value, IN_CLAUSE};

use super::{
    affected_rows, expire_at, field_u64, is_live, unix_now, CacheStore, COL_DATA, COL_EXPIRE,
    COL_KEY, COL_TYPE, INDEX_EXPIRE,
};

/// Cache over one table shared by every group
pub struct SharedCache {
    hs: HandlerSocket,
    db: String,
    table: String,

    /// Page size for bulk deletes (gc/flush); smaller than the per-table
    /// layout's because batches here compete with other groups
    pub many_limit: u64,
}

impl SharedCache {
    /// Default bulk-delete page size
    pub const MANY_LIMIT: u64 = 1_000;

    pub fn new(hs: HandlerSocket, db: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            hs,
            db: db.into(),
            table: table.into(),
            many_limit: Self::MANY_LIMIT,
        }
    }

    /// The underlying two-role client
    pub fn handler(&self) -> &HandlerSocket {
        &self.hs
    }

    fn exec_many(&self, fields: &[Value]) -> Result<()> {
        loop {
            let rows = self.hs.write_request(fields)?;
            if affected_rows(&rows) != self.many_limit {
                return Ok(());
            }
        }
    }
}

impl CacheStore for SharedCache {
    fn exists(&self, group: &str, key: &str) -> Result<bool> {
        let idx = self
            .hs
            .open_read_index(&IndexSpec::new(&self.db, &self.table).columns([COL_EXPIRE]))?;

        let rows = self.hs.read_request(&[
            Value::from(idx),
            Operator::Equal.into(),
            Value::from(2u64),
            Value::from(group),
            Value::from(key),
        ])?;

        Ok(!rows.is_empty())
    }

    fn valid(&self, group: &str, key: &str) -> Result<bool> {
        let idx = self
            .hs
            .open_read_index(&IndexSpec::new(&self.db, &self.table).columns([COL_EXPIRE]))?;

        let rows = self.hs.read_request(&[
            Value::from(idx),
            Operator::Equal.into(),
            Value::from(2u64),
            Value::from(group),
            Value::from(key),
        ])?;

        match rows.first() {
            Some(row) => Ok(is_live(field_u64(row.first()), unix_now())),
            None => Ok(false),
        }
    }

    fn get(&self, group: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let idx = self.hs.open_read_index(
            &IndexSpec::new(&self.db, &self.table).columns([COL_EXPIRE, COL_DATA]),
        )?;

        let rows = self.hs.read_request(&[
            Value::from(idx),
            Operator::Equal.into(),
            Value::from(2u64),
            Value::from(group),
            Value::from(key),
        ])?;

        match rows.first() {
            Some(row) if is_live(field_u64(row.first()), unix_now()) => {
                Ok(row.get(1).cloned().flatten())
            }
            _ => Ok(None),
        }
    }

    fn get_many(&self, group: &str, keys: &[&str]) -> Result<HashMap<String, Option<Vec<u8>>>> {
        let mut results: HashMap<String, Option<Vec<u8>>> =
            keys.iter().map(|key| (key.to_string(), None)).collect();

        if keys.is_empty() {
            return Ok(results);
        }

        let idx = self.hs.open_read_index(
            &IndexSpec::new(&self.db, &self.table).columns([COL_KEY, COL_EXPIRE, COL_DATA]),
        )?;

        let mut fields = vec![
            Value::from(idx),
            Operator::Equal.into(),
            Value::from(2u64),
            Value::from(group),
            Value::from(""),
            Value::from(keys.len()),
            Value::from(0u64),
            Value::from(IN_CLAUSE),
            Value::from(1u64),
            Value::from(keys.len()),
        ];
        fields.extend(keys.iter().map(|key| Value::from(*key)));

        let now = unix_now();
        for row in self.hs.read_request(&fields)? {
            if is_live(field_u64(row.get(1)), now) {
                if let Some(key) = row.first().cloned().flatten() {
                    results.insert(
                        String::from_utf8_lossy(&key).into_owned(),
                        row.get(2).cloned().flatten(),
                    );
                }
            }
        }

        Ok(results)
    }

    fn set(&self, group: &str, key: &str, value: &[u8], ttl_secs: i64) -> Result<bool> {
        if !self.exists(group, key)? {
            return self.add(group, key, value, ttl_secs);
        }

        let idx = self.hs.open_write_index(
            &IndexSpec::new(&self.db, &self.table).columns([COL_EXPIRE, COL_DATA]),
        )?;

        let rows = self.hs.write_request(&[
            Value::from(idx),
            Operator::Equal.into(),
            Value::from(2u64),
            Value::from(group),
            Value::from(key),
            Value::from(1u64),
            Value::from(0u64),
            Mutation::Update.into(),
            Value::from(expire_at(ttl_secs)),
            Value::from(value),
        ])?;

        Ok(affected_rows(&rows) == 1)
    }

    fn add(&self, group: &str, key: &str, value: &[u8], ttl_secs: i64) -> Result<bool> {
        let idx = self.hs.open_write_index(
            &IndexSpec::new(&self.db, &self.table).columns([COL_TYPE, COL_KEY, COL_EXPIRE, COL_DATA]),
        )?;

        let fields = [
            Value::from(idx),
            Mutation::Insert.into(),
            Value::from(4u64),
            Value::from(group),
            Value::from(key),
            Value::from(expire_at(ttl_secs)),
            Value::from(value),
        ];

        match self.hs.write_request(&fields) {
            Ok(_) => Ok(true),
            Err(HsError::Protocol { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn delete(&self, group: &str, key: &str) -> Result<bool> {
        let idx = self
            .hs
            .open_write_index(&IndexSpec::new(&self.db, &self.table))?;

        self.hs.write_request(&[
            Value::from(idx),
            Operator::Equal.into(),
            Value::from(2u64),
            Value::from(group),
            Value::from(key),
            Value::from(1u64),
            Value::from(0u64),
            Mutation::Delete.into(),
        ])?;

        Ok(true)
    }

    fn gc(&self, group: &str) -> Result<()> {
        let idx = self.hs.open_write_index(
            &IndexSpec::new(&self.db, &self.table)
                .index(INDEX_EXPIRE)
                .filter_columns([COL_TYPE, COL_EXPIRE]),
        )?;

        // expire < now, restricted to this group and to expire > 0
        self.exec_many(&[
            Value::from(idx),
            Operator::Less.into(),
            Value::from(1u64),
            Value::from(unix_now()),
            Value::from(self.many_limit),
            Value::from(0u64),
            FilterType::Filter.into(),
            Operator::Equal.into(),
            Value::from(0u64),
            Value::from(group),
            FilterType::Filter.into(),
            Operator::Greater.into(),
            Value::from(1u64),
            Value::from(0u64),
            Mutation::Delete.into(),
        ])
    }

    fn flush(&self, group: &str) -> Result<()> {
        let idx = self
            .hs
            .open_write_index(&IndexSpec::new(&self.db, &self.table))?;

        // Prefix match on the group column alone covers the whole group
        self.exec_many(&[
            Value::from(idx),
            Operator::Equal.into(),
            Value::from(1u64),
            Value::from(group),
            Value::from(self.many_limit),
            Value::from(0u64),
            Mutation::Delete.into(),
        ])
    }
}
