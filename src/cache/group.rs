//! Single-group cache front
//!
//! Pins a [`CacheStore`] to one group so callers deal in plain keys.

use std::collections::HashMap;

use crate::error::Result;

use super::CacheStore;

/// A cache bound to a fixed group
pub struct GroupCache<P> {
    provider: P,
    group: String,
}

impl<P: CacheStore> GroupCache<P> {
    pub fn new(provider: P, group: impl Into<String>) -> Self {
        Self {
            provider,
            group: group.into(),
        }
    }

    /// The pinned group name
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn exists(&self, key: &str) -> Result<bool> {
        self.provider.exists(&self.group, key)
    }

    pub fn valid(&self, key: &str) -> Result<bool> {
        self.provider.valid(&self.group, key)
    }

    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.provider.get(&self.group, key)
    }

    pub fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Option<Vec<u8>>>> {
        self.provider.get_many(&self.group, keys)
    }

    pub fn set(&self, key: &str, value: &[u8], ttl_secs: i64) -> Result<bool> {
        self.provider.set(&self.group, key, value, ttl_secs)
    }

    pub fn add(&self, key: &str, value: &[u8], ttl_secs: i64) -> Result<bool> {
        self.provider.add(&self.group, key, value, ttl_secs)
    }

    pub fn delete(&self, key: &str) -> Result<bool> {
        self.provider.delete(&self.group, key)
    }

    pub fn gc(&self) -> Result<()> {
        self.provider.gc(&self.group)
    }

    pub fn flush(&self) -> Result<()> {
        self.provider.flush(&self.group)
    }
}
