//! Describe cache with expiry
//!
//! Describes come from a remote call made by the caller; the cache only
//! remembers them. Time is passed in by the caller as an offset from any
//! fixed epoch, which keeps the cache usable where no system clock exists.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use super::describe::SObjectDescribe;

#[derive(Debug, Clone)]
struct CacheEntry {
    describe: SObjectDescribe,
    stored_at: Duration,
}

/// Describes keyed by object API name (case-insensitive)
#[derive(Debug, Clone)]
pub struct DescribeCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl DescribeCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store a describe, replacing any previous entry for the object
    pub fn insert(&mut self, describe: SObjectDescribe, now: Duration) {
        debug!(target: "soqlkit::cache", object = %describe.name, "cache insert");
        self.entries.insert(
            describe.name.to_lowercase(),
            CacheEntry {
                describe,
                stored_at: now,
            },
        );
    }

    /// Get a describe that has not outlived the TTL
    pub fn get(&self, name: &str, now: Duration) -> Option<&SObjectDescribe> {
        let entry = self.entries.get(&name.to_lowercase())?;
        if self.is_expired(entry, now) {
            return None;
        }
        Some(&entry.describe)
    }

    /// Drop one object's describe, e.g. after its metadata changed
    pub fn invalidate(&mut self, name: &str) -> bool {
        self.entries.remove(&name.to_lowercase()).is_some()
    }

    /// Drop everything, e.g. when switching orgs
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    /// Remove expired entries, returning how many were dropped
    pub fn purge_expired(&mut self, now: Duration) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_sub(entry.stored_at) < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, entry: &CacheEntry, now: Duration) -> bool {
        now.saturating_sub(entry.stored_at) >= self.ttl
    }
}
