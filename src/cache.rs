//! Read-through memoization of issue lookups.

use std::collections::HashMap;

use crate::lookup::{IssueLookup, LookupError};
use crate::types::{IssueRecord, LookupKey};

/// Wraps an `IssueLookup` so each key is fetched at most once per successful
/// result. Failures are never stored: a rate limit or a transient error on
/// one occurrence must not stop a later occurrence from trying again.
pub struct CachedLookup<L> {
    /// Successful results, only ever added to.
    entries: HashMap<LookupKey, IssueRecord>,
    /// The wrapped lookup.
    inner: L,
}

impl<L: IssueLookup> CachedLookup<L> {
    /// Start with an empty cache.
    pub fn new(inner: L) -> Self {
        return Self {
            entries: HashMap::new(),
            inner,
        };
    }

    /// Return the cached issue for `key`, fetching it on a miss.
    ///
    /// # Errors
    ///
    /// Propagates the inner lookup's error on a miss that fails.
    pub fn fetch(&mut self, key: &LookupKey) -> Result<IssueRecord, LookupError> {
        if let Some(record) = self.entries.get(key) {
            tracing::debug!(%key, "issue cache hit");
            return Ok(record.clone());
        }

        let record = self.inner.lookup(key)?;
        self.entries.insert(key.clone(), record.clone());
        return Ok(record);
    }

    /// Number of cached issues.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    /// The wrapped lookup.
    #[cfg(test)]
    pub const fn inner(&self) -> &L {
        return &self.inner;
    }
}
