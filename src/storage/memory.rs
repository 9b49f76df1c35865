use crate::storage::ResultSnapshot;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Concurrency-safe mapping from source URL to the phone numbers found there
///
/// All producers share one instance (behind an `Arc`) and only ever call
/// [`merge`](Self::merge). The lock is held for the set union alone, never
/// across a fetch, so contention stays proportional to the number of merges.
#[derive(Debug, Default)]
pub struct ResultStore {
    entries: Mutex<HashMap<String, BTreeSet<String>>>,
}

impl ResultStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Unions `matches` into the entry for `url`, creating it if absent
    ///
    /// The union happens under the store lock, so concurrent merges on the
    /// same key never lose values. An empty `matches` leaves the store
    /// untouched: entries exist only for URLs with at least one match.
    pub fn merge<I, S>(&self, url: &str, matches: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut incoming = matches.into_iter().map(Into::<String>::into).peekable();
        if incoming.peek().is_none() {
            return;
        }

        let mut entries = self.lock();
        match entries.get_mut(url) {
            Some(existing) => existing.extend(incoming),
            None => {
                entries.insert(url.to_string(), incoming.collect());
            }
        }
    }

    /// Returns a sorted copy of every entry
    ///
    /// Only meaningful once all producers have been joined; while writers are
    /// still active the copy reflects whichever merges finished first.
    pub fn snapshot(&self) -> ResultSnapshot {
        self.lock()
            .iter()
            .map(|(url, numbers)| (url.clone(), numbers.clone()))
            .collect()
    }

    /// Number of URLs with at least one match
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no URL has recorded a match
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock can only interrupt an `extend`, which
    // leaves a valid (if partially merged) set behind.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, BTreeSet<String>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
