//! Result storage for a single crawl run
//!
//! The store lives only as long as the run that owns it; nothing is persisted.
//! Fetch tasks write exclusively through [`ResultStore::merge`].

mod memory;

pub use memory::ResultStore;

use std::collections::{BTreeMap, BTreeSet};

/// Point-in-time copy of the store: source URL -> distinct phone numbers
pub type ResultSnapshot = BTreeMap<String, BTreeSet<String>>;
