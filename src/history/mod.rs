//! Search history
//!
//! An ordered, deduplicated, size-bounded list of past successful
//! suggestions, most recent first, mirrored into a single named slot of a
//! `KeyValueStore`.
//!
//! Invariants held by every operation:
//! - at most `MAX_ENTRIES` entries
//! - no two entries share the same exact `(from, to)`
//! - position 0 is the most recently recorded entry
//!
//! Loading never fails upward and keeps every entry that still reads.
//! Persisting is best effort: a broken or unavailable slot costs the
//! history, never the session.

pub mod error;
pub mod storage;

pub use error::{HistoryError, HistoryResult};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

use crate::route::RouteSuggestion;
use tracing::{debug, warn};

/// Name of the persisted slot
pub const HISTORY_KEY: &str = "busRouteHistory";

/// Capacity of the history
pub const MAX_ENTRIES: usize = 10;

/// Prepend `entry`, dropping any entry for the same route and anything past
/// capacity. Returns the new sequence; `entries` is left untouched.
pub fn record_entry(entries: &[RouteSuggestion], entry: RouteSuggestion) -> Vec<RouteSuggestion> {
    let rest = entries
        .iter()
        .filter(|existing| !existing.same_route(&entry))
        .cloned()
        .collect::<Vec<_>>();
    let mut updated = Vec::with_capacity(MAX_ENTRIES);
    updated.push(entry);
    updated.extend(rest);
    updated.truncate(MAX_ENTRIES);
    updated
}

/// Re-establish the invariants on a sequence of unknown provenance
fn normalize(entries: Vec<RouteSuggestion>) -> Vec<RouteSuggestion> {
    let mut kept: Vec<RouteSuggestion> = Vec::with_capacity(entries.len().min(MAX_ENTRIES));
    for entry in entries {
        if kept.len() == MAX_ENTRIES {
            break;
        }
        if !kept.iter().any(|k| k.same_route(&entry)) {
            kept.push(entry);
        }
    }
    kept
}

pub struct HistoryStore {
    store: Box<dyn KeyValueStore>,
    entries: Vec<RouteSuggestion>,
}

impl HistoryStore {
    /// Open the history over `store`, pre-loading whatever it holds
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        let entries = Self::load(store.as_ref());
        Self { store, entries }
    }

    /// Read the persisted sequence; absent or unreadable yields empty
    pub fn load(store: &dyn KeyValueStore) -> Vec<RouteSuggestion> {
        let payload = match store.get(HISTORY_KEY) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Could not read search history: {}", e);
                return Vec::new();
            }
        };

        let raw = match serde_json::from_str::<Vec<serde_json::Value>>(&payload) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Discarding unreadable search history: {}", e);
                return Vec::new();
            }
        };

        let total = raw.len();
        let entries = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<RouteSuggestion>(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable history entry: {}", e);
                    None
                }
            })
            .collect::<Vec<_>>();
        let entries = normalize(entries);
        debug!("Loaded {} of {} history entries", entries.len(), total);
        entries
    }

    /// Record a new entry in memory and return the updated sequence
    pub fn record(&mut self, entry: RouteSuggestion) -> &[RouteSuggestion] {
        self.entries = record_entry(&self.entries, entry);
        &self.entries
    }

    /// Serialize the full sequence into the slot, overwriting it
    pub fn try_persist(&self) -> HistoryResult<()> {
        let payload = serde_json::to_string(&self.entries)?;
        self.store.set(HISTORY_KEY, &payload)
    }

    /// Best-effort `try_persist`; failures are logged and reported as `false`
    pub fn persist(&self) -> bool {
        match self.try_persist() {
            Ok(()) => true,
            Err(e) => {
                warn!("Search history not saved: {}", e);
                false
            }
        }
    }

    pub fn entries(&self) -> &[RouteSuggestion] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&RouteSuggestion> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("entries", &self.entries.len())
            .finish()
    }
}
