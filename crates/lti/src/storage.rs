//! Launch data storage.
//!
//! Between the OIDC login redirect and the launch POST the tool must remember which `state` it
//! issued and the `nonce` bound to it. Entries are single-use and expire.

use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};

/// Lifetime of a pending login, in seconds.
pub const DEFAULT_STATE_TTL_SECS: i64 = 7200;

/// Most pending logins kept at once; the oldest are evicted first.
pub const DEFAULT_MAX_PENDING: usize = 10_000;

#[derive(Clone, Debug)]
struct PendingLaunch {
    nonce: String,
    created_at: DateTime<Utc>,
    seq: u64,
}

#[derive(Debug, Default)]
struct Pending {
    by_state: HashMap<String, PendingLaunch>,
    /// Insertion order: `seq -> state`.
    order: BTreeMap<u64, String>,
    next_seq: u64,
}

impl Pending {
    fn remove(&mut self, state: &str) -> Option<PendingLaunch> {
        let entry = self.by_state.remove(state)?;
        self.order.remove(&entry.seq);
        Some(entry)
    }

    fn pop_oldest(&mut self) -> Option<PendingLaunch> {
        let (_, state) = self.order.pop_first()?;
        self.by_state.remove(&state)
    }

    fn oldest(&self) -> Option<&PendingLaunch> {
        let (_, state) = self.order.first_key_value()?;
        self.by_state.get(state)
    }
}

/// In-memory, thread-safe map of `state -> nonce`, bounded in size.
#[derive(Debug)]
pub struct LaunchDataStorage {
    pending: Mutex<Pending>,
    ttl: Duration,
    max_entries: usize,
}

impl Default for LaunchDataStorage {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_STATE_TTL_SECS), DEFAULT_MAX_PENDING)
    }
}

impl LaunchDataStorage {
    /// `max_entries` is clamped to at least one.
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            pending: Mutex::new(Pending::default()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    /// Remember a login.
    ///
    /// Expired entries at the old end are pruned first; if the storage is still full, the oldest
    /// pending logins are evicted.
    pub fn save(&self, state: String, nonce: String) {
        self.save_at(state, nonce, Utc::now());
    }

    fn save_at(&self, state: String, nonce: String, now: DateTime<Utc>) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

        while pending
            .oldest()
            .is_some_and(|entry| now - entry.created_at >= self.ttl)
        {
            pending.pop_oldest();
        }

        pending.remove(&state);

        let mut evicted = 0usize;
        while pending.by_state.len() >= self.max_entries {
            if pending.pop_oldest().is_none() {
                break;
            }
            evicted += 1;
        }
        if evicted > 0 {
            tracing::warn!("launch storage full, evicted {} pending login(s)", evicted);
        }

        let seq = pending.next_seq;
        pending.next_seq += 1;
        pending.order.insert(seq, state.clone());
        pending.by_state.insert(
            state,
            PendingLaunch {
                nonce,
                created_at: now,
                seq,
            },
        );
    }

    /// Remove a login and return its nonce, unless it is unknown or expired.
    pub fn take(&self, state: &str) -> Option<String> {
        self.take_at(state, Utc::now())
    }

    fn take_at(&self, state: &str, now: DateTime<Utc>) -> Option<String> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = pending.remove(state)?;

        if now - entry.created_at >= self.ttl {
            tracing::debug!("launch state expired");
            return None;
        }
        Some(entry.nonce)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .by_state
            .len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_returns_nonce_once() {
        let storage = LaunchDataStorage::default();
        storage.save("state-1".into(), "nonce-1".into());

        assert_eq!(storage.take("state-1").as_deref(), Some("nonce-1"));
        assert_eq!(storage.take("state-1"), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_unknown_state_is_none() {
        let storage = LaunchDataStorage::default();
        assert_eq!(storage.take("missing"), None);
    }

    #[test]
    fn test_expired_entries_are_rejected_and_pruned() {
        let storage = LaunchDataStorage::new(Duration::seconds(60), DEFAULT_MAX_PENDING);
        let start = Utc::now();

        storage.save_at("old".into(), "n-old".into(), start);
        storage.save_at("kept".into(), "n-kept".into(), start + Duration::seconds(30));
        assert_eq!(storage.take_at("old", start + Duration::seconds(61)), None);

        storage.save_at("new".into(), "n-new".into(), start + Duration::seconds(100));
        assert_eq!(storage.len(), 1, "entries older than the ttl are pruned on save");
        assert_eq!(
            storage.take_at("new", start + Duration::seconds(101)).as_deref(),
            Some("n-new")
        );
    }

    #[test]
    fn test_save_beyond_capacity_evicts_oldest() {
        let storage = LaunchDataStorage::new(Duration::seconds(DEFAULT_STATE_TTL_SECS), 3);
        for i in 0..10 {
            storage.save(format!("state-{i}"), format!("nonce-{i}"));
        }

        assert_eq!(storage.len(), 3);
        assert_eq!(storage.take("state-6"), None);
        assert_eq!(storage.take("state-7").as_deref(), Some("nonce-7"));
        assert_eq!(storage.take("state-9").as_deref(), Some("nonce-9"));
    }

    #[test]
    fn test_many_logins_stay_within_default_capacity() {
        let storage = LaunchDataStorage::default();
        for i in 0..(DEFAULT_MAX_PENDING + 500) {
            storage.save(format!("state-{i}"), "nonce".into());
        }

        assert_eq!(storage.len(), DEFAULT_MAX_PENDING);
        assert_eq!(storage.take("state-0"), None);
        assert!(storage.take(&format!("state-{}", DEFAULT_MAX_PENDING + 499)).is_some());
    }

    #[test]
    fn test_taken_and_resaved_states_keep_order_consistent() {
        let storage = LaunchDataStorage::new(Duration::seconds(DEFAULT_STATE_TTL_SECS), 2);
        storage.save("a".into(), "n-a".into());
        storage.save("b".into(), "n-b".into());
        assert!(storage.take("a").is_some());

        storage.save("b".into(), "n-b2".into());
        storage.save("c".into(), "n-c".into());

        assert_eq!(storage.len(), 2);
        assert_eq!(storage.take("b").as_deref(), Some("n-b2"));
        assert_eq!(storage.take("c").as_deref(), Some("n-c"));
    }
}
