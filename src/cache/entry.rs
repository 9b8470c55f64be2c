//! Cache Entry Module
//!
//! The `(stored_at, data)` record kept by backends whose storage has no
//! timestamp of its own, and the freshness test shared by all backends.

use chrono::Utc;
use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A stored value paired with its write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Write timestamp (Unix seconds)
    pub stored_at: i64,
    /// The stored value
    pub data: Vec<u8>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    pub fn new(data: Vec<u8>) -> Self {
        Self::stored_at(data, current_timestamp())
    }

    /// Creates an entry with an explicit write time.
    pub fn stored_at(data: Vec<u8>, stored_at: i64) -> Self {
        Self { stored_at, data }
    }

    // == Is Fresh ==
    /// Checks the entry against `max_age` seconds using the current time.
    pub fn is_fresh(&self, max_age: u64) -> bool {
        is_fresh(self.stored_at, current_timestamp(), max_age)
    }

    /// Age in seconds at `now`, clamped to zero for future timestamps.
    pub fn age_at(&self, now: i64) -> u64 {
        now.saturating_sub(self.stored_at).max(0) as u64
    }
}

// == Freshness ==
/// Returns true when an item written at `stored_at` is still usable at
/// `now` under `max_age` seconds.
///
/// `max_age == 0` accepts any age. Otherwise the age must be strictly less
/// than `max_age`: an item exactly `max_age` seconds old is stale.
pub fn is_fresh(stored_at: i64, now: i64, max_age: u64) -> bool {
    if max_age == 0 {
        return true;
    }
    let age = now.saturating_sub(stored_at);
    i128::from(age) < i128::from(max_age)
}

// == Utility Functions ==
/// Returns current Unix timestamp in seconds.
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let before = current_timestamp();
        let entry = CacheEntry::new(b"value".to_vec());
        let after = current_timestamp();

        assert_eq!(entry.data, b"value");
        assert!(entry.stored_at >= before && entry.stored_at <= after);
        assert!(entry.is_fresh(0));
        assert!(entry.is_fresh(60));
    }

    #[test]
    fn test_zero_max_age_ignores_age() {
        assert!(is_fresh(0, 1_000_000, 0));
        assert!(is_fresh(1_000_000, 1_000_000, 0));
    }

    #[test]
    fn test_boundary_is_stale() {
        let t = 1_700_000_000;
        // now - stored_at == max_age counts as stale
        assert!(!is_fresh(t, t + 10, 10));
        assert!(is_fresh(t, t + 9, 10));
        assert!(!is_fresh(t, t + 11, 10));
    }

    #[test]
    fn test_future_timestamp_is_fresh() {
        let t = 1_700_000_000;
        assert!(is_fresh(t + 5, t, 1));
    }

    #[test]
    fn test_backdated_entry_is_stale() {
        let entry = CacheEntry::stored_at(b"old".to_vec(), current_timestamp() - 120);

        assert!(!entry.is_fresh(60));
        assert!(entry.is_fresh(0));
        assert!(entry.is_fresh(3600));
    }

    #[test]
    fn test_age_at() {
        let entry = CacheEntry::stored_at(Vec::new(), 100);
        assert_eq!(entry.age_at(130), 30);
        assert_eq!(entry.age_at(90), 0);
    }

    #[test]
    fn test_bincode_roundtrip_keeps_binary_data() {
        let entry = CacheEntry::stored_at(vec![0, 255, 13, 10, 7], 42);
        let bytes = bincode::serialize(&entry).unwrap();
        let decoded: CacheEntry = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, entry);
    }
}
