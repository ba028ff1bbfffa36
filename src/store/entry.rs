//! Store Entry Module
//!
//! Defines the structure for individual keyspace entries with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Stored Data ==
/// The two kinds of value a key can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredData {
    /// A single byte string (plain values and counters)
    Bytes(Vec<u8>),
    /// An ordered list of byte strings
    List(Vec<Vec<u8>>),
}

// == Store Entry ==
/// Represents a single keyspace entry with value and metadata.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored value
    pub data: StoredData,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry with optional TTL.
    ///
    /// # Arguments
    /// * `data` - The value to store
    /// * `ttl` - Optional time to live, measured from now. TTLs past the
    ///   end of the millisecond clock saturate to it.
    pub fn new(data: StoredData, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|ttl| {
            let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
            current_timestamp_ms().saturating_add(ttl_ms)
        });

        Self { data, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiration
    /// time, so a TTL that has fully elapsed never yields a hit.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn bytes(value: &str) -> StoredData {
        StoredData::Bytes(value.as_bytes().to_vec())
    }

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = StoreEntry::new(bytes("test_value"), None);

        assert_eq!(entry.data, bytes("test_value"));
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = StoreEntry::new(bytes("test_value"), Some(Duration::from_secs(60)));

        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = StoreEntry::new(bytes("test_value"), Some(Duration::from_secs(1)));

        assert!(!entry.is_expired());

        // Wait for expiration
        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiry_is_measured_from_now() {
        let before = current_timestamp_ms();
        let entry = StoreEntry::new(bytes("test_value"), Some(Duration::from_secs(10)));

        let expires_at = entry.expires_at.unwrap();
        assert!(expires_at >= before + 10_000);
        assert!(expires_at <= current_timestamp_ms() + 10_000);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = StoreEntry::new(bytes("test_value"), Some(Duration::MAX));

        assert_eq!(entry.expires_at, Some(u64::MAX));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_list_entry_never_expires() {
        let entry = StoreEntry::new(StoredData::List(vec![]), None);
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = StoreEntry {
            data: bytes("test"),
            expires_at: Some(now),
        };

        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }
}
