//! Last-known flight prices, used as a fallback when the catalog is down.

use std::collections::HashMap;

use tokio::sync::RwLock;

/// Key of a cached price: one flight on one day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlightKey {
    pub flight: String,
    pub day: String,
}

impl FlightKey {
    pub fn new(flight: impl Into<String>, day: impl Into<String>) -> Self {
        Self {
            flight: flight.into(),
            day: day.into(),
        }
    }
}

/// Process-wide map of the most recently observed dollar price per flight/day.
///
/// Entries are overwritten on every successful lookup and never expire.
/// Racing writers to the same key are last-write-wins.
#[derive(Debug, Default)]
pub struct FlightValueCache {
    entries: RwLock<HashMap<FlightKey, f64>>,
}

impl FlightValueCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last observed price for the flight on that day.
    pub async fn get(&self, flight: &str, day: &str) -> Option<f64> {
        self.entries
            .read()
            .await
            .get(&FlightKey::new(flight, day))
            .copied()
    }

    /// Records `value` as the latest price, replacing any previous one.
    pub async fn put(&self, flight: &str, day: &str, value: f64) {
        self.entries
            .write()
            .await
            .insert(FlightKey::new(flight, day), value);
    }

    /// Number of distinct flight/day pairs seen so far.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if no price has been recorded yet.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = FlightValueCache::new();
        assert_eq!(cache.get("AA100", "2025-01-15").await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let cache = FlightValueCache::new();
        cache.put("AA100", "2025-01-15", 450.0).await;
        cache.put("AA100", "2025-01-15", 470.0).await;

        assert_eq!(cache.get("AA100", "2025-01-15").await, Some(470.0));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_keys_are_per_day() {
        let cache = FlightValueCache::new();
        cache.put("AA100", "2025-01-15", 450.0).await;
        cache.put("AA100", "2025-01-20", 480.0).await;

        assert_eq!(cache.get("AA100", "2025-01-15").await, Some(450.0));
        assert_eq!(cache.get("AA100", "2025-01-20").await, Some(480.0));
        assert_eq!(cache.get("UA200", "2025-01-15").await, None);
        assert_eq!(cache.len().await, 2);
    }
}
