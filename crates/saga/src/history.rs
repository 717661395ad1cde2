//! Rolling window of observed exchange rates.

use std::collections::VecDeque;

use tokio::sync::RwLock;

/// Number of rates kept in the window.
pub const HISTORY_CAPACITY: usize = 10;

/// Rates the window starts with, so a fallback average always exists.
pub const SEED_RATES: [f64; HISTORY_CAPACITY] =
    [5.20, 5.35, 5.42, 5.50, 5.48, 5.61, 5.55, 5.38, 5.47, 5.53];

/// Fixed-size window of the last [`HISTORY_CAPACITY`] exchange rates.
///
/// Always holds exactly `HISTORY_CAPACITY` entries: it starts seeded and each
/// push evicts the oldest rate under the write lock.
#[derive(Debug)]
pub struct RateHistory {
    rates: RwLock<VecDeque<f64>>,
}

impl RateHistory {
    /// Creates a history seeded with [`SEED_RATES`].
    pub fn new() -> Self {
        Self::seeded(SEED_RATES)
    }

    /// Creates a history seeded with the given rates.
    pub fn seeded(seed: [f64; HISTORY_CAPACITY]) -> Self {
        Self {
            rates: RwLock::new(VecDeque::from(seed)),
        }
    }

    /// Appends a freshly observed rate, evicting the oldest one.
    pub async fn push(&self, rate: f64) {
        let mut rates = self.rates.write().await;
        if rates.len() >= HISTORY_CAPACITY {
            rates.pop_front();
        }
        rates.push_back(rate);
    }

    /// Mean of the window, rounded to 4 decimal places.
    pub async fn average(&self) -> f64 {
        let rates = self.rates.read().await;
        let mean = rates.iter().sum::<f64>() / rates.len() as f64;
        round_to(mean, 4)
    }

    /// Current entries, oldest first.
    pub async fn snapshot(&self) -> Vec<f64> {
        self.rates.read().await.iter().copied().collect()
    }

    /// Number of entries; always [`HISTORY_CAPACITY`].
    pub async fn len(&self) -> usize {
        self.rates.read().await.len()
    }
}

impl Default for RateHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Rounds half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seeded_size() {
        let history = RateHistory::new();
        assert_eq!(history.len().await, HISTORY_CAPACITY);
        assert_eq!(history.snapshot().await, SEED_RATES.to_vec());
    }

    #[tokio::test]
    async fn test_push_evicts_oldest() {
        let history = RateHistory::seeded([5.0; HISTORY_CAPACITY]);
        history.push(6.0).await;

        let rates = history.snapshot().await;
        assert_eq!(rates.len(), HISTORY_CAPACITY);
        assert_eq!(rates[HISTORY_CAPACITY - 1], 6.0);
        assert_eq!(rates.iter().filter(|r| **r == 5.0).count(), 9);
    }

    #[tokio::test]
    async fn test_average_rounds_to_four_places() {
        let history = RateHistory::seeded([5.0; HISTORY_CAPACITY]);
        assert_eq!(history.average().await, 5.0);

        history.push(5.12345).await;
        // (9 * 5.0 + 5.12345) / 10 = 5.012345
        assert_eq!(history.average().await, 5.0123);
    }

    #[tokio::test]
    async fn test_full_window_replacement() {
        let history = RateHistory::new();
        for _ in 0..HISTORY_CAPACITY {
            history.push(5.75).await;
        }
        assert_eq!(history.snapshot().await, vec![5.75; HISTORY_CAPACITY]);
        assert_eq!(history.average().await, 5.75);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_pushes_keep_capacity() {
        let history = Arc::new(RateHistory::new());
        let mut handles = Vec::new();
        for i in 0..64 {
            let history = history.clone();
            handles.push(tokio::spawn(async move {
                history.push(5.0 + (i % 10) as f64 / 10.0).await;
                history.len().await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), HISTORY_CAPACITY);
        }
        assert_eq!(history.len().await, HISTORY_CAPACITY);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2475.004, 2), 2475.0);
        assert_eq!(round_to(1.23456, 4), 1.2346);
    }
}
