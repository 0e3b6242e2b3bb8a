use std::collections::VecDeque;

use anchor_lang::prelude::*;

use crate::{config::VaultConfig, math::weighted_average};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceSnapshot {
    pub timestamp: i64,
    /// Underlying per whole vault token
    pub price_per_share: u64,
}

/// Weighted-average price per share of a non-rebasing position.
///
/// Observations enter a bounded window at most once per `min_snapshot_delay`.
/// The window mean is blended into the average by the vault tokens each
/// deposit adds, so a transient spike can only move the average by its own
/// deposit's weight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriceTracker {
    snapshots: VecDeque<PriceSnapshot>,
    avg_price_per_share: u64,
}

impl PriceTracker {
    /// Returns `false` when the sample was ignored (rebasing position or too soon).
    pub fn record_sample(
        &mut self,
        is_rebasing: bool,
        current_price: u64,
        now: i64,
        balance_before: u64,
        tokens_added: u64,
        config: &VaultConfig,
    ) -> Result<bool> {
        if is_rebasing {
            return Ok(false);
        }
        if let Some(last) = self.snapshots.back() {
            if now.saturating_sub(last.timestamp) < config.min_snapshot_delay {
                return Ok(false);
            }
        }

        self.snapshots.push_back(PriceSnapshot {
            timestamp: now,
            price_per_share: current_price,
        });
        self.evict(now, config);

        let observed = self.window_mean()?;
        self.avg_price_per_share = if balance_before == 0 {
            observed
        } else {
            weighted_average(
                self.avg_price_per_share,
                balance_before,
                observed,
                tokens_added,
            )?
        };
        Ok(true)
    }

    pub fn avg_price(&self) -> u64 {
        self.avg_price_per_share
    }

    pub fn last_snapshot(&self) -> Option<&PriceSnapshot> {
        self.snapshots.back()
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &PriceSnapshot> + '_ {
        self.snapshots.iter()
    }

    fn evict(&mut self, now: i64, config: &VaultConfig) {
        self.snapshots
            .retain(|snapshot| now.saturating_sub(snapshot.timestamp) <= config.stale_time);
        while self.snapshots.len() > config.max_snapshots as usize {
            self.snapshots.pop_front();
        }
    }

    fn window_mean(&self) -> Result<u64> {
        // The newest sample always survives eviction, so the window is never empty
        let count = self.snapshots.len() as u128;
        let sum: u128 = self
            .snapshots
            .iter()
            .map(|snapshot| snapshot.price_per_share as u128)
            .sum();
        u64::try_from(sum / count.max(1))
            .map_err(|_| error!(crate::error::VaultError::MathOverflow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: u64 = 1_000_000;

    fn config() -> VaultConfig {
        VaultConfig {
            min_snapshot_delay: 300,
            max_snapshots: 3,
            stale_time: 3_600,
            ..VaultConfig::default()
        }
    }

    #[test]
    fn test_first_sample_seeds_average() {
        let mut tracker = PriceTracker::default();
        assert!(tracker.record_sample(false, ONE, 1_000, 0, 100, &config()).unwrap());
        assert_eq!(tracker.avg_price(), ONE);
    }

    #[test]
    fn test_rebasing_never_tracks() {
        let mut tracker = PriceTracker::default();
        assert!(!tracker.record_sample(true, ONE, 1_000, 0, 100, &config()).unwrap());
        assert_eq!(tracker.avg_price(), 0);
        assert!(tracker.last_snapshot().is_none());
    }

    #[test]
    fn test_sample_inside_delay_is_ignored() {
        let mut tracker = PriceTracker::default();
        tracker.record_sample(false, ONE, 1_000, 0, 100, &config()).unwrap();

        // Donation spike right after the first sample
        let accepted = tracker
            .record_sample(false, 5 * ONE, 1_100, 100, 1_000, &config())
            .unwrap();
        assert!(!accepted);
        assert_eq!(tracker.avg_price(), ONE);
        assert_eq!(tracker.snapshots().count(), 1);
    }

    #[test]
    fn test_yield_moves_average_partway() {
        let mut tracker = PriceTracker::default();
        tracker.record_sample(false, ONE, 1_000, 0, 100, &config()).unwrap();
        tracker
            .record_sample(false, 1_200_000, 1_400, 100, 83, &config())
            .unwrap();

        let avg = tracker.avg_price();
        assert!(avg > ONE && avg < 1_200_000, "avg = {avg}");
    }

    #[test]
    fn test_spike_bounded_by_deposit_weight() {
        let mut tracker = PriceTracker::default();
        tracker.record_sample(false, ONE, 1_000, 0, 1_000_000, &config()).unwrap();

        // A 10x spike carried by a deposit worth 0.1% of the position
        tracker
            .record_sample(false, 10 * ONE, 2_000, 1_000_000, 1_000, &config())
            .unwrap();
        assert!(tracker.avg_price() < ONE + ONE / 100);
    }

    #[test]
    fn test_window_capped_and_stale_evicted() {
        let mut tracker = PriceTracker::default();
        let cfg = config();
        for i in 0..5 {
            tracker
                .record_sample(false, ONE + i as u64, 1_000 + i * 400, 10, 10, &cfg)
                .unwrap();
        }
        assert_eq!(tracker.snapshots().count(), cfg.max_snapshots as usize);

        // Far in the future every older sample is stale
        tracker.record_sample(false, 2 * ONE, 100_000, 10, 10, &cfg).unwrap();
        assert_eq!(tracker.snapshots().count(), 1);
        assert_eq!(tracker.last_snapshot().unwrap().price_per_share, 2 * ONE);
    }
}
