//! Root statistics shared across determinized trees.
//!
//! Every determinization owns a private tree, but the root's direct moves
//! are the same in all of them. Their visit counts and rewards live here, in
//! parallel arrays indexed by root move, and are only ever read for
//! selection or updated by atomic add.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use super::policy::{best_by_mean, ChildStats};

/// Lock-free `f64` on top of `AtomicU64` bit-casting.
#[derive(Debug, Default)]
pub struct AtomicF64 {
    inner: AtomicU64,
}

impl AtomicF64 {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            inner: AtomicU64::new(value.to_bits()),
        }
    }

    #[inline]
    pub fn load(&self, ordering: Ordering) -> f64 {
        f64::from_bits(self.inner.load(ordering))
    }

    /// Compare-and-swap add. Returns the previous value.
    pub fn fetch_add(&self, value: f64, ordering: Ordering) -> f64 {
        let mut current = self.inner.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(current) + value).to_bits();
            match self
                .inner
                .compare_exchange_weak(current, next, ordering, Ordering::Relaxed)
            {
                Ok(previous) => return f64::from_bits(previous),
                Err(actual) => current = actual,
            }
        }
    }
}

/// Visit/reward totals for each root move, shared by all determinizations.
///
/// Rewards are from the searching player's point of view.
#[derive(Debug)]
pub struct SharedRootStats {
    visits: Vec<AtomicU32>,
    rewards: Vec<AtomicF64>,
}

impl SharedRootStats {
    /// Zeroed statistics for `len` root moves.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            visits: (0..len).map(|_| AtomicU32::new(0)).collect(),
            rewards: (0..len).map(|_| AtomicF64::new(0.0)).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Add one visit and `reward` to root move `index`.
    pub fn record(&self, index: usize, reward: f64) {
        if let (Some(visits), Some(total)) = (self.visits.get(index), self.rewards.get(index)) {
            total.fetch_add(reward, Ordering::AcqRel);
            visits.fetch_add(1, Ordering::AcqRel);
        }
    }

    /// Sum of visits over all root moves.
    #[must_use]
    pub fn total_visits(&self) -> u32 {
        self.visits.iter().map(|v| v.load(Ordering::Acquire)).sum()
    }

    /// Point-in-time copy for the tree policy. Under concurrent updates a
    /// child's visits and reward may be one update apart.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ChildStats> {
        self.visits
            .iter()
            .zip(&self.rewards)
            .map(|(visits, reward)| ChildStats {
                visits: visits.load(Ordering::Acquire),
                reward: reward.load(Ordering::Acquire),
            })
            .collect()
    }

    /// Root move with the best aggregated average reward. Ties go to the
    /// earliest move.
    #[must_use]
    pub fn best_index(&self) -> usize {
        best_by_mean(&self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_f64_basics() {
        let value = AtomicF64::new(1.5);
        assert_eq!(value.fetch_add(2.0, Ordering::AcqRel), 1.5);
        assert_eq!(value.load(Ordering::Acquire), 3.5);

        value.fetch_add(-4.5, Ordering::AcqRel);
        assert_eq!(value.load(Ordering::Acquire), -1.0);
    }

    #[test]
    fn test_concurrent_records_are_not_lost() {
        let stats = SharedRootStats::new(3);

        std::thread::scope(|s| {
            for worker in 0..6 {
                let stats = &stats;
                s.spawn(move || {
                    for i in 0..1000 {
                        stats.record((worker + i) % 3, 0.5);
                    }
                });
            }
        });

        assert_eq!(stats.total_visits(), 6000);
        let snapshot = stats.snapshot();
        let total_reward: f64 = snapshot.iter().map(|c| c.reward).sum();
        assert!((total_reward - 3000.0).abs() < 1e-9);
        for child in &snapshot {
            assert_eq!(child.visits, 2000);
        }
    }

    #[test]
    fn test_best_index() {
        let stats = SharedRootStats::new(3);
        stats.record(0, 0.2);
        stats.record(1, 0.9);
        stats.record(2, 0.9);
        stats.record(2, 0.1);

        assert_eq!(stats.best_index(), 1);
    }

    #[test]
    fn test_out_of_range_record_is_ignored() {
        let stats = SharedRootStats::new(1);
        stats.record(5, 1.0);
        assert_eq!(stats.total_visits(), 0);
    }
}
