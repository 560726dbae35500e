//! Search budgets: when to stop iterating.
//!
//! A budget is single-use per search call. All methods take `&self` and are
//! safe to call from several workers at once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Stopping condition for the iterate-until-exhausted loop.
pub trait Budget: Send + Sync {
    /// Reset for a new search.
    fn start_search(&self);

    /// Record one iteration.
    fn new_iteration(&self);

    /// Whether the search should stop.
    fn has_reached(&self) -> bool;

    /// Check and record in one step. Returns `false` once the budget is
    /// exhausted.
    ///
    /// The default is check-then-record, which may let a few extra
    /// iterations through under contention.
    fn claim_iteration(&self) -> bool {
        if self.has_reached() {
            return false;
        }
        self.new_iteration();
        true
    }
}

/// Stops after a fixed number of iterations.
///
/// ```
/// use ccg_search::mcts::{Budget, IterCountBudget};
///
/// let budget = IterCountBudget::new(2);
/// budget.start_search();
///
/// assert!(!budget.has_reached());
/// budget.new_iteration();
/// budget.new_iteration();
/// assert!(budget.has_reached());
/// ```
#[derive(Debug)]
pub struct IterCountBudget {
    limit: u64,
    count: AtomicU64,
}

impl IterCountBudget {
    #[must_use]
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            count: AtomicU64::new(0),
        }
    }

    /// Iterations recorded since `start_search`.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }
}

impl Budget for IterCountBudget {
    fn start_search(&self) {
        self.count.store(0, Ordering::Release);
    }

    fn new_iteration(&self) {
        self.count.fetch_add(1, Ordering::AcqRel);
    }

    fn has_reached(&self) -> bool {
        self.count() >= self.limit
    }

    /// Exact under contention: never grants more than `limit` iterations.
    fn claim_iteration(&self) -> bool {
        self.count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.limit).then_some(n + 1)
            })
            .is_ok()
    }
}

/// Stops once a wall-clock duration has elapsed since `start_search`.
///
/// Advisory: an iteration already running when the deadline passes is
/// allowed to finish.
#[derive(Debug)]
pub struct TimeBudget {
    duration: Duration,
    deadline: Mutex<Instant>,
}

impl TimeBudget {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            deadline: Mutex::new(Instant::now() + duration),
        }
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Budget for TimeBudget {
    fn start_search(&self) {
        *self.deadline.lock() = Instant::now() + self.duration;
    }

    fn new_iteration(&self) {}

    fn has_reached(&self) -> bool {
        Instant::now() >= *self.deadline.lock()
    }
}

/// Serializable budget choice. Each `build` returns a fresh budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetConfig {
    Iterations(u64),
    Time { millis: u64 },
}

impl Default for BudgetConfig {
    fn default() -> Self {
        BudgetConfig::Iterations(2000)
    }
}

impl BudgetConfig {
    #[must_use]
    pub fn build(&self) -> Box<dyn Budget> {
        match *self {
            BudgetConfig::Iterations(n) => Box::new(IterCountBudget::new(n)),
            BudgetConfig::Time { millis } => Box::new(TimeBudget::new(Duration::from_millis(millis))),
        }
    }

    /// Whether the budget allows any iteration at all.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        match *self {
            BudgetConfig::Iterations(n) => n > 0,
            BudgetConfig::Time { millis } => millis > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;
    use std::sync::Arc;

    #[test]
    fn test_start_search_resets() {
        let budget = IterCountBudget::new(1);
        budget.new_iteration();
        assert!(budget.has_reached());

        budget.start_search();
        assert!(!budget.has_reached());
    }

    #[test]
    fn test_claim_is_exact_under_contention() {
        let budget = Arc::new(IterCountBudget::new(1000));
        let granted = Arc::new(AtomicU64::new(0));
        budget.start_search();

        std::thread::scope(|s| {
            for _ in 0..8 {
                let budget = Arc::clone(&budget);
                let granted = Arc::clone(&granted);
                s.spawn(move || {
                    while budget.claim_iteration() {
                        granted.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
        });

        assert_eq!(granted.load(Ordering::Relaxed), 1000);
        assert!(budget.has_reached());
    }

    #[test]
    fn test_time_budget_expires() {
        let budget = TimeBudget::new(Duration::from_millis(50));
        budget.start_search();
        assert!(!budget.has_reached());

        std::thread::sleep(Duration::from_millis(80));
        assert!(budget.has_reached());
    }

    #[test]
    fn test_default_claim_counts() {
        let budget = TimeBudget::new(Duration::from_secs(60));
        budget.start_search();
        assert!(budget.claim_iteration());
    }

    #[test]
    fn test_config_build() {
        let budget = BudgetConfig::Iterations(3).build();
        budget.start_search();
        let mut runs = 0;
        while budget.claim_iteration() {
            runs += 1;
        }
        assert_eq!(runs, 3);
        assert!(!BudgetConfig::Time { millis: 0 }.is_positive());
    }

    #[test]
    fn test_config_serialization() {
        let config = BudgetConfig::Time { millis: 250 };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"time":{"millis":250}}"#);
        assert_eq!(serde_json::from_str::<BudgetConfig>(&json).unwrap(), config);
    }
}
