//! Search statistics for diagnostics and tuning.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// Statistics of the last search call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Select-expand-simulate-backpropagate iterations, summed over workers.
    pub iterations: u32,

    /// Rollouts played to the end of the game.
    pub simulations: u32,

    /// Nodes added to the tree(s).
    pub nodes_expanded: u32,

    /// Determinized boards searched (MCTS only).
    pub determinizations: u32,

    /// Root candidate moves from the generator.
    pub candidate_moves: u32,

    /// Whether the returned move wins immediately.
    pub lethal_found: bool,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            f64::from(self.iterations) / (self.time_us as f64 / 1_000_000.0)
        }
    }

    #[must_use]
    pub fn simulations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            f64::from(self.simulations) / (self.time_us as f64 / 1_000_000.0)
        }
    }
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} iterations, {} simulations, {} nodes, {} candidates in {:.1} ms",
            self.iterations,
            self.simulations,
            self.nodes_expanded,
            self.candidate_moves,
            self.time_us as f64 / 1000.0
        )
    }
}

/// Counters bumped concurrently by workers, folded into `SearchStats` once
/// the workers are done.
#[derive(Debug, Default)]
pub(crate) struct SearchCounters {
    iterations: AtomicU32,
    simulations: AtomicU32,
    nodes_expanded: AtomicU32,
}

impl SearchCounters {
    pub(crate) fn iteration(&self) {
        self.iterations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn simulation(&self) {
        self.simulations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn expanded(&self) {
        self.nodes_expanded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn fold_into(&self, stats: &mut SearchStats) {
        stats.iterations += self.iterations.load(Ordering::Relaxed);
        stats.simulations += self.simulations.load(Ordering::Relaxed);
        stats.nodes_expanded += self.nodes_expanded.load(Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = SearchStats::new();
        assert_eq!(stats.iterations, 0);
        assert!(!stats.lethal_found);
    }

    #[test]
    fn test_stats_iterations_per_second() {
        let mut stats = SearchStats::new();
        stats.iterations = 1000;
        stats.time_us = 1_000_000;

        assert_eq!(stats.iterations_per_second(), 1000.0);
    }

    #[test]
    fn test_stats_reset() {
        let mut stats = SearchStats::new();
        stats.iterations = 100;
        stats.simulations = 50;

        stats.reset();

        assert_eq!(stats.iterations, 0);
        assert_eq!(stats.simulations, 0);
    }

    #[test]
    fn test_counters_fold() {
        let counters = SearchCounters::default();
        counters.iteration();
        counters.iteration();
        counters.simulation();
        counters.expanded();

        let mut stats = SearchStats::new();
        counters.fold_into(&mut stats);

        assert_eq!(stats.iterations, 2);
        assert_eq!(stats.simulations, 1);
        assert_eq!(stats.nodes_expanded, 1);
    }

    #[test]
    fn test_stats_serialization() {
        let mut stats = SearchStats::new();
        stats.iterations = 42;

        let json = serde_json::to_string(&stats).unwrap();
        let deserialized: SearchStats = serde_json::from_str(&json).unwrap();

        assert_eq!(stats.iterations, deserialized.iterations);
    }
}
