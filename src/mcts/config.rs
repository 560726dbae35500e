//! Search configuration parameters.

use serde::{Deserialize, Serialize};

use super::budget::BudgetConfig;
use crate::board::HeuristicWeights;
use crate::core::SearchError;
use crate::moves::GeneratorConfig;
use crate::rollout::RolloutKind;

/// Configuration shared by `MCSAgent` and `MCTSAgent`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// UCB1 exploration constant `cp` (default: 1/sqrt(2)).
    pub exploration: f64,

    /// Reward multiplier per ply between a node and the leaf (default: 0.96).
    /// Values < 1.0 prefer wins that come sooner.
    pub discount: f64,

    /// Base of the terminal score `turn_penalty^turn` (default: 0.97).
    pub turn_penalty: f64,

    /// Worker threads in the agent's pool.
    pub workers: usize,

    /// Sampled boards searched per call (MCTS only).
    pub determinizations: usize,

    /// When to stop iterating. MCTS gives each determinization its own.
    pub budget: BudgetConfig,

    /// Rollout policy for simulations.
    pub rollout: RolloutKind,

    /// Move generator limits and heuristic weights.
    pub generator: GeneratorConfig,

    /// Random seed. Same seed and single worker produce the same search.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration: std::f64::consts::FRAC_1_SQRT_2,
            discount: 0.96,
            turn_penalty: 0.97,
            workers: 5,
            determinizations: 5,
            budget: BudgetConfig::default(),
            rollout: RolloutKind::default(),
            generator: GeneratorConfig::default(),
            seed: 42,
        }
    }
}

impl SearchConfig {
    pub fn with_exploration(mut self, cp: f64) -> Self {
        self.exploration = cp;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_turn_penalty(mut self, turn_penalty: f64) -> Self {
        self.turn_penalty = turn_penalty;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_determinizations(mut self, determinizations: usize) -> Self {
        self.determinizations = determinizations;
        self
    }

    pub fn with_budget(mut self, budget: BudgetConfig) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_rollout(mut self, rollout: RolloutKind) -> Self {
        self.rollout = rollout;
        self
    }

    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    /// Replace only the heuristic weights of the generator config.
    pub fn with_weights(mut self, weights: HeuristicWeights) -> Self {
        self.generator.weights = weights;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject values the agents cannot run with.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.workers == 0 {
            return Err(SearchError::InvalidConfig("workers must be positive".into()));
        }
        if self.determinizations == 0 {
            return Err(SearchError::InvalidConfig(
                "determinizations must be positive".into(),
            ));
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration must be finite and non-negative, got {}",
                self.exploration
            )));
        }
        if !(self.discount > 0.0 && self.discount <= 1.0) {
            return Err(SearchError::InvalidConfig(format!(
                "discount must be in (0, 1], got {}",
                self.discount
            )));
        }
        if !(self.turn_penalty > 0.0 && self.turn_penalty <= 1.0) {
            return Err(SearchError::InvalidConfig(format!(
                "turn penalty must be in (0, 1], got {}",
                self.turn_penalty
            )));
        }
        if !self.budget.is_positive() {
            return Err(SearchError::InvalidConfig(format!(
                "budget must allow at least one iteration, got {:?}",
                self.budget
            )));
        }
        if self.generator.max_moves == 0 || self.generator.max_candidates == 0 {
            return Err(SearchError::InvalidConfig(
                "generator limits must be positive".into(),
            ));
        }
        if let RolloutKind::Blended { expert_probability } = self.rollout {
            if !(0.0..=1.0).contains(&expert_probability) {
                return Err(SearchError::InvalidConfig(format!(
                    "expert probability must be in [0, 1], got {expert_probability}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert!((config.exploration - 0.7071).abs() < 0.001);
        assert_eq!(config.discount, 0.96);
        assert_eq!(config.turn_penalty, 0.97);
        assert_eq!(config.workers, 5);
        assert_eq!(config.determinizations, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SearchConfig::default()
            .with_exploration(1.0)
            .with_workers(2)
            .with_budget(BudgetConfig::Time { millis: 100 })
            .with_seed(123);

        assert_eq!(config.exploration, 1.0);
        assert_eq!(config.workers, 2);
        assert_eq!(config.budget, BudgetConfig::Time { millis: 100 });
        assert_eq!(config.seed, 123);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(SearchConfig::default().with_workers(0).validate().is_err());
        assert!(SearchConfig::default()
            .with_determinizations(0)
            .validate()
            .is_err());
        assert!(SearchConfig::default().with_discount(0.0).validate().is_err());
        assert!(SearchConfig::default()
            .with_turn_penalty(1.5)
            .validate()
            .is_err());
        assert!(SearchConfig::default()
            .with_budget(BudgetConfig::Iterations(0))
            .validate()
            .is_err());
        assert!(SearchConfig::default()
            .with_budget(BudgetConfig::Time { millis: 0 })
            .validate()
            .is_err());
        assert!(SearchConfig::default()
            .with_exploration(f64::NAN)
            .validate()
            .is_err());
        assert!(SearchConfig::default()
            .with_rollout(RolloutKind::Blended {
                expert_probability: 2.0
            })
            .validate()
            .is_err());
    }

    #[test]
    fn test_serialization() {
        let config = SearchConfig::default().with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.seed, deserialized.seed);
        assert_eq!(config.budget, deserialized.budget);
        assert_eq!(config.rollout, deserialized.rollout);
    }
}
