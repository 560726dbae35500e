//! Mix of the expert and random policies.

use super::{DefaultPolicy, ExpertPolicy, RandomPolicy};
use crate::board::Board;
use crate::core::GameRng;
use crate::moves::SingleMove;

/// Per decision: expert with probability `expert_probability`, random
/// otherwise.
#[derive(Clone, Debug)]
pub struct BlendedPolicy {
    expert_probability: f64,
    expert: ExpertPolicy,
}

impl BlendedPolicy {
    /// Probability is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(expert_probability: f64) -> Self {
        Self {
            expert_probability: expert_probability.clamp(0.0, 1.0),
            expert: ExpertPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_expert(mut self, expert: ExpertPolicy) -> Self {
        self.expert = expert;
        self
    }

    #[must_use]
    pub fn expert_probability(&self) -> f64 {
        self.expert_probability
    }
}

impl DefaultPolicy for BlendedPolicy {
    fn next_action(&self, board: &Board, rng: &mut GameRng) -> Option<SingleMove> {
        if rng.gen_bool(self.expert_probability) {
            self.expert.next_action(board, rng)
        } else {
            RandomPolicy.next_action(board, rng)
        }
    }
}
