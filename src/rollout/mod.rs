//! Default (rollout) policies for finishing games during simulation.
//!
//! A `DefaultPolicy` picks one atomic action at a time; its provided
//! `produce_move` strings those into a full turn. `play_out` alternates turns
//! until the game ends.
//!
//! ## Policies
//!
//! - `RandomPolicy`: Uniform over action categories, then within one
//! - `ExpertPolicy`: Fixed priority list of sensible plays
//! - `BlendedPolicy`: Expert with probability p, random otherwise

pub mod blended;
pub mod expert;
pub mod random;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::core::GameRng;
use crate::moves::{Move, MoveBuilder, SingleMove};

pub use blended::BlendedPolicy;
pub use expert::ExpertPolicy;
pub use random::RandomPolicy;

/// Upper bound on actions in one rollout turn.
pub const MAX_ACTIONS_PER_TURN: usize = 30;

/// Rollout policy.
pub trait DefaultPolicy: Send + Sync {
    /// Next action for the current player, or `None` to end the turn.
    fn next_action(&self, board: &Board, rng: &mut GameRng) -> Option<SingleMove>;

    /// Build a full turn for the current player.
    ///
    /// Actions are tried on a private copy of `board`. Stops when the policy
    /// ends the turn, the game ends, an action fails to apply, or
    /// `MAX_ACTIONS_PER_TURN` actions were taken.
    fn produce_move(&self, board: &Board, rng: &mut GameRng) -> Move {
        let mut scratch = board.clone();
        let mut builder = MoveBuilder::new();
        while builder.len() < MAX_ACTIONS_PER_TURN && !scratch.is_game_over() {
            let Some(action) = self.next_action(&scratch, rng) else {
                break;
            };
            if scratch.apply_single(&action).is_err() {
                break;
            }
            builder.push(action);
        }
        builder.build()
    }
}

/// Play `board` to the end with `policy` for both players.
///
/// Returns the number of turns ended along the way.
pub fn play_out(board: &mut Board, policy: &dyn DefaultPolicy, rng: &mut GameRng) -> u32 {
    let mut turns = 0;
    while !board.is_game_over() {
        let mv = policy.produce_move(board, rng);
        board.apply_moves(&mv, false);
        if board.is_game_over() {
            break;
        }
        board.end_turn();
        turns += 1;
    }
    turns
}

/// Serializable choice of rollout policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloutKind {
    Random,
    Expert(ExpertPolicy),
    Blended { expert_probability: f64 },
}

impl Default for RolloutKind {
    fn default() -> Self {
        RolloutKind::Blended {
            expert_probability: 0.8,
        }
    }
}

impl RolloutKind {
    /// Instantiate the policy.
    #[must_use]
    pub fn build(&self) -> Box<dyn DefaultPolicy> {
        match self {
            RolloutKind::Random => Box::new(RandomPolicy),
            RolloutKind::Expert(expert) => Box::new(expert.clone()),
            RolloutKind::Blended { expert_probability } => {
                Box::new(BlendedPolicy::new(*expert_probability))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardBuilder, HeroPower};
    use crate::cards::CardRegistry;
    use crate::core::PlayerId;

    #[test]
    fn test_play_out_empty_board_ends_by_fatigue() {
        let mut board = BoardBuilder::new().build();
        let mut rng = GameRng::new(1);

        let turns = play_out(&mut board, &RandomPolicy, &mut rng);

        assert!(board.is_game_over());
        assert!(turns > 0);
        assert!(board.score(0.97, PlayerId::FIRST).is_ok());
    }

    #[test]
    fn test_play_out_standard_game_terminates() {
        let registry = CardRegistry::basic();
        for kind in [
            RolloutKind::Random,
            RolloutKind::Expert(ExpertPolicy::default()),
            RolloutKind::default(),
        ] {
            let mut rng = GameRng::new(21);
            let mut board = BoardBuilder::standard(
                &registry,
                [HeroPower::Fireblast, HeroPower::ArmorUp],
                &mut rng,
            )
            .build();

            play_out(&mut board, kind.build().as_ref(), &mut rng);

            assert!(board.is_game_over(), "{kind:?} did not finish");
        }
    }

    #[test]
    fn test_produce_move_does_not_touch_board() {
        let registry = CardRegistry::basic();
        let mut rng = GameRng::new(3);
        let board = BoardBuilder::standard(
            &registry,
            [HeroPower::Fireblast, HeroPower::Fireblast],
            &mut rng,
        )
        .build();
        let before = board.fingerprint();

        let mv = ExpertPolicy::default().produce_move(&board, &mut rng);

        assert_eq!(board.fingerprint(), before);
        assert!(mv.len() <= MAX_ACTIONS_PER_TURN);
    }

    #[test]
    fn test_rollout_kind_serialization() {
        let kind = RolloutKind::Blended {
            expert_probability: 0.25,
        };

        let json = serde_json::to_string(&kind).unwrap();
        let back: RolloutKind = serde_json::from_str(&json).unwrap();

        assert_eq!(kind, back);
    }
}
