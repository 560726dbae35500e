//! Uniform random rollout policy.

use super::DefaultPolicy;
use crate::board::Board;
use crate::core::GameRng;
use crate::moves::{LegalActions, SingleMove};

/// Picks a non-empty action category uniformly (minion attack, hero attack,
/// card play, hero power), then an action within it uniformly.
///
/// Ends the turn only when nothing is left to do.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPolicy;

impl DefaultPolicy for RandomPolicy {
    fn next_action(&self, board: &Board, rng: &mut GameRng) -> Option<SingleMove> {
        let legal = LegalActions::of(board);
        let categories = legal.categories();
        let category = rng.choose(&categories)?;
        rng.choose(category).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardBuilder;
    use crate::cards::{basic, CardRegistry};
    use crate::core::PlayerId;

    #[test]
    fn test_no_action_on_empty_board() {
        let board = BoardBuilder::new().build();
        let mut rng = GameRng::new(0);

        assert!(RandomPolicy.next_action(&board, &mut rng).is_none());
    }

    #[test]
    fn test_only_legal_actions() {
        let registry = CardRegistry::basic();
        let board = BoardBuilder::new()
            .mana(PlayerId::FIRST, 3)
            .minion(PlayerId::FIRST, registry.get(basic::BLOODFEN_RAPTOR).unwrap())
            .minion(PlayerId::SECOND, registry.get(basic::FROSTWOLF_GRUNT).unwrap())
            .hand(PlayerId::FIRST, vec![registry.get(basic::ARCANE_SHOT).unwrap().clone()])
            .build();
        let mut rng = GameRng::new(9);

        for _ in 0..50 {
            let action = RandomPolicy.next_action(&board, &mut rng).unwrap();
            assert!(board.clone().apply_single(&action).is_ok(), "{action}");
        }
    }
}
