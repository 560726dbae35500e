//! Static board evaluation.
//!
//! The move generator ranks and prunes candidate turns with this value. It
//! only reads inputs covered by [`Board::fingerprint`], so boards that
//! deduplicate together always evaluate the same.

use serde::{Deserialize, Serialize};

use super::state::{Board, PlayerSide};
use crate::core::PlayerId;

/// Value of a board where the enemy hero is dead. Negated when our hero is.
pub const LETHAL_VALUE: f64 = 1.0e6;

/// Weights of the heuristic terms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeuristicWeights {
    /// Per mana of minion cost on board (ours minus theirs).
    pub minions: f64,
    /// Log-scaled projected health race.
    pub race: f64,
    /// Per card in hand or secret (ours minus theirs).
    pub cards: f64,
    /// Penalty per own character that could still attack.
    pub unused_attacker: f64,
    /// Penalty per card still playable this turn.
    pub unused_card: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            minions: 1.0,
            race: 4.0,
            cards: 0.5,
            unused_attacker: 0.5,
            unused_card: 0.25,
        }
    }
}

fn minion_cost(side: &PlayerSide) -> f64 {
    side.minions.iter().map(|m| f64::from(m.cost())).sum()
}

fn card_count(side: &PlayerSide) -> f64 {
    (side.hand.len() + side.secrets.len()) as f64
}

fn ready_attackers(side: &PlayerSide) -> f64 {
    let minions = side.minions.iter().filter(|m| m.can_attack()).count();
    (minions + usize::from(side.hero.can_attack())) as f64
}

fn playable(side: &PlayerSide) -> f64 {
    side.hand
        .iter()
        .filter(|c| c.cost <= side.mana && !(c.is_minion() && side.is_board_full()))
        .count() as f64
}

/// Health after absorbing everything the other side has on board, floored at 0.
fn projected_health(side: &PlayerSide, other: &PlayerSide) -> f64 {
    f64::from((side.hero.effective_health() - other.board_damage()).max(0))
}

impl Board {
    /// Heuristic value of this board from `player`'s point of view.
    ///
    /// ```text
    /// minions * (ally minion cost - enemy minion cost)
    ///   + race * (ln(1 + projected own health) - ln(1 + projected enemy health))
    ///   + cards * ((own hand + secrets) - (enemy hand + secrets))
    ///   - unused_attacker * (own characters that could still attack)
    ///   - unused_card * (own cards still playable)
    /// ```
    #[must_use]
    pub fn heuristic_value(&self, player: PlayerId, weights: &HeuristicWeights) -> f64 {
        if self.hero(player).is_dead() {
            return -LETHAL_VALUE;
        }
        if self.hero(player.opponent()).is_dead() {
            return LETHAL_VALUE;
        }

        let own = self.side(player);
        let enemy = self.side(player.opponent());

        let board = minion_cost(own) - minion_cost(enemy);
        let race = projected_health(own, enemy).ln_1p() - projected_health(enemy, own).ln_1p();
        let cards = card_count(own) - card_count(enemy);

        weights.minions * board + weights.race * race + weights.cards * cards
            - weights.unused_attacker * ready_attackers(own)
            - weights.unused_card * playable(own)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardBuilder;
    use crate::cards::{basic, CardRegistry};

    #[test]
    fn test_symmetric_board_is_zero() {
        let board = BoardBuilder::new().build();
        let weights = HeuristicWeights::default();

        assert!(board.heuristic_value(PlayerId::FIRST, &weights).abs() < 1e-12);
    }

    #[test]
    fn test_lethal_values() {
        let mut board = BoardBuilder::new().build();
        board.side_mut(PlayerId::SECOND).hero.health = 0;
        let weights = HeuristicWeights::default();

        assert_eq!(board.heuristic_value(PlayerId::FIRST, &weights), LETHAL_VALUE);
        assert_eq!(board.heuristic_value(PlayerId::SECOND, &weights), -LETHAL_VALUE);
    }

    #[test]
    fn test_minions_raise_value() {
        let registry = CardRegistry::basic();
        let weights = HeuristicWeights::default();
        let empty = BoardBuilder::new().build();
        let with_yeti = BoardBuilder::new()
            .minion(PlayerId::FIRST, registry.get(basic::CHILLWIND_YETI).unwrap())
            .build();

        // The yeti is ready, so it also counts as an unused attacker.
        let delta = with_yeti.heuristic_value(PlayerId::FIRST, &weights)
            - empty.heuristic_value(PlayerId::FIRST, &weights);
        assert!(delta > 0.0);
        assert!(with_yeti.heuristic_value(PlayerId::SECOND, &weights) < 0.0);
    }

    #[test]
    fn test_attacking_raises_value() {
        let weights = HeuristicWeights::default();
        let mut board = BoardBuilder::new().weapon(PlayerId::FIRST, 3, 2).build();
        let before = board.heuristic_value(PlayerId::FIRST, &weights);

        board.side_mut(PlayerId::FIRST).hero.attacked = true;
        board.side_mut(PlayerId::SECOND).hero.health -= 3;

        assert!(board.heuristic_value(PlayerId::FIRST, &weights) > before);
    }
}
