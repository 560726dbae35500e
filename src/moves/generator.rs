//! Move generation.
//!
//! ## LegalActions
//!
//! Enumerates every atomic action the current player can take on a board,
//! grouped by category (hero power, hero attacks, minion attacks, card
//! plays).
//!
//! ## MoveGenerator
//!
//! Builds full-turn moves breadth-first from the empty move. Each candidate
//! keeps its own board snapshot; extending a candidate clones that snapshot
//! and applies one more action. Candidates are deduplicated by resulting
//! board fingerprint, optionally pruned when they score below their parent,
//! capped, and returned best-first.

use log::trace;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::model::{Move, SingleMove};
use crate::board::{Board, Character, HeuristicWeights};

/// Default cap on candidates explored.
pub const DEFAULT_MAX_CANDIDATES: usize = 1000;

/// Default cap on moves returned.
pub const DEFAULT_MAX_MOVES: usize = 500;

/// Every atomic action available to the current player, by category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LegalActions {
    pub hero_powers: Vec<SingleMove>,
    pub hero_attacks: Vec<SingleMove>,
    pub minion_attacks: Vec<SingleMove>,
    pub card_plays: Vec<SingleMove>,
}

impl LegalActions {
    /// Enumerate the legal actions on `board`. Empty once the game is over.
    #[must_use]
    pub fn of(board: &Board) -> Self {
        let mut legal = Self::default();
        if board.is_game_over() {
            return legal;
        }

        if board.can_use_hero_power() {
            legal.hero_powers = board
                .hero_power_targets()
                .into_iter()
                .map(|target| SingleMove::UseHeroPower { target })
                .collect();
        }

        let targets = board.attack_targets();
        for attacker in board.attackers() {
            let bucket = match attacker {
                Character::Hero(_) => &mut legal.hero_attacks,
                Character::Minion(_) => &mut legal.minion_attacks,
            };
            bucket.extend(
                targets
                    .iter()
                    .map(|&target| SingleMove::DirectAttack { attacker, target }),
            );
        }

        let side = board.side(board.current_player());
        for hand_index in board.playable_cards() {
            let Some(card) = side.hand.get(hand_index) else {
                continue;
            };
            let slots = if card.is_minion() {
                board.minion_slots()
            } else {
                vec![0]
            };
            let targets = board.card_targets(hand_index);
            for &slot in &slots {
                legal
                    .card_plays
                    .extend(targets.iter().map(|&target| SingleMove::PlayCard {
                        hand_index,
                        card: card.id,
                        slot,
                        target,
                    }));
            }
        }

        legal
    }

    /// Non-empty categories, in enumeration order.
    #[must_use]
    pub fn categories(&self) -> Vec<&[SingleMove]> {
        [
            self.hero_powers.as_slice(),
            self.hero_attacks.as_slice(),
            self.minion_attacks.as_slice(),
            self.card_plays.as_slice(),
        ]
        .into_iter()
        .filter(|c| !c.is_empty())
        .collect()
    }

    /// All actions, in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &SingleMove> {
        self.hero_powers
            .iter()
            .chain(&self.hero_attacks)
            .chain(&self.minion_attacks)
            .chain(&self.card_plays)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hero_powers.len()
            + self.hero_attacks.len()
            + self.minion_attacks.len()
            + self.card_plays.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Limits and scoring for [`MoveGenerator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Stop extending once more candidates than this exist.
    pub max_candidates: usize,
    /// Return at most this many moves.
    pub max_moves: usize,
    /// Drop candidates whose value is below their parent's.
    pub prune_worse: bool,
    pub weights: HeuristicWeights,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            max_moves: DEFAULT_MAX_MOVES,
            prune_worse: true,
            weights: HeuristicWeights::default(),
        }
    }
}

struct Candidate {
    mv: Move,
    board: Board,
    value: f64,
}

/// Breadth-first full-turn move generator.
///
/// ## Example
///
/// ```
/// use ccg_search::board::BoardBuilder;
/// use ccg_search::cards::{basic, CardRegistry};
/// use ccg_search::core::PlayerId;
/// use ccg_search::moves::MoveGenerator;
///
/// let registry = CardRegistry::basic();
/// let board = BoardBuilder::new()
///     .mana(PlayerId::FIRST, 1)
///     .hand(PlayerId::FIRST, vec![registry.get(basic::STONETUSK_BOAR).unwrap().clone()])
///     .health(PlayerId::SECOND, 1)
///     .build();
///
/// let moves = MoveGenerator::new().generate(&board);
///
/// // Best first: play the boar, then attack face for the win.
/// let mut after = board.clone();
/// after.apply_moves(&moves[0], false);
/// assert!(after.has_won(PlayerId::FIRST));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MoveGenerator {
    config: GeneratorConfig,
}

impl MoveGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.config.max_candidates = max;
        self
    }

    #[must_use]
    pub fn with_max_moves(mut self, max: usize) -> Self {
        self.config.max_moves = max;
        self
    }

    #[must_use]
    pub fn with_pruning(mut self, prune: bool) -> Self {
        self.config.prune_worse = prune;
        self
    }

    #[must_use]
    pub fn with_weights(mut self, weights: HeuristicWeights) -> Self {
        self.config.weights = weights;
        self
    }

    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Candidate moves for the current player, best first.
    ///
    /// Never empty: the empty move is always a candidate.
    #[must_use]
    pub fn generate(&self, board: &Board) -> Vec<Move> {
        self.generate_scored(board)
            .into_iter()
            .map(|(mv, _)| mv)
            .collect()
    }

    /// Candidate moves with their heuristic values, best first. Ties keep
    /// discovery order.
    #[must_use]
    pub fn generate_scored(&self, board: &Board) -> Vec<(Move, f64)> {
        let player = board.current_player();
        let weights = &self.config.weights;

        let mut seen = FxHashSet::default();
        seen.insert(board.fingerprint());
        let mut candidates = vec![Candidate {
            mv: Move::empty(),
            board: board.clone(),
            value: board.heuristic_value(player, weights),
        }];

        let mut next = 0;
        while next < candidates.len() && candidates.len() <= self.config.max_candidates {
            let parent_board = candidates[next].board.clone();
            let parent_move = candidates[next].mv.clone();
            let parent_value = candidates[next].value;
            next += 1;

            // Finished games are kept but not extended.
            if parent_board.is_game_over() {
                continue;
            }

            for action in LegalActions::of(&parent_board).iter() {
                if candidates.len() > self.config.max_candidates {
                    break;
                }
                let mut child = parent_board.clone();
                if let Err(err) = child.apply_single(action) {
                    trace!("generator skipped {action}: {err}");
                    continue;
                }
                let value = child.heuristic_value(player, weights);
                if self.config.prune_worse && value < parent_value {
                    continue;
                }
                if !seen.insert(child.fingerprint()) {
                    continue;
                }
                candidates.push(Candidate {
                    mv: parent_move.then(*action),
                    board: child,
                    value,
                });
            }
        }

        trace!(
            "generated {} candidates ({} extended) for {}",
            candidates.len(),
            next,
            player
        );

        let mut scored: Vec<(Move, f64)> = candidates.into_iter().map(|c| (c.mv, c.value)).collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(self.config.max_moves);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardBuilder, HeroPower};
    use crate::cards::{basic, CardRegistry};
    use crate::core::PlayerId;

    const ME: PlayerId = PlayerId::FIRST;
    const THEM: PlayerId = PlayerId::SECOND;

    #[test]
    fn test_empty_board_only_passes() {
        let board = BoardBuilder::new().build();
        let moves = MoveGenerator::new().generate(&board);

        assert_eq!(moves, vec![Move::empty()]);
    }

    #[test]
    fn test_legal_actions_categories() {
        let registry = CardRegistry::basic();
        let board = BoardBuilder::new()
            .mana(ME, 2)
            .hero_power(ME, HeroPower::ArmorUp)
            .weapon(ME, 1, 1)
            .minion(ME, registry.get(basic::WISP).unwrap())
            .minion(THEM, registry.get(basic::WISP).unwrap())
            .hand(ME, vec![registry.get(basic::MURLOC_RAIDER).unwrap().clone()])
            .build();

        let legal = LegalActions::of(&board);

        assert_eq!(legal.hero_powers.len(), 1);
        // Two targets each for the hero and the wisp.
        assert_eq!(legal.hero_attacks.len(), 2);
        assert_eq!(legal.minion_attacks.len(), 2);
        // One card, two slots.
        assert_eq!(legal.card_plays.len(), 2);
        assert_eq!(legal.categories().len(), 4);
        assert_eq!(legal.iter().count(), legal.len());
    }

    #[test]
    fn test_identical_cards_deduplicated() {
        let registry = CardRegistry::basic();
        let wisp = registry.get(basic::WISP).unwrap().clone();
        let board = BoardBuilder::new()
            .mana(ME, 0)
            .hand(ME, vec![wisp.clone(), wisp])
            .build();

        let moves = MoveGenerator::new().with_pruning(false).generate(&board);

        // Pass, one wisp, two wisps.
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn test_sorted_by_value() {
        let registry = CardRegistry::basic();
        let mut rng = crate::core::GameRng::new(5);
        let mut board = BoardBuilder::standard(
            &registry,
            [HeroPower::Fireblast, HeroPower::Fireblast],
            &mut rng,
        )
        .build();
        for _ in 0..6 {
            board.end_turn();
        }

        let scored = MoveGenerator::new().generate_scored(&board);

        assert!(!scored.is_empty());
        assert!(scored.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_caps_are_respected() {
        let registry = CardRegistry::basic();
        let wisp = registry.get(basic::WISP).unwrap();
        let mut builder = BoardBuilder::new().mana(ME, 10);
        for _ in 0..6 {
            builder = builder.minion(ME, wisp).minion(THEM, wisp);
        }
        let board = builder.build();

        let moves = MoveGenerator::new()
            .with_pruning(false)
            .with_max_candidates(50)
            .with_max_moves(20)
            .generate(&board);

        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn test_pruning_keeps_empty_move() {
        let registry = CardRegistry::basic();
        let board = BoardBuilder::new()
            .mana(ME, 10)
            .minion(THEM, registry.get(basic::BOULDERFIST_OGRE).unwrap())
            .minion(ME, registry.get(basic::WISP).unwrap())
            .build();

        let moves = MoveGenerator::new().generate(&board);

        assert!(moves.contains(&Move::empty()));
    }
}
