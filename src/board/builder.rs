//! Board construction.
//!
//! `BoardBuilder::new()` starts from two bare heroes (30 health, no mana, no
//! cards), which is the usual starting point for hand-built test positions.
//! `BoardBuilder::standard()` sets up a real opening: shuffled basic decks,
//! opening hands, and the first player's first turn started.

use std::sync::Arc;

use super::character::{HeroPower, Minion, Weapon};
use super::state::{Board, PlayerSide, MAX_MANA};
use crate::cards::{CardDefinition, CardRegistry};
use crate::core::{GameRng, PlayerId, PlayerMap};

/// Opening hand sizes: the player going second gets one extra card.
const OPENING_HAND: [usize; 2] = [3, 4];

/// Builder for `Board`.
///
/// ## Example
///
/// ```
/// use ccg_search::board::BoardBuilder;
/// use ccg_search::cards::{basic, CardRegistry};
/// use ccg_search::core::PlayerId;
///
/// let registry = CardRegistry::basic();
/// let board = BoardBuilder::new()
///     .mana(PlayerId::FIRST, 1)
///     .hand(PlayerId::FIRST, vec![registry.get(basic::STONETUSK_BOAR).unwrap().clone()])
///     .health(PlayerId::SECOND, 1)
///     .build();
///
/// assert_eq!(board.playable_cards(), vec![0]);
/// ```
#[derive(Clone, Debug)]
pub struct BoardBuilder {
    board: Board,
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardBuilder {
    /// Two bare heroes with Fireblast, first player to move, turn 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board {
                players: PlayerMap::new(|_| PlayerSide::new(HeroPower::Fireblast)),
                current: PlayerId::FIRST,
                turn: 0,
                next_minion_id: 0,
            },
        }
    }

    /// A fresh game with shuffled basic decks and opening hands drawn.
    ///
    /// The first player's turn has already started: one mana crystal and one
    /// card drawn.
    #[must_use]
    pub fn standard(registry: &CardRegistry, powers: [HeroPower; 2], rng: &mut GameRng) -> Self {
        let mut builder = Self::new();
        for player in PlayerId::both() {
            let mut deck = registry.basic_deck();
            rng.shuffle(&mut deck);
            let rest = deck.split_off(OPENING_HAND[player.index()].min(deck.len()));
            builder = builder
                .hero_power(player, powers[player.index()])
                .hand(player, deck)
                .deck(player, rest);
        }
        builder.board.start_turn();
        builder
    }

    #[must_use]
    pub fn hero_power(mut self, player: PlayerId, power: HeroPower) -> Self {
        self.board.players[player].hero.power = power;
        self
    }

    /// Set current and maximum health.
    #[must_use]
    pub fn health(mut self, player: PlayerId, health: i32) -> Self {
        let hero = &mut self.board.players[player].hero;
        hero.health = health;
        hero.max_health = hero.max_health.max(health);
        self
    }

    #[must_use]
    pub fn armor(mut self, player: PlayerId, armor: i32) -> Self {
        self.board.players[player].hero.armor = armor;
        self
    }

    /// Set both current and maximum mana, capped at 10.
    #[must_use]
    pub fn mana(mut self, player: PlayerId, mana: u8) -> Self {
        let side = &mut self.board.players[player];
        side.mana = mana.min(MAX_MANA);
        side.max_mana = side.mana;
        self
    }

    /// Replace the hand.
    #[must_use]
    pub fn hand(mut self, player: PlayerId, cards: Vec<Arc<CardDefinition>>) -> Self {
        self.board.players[player].hand = cards.into_iter().collect();
        self
    }

    /// Replace the deck. The first card is drawn first.
    #[must_use]
    pub fn deck(mut self, player: PlayerId, cards: Vec<Arc<CardDefinition>>) -> Self {
        self.board.players[player].deck = cards.into_iter().collect();
        self
    }

    /// Put a minion in play, ready to attack. Non-minion cards are ignored.
    #[must_use]
    pub fn minion(mut self, player: PlayerId, card: &Arc<CardDefinition>) -> Self {
        let id = self.board.allocate_minion_id();
        if let Some(mut minion) = Minion::summon(id, Arc::clone(card)) {
            minion.summoning_sick = false;
            self.board.players[player].minions.push_back(minion);
        }
        self
    }

    /// Put a card into play as a secret.
    #[must_use]
    pub fn secret(mut self, player: PlayerId, card: &Arc<CardDefinition>) -> Self {
        self.board.players[player].secrets.push_back(Arc::clone(card));
        self
    }

    #[must_use]
    pub fn weapon(mut self, player: PlayerId, attack: i32, durability: i32) -> Self {
        self.board.players[player].hero.weapon = Some(Weapon { attack, durability });
        self
    }

    /// Set the player to move.
    #[must_use]
    pub fn current(mut self, player: PlayerId) -> Self {
        self.board.current = player;
        self
    }

    /// Set the number of turns elapsed.
    #[must_use]
    pub fn turn(mut self, turn: u32) -> Self {
        self.board.turn = turn;
        self
    }

    #[must_use]
    pub fn build(self) -> Board {
        self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::basic;

    #[test]
    fn test_empty_board() {
        let board = BoardBuilder::new().build();

        assert_eq!(board.current_player(), PlayerId::FIRST);
        assert_eq!(board.turn(), 0);
        assert!(!board.is_game_over());
        for player in PlayerId::both() {
            assert_eq!(board.hero(player).health, 30);
            assert!(board.side(player).hand.is_empty());
        }
    }

    #[test]
    fn test_standard_opening() {
        let registry = CardRegistry::basic();
        let mut rng = GameRng::new(11);
        let board = BoardBuilder::standard(
            &registry,
            [HeroPower::Fireblast, HeroPower::ArmorUp],
            &mut rng,
        )
        .build();

        let first = board.side(PlayerId::FIRST);
        let second = board.side(PlayerId::SECOND);
        assert_eq!(first.hand.len(), 4);
        assert_eq!(first.deck.len(), 26);
        assert_eq!(first.mana, 1);
        assert_eq!(second.hand.len(), 4);
        assert_eq!(second.deck.len(), 26);
        assert_eq!(second.mana, 0);
        assert_eq!(second.hero.power, HeroPower::ArmorUp);
    }

    #[test]
    fn test_minion_ids_are_unique() {
        let registry = CardRegistry::basic();
        let wisp = registry.get(basic::WISP).unwrap();
        let board = BoardBuilder::new()
            .minion(PlayerId::FIRST, wisp)
            .minion(PlayerId::SECOND, wisp)
            .build();

        assert_ne!(
            board.minions(PlayerId::FIRST)[0].id,
            board.minions(PlayerId::SECOND)[0].id
        );
        assert!(board.minions(PlayerId::FIRST)[0].can_attack());
    }

    #[test]
    fn test_mana_is_capped() {
        let board = BoardBuilder::new().mana(PlayerId::FIRST, 15).build();
        assert_eq!(board.side(PlayerId::FIRST).max_mana, MAX_MANA);
    }
}
