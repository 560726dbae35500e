//! Board state.
//!
//! ## PlayerSide
//!
//! Everything one player owns: hero, mana, hand, deck, minions, secrets and
//! the fatigue counter.
//!
//! ## Board
//!
//! Both sides plus whose turn it is. Uses `im` persistent vectors, so a clone
//! is O(1) and the search can branch freely; mutating a clone never affects
//! the original.

use std::sync::Arc;

use im::Vector;
use smallvec::SmallVec;

use super::character::{Hero, HeroPower, Minion, MinionId};
use crate::cards::{CardDefinition, CardId};
use crate::core::{GameRng, PlayerId, PlayerMap};

/// Maximum number of cards in hand. Overdraw burns.
pub const MAX_HAND_SIZE: usize = 10;

/// Maximum number of minions per side.
pub const MAX_MINIONS: usize = 7;

/// Mana crystal cap.
pub const MAX_MANA: u8 = 10;

/// One player's half of the board.
#[derive(Clone, Debug)]
pub struct PlayerSide {
    pub hero: Hero,
    pub mana: u8,
    pub max_mana: u8,
    pub hand: Vector<Arc<CardDefinition>>,
    /// Top of the deck is the front.
    pub deck: Vector<Arc<CardDefinition>>,
    pub minions: Vector<Minion>,
    pub secrets: Vector<Arc<CardDefinition>>,
    /// Damage the next draw from an empty deck deals, minus one.
    pub fatigue: i32,
}

impl PlayerSide {
    #[must_use]
    pub fn new(power: HeroPower) -> Self {
        Self {
            hero: Hero::new(power),
            mana: 0,
            max_mana: 0,
            hand: Vector::new(),
            deck: Vector::new(),
            minions: Vector::new(),
            secrets: Vector::new(),
            fatigue: 0,
        }
    }

    /// Sum of spell damage bonuses on this side.
    #[must_use]
    pub fn spell_damage(&self) -> i32 {
        self.minions.iter().map(|m| m.keywords.spell_damage).sum()
    }

    /// Damage this side could deal next turn from the board alone.
    #[must_use]
    pub fn board_damage(&self) -> i32 {
        let minions: i32 = self.minions.iter().map(|m| m.attack.max(0)).sum();
        minions + self.hero.weapon.map_or(0, |w| w.attack)
    }

    /// Whether any minion with taunt is visible to attackers.
    #[must_use]
    pub fn has_taunt(&self) -> bool {
        self.minions
            .iter()
            .any(|m| m.keywords.taunt && !m.keywords.stealth)
    }

    #[must_use]
    pub fn is_board_full(&self) -> bool {
        self.minions.len() >= MAX_MINIONS
    }

    /// Position of a minion on this side.
    #[must_use]
    pub fn minion_index(&self, id: MinionId) -> Option<usize> {
        self.minions.iter().position(|m| m.id == id)
    }
}

/// Complete game state.
///
/// Cloning is deep in meaning and cheap in cost: the collections are
/// structurally shared, and copy-on-write keeps clones independent.
///
/// `Board` holds no RNG. Randomness (shuffles, rollouts, determinization) is
/// always supplied by the caller.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) players: PlayerMap<PlayerSide>,
    pub(crate) current: PlayerId,
    /// Turns elapsed.
    pub(crate) turn: u32,
    pub(crate) next_minion_id: u32,
}

impl Board {
    /// Player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    /// Player waiting for their turn.
    #[must_use]
    pub fn opponent(&self) -> PlayerId {
        self.current.opponent()
    }

    /// Number of turns elapsed.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn side(&self, player: PlayerId) -> &PlayerSide {
        &self.players[player]
    }

    pub fn side_mut(&mut self, player: PlayerId) -> &mut PlayerSide {
        &mut self.players[player]
    }

    #[must_use]
    pub fn hero(&self, player: PlayerId) -> &Hero {
        &self.players[player].hero
    }

    #[must_use]
    pub fn minions(&self, player: PlayerId) -> &Vector<Minion> {
        &self.players[player].minions
    }

    /// Look up a minion on either side: owner, position and minion.
    #[must_use]
    pub fn find_minion(&self, id: MinionId) -> Option<(PlayerId, usize, &Minion)> {
        PlayerId::both().find_map(|player| {
            let side = &self.players[player];
            side.minion_index(id)
                .and_then(|index| side.minions.get(index).map(|m| (player, index, m)))
        })
    }

    pub(crate) fn allocate_minion_id(&mut self) -> MinionId {
        let id = MinionId(self.next_minion_id);
        self.next_minion_id += 1;
        id
    }

    /// Hash/equality key used to deduplicate candidate moves.
    ///
    /// Covers every input of the heuristic value, so boards with equal
    /// fingerprints always have equal value. Minion order is ignored.
    #[must_use]
    pub fn fingerprint(&self) -> BoardFingerprint {
        BoardFingerprint {
            current: self.current,
            sides: [
                SideFingerprint::of(&self.players[PlayerId::FIRST]),
                SideFingerprint::of(&self.players[PlayerId::SECOND]),
            ],
        }
    }

    /// Resample the hidden information seen by the player to move.
    ///
    /// The acting player's deck is reshuffled. The opponent's hand and deck
    /// are pooled, shuffled, and redealt with the original hand size.
    pub fn determinize(&mut self, rng: &mut GameRng) {
        let me = self.current;
        let them = self.opponent();

        let mut deck: Vec<_> = self.players[me].deck.iter().cloned().collect();
        rng.shuffle(&mut deck);
        self.players[me].deck = deck.into_iter().collect();

        let side = &mut self.players[them];
        let hand_size = side.hand.len();
        let mut pool: Vec<_> = side.hand.iter().chain(side.deck.iter()).cloned().collect();
        rng.shuffle(&mut pool);
        let deck = pool.split_off(hand_size.min(pool.len()));
        side.hand = pool.into_iter().collect();
        side.deck = deck.into_iter().collect();
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "turn {}, {} to move", self.turn, self.current)?;
        for (player, side) in self.players.iter() {
            write!(
                f,
                " | {}: {}+{} hp, {}/{} mana, hand {}, deck {}, minions [",
                player,
                side.hero.health,
                side.hero.armor,
                side.mana,
                side.max_mana,
                side.hand.len(),
                side.deck.len()
            )?;
            for (i, minion) in side.minions.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{minion}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

/// Order-insensitive summary of one minion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct MinionPrint {
    card: CardId,
    attack: i32,
    health: i32,
    max_health: i32,
    ready: bool,
    taunt: bool,
    stealth: bool,
    divine_shield: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SideFingerprint {
    health: i32,
    armor: i32,
    weapon: Option<(i32, i32)>,
    temp_attack: i32,
    hero_attacked: bool,
    power_used: bool,
    mana: u8,
    max_mana: u8,
    deck_size: usize,
    fatigue: i32,
    hand: SmallVec<[CardId; MAX_HAND_SIZE]>,
    secrets: usize,
    minions: SmallVec<[MinionPrint; MAX_MINIONS]>,
}

impl SideFingerprint {
    fn of(side: &PlayerSide) -> Self {
        let mut hand: SmallVec<[CardId; MAX_HAND_SIZE]> = side.hand.iter().map(|c| c.id).collect();
        hand.sort_unstable();

        let mut minions: SmallVec<[MinionPrint; MAX_MINIONS]> = side
            .minions
            .iter()
            .map(|m| MinionPrint {
                card: m.card.id,
                attack: m.attack,
                health: m.health,
                max_health: m.max_health,
                ready: m.can_attack(),
                taunt: m.keywords.taunt,
                stealth: m.keywords.stealth,
                divine_shield: m.keywords.divine_shield,
            })
            .collect();
        minions.sort_unstable();

        Self {
            health: side.hero.health,
            armor: side.hero.armor,
            weapon: side.hero.weapon.map(|w| (w.attack, w.durability)),
            temp_attack: side.hero.temp_attack,
            hero_attacked: side.hero.attacked,
            power_used: side.hero.power_used,
            mana: side.mana,
            max_mana: side.max_mana,
            deck_size: side.deck.len(),
            fatigue: side.fatigue,
            hand,
            secrets: side.secrets.len(),
            minions,
        }
    }
}

/// Equality key for boards. See [`Board::fingerprint`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoardFingerprint {
    current: PlayerId,
    sides: [SideFingerprint; 2],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardBuilder;
    use crate::cards::{basic, CardRegistry};

    #[test]
    fn test_clone_is_independent() {
        let registry = CardRegistry::basic();
        let board = BoardBuilder::new()
            .minion(PlayerId::FIRST, registry.get(basic::CHILLWIND_YETI).unwrap())
            .build();

        let mut copy = board.clone();
        copy.side_mut(PlayerId::FIRST).hero.health = 1;
        copy.side_mut(PlayerId::FIRST).minions.pop_back();

        assert_eq!(board.hero(PlayerId::FIRST).health, 30);
        assert_eq!(board.minions(PlayerId::FIRST).len(), 1);
    }

    #[test]
    fn test_fingerprint_ignores_minion_order() {
        let registry = CardRegistry::basic();
        let wisp = registry.get(basic::WISP).unwrap();
        let raptor = registry.get(basic::BLOODFEN_RAPTOR).unwrap();

        let a = BoardBuilder::new()
            .minion(PlayerId::FIRST, wisp)
            .minion(PlayerId::FIRST, raptor)
            .build();
        let b = BoardBuilder::new()
            .minion(PlayerId::FIRST, raptor)
            .minion(PlayerId::FIRST, wisp)
            .build();

        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_sees_health_changes() {
        let board = BoardBuilder::new().build();
        let mut hurt = board.clone();
        hurt.side_mut(PlayerId::SECOND).hero.health -= 1;

        assert_ne!(board.fingerprint(), hurt.fingerprint());
    }

    #[test]
    fn test_find_minion() {
        let registry = CardRegistry::basic();
        let board = BoardBuilder::new()
            .minion(PlayerId::SECOND, registry.get(basic::WISP).unwrap())
            .build();

        let id = board.minions(PlayerId::SECOND)[0].id;
        let (owner, index, minion) = board.find_minion(id).unwrap();

        assert_eq!(owner, PlayerId::SECOND);
        assert_eq!(index, 0);
        assert_eq!(minion.card.id, basic::WISP);
        assert!(board.find_minion(MinionId(99)).is_none());
    }

    #[test]
    fn test_determinize_preserves_counts() {
        let registry = CardRegistry::basic();
        let deck = registry.basic_deck();
        let board = BoardBuilder::new()
            .deck(PlayerId::FIRST, deck.clone())
            .deck(PlayerId::SECOND, deck[5..].to_vec())
            .hand(PlayerId::SECOND, deck[..5].to_vec())
            .build();

        let mut rng = GameRng::new(7);
        let mut sampled = board.clone();
        sampled.determinize(&mut rng);

        let them = sampled.side(PlayerId::SECOND);
        assert_eq!(them.hand.len(), 5);
        assert_eq!(them.deck.len(), 25);
        assert_eq!(sampled.side(PlayerId::FIRST).deck.len(), 30);

        let mut before: Vec<_> = deck.iter().map(|c| c.id).collect();
        let mut after: Vec<_> = them.hand.iter().chain(them.deck.iter()).map(|c| c.id).collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[test]
    fn test_display_mentions_turn() {
        let board = BoardBuilder::new().build();
        let text = board.to_string();

        assert!(text.starts_with("turn 0, Player 0 to move"));
        assert!(text.contains("Player 1: 30+0 hp"));
    }
}
