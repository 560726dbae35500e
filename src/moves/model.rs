//! Move model: atomic actions and whole-turn moves.
//!
//! A `SingleMove` is one atomic action. A `Move` is the ordered sequence of
//! actions a player takes in one turn; the empty move means "end the turn
//! without acting" and is always legal.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::Character;
use crate::cards::CardId;

/// One atomic action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SingleMove {
    /// Play the card at `hand_index`. `card` must match the card found
    /// there. `slot` is the board position for minions and ignored
    /// otherwise.
    PlayCard {
        hand_index: usize,
        card: CardId,
        slot: usize,
        target: Option<Character>,
    },
    /// Attack with a hero or minion.
    DirectAttack {
        attacker: Character,
        target: Character,
    },
    /// Use the hero power.
    UseHeroPower { target: Option<Character> },
}

impl std::fmt::Display for SingleMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SingleMove::PlayCard {
                hand_index,
                card,
                slot,
                target,
            } => {
                write!(f, "play {card} from hand[{hand_index}] at slot {slot}")?;
                if let Some(target) = target {
                    write!(f, " on {target}")?;
                }
                Ok(())
            }
            SingleMove::DirectAttack { attacker, target } => {
                write!(f, "{attacker} attacks {target}")
            }
            SingleMove::UseHeroPower { target } => {
                write!(f, "hero power")?;
                if let Some(target) = target {
                    write!(f, " on {target}")?;
                }
                Ok(())
            }
        }
    }
}

/// A full turn: an ordered sequence of atomic actions. Immutable once built.
///
/// ## Example
///
/// ```
/// use ccg_search::board::Character;
/// use ccg_search::core::PlayerId;
/// use ccg_search::moves::{Move, SingleMove};
///
/// let face = SingleMove::DirectAttack {
///     attacker: Character::Hero(PlayerId::FIRST),
///     target: Character::Hero(PlayerId::SECOND),
/// };
/// let mv = Move::empty().then(face);
///
/// assert!(Move::empty().is_empty());
/// assert_eq!(mv.len(), 1);
/// assert_eq!(mv.to_string(), "Hero(Player 0) attacks Hero(Player 1)");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    actions: SmallVec<[SingleMove; 4]>,
}

/// "Do nothing this turn".
pub const EMPTY_MOVE: Move = Move {
    actions: SmallVec::new_const(),
};

impl Move {
    /// The empty move.
    #[must_use]
    pub const fn empty() -> Self {
        EMPTY_MOVE
    }

    /// A new move with `action` appended. `self` is left unchanged.
    #[must_use]
    pub fn then(&self, action: SingleMove) -> Self {
        let mut actions = self.actions.clone();
        actions.push(action);
        Self { actions }
    }

    #[must_use]
    pub fn actions(&self) -> &[SingleMove] {
        &self.actions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.actions.is_empty() {
            return write!(f, "<pass>");
        }
        for (i, action) in self.actions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{action}")?;
        }
        Ok(())
    }
}

impl FromIterator<SingleMove> for Move {
    fn from_iter<I: IntoIterator<Item = SingleMove>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

/// Append-only builder for `Move`.
#[derive(Clone, Debug, Default)]
pub struct MoveBuilder {
    actions: SmallVec<[SingleMove; 4]>,
}

impl MoveBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: SingleMove) -> &mut Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[must_use]
    pub fn build(self) -> Move {
        Move {
            actions: self.actions,
        }
    }
}
