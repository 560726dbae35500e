//! Error types.
//!
//! `GameError` is raised by the rules when an atomic action cannot be
//! applied or a terminal-only query is made too early. `SearchError` is raised
//! by the search agents.

use crate::board::Character;
use crate::cards::CardId;

/// Rejection of a game action, or a query made in the wrong game phase.
///
/// Rejected actions never leave partial state behind: the board is validated
/// before it is mutated.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Score requested before the game ended.
    #[error("game is not over yet")]
    NotTerminal,

    /// Action attempted after the game ended.
    #[error("game is already over")]
    GameOver,

    /// Hand index does not exist.
    #[error("no card at hand index {0}")]
    NoSuchCard(usize),

    /// The card at the hand index is not the one the move was built for.
    #[error("hand index {index} holds {found}, expected {expected}")]
    CardMismatch {
        index: usize,
        expected: CardId,
        found: CardId,
    },

    /// Not enough mana for a card or the hero power.
    #[error("not enough mana: need {need}, have {have}")]
    NotEnoughMana { need: u8, have: u8 },

    /// Minion board already holds the maximum number of minions.
    #[error("board is full")]
    BoardFull,

    /// Minion slot outside `0..=minion_count`.
    #[error("invalid board slot {0}")]
    InvalidSlot(usize),

    /// A target was required but missing, supplied but not allowed, or illegal.
    #[error("invalid target {0:?}")]
    InvalidTarget(Option<Character>),

    /// Referenced minion is not on the board.
    #[error("no such minion {0}")]
    NoSuchMinion(Character),

    /// Character is not allowed to attack right now.
    #[error("{0} cannot attack")]
    CannotAttack(Character),

    /// A taunt minion must be attacked first.
    #[error("{0} is protected by taunt")]
    TauntInTheWay(Character),

    /// Hero power already used this turn.
    #[error("hero power already used this turn")]
    HeroPowerUsed,
}

/// Failure of a top-level search call.
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    /// The move generator produced nothing; "do nothing" is always legal, so
    /// this is a logic defect.
    #[error("move generator returned no candidate moves")]
    NoCandidateMoves,

    /// The board handed to `search` is already terminal.
    #[error("cannot search a finished game")]
    GameOver,

    /// `search` called after `close`.
    #[error("agent has been closed")]
    Closed,

    /// Configuration rejected by `SearchConfig::validate`.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    #[test]
    fn test_game_error_messages() {
        let err = GameError::NotEnoughMana { need: 3, have: 1 };
        assert_eq!(err.to_string(), "not enough mana: need 3, have 1");

        let err = GameError::CannotAttack(Character::Hero(PlayerId::FIRST));
        assert_eq!(err.to_string(), "Hero(Player 0) cannot attack");
    }

    #[test]
    fn test_search_error_messages() {
        assert_eq!(
            SearchError::InvalidConfig("workers must be positive".into()).to_string(),
            "invalid configuration: workers must be positive"
        );
        assert_eq!(SearchError::Closed.to_string(), "agent has been closed");
    }
}
