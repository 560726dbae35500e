//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! The game is strictly two-player: `PlayerId::FIRST` moves first and
//! `PlayerId::SECOND` answers. `opponent()` flips between them.
//!
//! ## PlayerMap
//!
//! Fixed two-slot storage indexed by `PlayerId`. Used for per-player board
//! sides and for per-player reward totals in the search tree.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of seats at the table.
pub const PLAYER_COUNT: usize = 2;

/// Player identifier (0 or 1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// The player who takes the first turn.
    pub const FIRST: PlayerId = PlayerId(0);

    /// The player who takes the second turn.
    pub const SECOND: PlayerId = PlayerId(1);

    /// Create a new player ID.
    ///
    /// Panics if `id` is not 0 or 1.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!(id < PLAYER_COUNT as u8, "PlayerId must be 0 or 1");
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other player.
    ///
    /// ```
    /// use ccg_search::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::FIRST.opponent(), PlayerId::SECOND);
    /// assert_eq!(PlayerId::SECOND.opponent(), PlayerId::FIRST);
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Both players, first player first.
    pub fn both() -> impl Iterator<Item = PlayerId> {
        [PlayerId::FIRST, PlayerId::SECOND].into_iter()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use ccg_search::core::{PlayerId, PlayerMap};
///
/// let mut health: PlayerMap<i32> = PlayerMap::with_value(30);
/// health[PlayerId::SECOND] -= 4;
///
/// assert_eq!(health[PlayerId::FIRST], 30);
/// assert_eq!(health[PlayerId::SECOND], 26);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; PLAYER_COUNT],
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId::FIRST), factory(PlayerId::SECOND)],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: [value.clone(), value],
        }
    }

    /// Create a map with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T: Default> Default for PlayerMap<T> {
    fn default() -> Self {
        Self::with_default()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
