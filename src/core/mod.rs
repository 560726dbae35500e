//! Core types: players, RNG, errors.
//!
//! Everything else in the crate builds on these: the board is indexed by
//! `PlayerId`, every worker owns a forked `GameRng`, and fallible operations
//! return `GameError` or `SearchError`.

pub mod error;
pub mod player;
pub mod rng;

pub use error::{GameError, SearchError};
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::GameRng;
