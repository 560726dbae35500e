//! Board Adapter and reference game engine.
//!
//! The search core only needs a handful of things from the game: a cheap,
//! independent clone; legal-action queries; applying actions and whole moves;
//! the terminal test and score; and the end-of-turn transition. `Board`
//! provides all of them for a compact two-player card game:
//!
//! - Heroes with health, armor, weapons and a once-per-turn hero power
//! - Mana crystals (max 10), hand (max 10, overdraw burns), deck with fatigue
//! - Minions (max 7 per side) with taunt, charge, stealth, divine shield and
//!   spell damage
//! - Spells: damage, area damage, heal, draw, buff, armor; secrets are
//!   tracked but never trigger
//!
//! ## Key Types
//!
//! - `Board`: Complete game state with rules, fingerprint, heuristic and
//!   determinization
//! - `BoardBuilder`: Test positions and standard openings
//! - `Character`: Attack/target reference (hero or minion)

pub mod builder;
pub mod character;
pub mod heuristic;
pub mod rules;
pub mod state;

pub use builder::BoardBuilder;
pub use character::{
    Character, Hero, HeroPower, Minion, MinionId, Weapon, HERO_POWER_COST, STARTING_HEALTH,
};
pub use heuristic::{HeuristicWeights, LETHAL_VALUE};
pub use state::{Board, BoardFingerprint, PlayerSide, MAX_HAND_SIZE, MAX_MANA, MAX_MINIONS};
