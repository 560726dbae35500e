//! Moves: the turn model and the full-turn move generator.
//!
//! ## Key Types
//!
//! - `SingleMove`: One atomic action (play card, attack, hero power)
//! - `Move`: Ordered actions for one turn; `Move::empty()` passes
//! - `MoveGenerator`: Deduplicated, pruned, capped candidate turns
//! - `LegalActions`: Atomic actions available right now

pub mod generator;
pub mod model;

pub use generator::{
    GeneratorConfig, LegalActions, MoveGenerator, DEFAULT_MAX_CANDIDATES, DEFAULT_MAX_MOVES,
};
pub use model::{Move, MoveBuilder, SingleMove, EMPTY_MOVE};
