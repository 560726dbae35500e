//! # ccg-search
//!
//! Monte Carlo search agents for a two-player, turn-based collectible card
//! game with hidden information.
//!
//! ## Design Principles
//!
//! 1. **Whole-Turn Moves**: A move is every action a player takes in one
//!    turn. The search tree alternates players on each edge.
//!
//! 2. **Cheap Boards**: Boards clone in O(1) via `im` persistent vectors, so
//!    every rollout and every branch works on a private copy.
//!
//! 3. **Pluggable Policies**: Tree policy, rollout policy and budget are
//!    trait objects chosen at construction.
//!
//! ## Architecture
//!
//! - **Move Generator**: Breadth-first enumeration of turns, deduplicated by
//!   resulting board, pruned and capped by a board heuristic.
//!
//! - **MCS**: Flat Monte Carlo with a lethal short-circuit.
//!
//! - **MCTS**: Determinized tree search with atomically shared root
//!   statistics.
//!
//! ## Modules
//!
//! - `core`: Players, RNG, errors
//! - `cards`: Card definitions and the basic card set
//! - `board`: Game state, rules, heuristic and determinization
//! - `moves`: Move model and move generator
//! - `rollout`: Random, expert and blended rollout policies
//! - `mcts`: Tree, budgets, policies and the two search agents

pub mod board;
pub mod cards;
pub mod core;
pub mod mcts;
pub mod moves;
pub mod rollout;

// Re-export commonly used types
pub use crate::core::{GameError, GameRng, PlayerId, PlayerMap, SearchError};

pub use crate::cards::{CardDefinition, CardId, CardRegistry};

pub use crate::board::{Board, BoardBuilder, Character, HeroPower, HeuristicWeights};

pub use crate::moves::{Move, MoveBuilder, MoveGenerator, SingleMove, EMPTY_MOVE};

pub use crate::rollout::{DefaultPolicy, RolloutKind};

pub use crate::mcts::{
    Budget, BudgetConfig, MCSAgent, MCTSAgent, SearchAgent, SearchConfig, SearchStats,
    TreePolicy, Ucb1,
};
