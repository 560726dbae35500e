//! Monte Carlo search agents.
//!
//! ## Overview
//!
//! Two agents pick the move (a whole turn) for the player to move:
//!
//! - **`MCSAgent`**: Flat Monte Carlo over the candidate moves. Every
//!   candidate is rolled out once, an immediate win short-circuits the
//!   search, and the rest of the budget goes to UCB1-guided rollouts.
//! - **`MCTSAgent`**: Full tree search over several determinized boards,
//!   with root statistics shared between the trees through atomics.
//!
//! Both run on their own fixed-size rayon pool, stop on a pluggable
//! `Budget`, and use a `TreePolicy` (UCB1 by default) and a rollout
//! `DefaultPolicy` from `crate::rollout`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ccg_search::board::{BoardBuilder, HeroPower};
//! use ccg_search::cards::CardRegistry;
//! use ccg_search::core::GameRng;
//! use ccg_search::mcts::{BudgetConfig, MCTSAgent, SearchAgent, SearchConfig};
//!
//! let registry = CardRegistry::basic();
//! let mut rng = GameRng::new(1);
//! let board = BoardBuilder::standard(
//!     &registry,
//!     [HeroPower::Fireblast, HeroPower::SteadyShot],
//!     &mut rng,
//! )
//! .build();
//!
//! let config = SearchConfig::default().with_budget(BudgetConfig::Time { millis: 200 });
//! let mut agent = MCTSAgent::new(config).unwrap();
//! let mv = agent.search(&board).unwrap();
//! println!("Best move: {mv}");
//! println!("{}", agent.stats());
//! ```

pub mod agent;
pub mod budget;
pub mod config;
pub mod mcs;
pub mod node;
pub mod policy;
pub mod search;
pub mod shared;
pub mod stats;
pub mod tree;

// Re-export main types
pub use agent::SearchAgent;
pub use budget::{Budget, BudgetConfig, IterCountBudget, TimeBudget};
pub use config::SearchConfig;
pub use mcs::MCSAgent;
pub use node::{MCTSNode, NodeId, NodeState};
pub use policy::{best_by_mean, ChildStats, TreePolicy, Ucb1};
pub use search::MCTSAgent;
pub use shared::{AtomicF64, SharedRootStats};
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
