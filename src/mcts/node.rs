//! Search tree nodes.
//!
//! Nodes live in the `MCTSTree` arena and refer to each other by `NodeId`.
//! A node stores the move that led to it, never a board: boards are rebuilt
//! by replaying moves from the root on a private clone.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::policy::ChildStats;
use crate::core::{PlayerId, PlayerMap};
use crate::moves::Move;

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// Lifecycle of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeState {
    /// Children not generated yet.
    Unexpanded,
    /// Some generated children have never been visited.
    Expanded,
    /// Every child has been visited at least once.
    FullyVisited,
}

/// A node in the search tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode {
    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Move that led here (`None` at the root).
    pub mv: Option<Move>,

    /// Player to move at this node.
    pub to_move: PlayerId,

    /// Depth in tree (root = 0).
    pub depth: u16,

    pub visits: u32,

    /// Discounted reward accumulated for each player.
    pub total_reward: PlayerMap<f64>,

    /// Generated but never visited moves, in generation order.
    pub unvisited: VecDeque<Move>,

    /// Children in the order they were first visited.
    pub visited: SmallVec<[NodeId; 8]>,

    pub expanded: bool,

    /// Slot in the shared root statistics, for children of a determinized
    /// root.
    pub root_index: Option<usize>,
}

impl MCTSNode {
    #[must_use]
    pub fn new(parent: NodeId, mv: Option<Move>, to_move: PlayerId, depth: u16) -> Self {
        Self {
            parent,
            mv,
            to_move,
            depth,
            visits: 0,
            total_reward: PlayerMap::with_value(0.0),
            unvisited: VecDeque::new(),
            visited: SmallVec::new(),
            expanded: false,
            root_index: None,
        }
    }

    #[must_use]
    pub fn root(to_move: PlayerId) -> Self {
        Self::new(NodeId::NONE, None, to_move, 0)
    }

    #[must_use]
    pub fn state(&self) -> NodeState {
        if !self.expanded {
            NodeState::Unexpanded
        } else if self.unvisited.is_empty() {
            NodeState::FullyVisited
        } else {
            NodeState::Expanded
        }
    }

    /// Average reward for `player`, 0 when unvisited.
    #[must_use]
    pub fn mean_reward(&self, player: PlayerId) -> f64 {
        self.stats_for(player).mean()
    }

    /// Visits and accumulated reward from `player`'s point of view.
    #[must_use]
    pub fn stats_for(&self, player: PlayerId) -> ChildStats {
        ChildStats {
            visits: self.visits,
            reward: self.total_reward[player],
        }
    }
}
