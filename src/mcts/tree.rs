//! Arena-based search tree.
//!
//! Uses a flat `Vec<MCTSNode>` with index-based references. A tree is built
//! for one search call and dropped with it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::node::{MCTSNode, NodeId, NodeState};
use super::policy::{best_by_mean, ChildStats};
use crate::core::{PlayerId, PlayerMap};
use crate::moves::Move;

/// Arena-based search tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree {
    nodes: Vec<MCTSNode>,
    root: NodeId,
}

impl MCTSTree {
    /// Create a new tree with a root node.
    #[must_use]
    pub fn new(root_player: PlayerId) -> Self {
        Self::with_capacity(root_player, 1024)
    }

    #[must_use]
    pub fn with_capacity(root_player: PlayerId, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(MCTSNode::root(root_player));
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node, returning its ID.
    pub fn alloc(&mut self, node: MCTSNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn root_node(&self) -> &MCTSNode {
        self.get(self.root)
    }

    /// Store the generated moves of `id` as its unvisited children.
    pub fn expand(&mut self, id: NodeId, moves: impl IntoIterator<Item = Move>) {
        let node = self.get_mut(id);
        node.unvisited.extend(moves);
        node.expanded = true;
    }

    /// Take the next unvisited move of `id` and create its child node.
    ///
    /// The child's player to move is the opponent of the parent's: every
    /// move is a whole turn.
    pub fn visit_next(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.get_mut(id);
        let mv = parent.unvisited.pop_front()?;
        let to_move = parent.to_move.opponent();
        let depth = parent.depth + 1;
        let child = self.alloc(MCTSNode::new(id, Some(mv), to_move, depth));
        self.get_mut(id).visited.push(child);
        Some(child)
    }

    /// Statistics of the visited children of `id`, from `player`'s point of
    /// view.
    #[must_use]
    pub fn child_stats(&self, id: NodeId, player: PlayerId) -> SmallVec<[ChildStats; 8]> {
        self.get(id)
            .visited
            .iter()
            .map(|&child| self.get(child).stats_for(player))
            .collect()
    }

    /// Walk from `leaf` to the root, adding one visit and
    /// `reward * discount^k` per player, where `k` is the distance to the
    /// leaf.
    pub fn backpropagate(&mut self, leaf: NodeId, rewards: &PlayerMap<f64>, discount: f64) {
        let mut current = leaf;
        let mut factor = 1.0;
        while !current.is_none() {
            let node = self.get_mut(current);
            node.visits += 1;
            for player in PlayerId::both() {
                node.total_reward[player] += rewards[player] * factor;
            }
            factor *= discount;
            current = node.parent;
        }
    }

    /// Visited child of `id` with the highest average reward for `player`.
    /// Ties go to the first visited.
    #[must_use]
    pub fn best_child(&self, id: NodeId, player: PlayerId) -> Option<NodeId> {
        let visited = &self.get(id).visited;
        if visited.is_empty() {
            return None;
        }
        let index = best_by_mean(&self.child_stats(id, player));
        visited.get(index).copied()
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MCTSNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let expanded = self.nodes.iter().filter(|n| n.expanded).count();
        let fully_visited = self
            .nodes
            .iter()
            .filter(|n| n.state() == NodeState::FullyVisited)
            .count();
        let pending: usize = self.nodes.iter().map(|n| n.unvisited.len()).sum();

        TreeStats {
            node_count: self.nodes.len(),
            max_depth,
            expanded,
            fully_visited,
            pending,
        }
    }
}

/// Statistics about the search tree.
#[derive(Clone, Debug, Default)]
pub struct TreeStats {
    pub node_count: usize,
    pub max_depth: u16,
    /// Nodes whose moves have been generated.
    pub expanded: usize,
    pub fully_visited: usize,
    /// Generated moves not yet turned into nodes.
    pub pending: usize,
}

impl TreeStats {
    /// Average children per expanded node, counting pending moves.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        if self.expanded == 0 {
            0.0
        } else {
            (self.node_count - 1 + self.pending) as f64 / self.expanded as f64
        }
    }
}
