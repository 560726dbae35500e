//! Determinized Monte Carlo Tree Search.
//!
//! Hidden information is handled by sampling: each search builds several
//! determinized copies of the board (the acting player's deck reshuffled,
//! the opponent's hand and deck redealt) and searches every copy on the
//! pool with its own private tree and budget.
//!
//! The root moves are generated once from the real board, so the root
//! children line up across all trees. Their statistics live in one
//! `SharedRootStats`: root selection reads the aggregate, and every
//! iteration adds its reward there atomically. Below the root each tree is
//! independent and nodes keep rewards for both players, selecting from the
//! point of view of the player to move.

use std::time::Instant;

use log::{debug, error, trace};
use rayon::ThreadPool;

use super::agent::{advance, build_pool, simulate, terminal_rewards, SearchAgent};
use super::budget::BudgetConfig;
use super::config::SearchConfig;
use super::node::NodeId;
use super::policy::{TreePolicy, Ucb1};
use super::shared::SharedRootStats;
use super::stats::{SearchCounters, SearchStats};
use super::tree::MCTSTree;
use crate::board::Board;
use crate::core::{GameRng, PlayerId, SearchError};
use crate::moves::{Move, MoveGenerator};
use crate::rollout::DefaultPolicy;

/// Monte Carlo Tree Search agent over determinized boards.
pub struct MCTSAgent {
    config: SearchConfig,

    generator: MoveGenerator,

    /// Rollout policy.
    rollout: Box<dyn DefaultPolicy>,

    /// Selection policy, used at the shared root and inside each tree.
    tree_policy: Box<dyn TreePolicy>,

    /// `None` once closed.
    pool: Option<ThreadPool>,

    rng: GameRng,

    stats: SearchStats,
}

impl MCTSAgent {
    /// Validate `config` and start the worker pool.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let pool = build_pool(config.workers, "mcts")?;

        Ok(Self {
            generator: MoveGenerator::with_config(config.generator.clone()),
            rollout: config.rollout.build(),
            tree_policy: Box::new(Ucb1::new(config.exploration)),
            pool: Some(pool),
            rng: GameRng::new(config.seed),
            stats: SearchStats::default(),
            config,
        })
    }

    /// Set a custom rollout policy.
    pub fn with_default_policy<P: DefaultPolicy + 'static>(mut self, policy: P) -> Self {
        self.rollout = Box::new(policy);
        self
    }

    /// Set a custom tree policy.
    pub fn with_tree_policy<P: TreePolicy + 'static>(mut self, policy: P) -> Self {
        self.tree_policy = Box::new(policy);
        self
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl SearchAgent for MCTSAgent {
    fn search(&mut self, board: &Board) -> Result<Move, SearchError> {
        let start = Instant::now();
        self.stats.reset();

        let pool = self.pool.as_ref().ok_or(SearchError::Closed)?;
        if board.is_game_over() {
            return Err(SearchError::GameOver);
        }

        let me = board.current_player();
        let moves = self.generator.generate(board);
        self.stats.candidate_moves = moves.len() as u32;

        if moves.is_empty() {
            error!("no candidate moves for {me} on {board}");
            return Err(SearchError::NoCandidateMoves);
        }

        // Wins are decided by visible state, so any determinization agrees.
        if let Some(mv) = moves.iter().find(|mv| {
            let mut after = board.clone();
            after.apply_moves(mv, false);
            after.has_won(me)
        }) {
            debug!("lethal found: {mv}");
            self.stats.lethal_found = true;
            self.stats.time_us = start.elapsed().as_micros() as u64;
            return Ok(mv.clone());
        }

        if moves.len() == 1 {
            self.stats.time_us = start.elapsed().as_micros() as u64;
            return Ok(moves.into_iter().next().unwrap_or_default());
        }

        let samples: Vec<(Board, GameRng)> = (0..self.config.determinizations)
            .map(|_| {
                let mut rng = self.rng.fork();
                let mut sample = board.clone();
                sample.determinize(&mut rng);
                (sample, rng)
            })
            .collect();
        self.stats.determinizations = samples.len() as u32;

        let shared = SharedRootStats::new(moves.len());
        let counters = SearchCounters::default();
        let worker = Worker {
            me,
            root_moves: &moves,
            shared: &shared,
            counters: &counters,
            generator: &self.generator,
            rollout: self.rollout.as_ref(),
            tree_policy: self.tree_policy.as_ref(),
            budget: self.config.budget,
            discount: self.config.discount,
            turn_penalty: self.config.turn_penalty,
        };

        debug!(
            "searching {} determinizations of {} candidates for {me}",
            samples.len(),
            moves.len()
        );
        pool.scope(|s| {
            for (sample, rng) in samples {
                let worker = &worker;
                s.spawn(move |_| worker.run(sample, rng));
            }
        });

        counters.fold_into(&mut self.stats);
        self.stats.time_us = start.elapsed().as_micros() as u64;

        let best = shared.best_index();
        let mv = moves.into_iter().nth(best).unwrap_or_default();
        debug!("chose {mv} after {}", self.stats);
        Ok(mv)
    }

    fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn close(&mut self) {
        if self.pool.take().is_some() {
            debug!("MCTS agent closed");
        }
    }
}

/// Read-only context shared by the determinization workers.
struct Worker<'a> {
    me: PlayerId,
    root_moves: &'a [Move],
    shared: &'a SharedRootStats,
    counters: &'a SearchCounters,
    generator: &'a MoveGenerator,
    rollout: &'a dyn DefaultPolicy,
    tree_policy: &'a dyn TreePolicy,
    budget: BudgetConfig,
    discount: f64,
    turn_penalty: f64,
}

impl Worker<'_> {
    /// Search one determinized board until its budget runs out.
    fn run(&self, sample: Board, mut rng: GameRng) {
        let mut tree = MCTSTree::new(self.me);
        let root = tree.root();
        tree.expand(root, self.root_moves.iter().cloned());
        let mut index = 0;
        while let Some(child) = tree.visit_next(root) {
            tree.get_mut(child).root_index = Some(index);
            index += 1;
        }

        let budget = self.budget.build();
        budget.start_search();
        while budget.claim_iteration() {
            self.iterate(&mut tree, &sample, &mut rng);
        }
        trace!("determinization done: {:?}", tree.stats());
    }

    /// Select, expand, simulate and backpropagate once.
    fn iterate(&self, tree: &mut MCTSTree, sample: &Board, rng: &mut GameRng) {
        let root = tree.root();
        let index = self
            .tree_policy
            .select(self.shared.total_visits(), &self.shared.snapshot());
        let Some(&first) = tree.get(root).visited.get(index) else {
            return;
        };

        let mut sim = sample.clone();
        if let Some(mv) = &tree.get(first).mv {
            advance(&mut sim, mv, false);
        }
        let leaf = self.descend(tree, first, &mut sim);

        let rewards = if sim.is_game_over() {
            terminal_rewards(&sim, self.turn_penalty)
        } else {
            self.counters.simulation();
            simulate(&mut sim, self.rollout, rng, self.turn_penalty)
        };
        tree.backpropagate(leaf, &rewards, self.discount);

        let root_index = tree.get(first).root_index.unwrap_or(index);
        let plies = i32::from(tree.get(leaf).depth) - 1;
        self.shared
            .record(root_index, rewards[self.me] * self.discount.powi(plies));
        self.counters.iteration();
    }

    /// Walk down from `node`, applying moves to `sim`, until reaching a new
    /// child or a finished game. Returns the leaf.
    fn descend(&self, tree: &mut MCTSTree, mut node: NodeId, sim: &mut Board) -> NodeId {
        while !sim.is_game_over() {
            if !tree.get(node).expanded {
                let moves = self.generator.generate(sim);
                tree.expand(node, moves);
            }

            if let Some(child) = tree.visit_next(node) {
                self.counters.expanded();
                if let Some(mv) = &tree.get(child).mv {
                    advance(sim, mv, false);
                }
                return child;
            }

            let current = tree.get(node);
            let children = tree.child_stats(node, current.to_move);
            let index = self.tree_policy.select(current.visits, &children);
            let Some(&child) = current.visited.get(index) else {
                break;
            };
            if let Some(mv) = &tree.get(child).mv {
                advance(sim, mv, false);
            }
            node = child;
        }
        node
    }
}
