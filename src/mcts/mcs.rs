//! Flat Monte Carlo search over the current turn's moves.
//!
//! The tree is one level deep: the root and one child per candidate move.
//! Every root child is rolled out once (phase 1), then the remaining budget
//! is spent on UCB1-guided rollouts (phase 2). All workers share the tree
//! behind a mutex; boards are cloned per rollout and never shared.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{debug, error};
use parking_lot::Mutex;
use rayon::ThreadPool;

use super::agent::{advance, build_pool, simulate, terminal_rewards, SearchAgent};
use super::config::SearchConfig;
use super::node::NodeId;
use super::policy::{TreePolicy, Ucb1};
use super::stats::{SearchCounters, SearchStats};
use super::tree::MCTSTree;
use crate::board::Board;
use crate::core::{GameRng, PlayerId, SearchError};
use crate::moves::{Move, MoveGenerator};
use crate::rollout::DefaultPolicy;

/// Monte Carlo search agent.
///
/// ```no_run
/// use ccg_search::board::{BoardBuilder, HeroPower};
/// use ccg_search::cards::CardRegistry;
/// use ccg_search::core::GameRng;
/// use ccg_search::mcts::{MCSAgent, SearchAgent, SearchConfig};
///
/// let registry = CardRegistry::basic();
/// let mut rng = GameRng::new(7);
/// let board = BoardBuilder::standard(
///     &registry,
///     [HeroPower::Fireblast, HeroPower::ArmorUp],
///     &mut rng,
/// )
/// .build();
///
/// let mut agent = MCSAgent::new(SearchConfig::default()).unwrap();
/// let mv = agent.search(&board).unwrap();
/// println!("{mv} ({})", agent.stats());
/// agent.close();
/// ```
pub struct MCSAgent {
    config: SearchConfig,

    generator: MoveGenerator,

    /// Rollout policy.
    rollout: Box<dyn DefaultPolicy>,

    /// Selection among root children in phase 2.
    tree_policy: Box<dyn TreePolicy>,

    /// `None` once closed.
    pool: Option<ThreadPool>,

    rng: GameRng,

    stats: SearchStats,
}

impl MCSAgent {
    /// Validate `config` and start the worker pool.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let pool = build_pool(config.workers, "mcs")?;

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

impl SearchAgent for MCSAgent {
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

        if moves.len() <= 1 {
            self.stats.time_us = start.elapsed().as_micros() as u64;
            return moves.into_iter().next().ok_or_else(|| {
                error!("no candidate moves for {me} on {board}");
                SearchError::NoCandidateMoves
            });
        }

        let mut tree = MCTSTree::new(me);
        let root = tree.root();
        tree.expand(root, moves);

        let run = Run {
            board,
            me,
            root,
            tree: Mutex::new(tree),
            lethal: Mutex::new(None),
            cancel: AtomicBool::new(false),
            counters: SearchCounters::default(),
            rollout: self.rollout.as_ref(),
            tree_policy: self.tree_policy.as_ref(),
            discount: self.config.discount,
            turn_penalty: self.config.turn_penalty,
        };
        let mut rngs = self.rng.fork_many(self.config.workers);

        // === Phase 1: one rollout per root child ===
        debug!("phase 1: {} candidates for {me}", self.stats.candidate_moves);
        pool.scope(|s| {
            for rng in rngs.iter_mut() {
                let run = &run;
                s.spawn(move |_| run.visit_all(rng));
            }
        });

        let lethal = *run.lethal.lock();
        if let Some(child) = lethal {
            run.counters.fold_into(&mut self.stats);
            self.stats.lethal_found = true;
            self.stats.time_us = start.elapsed().as_micros() as u64;
            let tree = run.tree.into_inner();
            let mv = tree.get(child).mv.clone().unwrap_or_default();
            debug!("lethal found: {mv}");
            return Ok(mv);
        }

        // === Phase 2: budgeted UCB1 rollouts ===
        let budget = self.config.budget.build();
        budget.start_search();
        debug!("phase 2: budget {:?}", self.config.budget);
        pool.scope(|s| {
            for rng in rngs.iter_mut() {
                let run = &run;
                let budget = budget.as_ref();
                s.spawn(move |_| {
                    while budget.claim_iteration() {
                        if !run.select_and_simulate(rng) {
                            break;
                        }
                    }
                });
            }
        });

        run.counters.fold_into(&mut self.stats);
        self.stats.time_us = start.elapsed().as_micros() as u64;

        let tree = run.tree.into_inner();
        let best = tree
            .best_child(root, me)
            .and_then(|child| tree.get(child).mv.clone());
        match best {
            Some(mv) => {
                debug!("chose {mv} after {}", self.stats);
                Ok(mv)
            }
            None => {
                error!("no visited root child for {me} on {board}");
                Err(SearchError::NoCandidateMoves)
            }
        }
    }

    fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn close(&mut self) {
        if self.pool.take().is_some() {
            debug!("MCS agent closed");
        }
    }
}

/// State shared by the workers of one search call.
struct Run<'a> {
    board: &'a Board,
    me: PlayerId,
    root: NodeId,
    tree: Mutex<MCTSTree>,
    lethal: Mutex<Option<NodeId>>,
    cancel: AtomicBool,
    counters: SearchCounters,
    rollout: &'a dyn DefaultPolicy,
    tree_policy: &'a dyn TreePolicy,
    discount: f64,
    turn_penalty: f64,
}

impl Run<'_> {
    /// Take unvisited root children until none are left or one wins outright.
    fn visit_all(&self, rng: &mut GameRng) {
        while !self.cancel.load(Ordering::Relaxed) {
            let next = {
                let mut tree = self.tree.lock();
                tree.visit_next(self.root)
                    .map(|child| (child, tree.get(child).mv.clone().unwrap_or_default()))
            };
            let Some((child, mv)) = next else {
                break;
            };
            self.counters.expanded();

            let mut sim = self.board.clone();
            sim.apply_moves(&mv, true);
            if sim.has_won(self.me) {
                self.lethal.lock().get_or_insert(child);
                self.cancel.store(true, Ordering::Relaxed);
                break;
            }
            if !sim.is_game_over() {
                sim.end_turn();
            }
            self.finish(child, &mut sim, rng);
        }
    }

    /// One phase-2 iteration. Returns `false` if the root has no children.
    fn select_and_simulate(&self, rng: &mut GameRng) -> bool {
        let selected = {
            let tree = self.tree.lock();
            let children = tree.child_stats(self.root, self.me);
            let index = self
                .tree_policy
                .select(tree.get(self.root).visits, &children);
            tree.get(self.root)
                .visited
                .get(index)
                .map(|&child| (child, tree.get(child).mv.clone().unwrap_or_default()))
        };
        let Some((child, mv)) = selected else {
            return false;
        };

        let mut sim = self.board.clone();
        advance(&mut sim, &mv, true);
        self.finish(child, &mut sim, rng);
        true
    }

    /// Score `sim` (rolling out if needed) and back the result up from
    /// `child`.
    fn finish(&self, child: NodeId, sim: &mut Board, rng: &mut GameRng) {
        let rewards = if sim.is_game_over() {
            terminal_rewards(sim, self.turn_penalty)
        } else {
            self.counters.simulation();
            simulate(sim, self.rollout, rng, self.turn_penalty)
        };
        self.tree
            .lock()
            .backpropagate(child, &rewards, self.discount);
        self.counters.iteration();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardBuilder;
    use crate::cards::{basic, CardRegistry};
    use crate::mcts::BudgetConfig;
    use crate::moves::SingleMove;
    use crate::rollout::RandomPolicy;

    fn small_config() -> SearchConfig {
        SearchConfig::default()
            .with_workers(2)
            .with_budget(BudgetConfig::Iterations(50))
    }

    #[test]
    fn test_single_candidate_returned() {
        let board = BoardBuilder::new().build();
        let mut agent = MCSAgent::new(small_config()).unwrap();

        let mv = agent.search(&board).unwrap();

        assert!(mv.is_empty());
        assert_eq!(agent.stats().candidate_moves, 1);
        assert_eq!(agent.stats().iterations, 0);
    }

    #[test]
    fn test_finds_lethal_before_budget() {
        let registry = CardRegistry::basic();
        let board = BoardBuilder::new()
            .health(PlayerId::SECOND, 1)
            .mana(PlayerId::FIRST, 1)
            .hand(
                PlayerId::FIRST,
                vec![registry.get(basic::STONETUSK_BOAR).unwrap().clone()],
            )
            .build();
        let mut agent = MCSAgent::new(
            small_config().with_budget(BudgetConfig::Iterations(1_000_000_000)),
        )
        .unwrap();

        let mv = agent.search(&board).unwrap();

        let mut after = board.clone();
        after.apply_moves(&mv, false);
        assert!(after.has_won(PlayerId::FIRST));
        assert!(agent.stats().lethal_found);
        assert!(matches!(mv.actions().last(), Some(SingleMove::DirectAttack { .. })));
    }

    #[test]
    fn test_budget_counts_phase_two_only() {
        let registry = CardRegistry::basic();
        let mut rng = GameRng::new(11);
        let board = BoardBuilder::standard(
            &registry,
            [crate::board::HeroPower::Fireblast, crate::board::HeroPower::ArmorUp],
            &mut rng,
        )
        .mana(PlayerId::FIRST, 4)
        .build();
        let mut agent = MCSAgent::new(small_config())
            .unwrap()
            .with_default_policy(RandomPolicy);

        let mv = agent.search(&board);

        assert!(mv.is_ok());
        let stats = agent.stats();
        if !stats.lethal_found && stats.candidate_moves > 1 {
            assert_eq!(stats.iterations, stats.candidate_moves + 50);
        }
    }

    #[test]
    fn test_game_over_rejected() {
        let board = BoardBuilder::new().health(PlayerId::SECOND, 0).build();
        let mut agent = MCSAgent::new(small_config()).unwrap();

        assert!(matches!(agent.search(&board), Err(SearchError::GameOver)));
    }

    #[test]
    fn test_closed_agent_rejects_search() {
        let board = BoardBuilder::new().build();
        let mut agent = MCSAgent::new(small_config()).unwrap();
        agent.close();
        agent.close();

        assert!(matches!(agent.search(&board), Err(SearchError::Closed)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = MCSAgent::new(SearchConfig::default().with_workers(0));
        assert!(matches!(result, Err(SearchError::InvalidConfig(_))));
    }
}
