//! Search agent interface and the simulation steps both agents share.

use log::trace;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::stats::SearchStats;
use crate::board::Board;
use crate::core::{GameRng, PlayerId, PlayerMap, SearchError};
use crate::moves::Move;
use crate::rollout::{play_out, DefaultPolicy};

/// An agent that picks the move to play for the current player.
pub trait SearchAgent {
    /// Search `board` and return the move for `board.current_player()`.
    fn search(&mut self, board: &Board) -> Result<Move, SearchError>;

    /// Statistics of the last `search` call.
    fn stats(&self) -> &SearchStats;

    /// Release the worker pool. Later searches fail with
    /// `SearchError::Closed`.
    fn close(&mut self);
}

/// Build the fixed-size worker pool owned by an agent.
pub(crate) fn build_pool(workers: usize, name: &'static str) -> Result<ThreadPool, SearchError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(move |i| format!("{name}-{i}"))
        .build()?;
    Ok(pool)
}

/// Play a whole turn and hand over to the opponent, unless the move ended
/// the game.
///
/// `log` is forwarded to `Board::apply_moves`. Replays on determinized
/// boards pass `false`: moves generated on another sample are expected to
/// fail there now and then.
pub(crate) fn advance(board: &mut Board, mv: &Move, log: bool) {
    board.apply_moves(mv, log);
    if !board.is_game_over() {
        board.end_turn();
    }
}

/// Terminal score of a finished board for both players.
pub(crate) fn terminal_rewards(board: &Board, turn_penalty: f64) -> PlayerMap<f64> {
    PlayerMap::new(|player| board.score(turn_penalty, player).unwrap_or(0.0))
}

/// Roll `board` out to the end with `policy` and score it.
pub(crate) fn simulate(
    board: &mut Board,
    policy: &dyn DefaultPolicy,
    rng: &mut GameRng,
    turn_penalty: f64,
) -> PlayerMap<f64> {
    let turns = play_out(board, policy, rng);
    let rewards = terminal_rewards(board, turn_penalty);
    trace!(
        "rollout ended after {turns} turns at turn {}: {:.3} / {:.3}",
        board.turn(),
        rewards[PlayerId::FIRST],
        rewards[PlayerId::SECOND]
    );
    rewards
}
