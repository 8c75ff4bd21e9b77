//! Iterative-deepening search driver.

pub mod control;
pub mod heuristics;
pub mod negamax;
pub mod ordering;
pub mod tt;

use shakmaty::{Chess, Move, Position};
use tracing::debug;

use control::SearchControl;
use heuristics::{HistoryTable, KillerTable};
use negamax::{MATE, SearchContext, negamax_root};
use tt::TranspositionTable;

/// Result of a completed search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found at the deepest completed iteration; `None` only
    /// when the root has no legal moves.
    pub best_move: Option<Move>,
    /// Score of the best move in centipawns, from the engine's view.
    pub score: i32,
    /// Deepest fully completed iteration.
    pub depth: i32,
    /// Total nodes visited.
    pub nodes: u64,
}

/// Iterative-deepening searcher owning the transposition table.
pub struct Searcher {
    tt: TranspositionTable,
}

impl Searcher {
    /// Create a fresh searcher.
    pub fn new() -> Self {
        Self {
            tt: TranspositionTable::new(),
        }
    }

    /// Clear the transposition table (`ucinewgame`).
    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    /// Search `pos` by iterative deepening up to `max_depth` under
    /// `control`'s clock.
    ///
    /// `prev_keys` are the Zobrist keys of the positions played before
    /// `pos` in the game, oldest first; they feed repetition detection.
    /// Calls `on_iter(depth, score, nodes)` after each completed
    /// iteration, so the caller can emit UCI `info` lines.
    ///
    /// The returned move is always taken from the root legal move list:
    /// an iteration that was cut short, or a stale table move, can never
    /// leak out.
    pub fn find_best_move<F>(
        &mut self,
        pos: &Chess,
        prev_keys: &[u64],
        max_depth: i32,
        control: &SearchControl,
        mut on_iter: F,
    ) -> SearchResult
    where
        F: FnMut(i32, i32, u64),
    {
        // Fresh tables per search: killers and history always, and the
        // transposition table per the always-clear policy.
        self.tt.clear();
        let mut ctx = SearchContext {
            nodes: 0,
            control,
            tt: &mut self.tt,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            prev_keys: prev_keys.to_vec(),
        };

        let legal = pos.legal_moves();
        if legal.is_empty() {
            return SearchResult {
                best_move: None,
                score: 0,
                depth: 0,
                nodes: 0,
            };
        }

        let mut best = legal[0].clone();
        let mut best_score = 0;
        let mut completed_depth = 0;

        for depth in 1..=max_depth {
            let (score, mv) = negamax_root(&mut ctx, pos, depth, -MATE, MATE);

            if control.timed_out() {
                debug!(depth, "iteration interrupted, keeping previous best move");
                break;
            }

            // Accept the iteration only if it produced a genuine root move.
            match mv {
                Some(mv) if legal.contains(&mv) => {
                    best = mv;
                    best_score = score;
                    completed_depth = depth;
                    on_iter(depth, score, ctx.nodes);
                }
                _ => break,
            }

            if control.should_stop_iterating() {
                debug!(depth, "time nearly spent, not starting next iteration");
                break;
            }
        }

        SearchResult {
            best_move: Some(best),
            score: best_score,
            depth: completed_depth,
            nodes: ctx.nodes,
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}
