//! Transposition table with mate-distance normalisation.

use std::collections::HashMap;

use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{Chess, EnPassantMode, Move};

use crate::search::negamax::MATE_THRESHOLD;

/// Polyglot-compatible Zobrist key of a position. Also used for opening
/// book lookups.
pub fn position_key(pos: &Chess) -> u64 {
    pos.zobrist_hash::<Zobrist64>(EnPassantMode::Legal).0
}

/// Bound type stored in a TT entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The stored score is the exact minimax value to the stored depth.
    Exact,
    /// The stored score is a lower bound (a beta cutoff occurred).
    Lower,
    /// The stored score is an upper bound (alpha was never raised).
    Upper,
}

/// One table entry per key; the score is stored node-relative (see
/// [`score_to_tt`]).
#[derive(Debug, Clone)]
pub struct TtEntry {
    pub depth: i32,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

/// Convert a search score to TT-storable form.
///
/// Mate scores are path-dependent: `MATE - ply` changes with the search
/// path. They are stored as distance-from-node instead of
/// distance-from-root so they stay correct wherever the node is reached.
pub fn score_to_tt(score: i32, ply: i32) -> i32 {
    if score > MATE_THRESHOLD {
        score + ply
    } else if score < -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

/// Convert a TT-stored score back to search-usable form, reversing the
/// adjustment applied by [`score_to_tt`].
pub fn score_from_tt(score: i32, ply: i32) -> i32 {
    if score > MATE_THRESHOLD {
        score - ply
    } else if score < -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

/// Always-replace transposition table keyed by Zobrist hash.
///
/// Cleared at the start of every search and at `ucinewgame`.
pub struct TranspositionTable {
    entries: HashMap<u64, TtEntry>,
}

impl TranspositionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Drop all entries, keeping the allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Probe for a cutoff at `depth` within the `[alpha, beta]` window.
    ///
    /// Returns the usable score and the stored move when the entry is deep
    /// enough and its bound permits:
    /// - `Exact` always cuts;
    /// - `Lower` raises alpha, `Upper` lowers beta, and either cuts once
    ///   the window closes (`alpha >= beta`).
    ///
    /// On a miss the caller may still fetch the stored move for ordering
    /// via [`hash_move`](Self::hash_move).
    pub fn probe(
        &self,
        key: u64,
        depth: i32,
        mut alpha: i32,
        mut beta: i32,
        ply: i32,
    ) -> Option<(i32, Option<Move>)> {
        let entry = self.entries.get(&key)?;
        if entry.depth < depth {
            return None;
        }

        let value = score_from_tt(entry.score, ply);
        match entry.bound {
            Bound::Exact => return Some((value, entry.best_move.clone())),
            Bound::Lower => alpha = alpha.max(value),
            Bound::Upper => beta = beta.min(value),
        }
        if alpha >= beta {
            Some((value, entry.best_move.clone()))
        } else {
            None
        }
    }

    /// The stored best move for `key`, ignoring depth. Used as the hash
    /// move when ordering.
    pub fn hash_move(&self, key: u64) -> Option<Move> {
        self.entries.get(&key)?.best_move.clone()
    }

    /// Store a search result, replacing any existing entry.
    ///
    /// The bound is classified against the alpha the node was entered with
    /// (`alpha_orig`) and beta: `value <= alpha_orig` is an upper bound,
    /// `value >= beta` a lower bound, anything between is exact.
    pub fn store(
        &mut self,
        key: u64,
        depth: i32,
        best_move: Option<Move>,
        value: i32,
        alpha_orig: i32,
        beta: i32,
        ply: i32,
    ) {
        let bound = if value <= alpha_orig {
            Bound::Upper
        } else if value >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.entries.insert(
            key,
            TtEntry {
                depth,
                score: score_to_tt(value, ply),
                bound,
                best_move,
            },
        );
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}
