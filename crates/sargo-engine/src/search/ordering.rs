//! Move ordering.
//!
//! Scores fall into bands so that categories never overlap:
//! - hash move:            1,000,000
//! - captures (MVV-LVA):     900,000 + 10 * victim - attacker
//! - killer moves:           800,000
//! - quiet moves:              1,000 + history score
//!
//! Sorting is stable, so moves within a band keep generation order.

use std::cmp::Reverse;

use shakmaty::{Move, MoveList};

use crate::eval::pst::piece_value;
use crate::search::heuristics::{HistoryTable, KillerTable};

const HASH_MOVE_SCORE: i32 = 1_000_000;
const CAPTURE_SCORE: i32 = 900_000;
const KILLER_SCORE: i32 = 800_000;
const QUIET_SCORE: i32 = 1_000;

/// MVV-LVA score: prefer valuable victims, then cheap attackers. The
/// en-passant victim is a pawn (`Move::capture` already says so).
fn mvv_lva(mv: &Move) -> i32 {
    let victim = mv.capture().map_or(0, piece_value);
    let attacker = piece_value(mv.role());
    10 * victim - attacker
}

fn score_move(
    mv: &Move,
    ply: usize,
    hash_move: Option<&Move>,
    killers: &KillerTable,
    history: &HistoryTable,
) -> i32 {
    if hash_move == Some(mv) {
        HASH_MOVE_SCORE
    } else if mv.is_capture() {
        CAPTURE_SCORE + mvv_lva(mv)
    } else if killers.is_killer(ply, mv) {
        KILLER_SCORE
    } else {
        QUIET_SCORE + history.score(mv)
    }
}

/// Order `moves` for the main search, best candidates first.
///
/// Uses only static move properties and the tables passed in; the position
/// is never touched.
pub fn order_moves(
    moves: &MoveList,
    ply: usize,
    hash_move: Option<&Move>,
    killers: &KillerTable,
    history: &HistoryTable,
) -> Vec<Move> {
    let mut ordered: Vec<Move> = moves.iter().cloned().collect();
    ordered.sort_by_key(|mv| Reverse(score_move(mv, ply, hash_move, killers, history)));
    ordered
}

/// Captures only, MVV-LVA order, for quiescence.
pub fn order_captures(moves: &MoveList) -> Vec<Move> {
    let mut captures: Vec<Move> = moves.iter().filter(|m| m.is_capture()).cloned().collect();
    captures.sort_by_key(|mv| Reverse(mvv_lva(mv)));
    captures
}
