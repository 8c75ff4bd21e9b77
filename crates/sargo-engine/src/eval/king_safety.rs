//! King safety: pawn shield and open files around the king.
//!
//! Returns a *penalty* (positive = the king is unsafe); the caller
//! subtracts it from the side's score.

use shakmaty::{Board, Color, Role, Square};

use crate::eval::file_mask;

/// Penalty per missing pawn-shield square in front of the king.
const MISSING_SHIELD_PENALTY: i32 = 15;

/// Penalty for a fully open file on or next to the king's file.
const OPEN_FILE_PENALTY: i32 = 20;

/// Penalty for a semi-open file (own pawns gone, opponent pawns remain).
const SEMI_OPEN_FILE_PENALTY: i32 = 10;

/// King-safety penalty for `color`.
///
/// Checks the three shield squares on the rank immediately in front of the
/// king and the three files around it. Squares off the board are skipped.
pub fn king_safety(board: &Board, color: Color) -> i32 {
    let Some(king_sq) = board.king_of(color) else {
        return 0;
    };
    let kfile = king_sq as i32 % 8;
    let krank = king_sq as i32 / 8;

    let mut penalty = 0;

    // Pawn shield on the rank in front of the king.
    let shield_rank = match color {
        Color::White => krank + 1,
        Color::Black => krank - 1,
    };
    for df in -1..=1 {
        let f = kfile + df;
        if !(0..8).contains(&f) || !(0..8).contains(&shield_rank) {
            continue;
        }
        let sq = Square::new((shield_rank * 8 + f) as u32);
        let shielded = board
            .piece_at(sq)
            .is_some_and(|p| p.role == Role::Pawn && p.color == color);
        if !shielded {
            penalty += MISSING_SHIELD_PENALTY;
        }
    }

    // Open and semi-open files around the king.
    for df in -1..=1 {
        let f = kfile + df;
        if !(0..8).contains(&f) {
            continue;
        }
        let own = board.by_role(Role::Pawn) & board.by_color(color) & file_mask(f);
        let opp = board.by_role(Role::Pawn) & board.by_color(!color) & file_mask(f);
        if own.is_empty() {
            penalty += if opp.is_empty() {
                OPEN_FILE_PENALTY
            } else {
                SEMI_OPEN_FILE_PENALTY
            };
        }
    }

    penalty
}
