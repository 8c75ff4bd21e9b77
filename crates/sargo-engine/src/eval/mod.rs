//! Static evaluation.
//!
//! [`evaluate`] scores a position from the side-to-move's point of view
//! (positive = good for the side to move). Internally the terms are summed
//! in White's frame and the sign is flipped at the end.

pub mod king_safety;
pub mod pawns;
pub mod pst;

use shakmaty::{Bitboard, Chess, Color, MoveList, Position, Role};

use crate::search::negamax::MATE;

use king_safety::king_safety;
use pawns::pawn_structure;
use pst::{ROLES, piece_value, pst_value};

/// Bonus for owning both bishops.
const BISHOP_PAIR_BONUS: i32 = 30;

/// Centipawns per legal move for the side to move.
const MOBILITY_WEIGHT: i32 = 5;

/// Bitboard of one file, 0 = a-file through 7 = h-file.
#[inline]
pub(crate) fn file_mask(file: i32) -> Bitboard {
    Bitboard(0x0101_0101_0101_0101u64 << file)
}

/// Score `pos` from the side-to-move's perspective.
///
/// `moves` must be the legal moves of `pos`; an empty list means checkmate
/// (scored `-(MATE - ply_from_root)`, so nearer mates weigh more) or
/// stalemate (scored 0). The evaluation never mutates the position, which
/// keeps transposition-table entries sound.
pub fn evaluate(pos: &Chess, ply_from_root: i32, moves: &MoveList) -> i32 {
    if moves.is_empty() {
        return if pos.is_check() {
            -(MATE - ply_from_root)
        } else {
            0
        };
    }

    let board = pos.board();
    let mut score = 0;

    // Material and piece-square terms.
    for color in [Color::White, Color::Black] {
        let sign = if color == Color::White { 1 } else { -1 };
        let side = board.by_color(color);
        for role in ROLES {
            let value = piece_value(role);
            for sq in board.by_role(role) & side {
                score += sign * (value + pst_value(role, color, sq));
            }
        }
        if (board.by_role(Role::Bishop) & side).count() >= 2 {
            score += sign * BISHOP_PAIR_BONUS;
        }
    }

    score += pawn_structure(board, Color::White);
    score -= pawn_structure(board, Color::Black);

    score -= king_safety(board, Color::White);
    score += king_safety(board, Color::Black);

    // Mobility is credited to the side whose moves we were handed.
    let stm_sign = if pos.turn() == Color::White { 1 } else { -1 };
    score += stm_sign * MOBILITY_WEIGHT * moves.len() as i32;

    if pos.turn() == Color::Black {
        score = -score;
    }
    score
}

#[cfg(test)]
mod tests {
    use shakmaty::CastlingMode;
    use shakmaty::fen::Fen;

    use super::*;

    fn position(fen: &str) -> Chess {
        fen.parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap()
    }

    fn eval(fen: &str) -> i32 {
        let pos = position(fen);
        let moves = pos.legal_moves();
        evaluate(&pos, 0, &moves)
    }

    #[test]
    fn startpos_scores_only_mobility() {
        // Everything else cancels by symmetry; White has 20 legal moves.
        assert_eq!(eval("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"), 100);
    }

    #[test]
    fn startpos_symmetric_for_black() {
        // Same structure with Black to move: same score from Black's view.
        assert_eq!(eval("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1"), 100);
    }

    #[test]
    fn extra_queen_dominates() {
        let up = eval("4k3/8/8/8/8/8/8/QQQQK3 w - - 0 1");
        assert!(up > 2000, "three extra queens should score huge, got {up}");
    }

    #[test]
    fn material_deficit_is_negative_for_side_to_move() {
        // Black to move, down a rook.
        let score = eval("4k3/8/8/8/8/8/8/R3K3 b - - 0 1");
        assert!(score < 0, "side down a rook should be negative, got {score}");
    }

    #[test]
    fn checkmate_scores_mate_minus_ply() {
        // Back-rank mate: black king h8, white rook a8, white king g6.
        let pos = position("R6k/8/6K1/8/8/8/8/8 b - - 0 1");
        let moves = pos.legal_moves();
        assert!(moves.is_empty());
        assert_eq!(evaluate(&pos, 0, &moves), -MATE);
        assert_eq!(evaluate(&pos, 3, &moves), -(MATE - 3));
    }

    #[test]
    fn stalemate_scores_zero() {
        let pos = position("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");
        let moves = pos.legal_moves();
        assert!(moves.is_empty());
        assert_eq!(evaluate(&pos, 0, &moves), 0);
    }

    #[test]
    fn bishop_pair_counts_once_per_side() {
        // White: two bishops. Black: bishop and knight. Identical PST rows.
        let with_pair = eval("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1");
        let without = eval("4k3/8/8/8/8/8/8/2B1KN2 w - - 0 1");
        // Bishop (330) vs knight (320) plus the pair bonus (30), with PST
        // and mobility differences on top; the pair side must be ahead.
        assert!(
            with_pair > without,
            "pair {with_pair} should beat no-pair {without}"
        );
    }

    #[test]
    fn mirrored_position_evaluates_equally() {
        // A position and its color-mirror must agree from the movers' views.
        let white_view = eval("4k3/8/8/8/8/2N5/PPP5/4K3 w - - 0 1");
        let black_view = eval("4k3/ppp5/2n5/8/8/8/8/4K3 b - - 0 1");
        assert_eq!(white_view, black_view);
    }
}
