//! Piece values and piece-square tables.
//!
//! All tables are defined from White's perspective in LERF order:
//! index 0 = A1, index 7 = H1, index 8 = A2, ..., index 63 = H8.
//! Use [`pst_value`] to look up the value for either color.

use shakmaty::{Color, Role, Square};

/// Material values in centipawns, indexed by [`role_index`]:
/// pawn, knight, bishop, rook, queen, king.
///
/// The king carries no material value; its worth is implicit in mate
/// detection.
pub const PIECE_VALUES: [i32; 6] = [100, 320, 330, 500, 900, 0];

/// All six piece roles, in [`PIECE_VALUES`] order.
pub const ROLES: [Role; 6] = [
    Role::Pawn,
    Role::Knight,
    Role::Bishop,
    Role::Rook,
    Role::Queen,
    Role::King,
];

/// Dense 0..6 index for a piece role.
#[inline]
pub const fn role_index(role: Role) -> usize {
    match role {
        Role::Pawn => 0,
        Role::Knight => 1,
        Role::Bishop => 2,
        Role::Rook => 3,
        Role::Queen => 4,
        Role::King => 5,
    }
}

/// Material value of a piece role in centipawns.
#[inline]
pub const fn piece_value(role: Role) -> i32 {
    PIECE_VALUES[role_index(role)]
}

// ---------------------------------------------------------------------------
// Individual piece-square tables
// ---------------------------------------------------------------------------

#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
    // Rank 1 (indices 0-7) — never used
      0,   0,   0,   0,   0,   0,   0,   0,
    // Rank 2 (indices 8-15)
      5,  10,  10, -20, -20,  10,  10,   5,
    // Rank 3 (indices 16-23)
      5,  -5, -10,   0,   0, -10,  -5,   5,
    // Rank 4 (indices 24-31)
      0,   0,   0,  20,  20,   0,   0,   0,
    // Rank 5 (indices 32-39)
      5,   5,  10,  25,  25,  10,   5,   5,
    // Rank 6 (indices 40-47)
     10,  10,  20,  30,  30,  20,  10,  10,
    // Rank 7 (indices 48-55)
     50,  50,  50,  50,  50,  50,  50,  50,
    // Rank 8 (indices 56-63) — never used
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    // Rank 1 (indices 0-7)
    -50, -40, -30, -30, -30, -30, -40, -50,
    // Rank 2 (indices 8-15)
    -40, -20,   0,   5,   5,   0, -20, -40,
    // Rank 3 (indices 16-23)
    -30,   5,  10,  15,  15,  10,   5, -30,
    // Rank 4 (indices 24-31)
    -30,   0,  15,  20,  20,  15,   0, -30,
    // Rank 5 (indices 32-39)
    -30,   5,  15,  20,  20,  15,   5, -30,
    // Rank 6 (indices 40-47)
    -30,   0,  10,  15,  15,  10,   0, -30,
    // Rank 7 (indices 48-55)
    -40, -20,   0,   0,   0,   0, -20, -40,
    // Rank 8 (indices 56-63)
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
    // Rank 1 (indices 0-7)
    -20, -10, -10, -10, -10, -10, -10, -20,
    // Rank 2 (indices 8-15)
    -10,   5,   0,   0,   0,   0,   5, -10,
    // Rank 3 (indices 16-23)
    -10,  10,  10,  10,  10,  10,  10, -10,
    // Rank 4 (indices 24-31)
    -10,   0,  10,  10,  10,  10,   0, -10,
    // Rank 5 (indices 32-39)
    -10,   5,   5,  10,  10,   5,   5, -10,
    // Rank 6 (indices 40-47)
    -10,   0,   5,  10,  10,   5,   0, -10,
    // Rank 7 (indices 48-55)
    -10,   0,   0,   0,   0,   0,   0, -10,
    // Rank 8 (indices 56-63)
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
    // Rank 1 (indices 0-7)
      0,   0,   0,   5,   5,   0,   0,   0,
    // Rank 2 (indices 8-15)
     -5,   0,   0,   0,   0,   0,   0,  -5,
    // Rank 3 (indices 16-23)
     -5,   0,   0,   0,   0,   0,   0,  -5,
    // Rank 4 (indices 24-31)
     -5,   0,   0,   0,   0,   0,   0,  -5,
    // Rank 5 (indices 32-39)
     -5,   0,   0,   0,   0,   0,   0,  -5,
    // Rank 6 (indices 40-47)
     -5,   0,   0,   0,   0,   0,   0,  -5,
    // Rank 7 (indices 48-55)
      5,  10,  10,  10,  10,  10,  10,   5,
    // Rank 8 (indices 56-63)
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
    // Rank 1 (indices 0-7)
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    // Rank 2 (indices 8-15)
    -10,   0,   5,   0,   0,   0,   0, -10,
    // Rank 3 (indices 16-23)
    -10,   5,   5,   5,   5,   5,   0, -10,
    // Rank 4 (indices 24-31)
      0,   0,   5,   5,   5,   5,   0,  -5,
    // Rank 5 (indices 32-39)
     -5,   0,   5,   5,   5,   5,   0,  -5,
    // Rank 6 (indices 40-47)
    -10,   0,   5,   5,   5,   5,   0, -10,
    // Rank 7 (indices 48-55)
    -10,   0,   0,   0,   0,   0,   0, -10,
    // Rank 8 (indices 56-63)
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

/// King table for the middlegame: rewards castled corners, punishes walks
/// up the board.
#[rustfmt::skip]
const KING_PST: [i32; 64] = [
    // Rank 1 (indices 0-7)
     20,  30,  10,   0,   0,  10,  30,  20,
    // Rank 2 (indices 8-15)
     20,  20,   0,   0,   0,   0,  20,  20,
    // Rank 3 (indices 16-23)
    -10, -20, -20, -20, -20, -20, -20, -10,
    // Rank 4 (indices 24-31)
    -20, -30, -30, -40, -40, -30, -30, -20,
    // Rank 5 (indices 32-39)
    -30, -40, -40, -50, -50, -40, -40, -30,
    // Rank 6 (indices 40-47)
    -30, -40, -40, -50, -50, -40, -40, -30,
    // Rank 7 (indices 48-55)
    -30, -40, -40, -50, -50, -40, -40, -30,
    // Rank 8 (indices 56-63)
    -30, -40, -40, -50, -50, -40, -40, -30,
];

// ---------------------------------------------------------------------------
// Master table and lookup
// ---------------------------------------------------------------------------

/// Piece-square tables indexed `[role_index][square]`, from White's
/// perspective. Use [`pst_value`] rather than indexing this directly, so
/// that color mirroring is handled correctly.
pub static PST: [[i32; 64]; 6] = [
    PAWN_PST,
    KNIGHT_PST,
    BISHOP_PST,
    ROOK_PST,
    QUEEN_PST,
    KING_PST,
];

/// Look up the PST bonus for a piece of the given role and color on `sq`.
///
/// For Black pieces the square is mirrored vertically (`sq ^ 56`), which is
/// the same as `(7 - rank) * 8 + file`.
#[inline]
pub fn pst_value(role: Role, color: Color, sq: Square) -> i32 {
    let idx = match color {
        Color::White => sq as usize,
        Color::Black => sq as usize ^ 56,
    };
    PST[role_index(role)][idx]
}
