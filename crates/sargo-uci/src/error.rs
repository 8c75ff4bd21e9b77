//! Errors surfaced by the UCI front-end.
//!
//! These cover protocol input only; the search core has no recoverable
//! errors. The engine loop logs these and keeps reading, per the UCI
//! convention that bad input is never fatal.

/// Why a line of UCI input was rejected.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// `position` was followed by neither `startpos` nor `fen`.
    #[error("position needs 'startpos' or 'fen', got {0:?}")]
    BadPositionKind(String),

    /// The FEN in a `position fen ...` command did not describe a legal
    /// position.
    #[error("unusable FEN {0:?}")]
    BadFen(String),

    /// A token in the `moves` list is not UCI move syntax at all.
    #[error("unreadable move {0:?}")]
    UnreadableMove(String),

    /// A move parsed fine but is not playable in the position it was
    /// applied to.
    #[error("illegal move {0:?} in this position")]
    IllegalMove(String),

    /// A `go` keyword was not followed by a usable number.
    #[error("go {param}: expected a number, got {found:?}")]
    BadGoValue {
        /// The keyword whose value was bad (e.g. "wtime", "depth").
        param: String,
        /// What actually followed it; empty when the line ended there.
        found: String,
    },

    /// Reading stdin failed.
    #[error("stdin read failed: {0}")]
    Stdin(#[from] std::io::Error),
}
