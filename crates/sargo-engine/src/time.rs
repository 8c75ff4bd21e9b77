//! Time management — convert clock state into a per-move budget.

use std::time::Duration;

use crate::search::control::SearchControl;

/// Floor on the per-move budget, seconds.
const MIN_BUDGET: f64 = 0.05;

/// Wall-clock reserve that is never spent, seconds.
const RESERVE: f64 = 1.0;

/// Compute the budget for this move.
///
/// `moves_to_go` is estimated as `clamp(60 - fullmove, 1, 40)`: early in
/// the game the remaining time is spread over many moves, later over fewer,
/// never fewer than one. Half the increment is added, and the result is
/// capped at half the remaining time so the clock can never be burned on a
/// single move.
pub fn time_for_move(remaining: Duration, increment: Duration, fullmove: u32) -> Duration {
    let moves_to_go = (60 - fullmove as i64).clamp(1, 40) as f64;
    let remaining = remaining.as_secs_f64();
    let increment = increment.as_secs_f64();

    let budget = ((remaining - RESERVE) / moves_to_go + 0.5 * increment)
        .min(0.5 * remaining)
        .max(MIN_BUDGET);

    Duration::from_secs_f64(budget)
}

/// Build a [`SearchControl`] for a `go` command.
///
/// `remaining` comes from the side-to-move's clock, or from `movetime`
/// treated as the remaining time; when the GUI sent neither, callers pass
/// the engine's default.
pub fn control_for_go(remaining: Duration, increment: Duration, fullmove: u32) -> SearchControl {
    SearchControl::new_timed(time_for_move(remaining, increment, fullmove))
}
