//! Search control — time budget and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Fraction of the budget after which iterative deepening stops starting
/// new iterations; the next depth would likely overrun.
const SOFT_STOP_FRACTION: f64 = 0.9;

/// Cancellation token for one search.
///
/// Created per `go`, shared by reference through the recursion. The search
/// polls [`check_time`](Self::check_time) at the top of every node; once the
/// budget is exhausted the `timed_out` flag sticks and every caller must
/// treat in-flight results as meaningless.
pub struct SearchControl {
    start: Instant,
    budget: Option<Duration>,
    timed_out: AtomicBool,
}

impl SearchControl {
    /// Control without a time limit (`--test` runs, depth-only searches).
    pub fn new_infinite() -> Self {
        Self {
            start: Instant::now(),
            budget: None,
            timed_out: AtomicBool::new(false),
        }
    }

    /// Control with a wall-clock budget; the clock starts immediately.
    pub fn new_timed(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget: Some(budget),
            timed_out: AtomicBool::new(false),
        }
    }

    /// Poll the clock. Returns `true` (and latches the flag) once the
    /// budget is spent.
    pub fn check_time(&self) -> bool {
        if self.timed_out.load(Ordering::Relaxed) {
            return true;
        }
        if let Some(budget) = self.budget
            && self.start.elapsed() >= budget
        {
            self.timed_out.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }

    /// Whether a previous poll latched the timeout.
    pub fn timed_out(&self) -> bool {
        self.timed_out.load(Ordering::Relaxed)
    }

    /// Elapsed time since the search started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Whether iterative deepening should skip starting another depth.
    pub fn should_stop_iterating(&self) -> bool {
        match self.budget {
            Some(budget) => self.start.elapsed() >= budget.mul_f64(SOFT_STOP_FRACTION),
            None => false,
        }
    }
}
