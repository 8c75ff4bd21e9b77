//! The UCI engine loop.
//!
//! Single-threaded and blocking: a `go` command runs the search to
//! completion on this thread and answers with `bestmove` before the next
//! line is read. Protocol replies go to stdout; diagnostics go through
//! `tracing` (stderr) so they never corrupt the protocol stream.

use std::io::{self, BufRead};
use std::time::Duration;

use shakmaty::{CastlingMode, Chess, Color, Position};
use tracing::{info, warn};

use sargo_engine::{PolyglotBook, Searcher, control_for_go};

use crate::command::{Command, GoParams, parse_command};
use crate::error::UciError;
use crate::puzzles;

/// Remaining time assumed when the GUI sends `go` with no clock at all.
const DEFAULT_REMAINING: Duration = Duration::from_secs(5);

/// Depth cap when `go` carries no `depth`.
const DEFAULT_MAX_DEPTH: i32 = 64;

/// Book file probed at startup, relative to the working directory.
const BOOK_PATH: &str = "baron30.bin";

/// The UCI engine: current position, searcher, and opening book.
pub struct UciEngine {
    pos: Chess,
    prev_keys: Vec<u64>,
    searcher: Searcher,
    book: Option<PolyglotBook>,
}

impl UciEngine {
    /// Create an engine at the starting position, probing the default
    /// book path.
    pub fn new() -> Self {
        let book = match PolyglotBook::load(BOOK_PATH) {
            Ok(book) => {
                println!("info string loaded book with {} entries", book.len());
                Some(book)
            }
            Err(err) => {
                println!("info string no opening book ({BOOK_PATH}: {err})");
                None
            }
        };
        Self {
            pos: Chess::default(),
            prev_keys: Vec::new(),
            searcher: Searcher::new(),
            book,
        }
    }

    /// Read UCI commands from stdin until `quit` or end of input.
    pub fn run(&mut self) -> Result<(), UciError> {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_command(line) {
                Ok(Command::Quit) => break,
                Ok(cmd) => self.dispatch(cmd),
                Err(err) => {
                    // Malformed input is ignored per UCI convention.
                    warn!(error = %err, line, "ignoring malformed UCI input");
                }
            }
        }
        info!("sargo shutting down");
        Ok(())
    }

    fn dispatch(&mut self, cmd: Command) {
        match cmd {
            Command::Uci => {
                println!("id name sargo");
                println!("id author the sargo developers");
                println!("uciok");
            }
            Command::IsReady => println!("readyok"),
            Command::UciNewGame => {
                self.pos = Chess::default();
                self.prev_keys.clear();
                self.searcher.clear_tt();
            }
            Command::Position { pos, prev_keys } => {
                self.pos = pos;
                self.prev_keys = prev_keys;
            }
            Command::Go(params) => self.handle_go(params),
            Command::PuzzleTest => {
                puzzles::run_puzzle_tests();
                println!("info string Puzzle tests complete");
            }
            Command::Stop | Command::Unknown(_) | Command::Quit => {}
        }
    }

    fn handle_go(&mut self, params: GoParams) {
        if let Some(book) = &self.book
            && let Some(mv) = book.pick(&self.pos)
        {
            println!("info string book move");
            println!("bestmove {}", mv.to_uci(CastlingMode::Standard));
            return;
        }

        let (remaining, increment) = clock_for_side(&params, self.pos.turn());
        let control = control_for_go(remaining, increment, self.pos.fullmoves().get());
        let max_depth = params.depth.unwrap_or(DEFAULT_MAX_DEPTH);

        let result = self.searcher.find_best_move(
            &self.pos,
            &self.prev_keys,
            max_depth,
            &control,
            |depth, score, nodes| {
                let ms = control.elapsed().as_millis().max(1);
                let nps = nodes as u128 * 1000 / ms;
                println!(
                    "info depth {depth} score cp {score} nodes {nodes} nps {nps} time {ms}"
                );
            },
        );

        match result.best_move {
            Some(mv) => println!("bestmove {}", mv.to_uci(CastlingMode::Standard)),
            // No legal moves: the game is over; drivers treat the null
            // move as end-of-game.
            None => println!("bestmove 0000"),
        }
    }
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Remaining time and increment for the side to move, falling back to
/// `movetime` and finally to the engine default.
fn clock_for_side(params: &GoParams, side: Color) -> (Duration, Duration) {
    let (time, inc) = match side {
        Color::White => (params.wtime, params.winc),
        Color::Black => (params.btime, params.binc),
    };
    let remaining = time.or(params.movetime).unwrap_or(DEFAULT_REMAINING);
    (remaining, inc.unwrap_or(Duration::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_clock_selected_for_white() {
        let params = GoParams {
            wtime: Some(Duration::from_millis(60_000)),
            btime: Some(Duration::from_millis(1_000)),
            winc: Some(Duration::from_millis(700)),
            binc: Some(Duration::from_millis(9)),
            ..Default::default()
        };
        let (remaining, inc) = clock_for_side(&params, Color::White);
        assert_eq!(remaining, Duration::from_millis(60_000));
        assert_eq!(inc, Duration::from_millis(700));
    }

    #[test]
    fn black_clock_selected_for_black() {
        let params = GoParams {
            wtime: Some(Duration::from_millis(60_000)),
            btime: Some(Duration::from_millis(1_000)),
            ..Default::default()
        };
        let (remaining, inc) = clock_for_side(&params, Color::Black);
        assert_eq!(remaining, Duration::from_millis(1_000));
        assert_eq!(inc, Duration::ZERO);
    }

    #[test]
    fn movetime_used_when_no_clock() {
        let params = GoParams {
            movetime: Some(Duration::from_millis(2_500)),
            ..Default::default()
        };
        let (remaining, _) = clock_for_side(&params, Color::White);
        assert_eq!(remaining, Duration::from_millis(2_500));
    }

    #[test]
    fn bare_go_falls_back_to_default() {
        let (remaining, inc) = clock_for_side(&GoParams::default(), Color::Black);
        assert_eq!(remaining, DEFAULT_REMAINING);
        assert_eq!(inc, Duration::ZERO);
    }
}
