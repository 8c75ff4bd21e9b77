//! Tactical puzzle harness.
//!
//! A small built-in suite of tactics the engine is expected to solve at a
//! fixed depth, runnable from the `puzzletest` UCI command, plus the
//! single-position runner behind the `--test` CLI mode.

use std::time::{Duration, Instant};

use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess};
use tracing::debug;

use sargo_engine::{SearchControl, Searcher};

use crate::error::UciError;

/// One tactical test position.
struct Puzzle {
    fen: &'static str,
    description: &'static str,
    expected_best_move: &'static str,
    required_depth: i32,
}

/// The built-in suite.
const PUZZLES: &[Puzzle] = &[
    Puzzle {
        fen: "kbK5/pp6/1P6/8/8/8/R7/8 w - - 0 2",
        description: "mate in 2 (a2a6)",
        expected_best_move: "a2a6",
        required_depth: 4,
    },
    Puzzle {
        fen: "rnbqkbnr/ppp2ppp/3p4/4p3/4P1Q1/8/PPPP1PPP/RNB1KBNR b KQkq - 1 3",
        description: "black wins a queen (c8g4)",
        expected_best_move: "c8g4",
        required_depth: 6,
    },
    Puzzle {
        fen: "rnbqkbnr/1pp2ppp/p2p4/4p1B1/4P3/3P4/PPP2PPP/RN1QKBNR w KQkq - 0 4",
        description: "white wins a queen (g5d8)",
        expected_best_move: "g5d8",
        required_depth: 6,
    },
    Puzzle {
        fen: "r1b1kb1r/pppp1ppp/5q2/4n3/3KP3/2N3PN/PPP4P/R1BQ1B1R b kq - 0 1",
        description: "",
        expected_best_move: "f8c5",
        required_depth: 6,
    },
    Puzzle {
        fen: "1r5k/5ppp/3Q4/8/8/Prq3P1/2P1K2P/3R1R2 b - - 5 27",
        description: "",
        expected_best_move: "c3e3",
        required_depth: 6,
    },
    Puzzle {
        fen: "8/1Q6/2PBK3/k7/8/2P2P2/8/7q w - - 7 63",
        description: "mate in 2",
        expected_best_move: "d6c7",
        required_depth: 4,
    },
    Puzzle {
        fen: "r3k2r/ppp2Npp/1b5n/4p2b/2B1P2q/BQP2P2/P5PP/RN5K w kq - 1 0",
        description: "mate in 3",
        expected_best_move: "c4b5",
        required_depth: 6,
    },
    Puzzle {
        fen: "r2n1rk1/1ppb2pp/1p1p4/3Ppq1n/2B3P1/2P4P/PP1N1P1K/R2Q1RN1 b - - 0 1",
        description: "mate in 3",
        expected_best_move: "f5f2",
        required_depth: 6,
    },
    Puzzle {
        fen: "8/8/8/3k4/1Q1Np2p/1p2P2P/1Pp2b2/2K5 w - - 1 50",
        description: "mate in 6",
        expected_best_move: "b4a5",
        required_depth: 12,
    },
];

fn parse_fen(fen: &str) -> Result<Chess, UciError> {
    fen.parse::<Fen>()
        .ok()
        .and_then(|f| f.into_position::<Chess>(CastlingMode::Standard).ok())
        .ok_or_else(|| UciError::BadFen(fen.into()))
}

fn best_move_uci(pos: &Chess, depth: i32, budget: Duration) -> String {
    let control = SearchControl::new_timed(budget);
    let result = Searcher::new().find_best_move(pos, &[], depth, &control, |d, score, nodes| {
        debug!(depth = d, score, nodes, "puzzle iteration");
    });
    result
        .best_move
        .map(|mv| mv.to_uci(CastlingMode::Standard).to_string())
        .unwrap_or_else(|| "0000".into())
}

/// Run the whole suite, printing one `[PASS]`/`[FAIL]` line per puzzle and
/// a final tally. Returns `(passed, total)`.
pub fn run_puzzle_tests() -> (usize, usize) {
    let mut passed = 0;
    let overall_start = Instant::now();

    for puzzle in PUZZLES {
        let start = Instant::now();
        let result = match parse_fen(puzzle.fen) {
            Ok(pos) => best_move_uci(&pos, puzzle.required_depth, Duration::from_secs(1000)),
            Err(_) => "bad fen".into(),
        };
        let ok = result == puzzle.expected_best_move;
        if ok {
            passed += 1;
        }

        print!("{} FEN: {}", if ok { "[PASS]" } else { "[FAIL]" }, puzzle.fen);
        if !puzzle.description.is_empty() {
            print!(" ({})", puzzle.description);
        }
        println!(
            " - Expected: {}, Got: {} | Time: {:.2}s",
            puzzle.expected_best_move,
            result,
            start.elapsed().as_secs_f64()
        );
    }

    println!("Puzzle tests passed: {passed} / {}", PUZZLES.len());
    println!(
        "Total time for all puzzles: {:.2}s",
        overall_start.elapsed().as_secs_f64()
    );
    (passed, PUZZLES.len())
}

/// Search one position at `depth` with a generous budget and compare
/// against `expected_move`. Used by the `--test` CLI mode.
pub fn run_single_test(fen: &str, expected_move: &str, depth: i32) -> Result<bool, UciError> {
    let pos = parse_fen(fen)?;
    let result = best_move_uci(&pos, depth, Duration::from_secs(60));

    let passed = result == expected_move;
    if passed {
        println!("[PASS] Found best move: {result}");
    } else {
        println!("[FAIL] Expected: {expected_move}, Got: {result}");
    }
    Ok(passed)
}
