//! UCI command parsing.

use std::time::Duration;

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Position};

use sargo_engine::position_key;

use crate::error::UciError;

/// Parameters for the `go` command. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct GoParams {
    /// White's remaining time.
    pub wtime: Option<Duration>,
    /// Black's remaining time.
    pub btime: Option<Duration>,
    /// White's increment per move.
    pub winc: Option<Duration>,
    /// Black's increment per move.
    pub binc: Option<Duration>,
    /// Search for exactly this long (treated as remaining time).
    pub movetime: Option<Duration>,
    /// Search to this depth only.
    pub depth: Option<i32>,
}

/// A parsed UCI command.
#[derive(Debug)]
pub enum Command {
    /// `uci` -- identify the engine.
    Uci,
    /// `isready` -- synchronization ping.
    IsReady,
    /// `ucinewgame` -- reset engine state.
    UciNewGame,
    /// `position` -- set up a board with its preceding position keys.
    Position {
        /// The resulting position.
        pos: Chess,
        /// Zobrist keys of every position before `pos`, oldest first;
        /// feeds repetition detection.
        prev_keys: Vec<u64>,
    },
    /// `go` -- start searching with given parameters.
    Go(GoParams),
    /// `stop` -- no-op: searches block, so this only arrives when idle.
    Stop,
    /// `quit` -- exit the engine.
    Quit,
    /// `puzzletest` -- run the built-in tactical suite.
    PuzzleTest,
    /// Unrecognized command (silently ignored per UCI convention).
    Unknown(String),
}

/// Parse a single line of UCI input into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(Command::Unknown(String::new()));
    }

    match tokens[0] {
        "uci" => Ok(Command::Uci),
        "isready" => Ok(Command::IsReady),
        "ucinewgame" => Ok(Command::UciNewGame),
        "stop" => Ok(Command::Stop),
        "quit" => Ok(Command::Quit),
        "puzzletest" => Ok(Command::PuzzleTest),
        "position" => parse_position(&tokens[1..]),
        "go" => parse_go(&tokens[1..]),
        _ => Ok(Command::Unknown(tokens[0].to_string())),
    }
}

/// Parse the `position` command arguments.
///
/// Supports:
/// - `position startpos [moves e2e4 d7d5 ...]`
/// - `position fen <fen-string> [moves e2e4 d7d5 ...]`
fn parse_position(tokens: &[&str]) -> Result<Command, UciError> {
    let (mut pos, rest) = match tokens.first() {
        Some(&"startpos") => (Chess::default(), &tokens[1..]),
        Some(&"fen") => {
            // FEN is 6 space-separated fields
            if tokens.len() < 7 {
                return Err(UciError::BadFen(tokens[1..].join(" ")));
            }
            let fen = tokens[1..7].join(" ");
            let pos = fen
                .parse::<Fen>()
                .ok()
                .and_then(|f| f.into_position::<Chess>(CastlingMode::Standard).ok())
                .ok_or(UciError::BadFen(fen))?;
            (pos, &tokens[7..])
        }
        other => {
            return Err(UciError::BadPositionKind(
                other.copied().unwrap_or_default().to_string(),
            ));
        }
    };

    // Apply moves if present, recording the key of each passed-through
    // position for later repetition checks.
    let mut prev_keys = Vec::new();
    if !rest.is_empty() && rest[0] == "moves" {
        for uci_str in &rest[1..] {
            let uci = uci_str
                .parse::<UciMove>()
                .map_err(|_| UciError::UnreadableMove(uci_str.to_string()))?;
            let mv = uci
                .to_move(&pos)
                .map_err(|_| UciError::IllegalMove(uci_str.to_string()))?;
            prev_keys.push(position_key(&pos));
            pos.play_unchecked(&mv);
        }
    }

    Ok(Command::Position { pos, prev_keys })
}

/// Parse the `go` command arguments. Unknown tokens are silently skipped.
fn parse_go(tokens: &[&str]) -> Result<Command, UciError> {
    let mut params = GoParams::default();

    // Each known keyword consumes the token after it as its value;
    // unknown tokens are skipped on their own, per UCI convention.
    let mut iter = tokens.iter();
    while let Some(&keyword) = iter.next() {
        match keyword {
            "wtime" => params.wtime = Some(millis(go_value(keyword, iter.next())?)),
            "btime" => params.btime = Some(millis(go_value(keyword, iter.next())?)),
            "winc" => params.winc = Some(millis(go_value(keyword, iter.next())?)),
            "binc" => params.binc = Some(millis(go_value(keyword, iter.next())?)),
            "movetime" => params.movetime = Some(millis(go_value(keyword, iter.next())?)),
            "depth" => params.depth = Some(go_value(keyword, iter.next())?),
            _ => {}
        }
    }

    Ok(Command::Go(params))
}

/// Parse the number that must follow a `go` keyword.
///
/// A missing value reports as an empty `found` string.
fn go_value<T: std::str::FromStr>(keyword: &str, raw: Option<&&str>) -> Result<T, UciError> {
    let raw = raw.copied().unwrap_or_default();
    raw.parse().map_err(|_| UciError::BadGoValue {
        param: keyword.to_string(),
        found: raw.to_string(),
    })
}

/// Clock values on the wire are integer milliseconds.
fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
