//! Polyglot opening book.
//!
//! A book file is a sequence of 16-byte big-endian records:
//! 8-byte Zobrist key, 2-byte move, 2-byte weight, 4-byte learn value.
//! The move packs `to` in bits 0-5, `from` in bits 6-11 and the promotion
//! piece in bits 12-14 (1 = knight .. 4 = queen).

use std::collections::HashMap;
use std::io;
use std::path::Path;

use rand::Rng;
use shakmaty::{CastlingMode, Chess, Move, Position};
use tracing::debug;

use crate::search::tt::position_key;

/// One raw book record for a position.
#[derive(Debug, Clone, Copy)]
struct BookEntry {
    mv: u16,
    weight: u16,
}

/// An in-memory Polyglot book, keyed by position.
pub struct PolyglotBook {
    entries: HashMap<u64, Vec<BookEntry>>,
}

impl PolyglotBook {
    /// Load a book from disk.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let data = std::fs::read(path)?;
        Ok(Self::parse(&data))
    }

    /// Parse book bytes; trailing partial records are ignored.
    pub fn parse(data: &[u8]) -> Self {
        let mut entries: HashMap<u64, Vec<BookEntry>> = HashMap::new();
        for record in data.chunks_exact(16) {
            let key = u64::from_be_bytes(record[0..8].try_into().expect("8-byte slice"));
            let mv = u16::from_be_bytes(record[8..10].try_into().expect("2-byte slice"));
            let weight = u16::from_be_bytes(record[10..12].try_into().expect("2-byte slice"));
            // Bytes 12..16 hold the learn value, which this engine ignores.
            entries.entry(key).or_default().push(BookEntry { mv, weight });
        }
        Self { entries }
    }

    /// Total number of book moves.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether the book holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pick a legal book move for `pos`, weighted-randomly by entry weight
    /// (minimum 1). Returns `None` when the position is out of book or the
    /// stored move is not legal here.
    pub fn pick(&self, pos: &Chess) -> Option<Move> {
        let candidates = self.entries.get(&position_key(pos))?;

        let total: u64 = candidates.iter().map(|e| u64::from(e.weight.max(1))).sum();
        let mut roll = rand::thread_rng().gen_range(1..=total);
        let mut chosen = candidates[0];
        for entry in candidates {
            let weight = u64::from(entry.weight.max(1));
            if roll <= weight {
                chosen = *entry;
                break;
            }
            roll -= weight;
        }

        let uci = decode_move(chosen.mv);
        let legal = pos.legal_moves();
        let found = legal
            .iter()
            .find(|m| m.to_uci(CastlingMode::Standard).to_string() == uci);
        if found.is_none() {
            debug!(uci = %uci, "book move is not legal here, ignoring");
        }
        found.cloned()
    }
}

/// Decode a Polyglot 16-bit move into a UCI string.
///
/// Polyglot encodes castling as king-takes-rook (`e1h1`); those four
/// strings are rewritten to the standard king-two-squares form so they can
/// match generated legal moves.
fn decode_move(mv: u16) -> String {
    let to = (mv & 0x3F) as u32;
    let from = ((mv >> 6) & 0x3F) as u32;
    let promotion = ((mv >> 12) & 0x7) as usize;

    let square = |sq: u32| {
        format!(
            "{}{}",
            char::from(b'a' + (sq % 8) as u8),
            char::from(b'1' + (sq / 8) as u8)
        )
    };

    let mut uci = format!("{}{}", square(from), square(to));
    match uci.as_str() {
        "e1h1" => uci = "e1g1".into(),
        "e1a1" => uci = "e1c1".into(),
        "e8h8" => uci = "e8g8".into(),
        "e8a8" => uci = "e8c8".into(),
        _ => {}
    }

    // 1 = knight, 2 = bishop, 3 = rook, 4 = queen.
    if (1..=4).contains(&promotion) {
        uci.push(['n', 'b', 'r', 'q'][promotion - 1]);
    }
    uci
}

#[cfg(test)]
mod tests {
    use super::*;

    /// to | from<<6 | promo<<12, squares in a1=0 order.
    fn encode_move(from: u32, to: u32, promo: u16) -> u16 {
        (to as u16) | ((from as u16) << 6) | (promo << 12)
    }

    fn record(key: u64, mv: u16, weight: u16) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(16);
        bytes.extend_from_slice(&key.to_be_bytes());
        bytes.extend_from_slice(&mv.to_be_bytes());
        bytes.extend_from_slice(&weight.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes
    }

    const E2: u32 = 12;
    const E4: u32 = 28;

    #[test]
    fn parse_reads_big_endian_records() {
        let data = record(0x1122_3344_5566_7788, 0x0123, 7);
        let book = PolyglotBook::parse(&data);
        assert_eq!(book.len(), 1);
        assert!(!book.is_empty());
    }

    #[test]
    fn truncated_tail_ignored() {
        let mut data = record(1, 2, 3);
        data.extend_from_slice(&[0xAA; 5]);
        let book = PolyglotBook::parse(&data);
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn startpos_book_move_played() {
        let pos = Chess::default();
        let data = record(position_key(&pos), encode_move(E2, E4, 0), 10);
        let book = PolyglotBook::parse(&data);

        let mv = book.pick(&pos).expect("book move");
        assert_eq!(mv.to_uci(CastlingMode::Standard).to_string(), "e2e4");
    }

    #[test]
    fn out_of_book_position_returns_none() {
        let data = record(0xFFFF_0000_FFFF_0000, encode_move(E2, E4, 0), 1);
        let book = PolyglotBook::parse(&data);
        assert!(book.pick(&Chess::default()).is_none());
    }

    #[test]
    fn illegal_book_move_rejected() {
        // e4e5 is not legal in the starting position.
        let pos = Chess::default();
        let data = record(position_key(&pos), encode_move(E4, 36, 0), 1);
        let book = PolyglotBook::parse(&data);
        assert!(book.pick(&pos).is_none());
    }

    #[test]
    fn zero_weight_counts_as_one() {
        let pos = Chess::default();
        let data = record(position_key(&pos), encode_move(E2, E4, 0), 0);
        let book = PolyglotBook::parse(&data);
        assert!(book.pick(&pos).is_some());
    }

    #[test]
    fn weighted_pick_always_yields_a_stored_move() {
        let pos = Chess::default();
        let mut data = record(position_key(&pos), encode_move(E2, E4, 0), 3);
        data.extend(record(position_key(&pos), encode_move(11, 27, 0), 5)); // d2d4
        let book = PolyglotBook::parse(&data);

        for _ in 0..50 {
            let mv = book.pick(&pos).expect("book move");
            let uci = mv.to_uci(CastlingMode::Standard).to_string();
            assert!(uci == "e2e4" || uci == "d2d4", "unexpected {uci}");
        }
    }

    #[test]
    fn decode_promotion_pieces() {
        // a7a8 with each promotion code.
        let from = 48;
        let to = 56;
        assert_eq!(decode_move(encode_move(from, to, 1)), "a7a8n");
        assert_eq!(decode_move(encode_move(from, to, 2)), "a7a8b");
        assert_eq!(decode_move(encode_move(from, to, 3)), "a7a8r");
        assert_eq!(decode_move(encode_move(from, to, 4)), "a7a8q");
        assert_eq!(decode_move(encode_move(from, to, 0)), "a7a8");
    }

    #[test]
    fn decode_castling_normalised() {
        // e1 = 4, h1 = 7.
        assert_eq!(decode_move(encode_move(4, 7, 0)), "e1g1");
        // e8 = 60, a8 = 56.
        assert_eq!(decode_move(encode_move(60, 56, 0)), "e8c8");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(PolyglotBook::load("definitely-not-here.bin").is_err());
    }
}
