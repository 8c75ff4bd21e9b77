//! Negamax alpha-beta search with quiescence and a root driver.

use shakmaty::{Chess, Move, Position, Role};

use crate::eval::evaluate;
use crate::eval::pst::piece_value;
use crate::search::control::SearchControl;
use crate::search::heuristics::{HistoryTable, KillerTable};
use crate::search::ordering::{order_captures, order_moves};
use crate::search::tt::{TranspositionTable, position_key};

/// Score representing an unreachable upper/lower bound.
pub const INF: i32 = 70_000;

/// Base score for checkmate; a mate in N plies scores `MATE - N`.
pub const MATE: i32 = 69_000;

/// Scores beyond this magnitude are mate scores and get ply-normalised in
/// the transposition table.
pub const MATE_THRESHOLD: i32 = MATE - 1_000;

/// Plies past this depth never index the killer table.
pub const MAX_PLY: usize = 128;

/// Minimum depth for null-move pruning.
const NULL_MOVE_MIN_DEPTH: i32 = 3;

/// Depth subtracted for the null-move verification search.
const NULL_MOVE_REDUCTION: i32 = 3;

/// Side-to-move must have at least this much non-pawn material before a
/// null move is tried; guards against zugzwang in pawn endings.
const NULL_MOVE_MATERIAL: i32 = 2 * 500;

/// Minimum depth for late move reductions.
const LMR_MIN_DEPTH: i32 = 3;

/// Per-search state threaded through the recursion.
pub struct SearchContext<'a> {
    /// Nodes visited so far.
    pub nodes: u64,
    /// Cancellation token, polled at the top of every node.
    pub control: &'a SearchControl,
    /// Transposition table, owned by the searcher across iterations.
    pub tt: &'a mut TranspositionTable,
    /// Killer moves, cleared per search.
    pub killers: KillerTable,
    /// History heuristic, cleared per search.
    pub history: HistoryTable,
    /// Zobrist keys of every ancestor position: the game history handed in
    /// by the UCI layer plus the current search path.
    pub prev_keys: Vec<u64>,
}

impl SearchContext<'_> {
    /// Whether the position with `key` already occurred among the
    /// ancestors. Only positions with the same side to move are compared,
    /// and the scan stops once the halfmove clock says no repetition can
    /// exist further back.
    fn is_repetition(&self, key: u64, halfmoves: u32) -> bool {
        self.prev_keys
            .iter()
            .rev()
            .take(halfmoves as usize)
            .skip(1)
            .step_by(2)
            .any(|&k| k == key)
    }
}

/// Non-pawn material of the side to move, in centipawns.
fn non_pawn_material(pos: &Chess) -> i32 {
    let board = pos.board();
    let side = board.by_color(pos.turn());
    [Role::Knight, Role::Bishop, Role::Rook, Role::Queen]
        .iter()
        .map(|&role| piece_value(role) * (board.by_role(role) & side).count() as i32)
        .sum()
}

/// Immediate draw by rule: repetition, insufficient material, or the
/// 50-move rule.
fn is_rule_draw(ctx: &SearchContext, pos: &Chess, key: u64) -> bool {
    ctx.is_repetition(key, pos.halfmoves())
        || pos.is_insufficient_material()
        || pos.halfmoves() >= 100
}

/// Quiescence search: stand pat, then captures only.
///
/// Mate and stalemate fall out of [`evaluate`] receiving the empty move
/// list. No transposition table, no draw adjudication, no depth limit —
/// capture chains are finite.
pub(super) fn quiesce(
    ctx: &mut SearchContext,
    pos: &Chess,
    mut alpha: i32,
    beta: i32,
    ply: i32,
) -> i32 {
    ctx.nodes += 1;

    let moves = pos.legal_moves();
    let stand_pat = evaluate(pos, ply, &moves);

    if stand_pat >= beta {
        return stand_pat;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mut best = stand_pat;
    for mv in order_captures(&moves) {
        let mut child = pos.clone();
        child.play_unchecked(&mv);
        let score = -quiesce(ctx, &child, -beta, -alpha, ply + 1);

        if score >= beta {
            return score;
        }
        if score > best {
            best = score;
        }
        if score > alpha {
            alpha = score;
        }
    }

    best
}

/// Negamax with transposition table, null-move pruning, and late move
/// reductions. Fails hard on the null-move cutoff, soft elsewhere.
///
/// Returns 0 immediately once the clock runs out; callers must discard the
/// result whenever `ctx.control.timed_out()` is set.
pub(super) fn negamax(
    ctx: &mut SearchContext,
    pos: &Chess,
    depth: i32,
    mut alpha: i32,
    beta: i32,
    ply: i32,
) -> i32 {
    if ctx.control.check_time() {
        return 0;
    }
    ctx.nodes += 1;

    let moves = pos.legal_moves();
    let key = position_key(pos);

    if let Some((score, _)) = ctx.tt.probe(key, depth, alpha, beta, ply) {
        return score;
    }

    if is_rule_draw(ctx, pos, key) {
        return 0;
    }
    if moves.is_empty() {
        return if pos.is_check() { -(MATE - ply) } else { 0 };
    }
    if depth <= 0 {
        return quiesce(ctx, pos, alpha, beta, ply + 1);
    }

    let in_check = pos.is_check();

    // Null move: hand the opponent a free move; if the reduced search still
    // fails high, the real position surely would too. Skipped in check and
    // without heavy pieces, where zugzwang breaks the assumption.
    if depth >= NULL_MOVE_MIN_DEPTH && !in_check && non_pawn_material(pos) >= NULL_MOVE_MATERIAL {
        if let Ok(null_pos) = pos.clone().swap_turn() {
            ctx.prev_keys.push(key);
            let null_score = -negamax(
                ctx,
                &null_pos,
                depth - NULL_MOVE_REDUCTION,
                -beta,
                -beta + 1,
                ply + 1,
            );
            ctx.prev_keys.pop();
            if ctx.control.timed_out() {
                return 0;
            }
            if null_score >= beta {
                return beta;
            }
        }
    }

    let hash_move = ctx.tt.hash_move(key);
    let ordered = order_moves(&moves, ply as usize, hash_move.as_ref(), &ctx.killers, &ctx.history);

    let alpha_orig = alpha;
    let mut best_score = -INF;
    let mut best_move: Option<Move> = None;

    for (move_index, mv) in ordered.iter().enumerate() {
        let is_capture = mv.is_capture();
        let is_promotion = mv.promotion().is_some();

        let mut child = pos.clone();
        child.play_unchecked(mv);
        let gives_check = child.is_check();

        // Late quiet moves get searched a ply shallower first.
        let reduction = i32::from(
            depth >= LMR_MIN_DEPTH
                && move_index > 0
                && !is_capture
                && !is_promotion
                && !gives_check
                && !in_check,
        );

        ctx.prev_keys.push(key);
        let mut score;
        if reduction > 0 {
            score = -negamax(ctx, &child, depth - 1 - reduction, -alpha - 1, -alpha, ply + 1);
            if score > alpha && !ctx.control.timed_out() {
                // The reduced search beat alpha: re-search at full depth
                // and full window.
                score = -negamax(ctx, &child, depth - 1, -beta, -alpha, ply + 1);
            }
        } else {
            score = -negamax(ctx, &child, depth - 1, -beta, -alpha, ply + 1);
        }
        ctx.prev_keys.pop();

        if ctx.control.timed_out() {
            // Partial result; do not let it reach the table.
            return best_score;
        }

        if score > best_score {
            best_score = score;
            best_move = Some(mv.clone());
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            if !is_capture && !is_promotion {
                ctx.killers.store(ply as usize, mv.clone());
                ctx.history.reward(mv, depth);
            }
            break;
        }
    }

    ctx.tt.store(key, depth, best_move, best_score, alpha_orig, beta, ply);
    best_score
}

/// Root driver: like [`negamax`] but without null-move pruning, and it
/// always has a move to return — the first one is adopted even when it
/// fails to raise alpha.
pub(super) fn negamax_root(
    ctx: &mut SearchContext,
    pos: &Chess,
    depth: i32,
    mut alpha: i32,
    beta: i32,
) -> (i32, Option<Move>) {
    if ctx.control.check_time() {
        return (0, None);
    }
    ctx.nodes += 1;

    let moves = pos.legal_moves();
    let key = position_key(pos);

    if is_rule_draw(ctx, pos, key) {
        return (0, None);
    }
    if moves.is_empty() {
        let score = if pos.is_check() { -MATE } else { 0 };
        return (score, None);
    }

    // The table is consulted only for the ordering hint here; a depth
    // cutoff at the root would leave us without a move to play.
    let hash_move = ctx.tt.hash_move(key);
    let ordered = order_moves(&moves, 0, hash_move.as_ref(), &ctx.killers, &ctx.history);

    let alpha_orig = alpha;
    let mut best_score = -INF;
    let mut best_move: Option<Move> = None;

    for mv in &ordered {
        let mut child = pos.clone();
        child.play_unchecked(mv);

        ctx.prev_keys.push(key);
        let score = -negamax(ctx, &child, depth - 1, -beta, -alpha, 1);
        ctx.prev_keys.pop();

        if ctx.control.timed_out() {
            break;
        }

        if score > best_score || best_move.is_none() {
            best_score = score;
            best_move = Some(mv.clone());
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            break;
        }
    }

    if !ctx.control.timed_out()
        && let Some(mv) = &best_move
    {
        ctx.tt
            .store(key, depth, Some(mv.clone()), best_score, alpha_orig, beta, 0);
    }

    (best_score, best_move)
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

    fn search_root(fen: &str, depth: i32) -> (i32, Option<Move>) {
        let pos = position(fen);
        let control = SearchControl::new_infinite();
        let mut tt = TranspositionTable::new();
        let mut ctx = SearchContext {
            nodes: 0,
            control: &control,
            tt: &mut tt,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            prev_keys: Vec::new(),
        };
        negamax_root(&mut ctx, &pos, depth, -MATE, MATE)
    }

    fn uci(mv: &Move) -> String {
        mv.to_uci(CastlingMode::Standard).to_string()
    }

    #[test]
    fn mate_in_one_found_at_depth_two() {
        // Scholar's mate: Qh5xf7#.
        let (score, mv) =
            search_root("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4", 2);
        assert_eq!(uci(&mv.expect("must find a move")), "h5f7");
        assert!(score > MATE_THRESHOLD, "mate score expected, got {score}");
    }

    #[test]
    fn mated_side_sees_negative_mate_score() {
        // Black to move and in check; every reply runs into an immediate
        // mate by one of the white queens.
        let (score, mv) = search_root("1k6/8/KQ6/2Q5/8/8/8/8 b - - 0 1", 3);
        assert!(mv.is_some());
        assert!(score < -MATE_THRESHOLD, "expected mated score, got {score}");
    }

    #[test]
    fn checkmate_root_returns_mate_score_and_no_move() {
        let (score, mv) = search_root("R6k/8/6K1/8/8/8/8/8 b - - 0 1", 3);
        assert_eq!(score, -MATE);
        assert!(mv.is_none());
    }

    #[test]
    fn stalemate_root_returns_zero_and_no_move() {
        let (score, mv) = search_root("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1", 3);
        assert_eq!(score, 0);
        assert!(mv.is_none());
    }

    #[test]
    fn hanging_queen_gets_taken() {
        // White queen can capture the undefended black queen on d8.
        let (_, mv) = search_root("3q1k2/8/8/8/8/8/8/3QK3 w - - 0 1", 3);
        assert_eq!(uci(&mv.expect("must find a move")), "d1d8");
    }

    #[test]
    fn promotion_with_capture_preferred() {
        // e7 pawn can take the d8 queen and promote.
        let (_, mv) = search_root("3q1n2/4P3/8/8/8/8/k7/7K w - - 0 1", 2);
        assert_eq!(uci(&mv.expect("must find a move")), "e7d8q");
    }

    #[test]
    fn insufficient_material_is_draw() {
        // King and knight against king: no mate is possible.
        let (score, _) = search_root("4k3/8/8/8/8/8/8/4KN2 w - - 0 1", 4);
        assert_eq!(score, 0);
    }

    #[test]
    fn fifty_move_rule_scores_zero() {
        let (score, _) = search_root("4k3/8/8/8/8/8/4R3/4K3 w - - 100 80", 4);
        assert_eq!(score, 0);
    }

    #[test]
    fn repetition_detected_from_game_history() {
        let pos = position("4k3/8/8/8/8/8/8/4K2R w - - 4 10");
        let key = position_key(&pos);
        let control = SearchControl::new_infinite();
        let mut tt = TranspositionTable::new();
        // Fake a game history in which this exact position (same side to
        // move) already occurred two plies ago.
        let mut ctx = SearchContext {
            nodes: 0,
            control: &control,
            tt: &mut tt,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            prev_keys: vec![key, 0xABCD],
        };
        let (score, mv) = negamax_root(&mut ctx, &pos, 3, -MATE, MATE);
        assert_eq!(score, 0);
        assert!(mv.is_none());
    }

    #[test]
    fn timed_out_search_reports_quickly() {
        let pos = Chess::default();
        let control = SearchControl::new_timed(std::time::Duration::ZERO);
        let mut tt = TranspositionTable::new();
        let mut ctx = SearchContext {
            nodes: 0,
            control: &control,
            tt: &mut tt,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            prev_keys: Vec::new(),
        };
        let (_, mv) = negamax_root(&mut ctx, &pos, 12, -MATE, MATE);
        assert!(control.timed_out());
        assert!(mv.is_none(), "an instantly-expired clock yields no move");
        assert!(tt.is_empty(), "timed-out nodes must not reach the table");
    }

    #[test]
    fn quiescence_resolves_hanging_captures() {
        // Black to move, a queen up; QxP wins a further pawn and nothing
        // recaptures, so quiescence should settle above the queen's value.
        let pos = position("4k3/8/8/4q3/3P4/8/8/4K3 b - - 0 1");
        let control = SearchControl::new_infinite();
        let mut tt = TranspositionTable::new();
        let mut ctx = SearchContext {
            nodes: 0,
            control: &control,
            tt: &mut tt,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            prev_keys: Vec::new(),
        };
        let score = quiesce(&mut ctx, &pos, -INF, INF, 0);
        assert!(score > 500, "Black is up a queen, got {score}");
    }

    #[test]
    fn null_move_does_not_break_mate_in_one() {
        let (score, mv) = search_root(
            "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
            5,
        );
        assert_eq!(uci(&mv.expect("must find a move")), "h5f7");
        assert!(score > MATE_THRESHOLD);
    }

    #[test]
    fn deeper_search_keeps_finding_the_capture() {
        let (_, shallow) = search_root("3q1k2/8/8/8/8/8/8/3QK3 w - - 0 1", 2);
        let (_, deep) = search_root("3q1k2/8/8/8/8/8/8/3QK3 w - - 0 1", 5);
        assert_eq!(
            uci(&shallow.expect("shallow move")),
            uci(&deep.expect("deep move"))
        );
    }
}
