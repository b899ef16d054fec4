//! Turn order, legality and game termination.
//!
//! A [`Game`] owns one [`Board`] and one [`ChessTimer`]. Moves go through
//! [`Game::make_move`], which rejects with `false` and leaves the position
//! untouched whenever the move is not legal for the side to move.

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::{
    board::{Board, Placement},
    config::GameConfig,
    movegen::{self, legal_moves_from},
    square::Square,
    timer::ChessTimer,
    types::*,
};

/// Half-moves without a pawn move or capture that end the game.
pub const FIFTY_MOVE_LIMIT: u32 = 100;

/// Occurrences of one position that end the game.
pub const REPETITION_LIMIT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    ThreefoldRepetition,
    FiftyMoveRule,
    /// `loser` ran out of time
    Timeout { loser: Color },
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::Checkmate { winner } => Some(winner),
            GameStatus::Timeout { loser } => Some(loser.other()),
            _ => None,
        }
    }

    pub fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate
                | GameStatus::InsufficientMaterial
                | GameStatus::ThreefoldRepetition
                | GameStatus::FiftyMoveRule
        )
    }

    /// Human-readable result, `None` while the game is still on.
    pub fn description(self) -> Option<String> {
        let s = match self {
            GameStatus::Ongoing => return None,
            GameStatus::Checkmate { winner } => format!("{winner} wins by checkmate"),
            GameStatus::Stalemate => "Draw by stalemate".to_string(),
            GameStatus::InsufficientMaterial => "Draw by insufficient material".to_string(),
            GameStatus::ThreefoldRepetition => "Draw by threefold repetition".to_string(),
            GameStatus::FiftyMoveRule => "Draw by fifty-move rule".to_string(),
            GameStatus::Timeout { loser } => format!("{} wins on time", loser.other()),
        };
        Some(s)
    }
}

/// Position identity for repetition: colour and kind on every square plus
/// the side to move. Move-history flags are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Snapshot {
    pub placement: Placement,
    pub side_to_move: Color,
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    current_turn: Color,
    status: GameStatus,
    half_move_counter: u32,
    history: Vec<Snapshot>,
    timer: ChessTimer,
    timeout_player: Option<Color>,
    pending_promotion: Option<Square>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

impl Game {
    /// Standard starting position, White to move.
    pub fn new(config: &GameConfig) -> Self {
        Self::from_board(Board::startpos(), Color::White, config)
    }

    pub fn from_board(board: Board, turn: Color, config: &GameConfig) -> Self {
        Self::with_timer(board, turn, ChessTimer::new(config.time_minutes))
    }

    /// Custom position with a caller-supplied timer. The timer's active side
    /// is aligned with `turn`.
    pub fn with_timer(board: Board, turn: Color, mut timer: ChessTimer) -> Self {
        if timer.active_side() != turn {
            timer.switch_turn();
        }
        let mut game = Game {
            board,
            current_turn: turn,
            status: GameStatus::Ongoing,
            half_move_counter: 0,
            history: Vec::new(),
            timer,
            timeout_player: None,
            pending_promotion: None,
        };
        let initial = game.snapshot();
        game.history.push(initial);
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn half_move_counter(&self) -> u32 {
        self.half_move_counter
    }

    pub fn set_half_move_counter(&mut self, n: u32) {
        self.half_move_counter = n;
    }

    pub fn board_state_history(&self) -> &[Snapshot] {
        &self.history
    }

    pub fn timer(&self) -> &ChessTimer {
        &self.timer
    }

    pub fn timeout_player(&self) -> Option<Color> {
        self.timeout_player
    }

    /// Square of a pawn that reached the last rank and awaits [`promote_pawn`](Self::promote_pawn).
    pub fn pending_promotion(&self) -> Option<Square> {
        self.pending_promotion
    }

    pub fn in_check(&self) -> bool {
        self.board.is_king_in_check(self.current_turn)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            placement: self.board.placement(),
            side_to_move: self.current_turn,
        }
    }

    /// Legal destinations for the piece on `from`. Empty unless it belongs to
    /// the side to move and the game accepts moves.
    pub fn legal_moves_from(&self, from: Square) -> Vec<Square> {
        if self.is_game_over() || self.pending_promotion.is_some() {
            return Vec::new();
        }
        match self.board.piece_at(from) {
            Some(pc) if pc.color == self.current_turn => legal_moves_from(&self.board, from),
            _ => Vec::new(),
        }
    }

    pub fn make_move(&mut self, from: Square, to: Square) -> bool {
        if self.is_game_over() {
            debug!(%from, %to, "move rejected: game is over");
            return false;
        }
        if self.check_timeout() {
            return false;
        }
        if let Some(sq) = self.pending_promotion {
            debug!(%from, %to, pending = %sq, "move rejected: promotion pending");
            return false;
        }

        let mover = self.current_turn;
        let piece = match self.board.piece_at(from) {
            Some(p) if p.color == mover => p,
            Some(_) => {
                debug!(%from, %to, side = %mover, "move rejected: piece belongs to the other side");
                return false;
            }
            None => {
                debug!(%from, %to, "move rejected: empty square");
                self.end_if_stalemated();
                return false;
            }
        };

        // a move also restarts a paused clock
        if !self.timer.is_running() {
            self.timer.start();
        }

        if !self.board.leaves_king_safe(from, to) {
            debug!(%from, %to, "move rejected: king would be in check");
            self.end_if_stalemated();
            return false;
        }
        if !self.board.move_piece(from, to, mover) {
            debug!(%from, %to, "move rejected: not a legal move");
            self.end_if_stalemated();
            return false;
        }
        trace!(%from, %to, side = %mover, "move played");

        let double_push = piece.kind == PieceKind::Pawn && (to.rank() - from.rank()).abs() == 2;
        let ep = if double_push {
            from.offset(0, mover.forward())
        } else {
            None
        };
        self.board.set_en_passant_target(ep);

        let mut fifty = false;
        if piece.kind == PieceKind::Pawn || self.board.capture_made() {
            self.half_move_counter = 0;
            self.history.clear();
        } else {
            self.half_move_counter += 1;
            fifty = self.half_move_counter >= FIFTY_MOVE_LIMIT;
        }

        if piece.kind == PieceKind::Pawn && to.rank() == mover.promotion_rank() {
            self.pending_promotion = Some(to);
        }

        self.current_turn = mover.other();
        let snap = self.snapshot();
        self.history.push(snap);

        if fifty {
            self.finish(GameStatus::FiftyMoveRule);
            return true;
        }
        if self.pending_promotion.is_none() {
            self.complete_move();
        }
        true
    }

    /// Replace a pawn on its last rank with a new piece of `kind`. Returns
    /// false, changing nothing, for any other square, piece or kind.
    pub fn promote_pawn(&mut self, sq: Square, kind: PieceKind) -> bool {
        if self.is_game_over() || !kind.is_promotion_target() {
            return false;
        }
        let pawn = match self.board.piece_at(sq) {
            Some(p) if p.kind == PieceKind::Pawn => p,
            _ => return false,
        };
        if sq.rank() != pawn.color.promotion_rank() {
            return false;
        }

        self.board.set_piece(sq, Some(Piece::new(pawn.color, kind)));
        debug!(square = %sq, ?kind, "pawn promoted");

        if self.pending_promotion == Some(sq) {
            self.pending_promotion = None;
            let snap = self.snapshot();
            if let Some(last) = self.history.last_mut() {
                *last = snap;
            }
            self.complete_move();
        }
        true
    }

    /// End the game if the side on the clock has run out of time.
    pub fn check_timeout(&mut self) -> bool {
        if self.is_game_over() {
            return matches!(self.status, GameStatus::Timeout { .. });
        }
        if !self.timer.is_timeout() {
            return false;
        }
        let loser = self.timer.active_side();
        self.timeout_player = Some(loser);
        self.finish(GameStatus::Timeout { loser });
        true
    }

    /// Stop the clocks. Only once the game has started and while it is on.
    pub fn pause_timer(&mut self) -> bool {
        if self.is_game_over() || !self.timer.has_started() {
            return false;
        }
        self.timer.stop();
        true
    }

    pub fn resume_timer(&mut self) -> bool {
        if self.is_game_over() || !self.timer.has_started() {
            return false;
        }
        self.timer.start();
        true
    }

    /// True when the side to move is in check and nothing resolves it.
    pub fn is_checkmate(&self) -> bool {
        let color = self.current_turn;
        let enemy = color.other();
        let king = match self.board.find_king(color) {
            Some(k) => k,
            None => return false,
        };
        if !self.board.is_square_attacked(king, enemy) {
            return false;
        }
        if !legal_moves_from(&self.board, king).is_empty() {
            return false;
        }

        let attackers = self.board.attackers_of(king, enemy);
        let attacker = match attackers.as_slice() {
            [single] => *single,
            [] => return false,
            // double check: only the king could help and it cannot move
            _ => return true,
        };
        if self.can_reach(attacker, color, |_| true) {
            return false;
        }

        let attacker_piece = match self.board.piece_at(attacker) {
            Some(p) => p,
            None => return false,
        };

        // a checking pawn that just advanced two squares can be taken en passant
        if attacker_piece.kind == PieceKind::Pawn {
            if let Some(ep) = self.board.en_passant_target() {
                if ep.offset(0, enemy.forward()) == Some(attacker)
                    && self.can_reach(ep, color, |pc| pc.kind == PieceKind::Pawn)
                {
                    return false;
                }
            }
        }

        if attacker_piece.kind.is_slider() {
            let blockable = movegen::squares_between(king, attacker)
                .into_iter()
                .any(|sq| self.can_reach(sq, color, |pc| pc.kind != PieceKind::King));
            if blockable {
                return false;
            }
        }
        true
    }

    /// True when the side to move is not in check and has no legal move.
    pub fn is_stalemate(&self) -> bool {
        if self.in_check() {
            return false;
        }
        !movegen::has_legal_move(&self.board, self.current_turn)
    }

    /// Only kings, or kings plus a single bishop or knight, remain.
    pub fn has_insufficient_material(&self) -> bool {
        let mut minors = 0;
        for (_, pc) in self.board.pieces() {
            match pc.kind {
                PieceKind::King => {}
                PieceKind::Bishop | PieceKind::Knight => minors += 1,
                _ => return false,
            }
        }
        minors <= 1
    }

    pub fn is_threefold_repetition(&self) -> bool {
        let current = self.snapshot();
        self.history.iter().filter(|s| **s == current).count() >= REPETITION_LIMIT
    }

    /// Whether some piece of `color` accepted by `filter` can legally move to `target`.
    fn can_reach(&self, target: Square, color: Color, filter: impl Fn(Piece) -> bool) -> bool {
        self.board.pieces().any(|(from, pc)| {
            pc.color == color
                && filter(pc)
                && movegen::candidate_moves(&self.board, from).contains(&target)
                && self.board.leaves_king_safe(from, target)
        })
    }

    /// Draw by insufficient material, or stalemate, for the side to move.
    fn drawn_outcome(&self) -> Option<GameStatus> {
        if self.has_insufficient_material() {
            Some(GameStatus::InsufficientMaterial)
        } else if self.is_stalemate() {
            Some(GameStatus::Stalemate)
        } else {
            None
        }
    }

    /// A rejected move may mean the side to move has nothing legal at all.
    fn end_if_stalemated(&mut self) {
        if let Some(outcome) = self.drawn_outcome() {
            self.finish(outcome);
        }
    }

    /// Evaluate the position after a finished move and hand over the clock.
    fn complete_move(&mut self) {
        if self.is_threefold_repetition() {
            self.finish(GameStatus::ThreefoldRepetition);
            return;
        }
        if self.is_checkmate() {
            let winner = self.current_turn.other();
            self.finish(GameStatus::Checkmate { winner });
            return;
        }
        if let Some(outcome) = self.drawn_outcome() {
            self.finish(outcome);
            return;
        }
        self.timer.switch_turn();
    }

    fn finish(&mut self, status: GameStatus) {
        self.status = status;
        self.timer.stop();
        info!(?status, half_moves = self.half_move_counter, "game over");
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
