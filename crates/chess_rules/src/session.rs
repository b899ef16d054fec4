//! Caller-facing facade over one [`Game`].
//!
//! Everything here takes square labels as strings, as a request handler
//! would receive them. Malformed labels are rejected with
//! [`ChessError::InvalidSquare`] before the game is touched; illegal moves
//! and bad promotion requests stay soft failures.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    config::GameConfig,
    error::Result,
    game::{Game, GameStatus},
    square::Square,
    timer::{ChessTimer, TimeSource},
    types::*,
    Board,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PieceSummary {
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub color: Color,
}

impl From<Piece> for PieceSummary {
    fn from(pc: Piece) -> Self {
        Self {
            kind: pc.kind,
            color: pc.color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub turn: Color,
    pub game_over: bool,
    pub in_check: bool,
    pub result: Option<String>,
    pub outcome: GameStatus,
    pub pending_promotion: Option<Square>,
    pub white_time: String,
    pub black_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveReport {
    pub success: bool,
    pub captured: Option<PieceSummary>,
    pub status: StatusView,
}

#[derive(Debug)]
pub struct GameSession {
    game: Game,
    config: GameConfig,
    time_source: Option<Arc<dyn TimeSource>>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        Self {
            game: Game::new(&config),
            config,
            time_source: None,
        }
    }

    /// Session whose clocks read `source` instead of the system clock.
    pub fn with_time_source(config: GameConfig, source: Arc<dyn TimeSource>) -> Self {
        let timer = ChessTimer::with_source(config.time_minutes, source.clone());
        Self {
            game: Game::with_timer(Board::startpos(), Color::White, timer),
            config,
            time_source: Some(source),
        }
    }

    /// Replace the game with a fresh starting position. `minutes` overrides
    /// the configured clock budget.
    pub fn new_game(&mut self, minutes: Option<u32>) {
        let minutes = minutes.unwrap_or(self.config.time_minutes);
        let timer = match &self.time_source {
            Some(src) => ChessTimer::with_source(minutes, src.clone()),
            None => ChessTimer::new(minutes),
        };
        self.game = Game::with_timer(Board::startpos(), Color::White, timer);
        info!(minutes, "new game");
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn board_snapshot(&self) -> BTreeMap<Square, PieceSummary> {
        self.game
            .board()
            .pieces()
            .map(|(sq, pc)| (sq, PieceSummary::from(pc)))
            .collect()
    }

    pub fn current_turn(&self) -> Color {
        self.game.current_turn()
    }

    pub fn is_game_over(&self) -> bool {
        self.game.is_game_over()
    }

    /// Current status. Polls the clock first so a flag fall is reported.
    pub fn status(&mut self) -> StatusView {
        self.game.check_timeout();
        self.status_view()
    }

    pub fn valid_moves(&self, square: &str) -> Result<Vec<Square>> {
        let sq: Square = square.parse()?;
        Ok(self.game.legal_moves_from(sq))
    }

    pub fn make_move(&mut self, from: &str, to: &str) -> Result<MoveReport> {
        let from: Square = from.parse()?;
        let to: Square = to.parse()?;

        let captured = self.capture_victim(from, to);
        let success = self.game.make_move(from, to);
        debug!(%from, %to, success, "move requested");

        Ok(MoveReport {
            success,
            captured: if success { captured } else { None },
            status: self.status_view(),
        })
    }

    /// Unknown piece names are ignored like any other invalid promotion.
    pub fn promote_pawn(&mut self, square: &str, piece: &str) -> Result<()> {
        let sq: Square = square.parse()?;
        match piece.parse::<PieceKind>() {
            Ok(kind) => {
                if !self.game.promote_pawn(sq, kind) {
                    debug!(square = %sq, piece, "promotion ignored");
                }
            }
            Err(e) => debug!(error = %e, "promotion ignored"),
        }
        Ok(())
    }

    pub fn pause_timer(&mut self) -> bool {
        self.game.pause_timer()
    }

    pub fn resume_timer(&mut self) -> bool {
        self.game.resume_timer()
    }

    fn status_view(&self) -> StatusView {
        let outcome = self.game.status();
        StatusView {
            turn: self.game.current_turn(),
            game_over: outcome.is_over(),
            in_check: self.game.in_check(),
            result: outcome.description(),
            outcome,
            pending_promotion: self.game.pending_promotion(),
            white_time: self.game.timer().formatted_time(Color::White),
            black_time: self.game.timer().formatted_time(Color::Black),
        }
    }

    /// Piece that `from -> to` would capture, en passant included.
    fn capture_victim(&self, from: Square, to: Square) -> Option<PieceSummary> {
        let board = self.game.board();
        if let Some(pc) = board.piece_at(to) {
            return Some(pc.into());
        }
        let mover = board.piece_at(from)?;
        if mover.kind == PieceKind::Pawn
            && from.file() != to.file()
            && board.en_passant_target() == Some(to)
        {
            let victim = to.offset(0, -mover.color.forward())?;
            return board.piece_at(victim).map(PieceSummary::from);
        }
        None
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
