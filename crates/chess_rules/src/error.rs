//! Error types for the rules engine.
//!
//! Only malformed input is an error. Illegal moves, rejected promotions and
//! moves after the game has ended are ordinary outcomes and are reported as
//! `false` or a no-op by the game API instead.

use thiserror::Error;

/// Errors surfaced by parsing and configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// Square label is not a file letter `a`-`h` followed by a rank digit `1`-`8`
    #[error("invalid square label {0:?}")]
    InvalidSquare(String),
    /// Piece name could not be parsed
    #[error("invalid piece kind {0:?}")]
    InvalidPieceKind(String),
    /// Configuration could not be read or parsed
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ChessError>;
