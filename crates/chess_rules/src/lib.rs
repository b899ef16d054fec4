//! Chess rules engine.
//!
//! Maintains board state, generates legal moves per piece, executes moves
//! (castling and en passant included), decides game termination and runs a
//! two-sided clock. One [`Game`] is one in-memory game; hosts that serve many
//! games keep one value per game and serialize calls to it.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod movegen;
pub mod session;
pub mod square;
pub mod timer;
pub mod types;

pub use board::*;
pub use config::*;
pub use error::*;
pub use game::*;
pub use movegen::*;
pub use session::*;
pub use square::*;
pub use timer::*;
pub use types::*;
