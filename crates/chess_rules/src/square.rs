//! Board coordinates and algebraic square labels.
//!
//! Files and ranks are zero-based: `a1` is `(0, 0)` and `h8` is `(7, 7)`.
//! A [`Square`] stores the packed index `rank * 8 + file`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChessError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square(u8);

impl Square {
    /// Build a square from zero-based coordinates, `None` if off the board.
    pub fn new(file: i8, rank: i8) -> Option<Square> {
        if is_valid(file, rank) {
            Some(Square((rank as u8) * 8 + file as u8))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn file(self) -> i8 {
        (self.0 % 8) as i8
    }

    pub fn rank(self) -> i8 {
        (self.0 / 8) as i8
    }

    /// The square `(df, dr)` away from this one, if it is on the board.
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        Square::new(self.file() + df, self.rank() + dr)
    }

    /// All 64 squares, `a1` first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }

    pub fn label(self) -> String {
        let f = (b'a' + self.0 % 8) as char;
        let r = (b'1' + self.0 / 8) as char;
        format!("{f}{r}")
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self> {
        let (file, rank) = to_coords(s)?;
        Ok(Square((rank as u8) * 8 + file as u8))
    }
}

impl TryFrom<String> for Square {
    type Error = ChessError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> String {
        sq.label()
    }
}

/// Parse a label such as `"e4"` into `(file, rank)`.
pub fn to_coords(label: &str) -> Result<(i8, i8)> {
    let b = label.as_bytes();
    if b.len() != 2 {
        return Err(ChessError::InvalidSquare(label.to_string()));
    }
    let (f, r) = (b[0], b[1]);
    if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
        return Err(ChessError::InvalidSquare(label.to_string()));
    }
    Ok(((f - b'a') as i8, (r - b'1') as i8))
}

/// Inverse of [`to_coords`]; `None` when either coordinate is off the board.
pub fn to_label(file: i8, rank: i8) -> Option<Square> {
    Square::new(file, rank)
}

pub fn is_valid(file: i8, rank: i8) -> bool {
    (0..8).contains(&file) && (0..8).contains(&rank)
}

#[cfg(test)]
#[path = "square_tests.rs"]
mod square_tests;
