//! Per-piece move generation.
//!
//! [`candidate_moves`] lists every square a piece could move to or capture on,
//! castling included, without asking whether its own king ends up in check.
//! [`legal_moves_from`] adds that filter by simulating each candidate on a copy
//! of the board.

use crate::{board::Board, square::Square, types::*};

pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

pub const KING_DELTAS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

pub const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const KING_HOME_FILE: i8 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// Castling side implied by the king's destination file (g or c).
    pub fn from_king_target(to: Square) -> Option<CastleSide> {
        match to.file() {
            6 => Some(CastleSide::Kingside),
            2 => Some(CastleSide::Queenside),
            _ => None,
        }
    }

    /// (rook source file, rook destination file)
    pub fn rook_files(self) -> (i8, i8) {
        match self {
            CastleSide::Kingside => (7, 5),
            CastleSide::Queenside => (0, 3),
        }
    }

    pub fn king_target_file(self) -> i8 {
        match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        }
    }

    /// Files strictly between king and rook; all must be empty.
    fn between_files(self) -> &'static [i8] {
        match self {
            CastleSide::Kingside => &[5, 6],
            CastleSide::Queenside => &[1, 2, 3],
        }
    }

    /// Files the king stands on or crosses, start and destination included.
    fn king_path_files(self) -> &'static [i8] {
        match self {
            CastleSide::Kingside => &[4, 5, 6],
            CastleSide::Queenside => &[4, 3, 2],
        }
    }
}

pub fn candidate_moves(board: &Board, from: Square) -> Vec<Square> {
    let mut out = Vec::with_capacity(28);
    candidate_moves_into(board, from, &mut out);
    out
}

/// Candidate destinations for the piece on `from`, appended to `out`.
/// Empty squares produce nothing.
pub fn candidate_moves_into(board: &Board, from: Square, out: &mut Vec<Square>) {
    let pc = match board.piece_at(from) {
        Some(p) => p,
        None => return,
    };
    match pc.kind {
        PieceKind::Pawn => gen_pawn(board, from, pc.color, out),
        PieceKind::Knight => gen_steps(board, from, pc.color, &KNIGHT_DELTAS, out),
        PieceKind::Bishop => gen_slider(board, from, pc.color, &DIAGONALS, out),
        PieceKind::Rook => gen_slider(board, from, pc.color, &ORTHOGONALS, out),
        PieceKind::Queen => {
            gen_slider(board, from, pc.color, &ORTHOGONALS, out);
            gen_slider(board, from, pc.color, &DIAGONALS, out);
        }
        PieceKind::King => {
            gen_steps(board, from, pc.color, &KING_DELTAS, out);
            if !pc.moved {
                gen_castle(board, from, pc.color, out);
            }
        }
    }
}

fn gen_pawn(board: &Board, from: Square, c: Color, out: &mut Vec<Square>) {
    let dir = c.forward();
    let start_rank: i8 = match c {
        Color::White => 1,
        Color::Black => 6,
    };
    // rank a pawn must stand on to take en passant
    let ep_rank: i8 = match c {
        Color::White => 4,
        Color::Black => 3,
    };

    // forward 1
    if let Some(to) = from.offset(0, dir) {
        if board.piece_at(to).is_none() {
            out.push(to);

            // forward 2 from start
            let unmoved = board.piece_at(from).is_some_and(|p| !p.moved);
            if from.rank() == start_rank && unmoved {
                if let Some(to2) = from.offset(0, 2 * dir) {
                    if board.piece_at(to2).is_none() {
                        out.push(to2);
                    }
                }
            }
        }
    }

    // captures + en-passant
    for df in [-1, 1] {
        if let Some(to) = from.offset(df, dir) {
            match board.piece_at(to) {
                Some(tpc) if tpc.color != c => out.push(to),
                Some(_) => {}
                None => {
                    if board.en_passant_target() == Some(to) && from.rank() == ep_rank {
                        out.push(to);
                    }
                }
            }
        }
    }
}

fn gen_steps(board: &Board, from: Square, c: Color, deltas: &[(i8, i8)], out: &mut Vec<Square>) {
    for &(df, dr) in deltas {
        if let Some(to) = from.offset(df, dr) {
            match board.piece_at(to) {
                None => out.push(to),
                Some(pc) if pc.color != c => out.push(to),
                _ => {}
            }
        }
    }
}

fn gen_slider(board: &Board, from: Square, c: Color, dirs: &[(i8, i8)], out: &mut Vec<Square>) {
    for &(df, dr) in dirs {
        let mut cur = from;
        while let Some(to) = cur.offset(df, dr) {
            match board.piece_at(to) {
                None => out.push(to),
                Some(pc) if pc.color != c => {
                    out.push(to);
                    break;
                }
                _ => break,
            }
            cur = to;
        }
    }
}

fn gen_castle(board: &Board, from: Square, c: Color, out: &mut Vec<Square>) {
    for side in [CastleSide::Kingside, CastleSide::Queenside] {
        if can_castle(board, from, c, side) {
            if let Some(to) = Square::new(side.king_target_file(), c.back_rank()) {
                out.push(to);
            }
        }
    }
}

/// Every castling precondition: unmoved king on its home square, unmoved rook
/// on its corner, empty squares in between, king not in check, and no square
/// on the king's path attacked.
pub fn can_castle(board: &Board, king_from: Square, c: Color, side: CastleSide) -> bool {
    let back = c.back_rank();
    if king_from.rank() != back || king_from.file() != KING_HOME_FILE {
        return false;
    }
    match board.piece_at(king_from) {
        Some(k) if k.color == c && k.kind == PieceKind::King && !k.moved => {}
        _ => return false,
    }

    let (rook_file, _) = side.rook_files();
    let rook_ok = Square::new(rook_file, back)
        .and_then(|s| board.piece_at(s))
        .is_some_and(|r| r.color == c && r.kind == PieceKind::Rook && !r.moved);
    if !rook_ok {
        return false;
    }

    let blocked = side
        .between_files()
        .iter()
        .filter_map(|&f| Square::new(f, back))
        .any(|s| board.piece_at(s).is_some());
    if blocked {
        return false;
    }

    let path: Vec<Square> = side
        .king_path_files()
        .iter()
        .filter_map(|&f| Square::new(f, back))
        .collect();
    !board.is_square_under_attack(&path, c.other())
}

/// Whether the piece on `from` attacks `target`. Unlike [`candidate_moves`]
/// this ignores who stands on `target`, pawns attack only diagonally and
/// castling never attacks.
pub fn attacks(board: &Board, from: Square, target: Square) -> bool {
    let pc = match board.piece_at(from) {
        Some(p) => p,
        None => return false,
    };
    if from == target {
        return false;
    }
    let df = target.file() - from.file();
    let dr = target.rank() - from.rank();
    let straight = df == 0 || dr == 0;
    let diagonal = df.abs() == dr.abs();
    match pc.kind {
        PieceKind::Pawn => dr == pc.color.forward() && df.abs() == 1,
        PieceKind::Knight => matches!((df.abs(), dr.abs()), (1, 2) | (2, 1)),
        PieceKind::King => df.abs() <= 1 && dr.abs() <= 1,
        PieceKind::Bishop => diagonal && ray_clear(board, from, target),
        PieceKind::Rook => straight && ray_clear(board, from, target),
        PieceKind::Queen => (straight || diagonal) && ray_clear(board, from, target),
    }
}

fn ray_clear(board: &Board, from: Square, target: Square) -> bool {
    squares_between(from, target)
        .into_iter()
        .all(|s| board.piece_at(s).is_none())
}

/// Squares strictly between two squares sharing a rank, file or diagonal.
/// Empty when they are adjacent or not aligned.
pub fn squares_between(a: Square, b: Square) -> Vec<Square> {
    let df = b.file() - a.file();
    let dr = b.rank() - a.rank();
    if a == b || !(df == 0 || dr == 0 || df.abs() == dr.abs()) {
        return Vec::new();
    }
    let (sf, sr) = (df.signum(), dr.signum());
    let mut out = Vec::new();
    let mut cur = a;
    while let Some(next) = cur.offset(sf, sr) {
        if next == b {
            break;
        }
        out.push(next);
        cur = next;
    }
    out
}

/// Candidate moves of the piece on `from` that do not leave its own king in check.
pub fn legal_moves_from(board: &Board, from: Square) -> Vec<Square> {
    let mut out = candidate_moves(board, from);
    out.retain(|&to| board.leaves_king_safe(from, to));
    out
}

/// Whether `color` has at least one legal move anywhere on the board.
pub fn has_legal_move(board: &Board, color: Color) -> bool {
    let mut buf = Vec::with_capacity(28);
    for (from, pc) in board.pieces() {
        if pc.color != color {
            continue;
        }
        buf.clear();
        candidate_moves_into(board, from, &mut buf);
        if buf.iter().any(|&to| board.leaves_king_safe(from, to)) {
            return true;
        }
    }
    false
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
