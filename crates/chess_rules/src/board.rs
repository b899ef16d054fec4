use crate::{
    movegen::{self, CastleSide},
    square::Square,
    types::*,
};

/// Piece placement plus the auxiliary state move execution needs.
///
/// The board is a fixed array of 64 optional pieces indexed by [`Square`],
/// so simulating a move is a plain copy of the value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    en_passant_target: Option<Square>, // square behind a pawn that just advanced 2
    last_move_from: Option<Square>,
    last_move_to: Option<Square>,
    capture_made: bool,
}

/// Colour and kind per square, without move-history flags.
pub type Placement = [Option<(Color, PieceKind)>; 64];

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Board {
    pub fn empty() -> Self {
        Board {
            squares: [None; 64],
            en_passant_target: None,
            last_move_from: None,
            last_move_to: None,
            capture_made: false,
        }
    }

    pub fn startpos() -> Self {
        let mut b = Board::empty();

        for f in 0..8 {
            b.place(f, 1, Color::White, PieceKind::Pawn);
            b.place(f, 6, Color::Black, PieceKind::Pawn);
        }
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            b.place(f as i8, 0, Color::White, kind);
            b.place(f as i8, 7, Color::Black, kind);
        }
        b
    }

    /// Board holding exactly the given pieces, all unmoved.
    pub fn from_pieces<I>(pieces: I) -> Self
    where
        I: IntoIterator<Item = (Square, Color, PieceKind)>,
    {
        let mut b = Board::empty();
        for (sq, color, kind) in pieces {
            b.set_piece(sq, Some(Piece::new(color, kind)));
        }
        b
    }

    fn place(&mut self, file: i8, rank: i8, color: Color, kind: PieceKind) {
        if let Some(sq) = Square::new(file, rank) {
            self.set_piece(sq, Some(Piece::new(color, kind)));
        }
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    pub fn set_piece(&mut self, sq: Square, pc: Option<Piece>) {
        self.squares[sq.index()] = pc;
    }

    /// Occupied squares in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|pc| (sq, pc)))
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().filter(|s| s.is_some()).count()
    }

    pub fn find_king(&self, c: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, pc)| pc.color == c && pc.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    pub fn set_en_passant_target(&mut self, sq: Option<Square>) {
        self.en_passant_target = sq;
    }

    pub fn last_move(&self) -> Option<(Square, Square)> {
        self.last_move_from.zip(self.last_move_to)
    }

    /// Whether the last executed move captured something, en passant included.
    pub fn capture_made(&self) -> bool {
        self.capture_made
    }

    pub fn placement(&self) -> Placement {
        let mut out: Placement = [None; 64];
        for (slot, pc) in out.iter_mut().zip(self.squares.iter()) {
            *slot = pc.map(|p| (p.color, p.kind));
        }
        out
    }

    pub fn is_square_attacked(&self, target: Square, by: Color) -> bool {
        self.pieces()
            .any(|(from, pc)| pc.color == by && movegen::attacks(self, from, target))
    }

    /// True if any of `squares` is attacked by `by`. Used for castling paths.
    pub fn is_square_under_attack(&self, squares: &[Square], by: Color) -> bool {
        squares.iter().any(|&sq| self.is_square_attacked(sq, by))
    }

    /// Squares of every `by` piece attacking `target`.
    pub fn attackers_of(&self, target: Square, by: Color) -> Vec<Square> {
        self.pieces()
            .filter(|&(from, pc)| pc.color == by && movegen::attacks(self, from, target))
            .map(|(from, _)| from)
            .collect()
    }

    /// A board without a king of colour `c` is never in check.
    pub fn is_king_in_check(&self, c: Color) -> bool {
        match self.find_king(c) {
            Some(ksq) => self.is_square_attacked(ksq, c.other()),
            None => false,
        }
    }

    /// Play `from -> to` on a copy and report whether the mover's king is safe
    /// afterwards. The move is not checked against the piece's move set.
    pub fn leaves_king_safe(&self, from: Square, to: Square) -> bool {
        let mover = match self.piece_at(from) {
            Some(pc) => pc.color,
            None => return false,
        };
        let mut sim = self.clone();
        sim.apply(from, to);
        !sim.is_king_in_check(mover)
    }

    /// Execute a move for `turn` if it is one of the piece's generated moves
    /// and does not leave its king in check. Returns false and leaves the
    /// board untouched otherwise.
    pub fn move_piece(&mut self, from: Square, to: Square, turn: Color) -> bool {
        let piece = match self.piece_at(from) {
            Some(p) => p,
            None => return false,
        };
        if piece.color != turn {
            return false;
        }
        if !movegen::candidate_moves(self, from).contains(&to) {
            return false;
        }

        if piece.kind == PieceKind::King && (to.file() - from.file()).abs() == 2 {
            return self.perform_castling(from, to, turn);
        }

        if !self.leaves_king_safe(from, to) {
            return false;
        }

        let captured = self.apply(from, to);
        self.capture_made = captured;
        self.last_move_from = Some(from);
        self.last_move_to = Some(to);
        true
    }

    fn perform_castling(&mut self, from: Square, to: Square, turn: Color) -> bool {
        let side = match CastleSide::from_king_target(to) {
            Some(s) => s,
            None => return false,
        };
        if to.rank() != from.rank() || !movegen::can_castle(self, from, turn, side) {
            return false;
        }

        self.apply(from, to);
        self.capture_made = false;
        self.last_move_from = Some(from);
        self.last_move_to = Some(to);
        true
    }

    /// Raw move execution: relocates the piece, removes an en-passant victim,
    /// brings the rook along when a king moves two files, and sets the moved
    /// flag. Returns whether a piece was captured. No legality checks.
    fn apply(&mut self, from: Square, to: Square) -> bool {
        let mut moved = match self.piece_at(from) {
            Some(p) => p,
            None => return false,
        };
        let mut captured = self.piece_at(to).is_some();

        if moved.kind == PieceKind::Pawn
            && !captured
            && to.file() != from.file()
            && self.en_passant_target == Some(to)
        {
            // victim sits one rank behind the target, seen from the mover
            if let Some(victim) = to.offset(0, -moved.color.forward()) {
                self.set_piece(victim, None);
                captured = true;
            }
        }

        if moved.kind == PieceKind::King && (to.file() - from.file()).abs() == 2 {
            if let Some(side) = CastleSide::from_king_target(to) {
                let (rf, rt) = side.rook_files();
                if let (Some(rook_from), Some(rook_to)) =
                    (Square::new(rf, from.rank()), Square::new(rt, from.rank()))
                {
                    if let Some(mut rook) = self.piece_at(rook_from) {
                        rook.mark_moved();
                        self.set_piece(rook_from, None);
                        self.set_piece(rook_to, Some(rook));
                    }
                }
            }
        }

        moved.mark_moved();
        self.set_piece(from, None);
        self.set_piece(to, Some(moved));
        captured
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
