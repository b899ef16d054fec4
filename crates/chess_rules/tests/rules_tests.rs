//! Whole-game rule checks driven through the public `Game` API.

use rayon::prelude::*;

use chess_rules::{Board, Color, Game, GameConfig, GameStatus, PieceKind, Square};

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

fn play(game: &mut Game, moves: &[(&str, &str)]) {
    for (from, to) in moves {
        assert!(game.make_move(sq(from), sq(to)), "{from}{to} should be accepted");
    }
}

fn all_moves(game: &Game) -> Vec<(Square, Square)> {
    Square::all()
        .flat_map(|from| {
            game.legal_moves_from(from)
                .into_iter()
                .map(move |to| (from, to))
        })
        .collect()
}

fn count_nodes(game: &Game, depth: u32) -> u64 {
    let moves = all_moves(game);
    if depth <= 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|&(from, to)| {
            let mut child = game.clone();
            assert!(child.make_move(from, to));
            count_nodes(&child, depth - 1)
        })
        .sum()
}

fn count_nodes_par(game: &Game, depth: u32) -> u64 {
    if depth <= 1 {
        return count_nodes(game, depth);
    }
    all_moves(game)
        .par_iter()
        .map(|&(from, to)| {
            let mut child = game.clone();
            assert!(child.make_move(from, to));
            count_nodes(&child, depth - 1)
        })
        .sum()
}

#[test]
fn move_counts_from_start_position() {
    let game = Game::default();
    for (depth, expected) in [(1, 20), (2, 400), (3, 8902)] {
        let got = count_nodes_par(&game, depth);
        assert!(
            got == expected,
            "Node count mismatch at depth {}: expected {}, got {}",
            depth,
            expected,
            got
        );
    }
}

#[test]
fn move_count_with_castling_available() {
    let board = Board::from_pieces([
        (sq("e1"), Color::White, PieceKind::King),
        (sq("a1"), Color::White, PieceKind::Rook),
        (sq("h1"), Color::White, PieceKind::Rook),
        (sq("e8"), Color::Black, PieceKind::King),
        (sq("a8"), Color::Black, PieceKind::Rook),
        (sq("h8"), Color::Black, PieceKind::Rook),
    ]);
    let game = Game::from_board(board, Color::White, &GameConfig::default());
    assert_eq!(count_nodes(&game, 1), 26);
}

#[test]
fn scholars_mate() {
    let mut game = Game::default();
    play(
        &mut game,
        &[
            ("e2", "e4"),
            ("e7", "e5"),
            ("f1", "c4"),
            ("b8", "c6"),
            ("d1", "h5"),
            ("g8", "f6"),
            ("h5", "f7"),
        ],
    );
    assert_eq!(game.status(), GameStatus::Checkmate { winner: Color::White });
    assert!(!game.timer().is_running());
    assert!(all_moves(&game).is_empty());
}

#[test]
fn fools_mate() {
    let mut game = Game::default();
    play(
        &mut game,
        &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")],
    );
    assert_eq!(game.status(), GameStatus::Checkmate { winner: Color::Black });
    assert_eq!(game.status().winner(), Some(Color::Black));
}

#[test]
fn en_passant_in_play() {
    let mut game = Game::default();
    play(
        &mut game,
        &[("d2", "d4"), ("a7", "a5"), ("d4", "d5"), ("e7", "e5")],
    );
    assert_eq!(game.board().en_passant_target(), Some(sq("e6")));

    play(&mut game, &[("d5", "e6")]);
    assert!(game.board().piece_at(sq("e5")).is_none());
    assert_eq!(game.board().piece_at(sq("e6")).unwrap().color, Color::White);
    assert_eq!(game.half_move_counter(), 0);
    assert_eq!(game.board().piece_count(), 31);
}

#[test]
fn castling_both_sides_in_play() {
    let mut game = Game::default();
    play(
        &mut game,
        &[
            ("e2", "e4"),
            ("e7", "e5"),
            ("g1", "f3"),
            ("b8", "c6"),
            ("f1", "c4"),
            ("f8", "c5"),
            ("e1", "g1"),
            ("g8", "f6"),
            ("d2", "d3"),
            ("e8", "g8"),
        ],
    );
    for (king, rook) in [("g1", "f1"), ("g8", "f8")] {
        assert_eq!(game.board().piece_at(sq(king)).unwrap().kind, PieceKind::King);
        assert_eq!(game.board().piece_at(sq(rook)).unwrap().kind, PieceKind::Rook);
    }
    assert!(game.board().piece_at(sq("h1")).is_none());
    assert!(game.board().piece_at(sq("h8")).is_none());
}

#[test]
fn castling_refused_while_in_check() {
    let mut game = Game::default();
    // ...Bxf2+ leaves the king in check with f1 and g1 both empty
    play(
        &mut game,
        &[
            ("e2", "e4"),
            ("e7", "e5"),
            ("g1", "f3"),
            ("f8", "c5"),
            ("f1", "e2"),
            ("c5", "f2"),
        ],
    );
    assert!(game.in_check());
    assert!(!game.make_move(sq("e1"), sq("g1")));
    assert!(game.make_move(sq("e1"), sq("f1")));
}

#[test]
fn king_cannot_step_next_to_king() {
    let board = Board::from_pieces([
        (sq("e4"), Color::White, PieceKind::King),
        (sq("e6"), Color::Black, PieceKind::King),
    ]);
    let game = Game::from_board(board, Color::White, &GameConfig::default());
    let moves = game.legal_moves_from(sq("e4"));
    assert_eq!(moves.len(), 5);
    assert!(!moves.contains(&sq("e5")));
    assert!(!moves.contains(&sq("d5")));
    assert!(!moves.contains(&sq("f5")));
}

#[test]
fn underpromotion_to_knight_on_capture() {
    let board = Board::from_pieces([
        (sq("e1"), Color::White, PieceKind::King),
        (sq("g7"), Color::White, PieceKind::Pawn),
        (sq("h8"), Color::Black, PieceKind::Rook),
        (sq("h6"), Color::Black, PieceKind::King),
        (sq("a7"), Color::Black, PieceKind::Pawn),
    ]);
    let mut game = Game::from_board(board, Color::White, &GameConfig::default());
    play(&mut game, &[("g7", "h8")]);
    assert_eq!(game.pending_promotion(), Some(sq("h8")));
    assert!(game.promote_pawn(sq("h8"), PieceKind::Knight));
    // knight on h8 does not reach h6; f7 and g6 are its squares
    assert!(!game.in_check());
    assert!(!game.is_game_over());
    assert_eq!(game.current_turn(), Color::Black);
    assert_eq!(game.half_move_counter(), 0);
}
