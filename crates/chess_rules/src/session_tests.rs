use super::*;
use crate::error::ChessError;
use crate::timer::ManualTimeSource;

fn manual_session(minutes: u32) -> (GameSession, ManualTimeSource) {
    let clock = ManualTimeSource::new();
    let session = GameSession::with_time_source(
        GameConfig::with_time_minutes(minutes),
        Arc::new(clock.clone()),
    );
    (session, clock)
}

#[test]
fn test_malformed_squares_are_errors() {
    let mut session = GameSession::default();
    let before = session.game().board().clone();

    assert_eq!(
        session.make_move("e9", "e4").unwrap_err(),
        ChessError::InvalidSquare("e9".to_string())
    );
    assert!(session.make_move("e2", "").is_err());
    assert!(session.valid_moves("z1").is_err());
    assert!(session.promote_pawn("e2e4", "queen").is_err());

    assert_eq!(session.game().board(), &before);
    assert_eq!(session.current_turn(), Color::White);
    assert!(!session.game().timer().has_started());
}

#[test]
fn test_valid_moves_by_label() {
    let session = GameSession::default();
    let mut moves: Vec<String> = session
        .valid_moves("b1")
        .unwrap()
        .into_iter()
        .map(|s| s.label())
        .collect();
    moves.sort();
    assert_eq!(moves, vec!["a3", "c3"]);
    assert!(session.valid_moves("e7").unwrap().is_empty());
    assert!(session.valid_moves("e4").unwrap().is_empty());
}

#[test]
fn test_move_report_and_captures() {
    let mut session = GameSession::default();
    let report = session.make_move("e2", "e4").unwrap();
    assert!(report.success);
    assert_eq!(report.captured, None);
    assert_eq!(report.status.turn, Color::Black);

    let report = session.make_move("e2", "e3").unwrap();
    assert!(!report.success);

    assert!(session.make_move("d7", "d5").unwrap().success);
    let report = session.make_move("e4", "d5").unwrap();
    assert!(report.success);
    assert_eq!(
        report.captured,
        Some(PieceSummary {
            kind: PieceKind::Pawn,
            color: Color::Black,
        })
    );
}

#[test]
fn test_en_passant_capture_reported() {
    let mut session = GameSession::default();
    for (from, to) in [("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")] {
        assert!(session.make_move(from, to).unwrap().success);
    }
    let report = session.make_move("e5", "d6").unwrap();
    assert!(report.success);
    assert_eq!(report.captured.map(|c| c.color), Some(Color::Black));
    assert!(!session.board_snapshot().contains_key(&"d5".parse::<Square>().unwrap()));
}

#[test]
fn test_rejected_capture_reports_nothing() {
    let mut session = GameSession::default();
    // queen cannot jump its own pawn to take d7
    let report = session.make_move("d1", "d7").unwrap();
    assert!(!report.success);
    assert_eq!(report.captured, None);
}

#[test]
fn test_bad_promotion_piece_is_soft() {
    let mut session = GameSession::default();
    assert!(session.promote_pawn("e2", "dragon").is_ok());
    assert!(session.promote_pawn("e2", "queen").is_ok());
    let pawn = session.game().board().piece_at("e2".parse().unwrap()).unwrap();
    assert_eq!(pawn.kind, PieceKind::Pawn);
}

#[test]
fn test_status_result_strings() {
    let mut session = GameSession::default();
    for (from, to) in [
        ("e2", "e4"),
        ("e7", "e5"),
        ("f1", "c4"),
        ("b8", "c6"),
        ("d1", "h5"),
        ("g8", "f6"),
        ("h5", "f7"),
    ] {
        assert!(session.make_move(from, to).unwrap().success);
    }
    let status = session.status();
    assert!(status.game_over);
    assert!(status.in_check);
    assert_eq!(status.result.as_deref(), Some("White wins by checkmate"));
    assert_eq!(status.outcome, GameStatus::Checkmate { winner: Color::White });
}

#[test]
fn test_status_polls_timeout() {
    let (mut session, clock) = manual_session(1);
    assert!(session.make_move("e2", "e4").unwrap().success);
    clock.advance(30_500);
    let status = session.status();
    assert!(!status.game_over);
    assert_eq!(status.black_time, "00:29");
    assert_eq!(status.white_time, "01:00");

    clock.advance(40_000);
    let status = session.status();
    assert!(status.game_over);
    assert_eq!(status.result.as_deref(), Some("White wins on time"));
    assert_eq!(status.black_time, "00:00");
    assert_eq!(session.game().timeout_player(), Some(Color::Black));
}

#[test]
fn test_new_game_resets_and_overrides_minutes() {
    let (mut session, clock) = manual_session(5);
    assert!(session.make_move("e2", "e4").unwrap().success);
    clock.advance(10_000);

    session.new_game(Some(2));
    assert_eq!(session.current_turn(), Color::White);
    assert_eq!(session.board_snapshot().len(), 32);
    let status = session.status();
    assert_eq!(status.white_time, "02:00");
    assert_eq!(status.black_time, "02:00");

    session.new_game(None);
    assert_eq!(session.status().white_time, "05:00");
}

#[test]
fn test_pause_resume_through_session() {
    let (mut session, clock) = manual_session(5);
    assert!(!session.pause_timer());
    assert!(session.make_move("e2", "e4").unwrap().success);
    assert!(session.pause_timer());
    clock.advance(60_000);
    assert_eq!(session.status().black_time, "05:00");
    assert!(session.resume_timer());
    clock.advance(60_000);
    assert_eq!(session.status().black_time, "04:00");
}

#[test]
fn test_json_shapes() {
    let mut session = GameSession::default();
    let board = serde_json::to_value(session.board_snapshot()).unwrap();
    assert_eq!(board["e1"], serde_json::json!({"type": "king", "color": "white"}));
    assert_eq!(board["d8"]["type"], "queen");
    assert!(board.get("e4").is_none());

    let status = serde_json::to_value(session.status()).unwrap();
    assert_eq!(status["turn"], "white");
    assert_eq!(status["gameOver"], false);
    assert_eq!(status["result"], serde_json::Value::Null);
    assert_eq!(status["outcome"]["kind"], "ongoing");
    assert_eq!(status["whiteTime"], "05:00");

    let outcome = serde_json::to_value(GameStatus::Timeout { loser: Color::Black }).unwrap();
    assert_eq!(outcome, serde_json::json!({"kind": "timeout", "loser": "black"}));
}
