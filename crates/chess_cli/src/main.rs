use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chess_rules::{ChessError, GameConfig, GameSession};

const USAGE: &str = "usage: chess_cli [--config <path>]";

fn config_path() -> Result<Option<PathBuf>, String> {
    let mut args = std::env::args().skip(1);
    let mut path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => match args.next() {
                Some(p) => path = Some(PathBuf::from(p)),
                None => return Err(USAGE.to_string()),
            },
            "--help" | "-h" => return Err(USAGE.to_string()),
            other => return Err(format!("unknown argument {other:?}\n{USAGE}")),
        }
    }
    Ok(path)
}

fn emit<T: Serialize>(out: &mut impl Write, value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => {
            writeln!(out, "{s}").ok();
        }
        Err(e) => warn!(error = %e, "failed to encode response"),
    }
    out.flush().ok();
}

fn emit_error(out: &mut impl Write, err: &ChessError) {
    emit(out, &json!({ "error": err.to_string() }));
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = match config_path() {
        Ok(Some(path)) => match GameConfig::load(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(2);
            }
        },
        Ok(None) => GameConfig::default(),
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };
    info!(time_minutes = config.time_minutes, "starting");

    // One game per process, driven by line commands on stdin.
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut session = GameSession::new(config);

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts.as_slice() {
            ["new"] => {
                session.new_game(None);
                emit(&mut stdout, &session.status());
            }
            ["new", minutes] => match minutes.parse::<u32>() {
                Ok(m) => {
                    session.new_game(Some(m));
                    emit(&mut stdout, &session.status());
                }
                Err(_) => emit(&mut stdout, &json!({ "error": "minutes must be a number" })),
            },
            ["board"] => emit(&mut stdout, &session.board_snapshot()),
            ["status"] => emit(&mut stdout, &session.status()),
            ["moves", square] => match session.valid_moves(square) {
                Ok(moves) => emit(&mut stdout, &moves),
                Err(e) => emit_error(&mut stdout, &e),
            },
            ["move", from, to] => match session.make_move(from, to) {
                Ok(report) => emit(&mut stdout, &report),
                Err(e) => emit_error(&mut stdout, &e),
            },
            ["promote", square, piece] => match session.promote_pawn(square, piece) {
                Ok(()) => emit(&mut stdout, &session.status()),
                Err(e) => emit_error(&mut stdout, &e),
            },
            ["pause"] => {
                let ok = session.pause_timer();
                emit(&mut stdout, &json!({ "success": ok }));
            }
            ["resume"] => {
                let ok = session.resume_timer();
                emit(&mut stdout, &json!({ "success": ok }));
            }
            ["quit"] => break,
            _ => emit(&mut stdout, &json!({ "error": format!("unknown command {line:?}") })),
        }
    }
}
