//! Shuttle Rally entry point
//!
//! Plays one game headless, exports the last rally's record and replays it.
//!
//! Usage: `shuttle-rally [config.json] [record-out.json]`

use std::process::ExitCode;

use shuttle_rally::SimConfig;
use shuttle_rally::sim::{MatchEvent, Record, Session};

/// Upper bound on simulated time for one game (ticks at 120 Hz)
const MAX_GAME_STEPS: usize = 120 * 60 * 60;
/// Upper bound on one rally (ticks at 120 Hz)
const MAX_RALLY_STEPS: usize = 120 * 120;

fn main() -> ExitCode {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let config = args.next().map(SimConfig::load).unwrap_or_default();
    let record_path = args.next();
    log::info!("Shuttle Rally starting (seed {})", config.seed);

    let mut session = Session::new(&config);
    session.add_listener(|event| {
        if let MatchEvent::ScoreChange { winner, score1, score2 } = event {
            println!("point to player {}: {}-{}", winner.number(), score1, score2);
        }
    });

    let mut steps = 0;
    while !session.is_game_over() && steps < MAX_GAME_STEPS {
        session.step();
        steps += 1;
    }
    let board = session.state.scoreboard.clone();
    match board.winner() {
        Some(winner) => println!(
            "game to player {} ({}-{}) after {:.1}s",
            winner.number(),
            board.score1,
            board.score2,
            steps as f32 * config.dt
        ),
        None => println!(
            "no winner after {:.1}s ({}-{})",
            steps as f32 * config.dt,
            board.score1,
            board.score2
        ),
    }

    // Round-trip the last rally through JSON and play it back
    let live_hits = session.rally_hits().to_vec();
    let live_rest = session.state.shuttle.position;
    let record = match session
        .recorder()
        .record()
        .to_json()
        .and_then(|json| Record::from_json(&json))
    {
        Ok(record) => record,
        Err(e) => {
            log::error!("Failed to export record: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = record_path {
        match record.save(&path) {
            Ok(()) => println!("record written to {}", path),
            Err(e) => log::error!("Failed to write {}: {}", path, e),
        }
    }

    session.replay(Some(record));
    session.run_rally(MAX_RALLY_STEPS);
    let matched = session.rally_hits() == live_hits.as_slice()
        && session.state.scoreboard == board
        && session.state.shuttle.position == live_rest;
    println!(
        "replay of the last rally ({} hits): {}",
        live_hits.len(),
        if matched { "identical" } else { "DIVERGED" }
    );

    if matched { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
