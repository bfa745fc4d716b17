//! Fixed timestep simulation tick
//!
//! Advances a rally deterministically: shuttlecock physics, robots, net,
//! then scoring.

use super::court::NetOutcome;
use super::shuttle::ShuttleState;
use super::state::{MatchEvent, MatchPhase, MatchState};

/// Advance the match by one fixed timestep and report what happened
pub fn tick(state: &mut MatchState, dt: f32) -> Vec<MatchEvent> {
    let mut events = Vec::new();
    if state.phase == MatchPhase::GameOver {
        return events;
    }
    state.time_ticks += 1;

    // Shuttlecock physics
    let was_moving = state.shuttle.state == ShuttleState::Move;
    state.shuttle.update(dt);
    if was_moving && state.shuttle.state != ShuttleState::Move {
        events.push(MatchEvent::Landed {
            position: state.shuttle.position,
        });
    }

    // Robots, always player one first
    for robot in &mut state.robots {
        events.push(MatchEvent::BeforeUpdate { player: robot.player });
        if let Some(hit) = robot.update(&mut state.shuttle, dt) {
            events.push(MatchEvent::AfterImpact(hit));
        }
    }

    // Net
    if let Some(outcome) = state.net.check(&mut state.shuttle) {
        if let NetOutcome::Hung { .. } = outcome {
            log::info!("shuttlecock caught in the net");
        }
        events.push(MatchEvent::NetCrossing(outcome));
    }

    // Scoring
    if state.phase != MatchPhase::Rally {
        return events;
    }
    if let Some(winner) = state.scoreboard.resolve(&state.shuttle) {
        let board = &state.scoreboard;
        log::info!(
            "point to player {} ({}-{})",
            winner.number(),
            board.score1,
            board.score2
        );
        events.push(MatchEvent::ScoreChange {
            winner,
            score1: board.score1,
            score2: board.score2,
        });
        state.phase = MatchPhase::PointScored;

        if let Some(game_winner) = board.winner() {
            log::info!("game to player {}", game_winner.number());
            events.push(MatchEvent::GameOver { winner: game_winner });
            state.phase = MatchPhase::GameOver;
        }
    }

    events
}
