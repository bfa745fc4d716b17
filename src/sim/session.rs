//! Match driver
//!
//! Owns the match state and steps it at a fixed rate. In live play the
//! seeded planner makes every decision and the recorder logs them; in
//! replay the recorder feeds a logged rally back in instead.

use std::fmt;

use super::court::serve_from_right;
use super::record::{Record, Recorder};
use super::robot::Hit;
use super::state::{MatchEvent, MatchPhase, MatchState};
use super::tactics::Planner;
use super::tick::tick;
use crate::config::SimConfig;

/// Where decisions come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Replay,
}

type Listener = Box<dyn FnMut(&MatchEvent)>;

/// A running match
pub struct Session {
    pub state: MatchState,
    recorder: Recorder,
    planner: Planner,
    mode: Mode,
    listeners: Vec<Listener>,
    dt: f32,
    rally_reset_delay: f32,
    /// Time left before the next serve
    reset_timer: f32,
    /// Hits of the current rally
    rally_hits: Vec<Hit>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode)
            .field("phase", &self.state.phase)
            .field("scoreboard", &self.state.scoreboard)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Session {
    /// Set up a match and serve the first rally
    pub fn new(config: &SimConfig) -> Self {
        let state = MatchState::new(config);
        let recorder = Recorder::init(&state, None);
        let mut session = Self {
            state,
            recorder,
            planner: Planner::new(config.seed),
            mode: Mode::Live,
            listeners: Vec::new(),
            dt: config.dt,
            rally_reset_delay: config.rally_reset_delay,
            reset_timer: 0.0,
            rally_hits: Vec::new(),
        };
        session.start_rally();
        session
    }

    /// Register a callback for every event
    pub fn add_listener(&mut self, listener: impl FnMut(&MatchEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn rally_hits(&self) -> &[Hit] {
        &self.rally_hits
    }

    pub fn is_game_over(&self) -> bool {
        self.state.phase == MatchPhase::GameOver
    }

    /// The current rally has been scored
    pub fn is_rally_over(&self) -> bool {
        self.state.phase != MatchPhase::Rally
    }

    /// Serve a new live rally and start recording it
    pub fn start_rally(&mut self) {
        let server = self.state.scoreboard.server();
        let right = serve_from_right(self.state.scoreboard.score_of(server));
        let (serve_type, target) = self.planner.serve(server, right);
        self.state.start_rally(serve_type, target);
        self.recorder = Recorder::init(&self.state, None);
        self.recorder.record().init.sync_orientation(&mut self.state);
        self.recorder.record_robot(self.state.robot(server));
        self.mode = Mode::Live;
        self.rally_hits.clear();
    }

    /// Replay `record`, or the rally recorded last when `None`
    pub fn replay(&mut self, record: Option<Record>) {
        if let Some(record) = record {
            self.recorder = Recorder::init(&self.state, Some(record));
        }
        self.recorder.play(&mut self.state);
        self.mode = Mode::Replay;
        self.rally_hits.clear();
    }

    /// Advance one fixed step
    pub fn step(&mut self) -> Vec<MatchEvent> {
        let events = tick(&mut self.state, self.dt);

        for event in &events {
            match event {
                MatchEvent::AfterImpact(hit) => self.after_impact(hit),
                MatchEvent::ScoreChange { .. } => self.reset_timer = self.rally_reset_delay,
                _ => {}
            }
            for listener in &mut self.listeners {
                listener(event);
            }
        }

        if self.mode == Mode::Live && self.state.phase == MatchPhase::PointScored {
            self.reset_timer -= self.dt;
            if self.reset_timer <= 0.0 {
                self.start_rally();
            }
        }
        events
    }

    /// Pick the receiver's reply, or take it from the record
    fn after_impact(&mut self, hit: &Hit) {
        self.rally_hits.push(*hit);
        match self.mode {
            Mode::Live => {
                let receiver = hit.player.other();
                let (impact_type, target) = self
                    .planner
                    .respond(self.state.robot(receiver), &self.state.shuttle);
                self.state.robot_mut(receiver).set_decision(impact_type, target);
                self.recorder.record_robot(self.state.robot(receiver));
            }
            Mode::Replay => {
                self.recorder.play_robot(&mut self.state);
            }
        }
    }

    /// Step until the current rally is scored or `max_steps` run out
    pub fn run_rally(&mut self, max_steps: usize) -> usize {
        let mut steps = 0;
        while steps < max_steps && !self.is_rally_over() {
            self.step();
            steps += 1;
        }
        steps
    }
}
