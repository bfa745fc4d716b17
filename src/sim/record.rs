//! Rally record and deterministic replay
//!
//! A record is the state at the serve plus every robot decision in the
//! order they were made: the serve first, then one reply after each hit.
//! Physics is deterministic, so restoring the baseline and feeding the
//! decisions back in at the same moments reproduces the rally.

use std::f32::consts::TAU;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::court::{Area, Player};
use super::pose::{euler_to_quat, quat_to_euler};
use super::robot::{ImpactType, Robot};
use super::shuttle::ShuttleState;
use super::state::{MatchPhase, MatchState};

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid first player: {0}")]
    InvalidPlayer(u8),

    #[error("Invalid responsible area for robot {robot}")]
    InvalidArea { robot: u8 },

    #[error("Value out of range: {field}")]
    OutOfRange { field: &'static str },
}

/// Largest accepted coordinate magnitude (cm)
const MAX_COORDINATE: f32 = 1.0e5;
/// Largest accepted speed (cm/s)
const MAX_SPEED: f32 = 1.0e6;

/// Every value finite and within `±limit`
fn check_range(field: &'static str, values: &[f32], limit: f32) -> Result<(), RecordError> {
    if values.iter().all(|v| v.is_finite() && v.abs() <= limit) {
        Ok(())
    } else {
        Err(RecordError::OutOfRange { field })
    }
}

/// Shuttlecock at the serve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShuttleSnapshot {
    pub state: ShuttleState,
    pub position: [f32; 3],
    /// XYZ Euler angles
    pub rotation: [f32; 3],
    pub velocity: [f32; 3],
    pub impact_count: u32,
}

/// Robot at the serve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotSnapshot {
    /// min xyz then max xyz
    pub responsible_area: [f32; 6],
    /// `null` until the robot has hit
    pub impact_count: Option<u32>,
    pub health_percent: f32,
    pub body_angle: f32,
    pub position: [f32; 3],
    /// XYZ Euler angles of the body
    pub rotation: [f32; 3],
}

impl RobotSnapshot {
    fn capture(robot: &Robot) -> Self {
        Self {
            responsible_area: robot.responsible_area.to_array(),
            impact_count: robot.impact_count,
            health_percent: robot.health_percent,
            body_angle: robot.body_angle,
            position: robot.position.to_array(),
            rotation: quat_to_euler(robot.pose().rotation),
        }
    }

    /// Body yaw is authoritative; `rotation` is informational
    fn restore(&self, robot: &mut Robot) {
        robot.responsible_area = Area::from_array(self.responsible_area);
        robot.impact_count = self.impact_count;
        robot.health_percent = self.health_percent;
        robot.body_angle = self.body_angle;
        robot.position = Vec3::from_array(self.position);
    }
}

/// Match state at the serve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub score1: u32,
    pub score2: u32,
    pub nth_score: u32,
    /// Server of the rally (1 or 2)
    pub first_player: u8,
    pub shuttlecock: ShuttleSnapshot,
    pub robot1: RobotSnapshot,
    pub robot2: RobotSnapshot,
}

impl Snapshot {
    pub fn capture(state: &MatchState) -> Self {
        let board = &state.scoreboard;
        let shuttle = &state.shuttle;
        Self {
            score1: board.score1,
            score2: board.score2,
            nth_score: board.nth_score,
            first_player: board.last_winner.number(),
            shuttlecock: ShuttleSnapshot {
                state: shuttle.state,
                position: shuttle.position.to_array(),
                rotation: quat_to_euler(shuttle.rotation),
                velocity: shuttle.velocity.to_array(),
                impact_count: shuttle.impact_count,
            },
            robot1: RobotSnapshot::capture(state.robot(Player::One)),
            robot2: RobotSnapshot::capture(state.robot(Player::Two)),
        }
    }

    pub fn first_player(&self) -> Option<Player> {
        Player::from_number(self.first_player)
    }

    /// Put `state` back to this snapshot, ready for the serve
    pub fn restore(&self, state: &mut MatchState) {
        let board = &mut state.scoreboard;
        board.score1 = self.score1;
        board.score2 = self.score2;
        board.nth_score = self.nth_score;
        board.last_winner = self.first_player().unwrap_or_else(|| {
            log::warn!("record has invalid first player {}, using 1", self.first_player);
            Player::One
        });

        let s = &self.shuttlecock;
        state.shuttle.reset(Vec3::from_array(s.position), Vec3::from_array(s.velocity));
        state.shuttle.rotation = euler_to_quat(s.rotation);
        state.shuttle.state = s.state;
        state.shuttle.impact_count = s.impact_count;

        state.reset_robots();
        self.robot1.restore(state.robot_mut(Player::One));
        self.robot2.restore(state.robot_mut(Player::Two));
        state.net.reset();
        state.phase = MatchPhase::Rally;
    }

    /// Adopt the stored orientation, so a live rally starts from exactly
    /// the state playback will restore
    pub fn sync_orientation(&self, state: &mut MatchState) {
        state.shuttle.rotation = euler_to_quat(self.shuttlecock.rotation);
    }

    fn validate(&self) -> Result<(), RecordError> {
        self.first_player()
            .ok_or(RecordError::InvalidPlayer(self.first_player))?;
        let s = &self.shuttlecock;
        check_range("shuttlecock.position", &s.position, MAX_COORDINATE)?;
        check_range("shuttlecock.rotation", &s.rotation, TAU)?;
        check_range("shuttlecock.velocity", &s.velocity, MAX_SPEED)?;
        for (robot, snapshot) in [(1, &self.robot1), (2, &self.robot2)] {
            check_range("robot.responsibleArea", &snapshot.responsible_area, MAX_COORDINATE)?;
            if !Area::from_array(snapshot.responsible_area).is_valid() {
                return Err(RecordError::InvalidArea { robot });
            }
            check_range("robot.position", &snapshot.position, MAX_COORDINATE)?;
            check_range("robot.rotation", &snapshot.rotation, TAU)?;
            check_range("robot.bodyAngle", &[snapshot.body_angle], TAU)?;
            let health = snapshot.health_percent;
            if !(0.0..=100.0).contains(&health) {
                return Err(RecordError::OutOfRange {
                    field: "robot.healthPercent",
                });
            }
        }
        Ok(())
    }
}

/// One robot decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotEvent {
    pub impact_type: ImpactType,
    pub target_position: [f32; 3],
}

/// A recorded rally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub init: Snapshot,
    pub next: Vec<RobotEvent>,
}

impl Record {
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let record: Record = serde_json::from_str(json)?;
        record.init.validate()?;
        for event in &record.next {
            check_range("next.targetPosition", &event.target_position, MAX_COORDINATE)?;
        }
        Ok(record)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// Records a live rally, or plays a record back
#[derive(Debug, Clone)]
pub struct Recorder {
    record: Record,
    /// Next event to apply during playback
    cursor: usize,
    playing: bool,
}

impl Recorder {
    /// Start from `record`, or from the current state with an empty log
    pub fn init(state: &MatchState, record: Option<Record>) -> Self {
        let record = record.unwrap_or_else(|| Record {
            init: Snapshot::capture(state),
            next: Vec::new(),
        });
        Self {
            record,
            cursor: 0,
            playing: false,
        }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Log the decision `robot` was just given. Ignored during playback.
    pub fn record_robot(&mut self, robot: &Robot) {
        if self.playing {
            return;
        }
        self.record.next.push(RobotEvent {
            impact_type: robot.impact_type,
            target_position: robot.target_position.to_array(),
        });
    }

    /// Restore the baseline, rewind the event log and hand the server its
    /// decision. Returns whether there was one.
    pub fn play(&mut self, state: &mut MatchState) -> bool {
        self.record.init.restore(state);
        self.cursor = 0;
        self.playing = true;
        log::info!("replaying rally with {} recorded decisions", self.record.next.len());
        self.play_robot(state)
    }

    /// Hand the next recorded decision to the robot whose turn it is.
    ///
    /// Decisions alternate starting with the server. Returns `false` at the
    /// end of the log, which also ends playback.
    pub fn play_robot(&mut self, state: &mut MatchState) -> bool {
        if !self.playing {
            return false;
        }
        let Some(event) = self.record.next.get(self.cursor).copied() else {
            log::info!("replay finished after {} decisions", self.cursor);
            self.playing = false;
            return false;
        };
        let first = self.record.init.first_player().unwrap_or(Player::One);
        let player = if self.cursor % 2 == 0 { first } else { first.other() };
        state
            .robot_mut(player)
            .set_decision(event.impact_type, Vec3::from_array(event.target_position));
        self.cursor += 1;
        true
    }
}
