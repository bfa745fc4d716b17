//! Match state and core simulation types
//!
//! Everything a replay needs to restart a rally lives here.

use std::f32::consts::PI;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::court::{NetOutcome, Net, Player, half_court, serve_from_right, service_box};
use super::robot::{Command, Hit, ImpactType, LinkJoint, Robot};
use super::rules::Scoreboard;
use super::shuttle::Shuttlecock;
use crate::config::SimConfig;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Shuttlecock in play
    Rally,
    /// Rally decided, waiting before the next serve
    PointScored,
    /// Game decided
    GameOver,
}

/// Things that happened during a tick, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// A robot is about to make its per-tick decision
    BeforeUpdate { player: Player },
    /// Confirmed racket contact
    AfterImpact(Hit),
    /// The shuttlecock crossed the net plane
    NetCrossing(NetOutcome),
    /// First ground contact of the rally
    Landed { position: Vec3 },
    /// A rally was scored
    ScoreChange {
        winner: Player,
        score1: u32,
        score2: u32,
    },
    GameOver { winner: Player },
}

/// Complete match state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub shuttle: Shuttlecock,
    /// Indexed by [`Player::index`]
    pub robots: [Robot; 2],
    pub net: Net,
    pub scoreboard: Scoreboard,
    pub phase: MatchPhase,
    /// Height of the serve toss above the strike height (cm)
    pub serve_toss_height: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl MatchState {
    pub fn new(config: &SimConfig) -> Self {
        let first_server = Player::from_number(config.first_server).unwrap_or(Player::One);
        Self {
            shuttle: Shuttlecock::new(config.shuttle.clone()),
            robots: [
                Robot::new(Player::One, config.robot.clone()),
                Robot::new(Player::Two, config.robot.clone()),
            ],
            net: Net::default(),
            scoreboard: Scoreboard::new(first_server),
            phase: MatchPhase::Rally,
            serve_toss_height: config.serve_toss_height,
            time_ticks: 0,
        }
    }

    pub fn robot(&self, player: Player) -> &Robot {
        &self.robots[player.index()]
    }

    pub fn robot_mut(&mut self, player: Player) -> &mut Robot {
        &mut self.robots[player.index()]
    }

    /// Clear per-rally robot state and give both robots a neutral decision
    pub fn reset_robots(&mut self) {
        for robot in &mut self.robots {
            robot.links = [LinkJoint::default(); 3];
            robot.command = Command::default();
            robot.cooldown = 0.0;
            robot.set_decision(ImpactType::Right, half_court(robot.player.other()).center());
        }
    }

    /// Set up the next serve.
    ///
    /// Both robots are confined to their service boxes, the receiver waits
    /// in the middle of its box and the server stands ready under a
    /// shuttlecock held still above its racket.
    pub fn start_rally(&mut self, serve_type: ImpactType, serve_target: Vec3) {
        self.scoreboard.begin_rally();
        self.reset_robots();
        self.net.reset();

        let server = self.scoreboard.server();
        let receiver = server.other();
        let right = serve_from_right(self.scoreboard.score_of(server));

        let receiving = self.robot_mut(receiver);
        receiving.responsible_area = service_box(receiver, right);
        receiving.position = receiving.responsible_area.center();
        receiving.body_angle = receiver.facing_yaw();
        receiving.impact_count = None;

        let toss_height = self.serve_toss_height;
        let serving = self.robot_mut(server);
        serving.responsible_area = service_box(server, right);
        serving.impact_count = None;
        serving.set_decision(serve_type, serve_target);
        let mut toss = serving.responsible_area.center();
        toss.y = serving.params.strike_height(serve_type.link());
        serving.take_stance(toss);
        toss.y += toss_height;

        self.shuttle.reset(toss, Vec3::ZERO);
        // Held cork down
        self.shuttle.rotation = Quat::from_rotation_x(PI);
        self.phase = MatchPhase::Rally;

        log::info!(
            "rally {}: player {} serves from the {} box ({}-{})",
            self.scoreboard.nth_score + 1,
            server.number(),
            if right { "right" } else { "left" },
            self.scoreboard.score1,
            self.scoreboard.score2
        );
    }
}
