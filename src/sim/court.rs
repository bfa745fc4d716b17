//! Court geometry, responsible areas and the net
//!
//! The net lies in the z = 0 plane. Player 1 defends z < 0, player 2
//! defends z > 0. The x axis runs across the court.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::pose::{Aabb, Pose};
use super::shuttle::{ShuttleState, Shuttlecock};
use crate::consts::*;

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// Wire number (1 or 2)
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    /// Sign of z on this player's half
    pub fn side(self) -> f32 {
        match self {
            Player::One => -1.0,
            Player::Two => 1.0,
        }
    }

    /// Yaw that faces the net from this player's half
    pub fn facing_yaw(self) -> f32 {
        match self {
            Player::One => 0.0,
            Player::Two => std::f32::consts::PI,
        }
    }
}

/// Horizontal axis-aligned region on the court (x/z; y is ignored for
/// containment)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub min: Vec3,
    pub max: Vec3,
}

impl Area {
    /// Build from two corners in any order
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn center(&self) -> Vec3 {
        let c = (self.min + self.max) * 0.5;
        Vec3::new(c.x, 0.0, c.z)
    }

    /// Contains the point on the floor plan, grown by `epsilon` on every side
    pub fn contains(&self, point: Vec3, epsilon: f32) -> bool {
        point.x >= self.min.x - epsilon
            && point.x <= self.max.x + epsilon
            && point.z >= self.min.z - epsilon
            && point.z <= self.max.z + epsilon
    }

    /// Nearest floor point inside the area grown by `epsilon`
    pub fn clamp(&self, point: Vec3, epsilon: f32) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x - epsilon, self.max.x + epsilon),
            point.y,
            point.z.clamp(self.min.z - epsilon, self.max.z + epsilon),
        )
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.z <= self.max.z
    }

    pub fn to_array(&self) -> [f32; 6] {
        [
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z,
        ]
    }

    pub fn from_array(a: [f32; 6]) -> Self {
        Self {
            min: Vec3::new(a[0], a[1], a[2]),
            max: Vec3::new(a[3], a[4], a[5]),
        }
    }
}

/// The full singles half of `player`
pub fn half_court(player: Player) -> Area {
    let side = player.side();
    Area::from_corners(
        Vec3::new(-COURT_HALF_WIDTH, 0.0, 0.0),
        Vec3::new(COURT_HALF_WIDTH, 0.0, side * COURT_HALF_LENGTH),
    )
}

/// Singles service box of `player`; `right` is from the player's own view
/// while facing the net
pub fn service_box(player: Player, right: bool) -> Area {
    let side = player.side();
    // Facing +z (player one) the right hand is -x; facing -z it is +x
    let right_sign = side;
    let x_sign = if right { right_sign } else { -right_sign };
    Area::from_corners(
        Vec3::new(0.0, 0.0, side * SHORT_SERVICE_LINE),
        Vec3::new(x_sign * COURT_HALF_WIDTH, 0.0, side * COURT_HALF_LENGTH),
    )
}

/// Serving and receiving happen from the right box on an even server score
pub fn serve_from_right(server_score: u32) -> bool {
    server_score % 2 == 0
}

/// Tracks which side of a plane a point was on last tick, so a crossing is
/// still caught when the extrapolated previous position misses it.
///
/// Starts at 0 ("no side yet"): on the first check only the segment test
/// applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaneCrossing {
    last_side: f32,
}

impl PlaneCrossing {
    /// Does the segment `prev -> cur` (local z is the plane normal) cross
    /// z = 0? Returns the interpolated crossing point.
    pub fn check(&mut self, prev: Vec3, cur: Vec3) -> Option<Vec3> {
        let side = if cur.z > 0.0 {
            1.0
        } else if cur.z < 0.0 {
            -1.0
        } else {
            0.0
        };
        let segment_crossed = prev.z * cur.z < 0.0 || (cur.z == 0.0 && prev.z != 0.0);
        let side_flipped = self.last_side != 0.0 && side != 0.0 && side != self.last_side;
        if side != 0.0 {
            self.last_side = side;
        }

        if segment_crossed {
            let t = prev.z / (prev.z - cur.z);
            Some(prev + (cur - prev) * t)
        } else if side_flipped {
            Some(Vec3::new(cur.x, cur.y, 0.0))
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.last_side = 0.0;
    }
}

/// What happened when the shuttlecock crossed the net plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NetOutcome {
    /// Caught in the net (terminal)
    Hung { point: Vec3 },
    /// Went under the net
    UnderNet { point: Vec3 },
    /// Cleared the net
    Over { point: Vec3 },
}

/// The net
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    pub pose: Pose,
    /// Net mesh bounds in the net's local frame
    pub bounds: Aabb,
    /// Growth of the shuttlecock's sphere when testing for a hang
    pub catch_margin: f32,
    pub crossing: PlaneCrossing,
}

impl Default for Net {
    fn default() -> Self {
        Self {
            pose: Pose::IDENTITY,
            bounds: Aabb::new(
                Vec3::new(-NET_HALF_WIDTH, NET_BOTTOM, -NET_THICKNESS / 2.0),
                Vec3::new(NET_HALF_WIDTH, NET_HEIGHT, NET_THICKNESS / 2.0),
            ),
            catch_margin: 1.2,
            crossing: PlaneCrossing::default(),
        }
    }
}

impl Net {
    /// Look for a net-plane crossing this tick and resolve a hang.
    pub fn check(&mut self, shuttle: &mut Shuttlecock) -> Option<NetOutcome> {
        if shuttle.state != ShuttleState::Move {
            return None;
        }
        let cur = self.pose.to_local(shuttle.position);
        let prev = self.pose.to_local(shuttle.previous_position());
        let point = self.crossing.check(prev, cur)?;

        let radius = shuttle.params.radius * self.catch_margin;
        if self.bounds.intersects_sphere(point, radius) {
            shuttle.position = self.pose.to_world(point);
            shuttle.velocity = Vec3::ZERO;
            shuttle.state = ShuttleState::StopNet;
            shuttle.hung = true;
            log::debug!("shuttlecock hung in the net at {:?}", shuttle.position);
            return Some(NetOutcome::Hung {
                point: shuttle.position,
            });
        }

        let world = self.pose.to_world(point);
        if point.y < self.bounds.min.y {
            shuttle.under_net = true;
            log::debug!("shuttlecock passed under the net at {:?}", world);
            Some(NetOutcome::UnderNet { point: world })
        } else {
            Some(NetOutcome::Over { point: world })
        }
    }

    pub fn reset(&mut self) {
        self.crossing.reset();
    }
}
