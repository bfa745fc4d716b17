//! Seeded shot selection for live play
//!
//! Decides what each robot plays next: a stroke type and an aim point in
//! the opponent's half. All randomness comes from one seeded Pcg32, so a
//! live match is reproducible from its seed.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::court::{Area, Player, half_court, service_box};
use super::robot::{ImpactType, Link, Robot, predict_falling_position};
use super::shuttle::Shuttlecock;

/// Keep aim points this far inside the lines (cm)
const AIM_MARGIN: f32 = 40.0;
/// Percent chance of a smash
const SMASH_CHANCE: u32 = 10;
/// Percent chance of an overhead shot (after the smash roll)
const TOP_CHANCE: u32 = 30;

/// Shot planner
#[derive(Debug, Clone)]
pub struct Planner {
    rng: Pcg32,
}

impl Planner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Serve decision: a side stroke into the receiver's service box
    pub fn serve(&mut self, server: Player, right: bool) -> (ImpactType, Vec3) {
        let impact_type = if self.rng.random_bool(0.5) {
            ImpactType::Left
        } else {
            ImpactType::Right
        };
        let target = self.aim_in(service_box(server.other(), right));
        (impact_type, target)
    }

    /// Return decision for `robot`, which is next to hit `shuttle`
    pub fn respond(&mut self, robot: &Robot, shuttle: &Shuttlecock) -> (ImpactType, Vec3) {
        let roll = self.rng.random_range(0..100);
        let impact_type = if roll < SMASH_CHANCE {
            ImpactType::Smash
        } else if roll < SMASH_CHANCE + TOP_CHANCE {
            ImpactType::Top
        } else {
            self.side_for(robot, shuttle)
        };
        let target = self.aim_in(half_court(robot.player.other()));
        (impact_type, target)
    }

    /// Forehand or backhand, by which side of the body the shuttlecock
    /// is predicted to come down
    fn side_for(&mut self, robot: &Robot, shuttle: &Shuttlecock) -> ImpactType {
        let height = robot.params.strike_height(Link::Left);
        match predict_falling_position(shuttle, height, robot.params.fall_time_tolerance) {
            Some(p) if robot.pose().to_local(p).x >= 0.0 => ImpactType::Left,
            Some(_) => ImpactType::Right,
            None if self.rng.random_bool(0.5) => ImpactType::Left,
            None => ImpactType::Right,
        }
    }

    fn aim_in(&mut self, area: Area) -> Vec3 {
        let inset = |lo: f32, hi: f32| {
            if hi - lo > 2.0 * AIM_MARGIN {
                (lo + AIM_MARGIN, hi - AIM_MARGIN)
            } else {
                let mid = (lo + hi) * 0.5;
                (mid, mid)
            }
        };
        let (x0, x1) = inset(area.min.x, area.max.x);
        let (z0, z1) = inset(area.min.z, area.max.z);
        Vec3::new(self.uniform(x0, x1), 0.0, self.uniform(z0, z1))
    }

    fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        if hi > lo { self.rng.random_range(lo..hi) } else { lo }
    }
}
