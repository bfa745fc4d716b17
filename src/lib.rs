//! Shuttle Rally - a two-robot badminton rally simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (shuttlecock physics, robots, rules, replay)
//! - `config`: Data-driven tunables loaded from JSON

pub mod config;
pub mod sim;

pub use config::{ConfigError, SimConfig};

use glam::Vec3;

/// Simulation constants. Lengths are in world units (centimetres).
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// World units per metre
    pub const WORLD_UNITS_PER_METER: f32 = 100.0;
    /// Standard gravity (m/s²)
    pub const GRAVITY: f32 = 9.8;
    /// Sea-level air density (kg/m³)
    pub const AIR_DENSITY: f32 = 1.205;

    /// Court half length, net to back boundary
    pub const COURT_HALF_LENGTH: f32 = 670.0;
    /// Singles sideline distance from the centre line
    pub const COURT_HALF_WIDTH: f32 = 259.0;
    /// Short service line distance from the net
    pub const SHORT_SERVICE_LINE: f32 = 198.0;

    /// Net top height at the centre
    pub const NET_HEIGHT: f32 = 155.0;
    /// Lower edge of the net mesh
    pub const NET_BOTTOM: f32 = 79.0;
    /// Half distance between the posts
    pub const NET_HALF_WIDTH: f32 = 305.0;
    /// Net mesh thickness used for its bounding box
    pub const NET_THICKNESS: f32 = 2.0;

    /// Points needed to win a game
    pub const GAME_POINTS: u32 = 21;
    /// A game always ends at this score
    pub const GAME_POINTS_CAP: u32 = 30;
}

/// Normalized angle to [-π, π]; non-finite input comes back unchanged
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

/// Convert metres to world units
#[inline]
pub fn meters_to_world(meters: f32) -> f32 {
    meters * consts::WORLD_UNITS_PER_METER
}

/// Gravity acceleration in world units (cm/s²)
#[inline]
pub fn world_gravity() -> Vec3 {
    Vec3::new(0.0, -meters_to_world(consts::GRAVITY), 0.0)
}

/// Air density in kg per cubic world unit
#[inline]
pub fn world_air_density() -> f32 {
    consts::AIR_DENSITY / consts::WORLD_UNITS_PER_METER.powi(3)
}

/// Move `current` toward `target` by at most `max_step`, never overshooting
#[inline]
pub fn step_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = target - current;
    current + delta.clamp(-max_step, max_step)
}

/// Same as [`step_toward`] but for angles, taking the short way around
#[inline]
pub fn step_angle_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = normalize_angle(target - current);
    normalize_angle(current + delta.clamp(-max_step, max_step))
}

/// Move a point toward `target` by at most `max_step` along the straight line
#[inline]
pub fn step_point_toward(current: Vec3, target: Vec3, max_step: f32) -> Vec3 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_step || dist == 0.0 {
        target
    } else {
        current + delta * (max_step / dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unit_conversion() {
        assert!((world_gravity().y + 980.0).abs() < 1e-3);
        assert!((world_air_density() - 1.205e-6).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_angle() {
        use std::f32::consts::PI;
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-4);
        assert!((normalize_angle(-0.5) + 0.5).abs() < 1e-6);
        assert!((normalize_angle(2.0 * PI + 0.25) - 0.25).abs() < 1e-5);
        // Huge values must not spin forever
        for angle in [1e30f32, -1e30, 3.4e38] {
            let a = normalize_angle(angle);
            assert!((-PI..=PI).contains(&a), "{angle} -> {a}");
        }
        assert!(step_angle_toward(0.0, 1e30, 0.1).is_finite());
    }

    #[test]
    fn test_step_angle_wraps() {
        // From just below π to just above -π is a short hop, not a full turn
        let next = step_angle_toward(3.1, -3.1, 0.5);
        assert!(next.abs() > 3.0);
    }

    proptest! {
        #[test]
        fn step_toward_never_overshoots(
            current in -1000.0f32..1000.0,
            target in -1000.0f32..1000.0,
            speed in 0.0f32..50.0,
            dt in 0.0f32..0.1,
        ) {
            let max_step = speed * dt;
            let next = step_toward(current, target, max_step);
            let applied = (next - current).abs();
            let expected = (target - current).abs().min(max_step);
            prop_assert!((applied - expected).abs() <= 1e-3);
        }

        #[test]
        fn step_point_never_overshoots(
            cx in -500.0f32..500.0, cz in -500.0f32..500.0,
            tx in -500.0f32..500.0, tz in -500.0f32..500.0,
            max_step in 0.0f32..100.0,
        ) {
            let current = Vec3::new(cx, 0.0, cz);
            let target = Vec3::new(tx, 0.0, tz);
            let next = step_point_toward(current, target, max_step);
            let applied = (next - current).length();
            let expected = (target - current).length().min(max_step);
            prop_assert!((applied - expected).abs() <= 1e-2);
        }
    }
}
