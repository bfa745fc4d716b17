//! Shuttlecock flight and settling
//!
//! Flight is drag + gravity with one Euler step per tick. The cork-to-skirt
//! axis carries a damped pendulum ("flip") that turns the cork back toward
//! the direction of travel after every hit. Once on the ground the
//! shuttlecock topples onto its cork and comes to rest.

use std::f32::consts::PI;

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::ode::rk4_step;
use super::pose::Pose;
use crate::{world_air_density, world_gravity};

/// Remaining topple rotation below which the shuttlecock is at rest (rad)
pub const TOPPLE_EPSILON: f32 = 1e-4;

/// Discrete flight state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShuttleState {
    /// Free flight
    Move,
    /// On the ground, rolling onto its cork
    Topple,
    /// At rest on the ground
    StopGround,
    /// Caught in the net
    StopNet,
}

impl ShuttleState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ShuttleState::StopGround | ShuttleState::StopNet)
    }
}

/// Physical constants of a shuttlecock (SI masses, world-unit lengths)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShuttleParams {
    /// Cork mass (kg)
    pub cork_mass: f32,
    /// Skirt mass (kg)
    pub skirt_mass: f32,
    pub drag_coefficient: f32,
    /// Cross-sectional area (cm²)
    pub area: f32,
    /// Half opening angle of the cork cone; sets the resting tilt (rad)
    pub cork_half_angle: f32,
    /// Distance from the centre of mass to the centre of pressure (cm)
    pub mass_center_offset: f32,
    /// Distance from the cork centre to the cork tip along the body axis (cm)
    pub cork_tip_offset: f32,
    /// Offset of the bounding sphere centre behind the cork centre (cm)
    pub sphere_offset: f32,
    /// Bounding sphere radius (cm)
    pub radius: f32,
    /// Fraction of speed lost in a ground bounce
    pub ground_attenuation: f32,
    /// Topple rotation rate (rad/s)
    pub stop_angular_velocity: f32,
}

impl Default for ShuttleParams {
    fn default() -> Self {
        Self {
            cork_mass: 0.0032,
            skirt_mass: 0.0018,
            drag_coefficient: 0.6,
            area: 36.3,
            cork_half_angle: 0.35,
            mass_center_offset: 2.4,
            cork_tip_offset: 1.3,
            sphere_offset: 3.5,
            radius: 4.5,
            ground_attenuation: 0.75,
            stop_angular_velocity: 6.0,
        }
    }
}

impl ShuttleParams {
    pub fn mass(&self) -> f32 {
        self.cork_mass + self.skirt_mass
    }

    /// Drag magnitude ½·ρ·S·C_D·U²
    pub fn drag_force(&self, speed: f32) -> f32 {
        0.5 * world_air_density() * self.area * self.drag_coefficient * speed * speed
    }

    /// Time derivative of the flip pendulum state `[φ, φ̇]` at airspeed `speed`
    pub fn flip_derivative(&self, speed: f32, state: &[f32; 2]) -> [f32; 2] {
        let rho_s_cd = world_air_density() * self.area * self.drag_coefficient;
        let damping =
            rho_s_cd * speed / (2.0 * self.skirt_mass * (1.0 + self.skirt_mass / self.cork_mass));
        let restoring = rho_s_cd * speed * speed / (2.0 * self.mass() * self.mass_center_offset);
        [state[1], -damping * state[1] - restoring * state[0].sin()]
    }
}

/// The shuttlecock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shuttlecock {
    /// Cork centre
    pub position: Vec3,
    pub velocity: Vec3,
    /// Body orientation; local +Y points from skirt to cork
    pub rotation: Quat,
    /// Flip offset applied on top of the body orientation
    pub flip_rotation: Quat,
    pub flip_angle: f32,
    pub flip_angular_velocity: f32,
    /// Flip axis in the body frame
    pub flip_axis: Vec3,
    pub state: ShuttleState,
    /// Caught by the net
    #[serde(default)]
    pub hung: bool,
    /// Passed below the net this rally
    #[serde(default)]
    pub under_net: bool,
    /// Counted hits since the last reset
    pub impact_count: u32,
    /// Previous tick's step, used to extrapolate the previous position
    pub last_delta: f32,
    pub params: ShuttleParams,
}

impl Shuttlecock {
    pub fn new(params: ShuttleParams) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            flip_rotation: Quat::IDENTITY,
            flip_angle: 0.0,
            flip_angular_velocity: 0.0,
            flip_axis: Vec3::X,
            state: ShuttleState::Move,
            hung: false,
            under_net: false,
            impact_count: 0,
            last_delta: 0.0,
            params,
        }
    }

    /// Put the shuttlecock back in flight for a new rally
    pub fn reset(&mut self, position: Vec3, velocity: Vec3) {
        let params = std::mem::take(&mut self.params);
        *self = Self::new(params);
        self.position = position;
        self.velocity = velocity;
    }

    /// Rendered pose (body orientation with the flip folded in)
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation * self.flip_rotation)
    }

    /// Cork direction in world space
    pub fn up(&self) -> Vec3 {
        (self.rotation * self.flip_rotation) * Vec3::Y
    }

    /// Position one tick back, assuming constant velocity
    pub fn previous_position(&self) -> Vec3 {
        self.position - self.velocity * self.last_delta
    }

    /// Bounding sphere (centre, radius)
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        (
            self.position - self.up() * self.params.sphere_offset,
            self.params.radius,
        )
    }

    /// Advance one tick
    pub fn update(&mut self, delta: f32) {
        match self.state {
            ShuttleState::Move => self.update_move(delta),
            ShuttleState::Topple => self.update_topple(delta),
            ShuttleState::StopGround | ShuttleState::StopNet => {}
        }
        self.last_delta = delta;
    }

    fn update_move(&mut self, delta: f32) {
        let mass = self.params.mass();
        let speed = self.velocity.length();
        let drag = if speed > 0.0 {
            -self.velocity / speed * self.params.drag_force(speed)
        } else {
            Vec3::ZERO
        };
        let accel = world_gravity() + drag / mass;

        self.position += self.velocity * delta;
        self.velocity += accel * delta;

        self.align_to_velocity();

        if delta > 0.0 {
            if self.flip_angle.abs() >= PI {
                self.flip_rotation = Quat::IDENTITY;
            } else {
                let params = &self.params;
                let [angle, angular_velocity] = rk4_step(
                    [self.flip_angle, self.flip_angular_velocity],
                    delta,
                    |s| params.flip_derivative(speed, s),
                );
                self.flip_angle = angle;
                self.flip_angular_velocity = angular_velocity;
                self.flip_rotation = Quat::from_axis_angle(self.flip_axis, self.flip_angle);
            }
        }

        if self.position.y < 0.0 {
            self.bounce_on_ground(delta);
        }
    }

    /// Rebuild the body frame from the velocity; no-op when the velocity is
    /// parallel to gravity
    fn align_to_velocity(&mut self) {
        let side = self.velocity.cross(world_gravity());
        if side.length_squared() == 0.0 {
            return;
        }
        let y = self.velocity.normalize();
        let x = side.normalize();
        let z = x.cross(y);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize();
    }

    fn bounce_on_ground(&mut self, delta: f32) {
        self.position.y = 0.0;
        self.impact(Vec3::ZERO, Vec3::Y, self.params.ground_attenuation, false);
        // Too slow to leave the ground before gravity pulls it back
        if self.velocity.y + world_gravity().y * delta <= 0.0 {
            self.velocity.y = 0.0;
            self.state = ShuttleState::Topple;
        }
    }

    /// Apply a hit: reflect about `normal`, keep `1 - attenuation` of the
    /// reflected velocity and add the `velocity` impulse. Restarts the flip
    /// from rest. Only counted hits bump `impact_count`.
    pub fn impact(&mut self, velocity: Vec3, normal: Vec3, attenuation: f32, counted: bool) {
        let up = self.up();
        let n = normal.normalize_or_zero();
        let reflected = self.velocity - 2.0 * self.velocity.dot(n) * n;
        self.velocity = reflected * (1.0 - attenuation) + velocity;

        self.align_to_velocity();
        let axis = self.velocity.cross(up);
        if axis.length_squared() > 0.0 {
            self.flip_axis = (self.rotation.inverse() * axis).normalize();
            self.flip_angle = self.velocity.angle_between(up);
        } else {
            self.flip_angle = 0.0;
        }
        self.flip_angular_velocity = 0.0;
        self.flip_rotation = Quat::from_axis_angle(self.flip_axis, self.flip_angle);

        if counted {
            self.impact_count += 1;
        }
    }

    fn update_topple(&mut self, delta: f32) {
        self.rotation = (self.rotation * self.flip_rotation).normalize();
        self.flip_rotation = Quat::IDENTITY;
        self.flip_angle = 0.0;
        self.flip_angular_velocity = 0.0;

        let up = self.rotation * Vec3::Y;
        let mut target = -Vec3::new(self.velocity.x, 0.0, self.velocity.z).normalize_or_zero();
        if target == Vec3::ZERO {
            target = Vec3::new(up.x, 0.0, up.z).normalize_or_zero();
        }
        if target == Vec3::ZERO {
            target = Vec3::X;
        }

        let axis = up.cross(target);
        let remaining = up.angle_between(target);
        let step = (self.params.stop_angular_velocity * delta)
            .min(remaining - self.params.cork_half_angle);
        if step < TOPPLE_EPSILON || axis.length_squared() == 0.0 {
            self.state = ShuttleState::StopGround;
            return;
        }

        self.rotation = (Quat::from_axis_angle(axis.normalize(), step) * self.rotation).normalize();
        let tip = self.rotation * Vec3::Y * self.params.cork_tip_offset;
        self.position.y = (-tip.y).max(0.0);
    }
}
