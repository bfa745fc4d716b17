//! Robot players
//!
//! Each robot has a body that slides and yaws on the floor and three
//! striking links (left, right, top), each with an attack angle (pitch of
//! the racket face) and a spin angle (yaw of the racket head). Every tick
//! the robot predicts where it will meet the shuttlecock, commands a pose,
//! moves toward it at bounded rates and checks for racket contact.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::court::{Area, PlaneCrossing, Player, half_court};
use super::pose::{Pose, rect_intersects_circle};
use super::shot_table::{self, SHOT_TABLE, TOP_TABLE};
use super::shuttle::{ShuttleState, Shuttlecock};
use crate::consts::NET_HEIGHT;
use crate::{normalize_angle, step_angle_toward, step_point_toward, step_toward};

/// Which stroke the robot plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactType {
    Left,
    Right,
    Top,
    Smash,
}

impl ImpactType {
    pub fn link(self) -> Link {
        match self {
            ImpactType::Left => Link::Left,
            ImpactType::Right => Link::Right,
            ImpactType::Top | ImpactType::Smash => Link::Top,
        }
    }
}

/// Striking link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    Left,
    Right,
    Top,
}

impl Link {
    pub const ALL: [Link; 3] = [Link::Left, Link::Right, Link::Top];

    pub fn index(self) -> usize {
        match self {
            Link::Left => 0,
            Link::Right => 1,
            Link::Top => 2,
        }
    }
}

/// Two angular degrees of freedom of one link
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkJoint {
    pub attack_angle: f32,
    pub spin_angle: f32,
}

/// Robot tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotParams {
    /// Body translation speed at full health (cm/s)
    pub body_speed: f32,
    /// Body yaw and link joint speed (rad/s)
    pub angular_speed: f32,
    /// Shoulder to racket centre (cm); also the lever arm of a hit
    pub arm_length: f32,
    /// Sideways shoulder offset of the side links (cm)
    pub shoulder_offset: f32,
    /// Side-link shoulder height, which is the side strike height (cm)
    pub shoulder_height: f32,
    /// Top-link mount height (cm)
    pub top_mount_height: f32,
    pub racket_half_width: f32,
    pub racket_half_height: f32,
    /// Minimum time between two registered hits (s)
    pub hit_cooldown: f32,
    /// Health multiplier applied per hit
    pub health_attenuation: f32,
    /// Margin around the responsible area (cm)
    pub area_epsilon: f32,
    /// Fraction of incoming speed the racket absorbs
    pub racket_attenuation: f32,
    /// Base attack angle of the side links (rad)
    pub side_attack_angle: f32,
    /// Fixed attack angle of the top link (rad, negative is downward)
    pub top_attack_angle: f32,
    /// Smash racket speed (rad/s)
    pub smash_angular_speed: f32,
    /// Smash intercepts further ahead than this are ignored (s)
    pub smash_max_time: f32,
    /// How far past the strike height a prediction may look back (s)
    pub fall_time_tolerance: f32,
    /// Damping of the side-table interpolation fraction
    pub shot_damping: f32,
}

impl Default for RobotParams {
    fn default() -> Self {
        Self {
            body_speed: 500.0,
            angular_speed: 6.0,
            arm_length: 70.0,
            shoulder_offset: 25.0,
            shoulder_height: 100.0,
            top_mount_height: 180.0,
            racket_half_width: 11.0,
            racket_half_height: 14.0,
            hit_cooldown: 0.3,
            health_attenuation: 0.98,
            area_epsilon: 30.0,
            racket_attenuation: 0.3,
            side_attack_angle: 0.5,
            top_attack_angle: -0.15,
            smash_angular_speed: 20.0 * std::f32::consts::PI,
            smash_max_time: 1.5,
            fall_time_tolerance: 0.02,
            shot_damping: shot_table::DEFAULT_DAMPING,
        }
    }
}

impl RobotParams {
    /// Racket centre in the body frame
    pub fn link_offset(&self, link: Link) -> Vec3 {
        let reach = self.shoulder_offset + self.arm_length;
        match link {
            // Facing +z, the robot's left hand is +x
            Link::Left => Vec3::new(reach, self.shoulder_height, 0.0),
            Link::Right => Vec3::new(-reach, self.shoulder_height, 0.0),
            Link::Top => Vec3::new(0.0, self.top_mount_height + self.arm_length, 0.0),
        }
    }

    /// Height of the racket centre of a link
    pub fn strike_height(&self, link: Link) -> f32 {
        self.link_offset(link).y
    }
}

/// Pose the robot is steering toward this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub position: Vec3,
    pub body_angle: f32,
    pub attack_angle: f32,
    pub spin_angle: f32,
    /// Racket angular speed used if contact happens (rad/s)
    pub impact_speed: f32,
    /// The shot passed every validity check
    pub ready: bool,
}

/// Where and how a shot will be played
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotPlan {
    pub impact_point: Vec3,
    pub attack_angle: f32,
    pub angular_speed: f32,
}

/// A confirmed racket contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub player: Player,
    pub impact_type: ImpactType,
    pub target_position: Vec3,
    pub impact_count: u32,
    pub point: Vec3,
}

/// Linear time until the shuttlecock reaches `height`.
///
/// Drag is ignored; the shot tables assume this
/// straight-line model. `None` when the shuttlecock is level or already
/// past the height by more than `tolerance` seconds.
pub fn predict_falling_time(shuttle: &Shuttlecock, height: f32, tolerance: f32) -> Option<f32> {
    let vy = shuttle.velocity.y;
    if vy == 0.0 {
        return None;
    }
    let time = (height - shuttle.position.y) / vy;
    if !time.is_finite() || time < -tolerance {
        return None;
    }
    Some(time)
}

/// Linear position of the shuttlecock when it reaches `height`
pub fn predict_falling_position(
    shuttle: &Shuttlecock,
    height: f32,
    tolerance: f32,
) -> Option<Vec3> {
    predict_falling_time(shuttle, height, tolerance)
        .map(|t| shuttle.position + shuttle.velocity * t)
}

/// Parameter `t` where the ray `origin + dir·t` meets the plane, if any
pub fn ray_plane_intersection(
    origin: Vec3,
    dir: Vec3,
    plane_point: Vec3,
    plane_normal: Vec3,
) -> Option<f32> {
    let denom = dir.dot(plane_normal);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (plane_point - origin).dot(plane_normal) / denom;
    t.is_finite().then_some(t)
}

/// A robot player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Robot {
    pub player: Player,
    /// Body position on the floor
    pub position: Vec3,
    /// Body yaw
    pub body_angle: f32,
    /// Joints, indexed by [`Link::index`]
    pub links: [LinkJoint; 3],
    pub impact_type: ImpactType,
    /// Aim point chosen by the decision layer
    pub target_position: Vec3,
    pub responsible_area: Area,
    pub health_percent: f32,
    /// Shuttlecock impact count of this robot's last hit
    pub impact_count: Option<u32>,
    /// Seconds until another hit may register
    pub cooldown: f32,
    pub command: Command,
    pub crossing: PlaneCrossing,
    pub params: RobotParams,
}

impl Robot {
    pub fn new(player: Player, params: RobotParams) -> Self {
        let area = half_court(player);
        Self {
            player,
            position: area.center(),
            body_angle: player.facing_yaw(),
            links: [LinkJoint::default(); 3],
            impact_type: ImpactType::Right,
            target_position: half_court(player.other()).center(),
            responsible_area: area,
            health_percent: 100.0,
            impact_count: None,
            cooldown: 0.0,
            command: Command::default(),
            crossing: PlaneCrossing::default(),
            params,
        }
    }

    /// Body pose for rendering
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, Quat::from_rotation_y(self.body_angle))
    }

    /// World pose of a link's racket; the face normal is local +Z
    pub fn racket_pose(&self, link: Link) -> Pose {
        let joint = self.links[link.index()];
        let local = Pose::new(
            self.params.link_offset(link),
            Quat::from_rotation_y(joint.spin_angle) * Quat::from_rotation_x(-joint.attack_angle),
        );
        self.pose().compose(&local)
    }

    /// Apply a decision from the planner or a replay log
    pub fn set_decision(&mut self, impact_type: ImpactType, target_position: Vec3) {
        self.impact_type = impact_type;
        self.target_position = target_position;
        self.crossing.reset();
    }

    /// Decide, actuate and check for contact. Returns a confirmed hit.
    pub fn update(&mut self, shuttle: &mut Shuttlecock, delta: f32) -> Option<Hit> {
        self.cooldown = (self.cooldown - delta).max(0.0);
        self.command = self.decide(shuttle);
        self.actuate(delta);
        if self.command.ready {
            self.check_intersect(shuttle)
        } else {
            self.crossing.reset();
            None
        }
    }

    /// Safe pose: centre of the responsible area, racket neutral
    fn idle_command(&self) -> Command {
        Command {
            position: self.responsible_area.center(),
            body_angle: self.player.facing_yaw(),
            ..Default::default()
        }
    }

    /// Choose this tick's commanded pose
    pub fn decide(&self, shuttle: &Shuttlecock) -> Command {
        let my_hit = self.impact_count == Some(shuttle.impact_count);
        if shuttle.state != ShuttleState::Move || my_hit {
            return self.idle_command();
        }
        let plan = match self.impact_type {
            ImpactType::Smash => self.plan_smash(shuttle),
            ImpactType::Top => self.plan_top(shuttle),
            ImpactType::Left | ImpactType::Right => self.plan_side(shuttle),
        };
        let epsilon = self.params.area_epsilon;
        match plan {
            Some(plan) if self.responsible_area.contains(plan.impact_point, epsilon) => {
                self.command_for(&plan)
            }
            _ => self.idle_command(),
        }
    }

    fn plan_side(&self, shuttle: &Shuttlecock) -> Option<ShotPlan> {
        let p = predict_falling_position(
            shuttle,
            self.params.strike_height(self.impact_type.link()),
            self.params.fall_time_tolerance,
        )?;
        self.side_plan_at(p)
    }

    /// The table row is picked by how far the robot stands from the net
    fn side_plan_at(&self, p: Vec3) -> Option<ShotPlan> {
        let to_target = self.target_position - p;
        let displacement = Vec2::new(to_target.x, to_target.z).length();
        let power = shot_table::side_shot(
            SHOT_TABLE,
            self.position.z.abs(),
            displacement,
            self.params.shot_damping,
        )?;
        Some(ShotPlan {
            impact_point: p,
            attack_angle: self.params.side_attack_angle * power.elevation,
            angular_speed: power.angular_speed,
        })
    }

    fn plan_top(&self, shuttle: &Shuttlecock) -> Option<ShotPlan> {
        let p = predict_falling_position(
            shuttle,
            self.params.strike_height(Link::Top),
            self.params.fall_time_tolerance,
        )?;
        self.top_plan_at(p)
    }

    fn top_plan_at(&self, p: Vec3) -> Option<ShotPlan> {
        let speed = shot_table::top_shot(TOP_TABLE, p.distance(self.target_position))?;
        Some(ShotPlan {
            impact_point: p,
            attack_angle: self.params.top_attack_angle,
            angular_speed: speed,
        })
    }

    /// Meet the shuttlecock where its current heading crosses the vertical
    /// plane of the top racket, then drive straight at the target.
    ///
    /// The plane faces the net (normal z) and passes through the racket
    /// the robot already holds up, so the shuttlecock is met in front of
    /// the body. A plane through the target would sit behind every
    /// incoming shuttlecock. Rejected when the crossing is behind the
    /// shuttlecock, more than `smash_max_time` away or below the net tape.
    fn plan_smash(&self, shuttle: &Shuttlecock) -> Option<ShotPlan> {
        let racket = self.racket_pose(Link::Top).translation;
        let t = ray_plane_intersection(shuttle.position, shuttle.velocity, racket, Vec3::Z)?;
        if t < 0.0 || t > self.params.smash_max_time {
            return None;
        }
        let p = shuttle.position + shuttle.velocity * t;
        if p.y < NET_HEIGHT {
            return None;
        }
        let to_target = self.target_position - p;
        let horizontal = Vec2::new(to_target.x, to_target.z).length();
        Some(ShotPlan {
            impact_point: p,
            attack_angle: to_target.y.atan2(horizontal),
            angular_speed: self.params.smash_angular_speed,
        })
    }

    /// Body pose that puts the active racket at the plan's impact point,
    /// turned toward the target
    pub fn command_for(&self, plan: &ShotPlan) -> Command {
        let facing = self.player.facing_yaw();
        let aim = self.target_position - plan.impact_point;
        let aim_yaw = if aim.x == 0.0 && aim.z == 0.0 {
            facing
        } else {
            aim.x.atan2(aim.z)
        };
        // Body turns half way, the racket head makes up the rest
        let body_angle = normalize_angle(facing + 0.5 * normalize_angle(aim_yaw - facing));
        let spin_angle = normalize_angle(aim_yaw - body_angle);

        let link_offset = self.params.link_offset(self.impact_type.link());
        let offset = Quat::from_rotation_y(body_angle) * link_offset;
        let stance = Vec3::new(
            plan.impact_point.x - offset.x,
            0.0,
            plan.impact_point.z - offset.z,
        );
        Command {
            position: self.responsible_area.clamp(stance, self.params.area_epsilon),
            body_angle,
            attack_angle: plan.attack_angle,
            spin_angle,
            impact_speed: plan.angular_speed,
            ready: true,
        }
    }

    /// Snap the body under a shuttlecock that will drop through `point`.
    ///
    /// Only the body moves; the links start neutral and swing into place
    /// while the shuttlecock falls.
    pub fn take_stance(&mut self, point: Vec3) {
        let plan = match self.impact_type {
            ImpactType::Left | ImpactType::Right => self.side_plan_at(point),
            ImpactType::Top | ImpactType::Smash => self.top_plan_at(point),
        };
        if let Some(plan) = plan {
            let cmd = self.command_for(&plan);
            self.position = cmd.position;
            self.body_angle = cmd.body_angle;
        }
    }

    /// Rate-limited motion toward the command
    fn actuate(&mut self, delta: f32) {
        let max_move = self.params.body_speed * delta * (self.health_percent / 100.0);
        self.position = step_point_toward(self.position, self.command.position, max_move);

        let max_turn = self.params.angular_speed * delta;
        self.body_angle = step_angle_toward(self.body_angle, self.command.body_angle, max_turn);

        let active = self.impact_type.link();
        for link in Link::ALL {
            let (attack, spin) = if link == active {
                (self.command.attack_angle, self.command.spin_angle)
            } else {
                (0.0, 0.0)
            };
            let joint = &mut self.links[link.index()];
            joint.attack_angle = step_toward(joint.attack_angle, attack, max_turn);
            joint.spin_angle = step_angle_toward(joint.spin_angle, spin, max_turn);
        }
    }

    /// Racket contact test and response
    fn check_intersect(&mut self, shuttle: &mut Shuttlecock) -> Option<Hit> {
        let racket = self.racket_pose(self.impact_type.link());
        let (center, radius) = shuttle.bounding_sphere();
        let prev = center - shuttle.velocity * shuttle.last_delta;

        let point = self
            .crossing
            .check(racket.to_local(prev), racket.to_local(center))?;
        if self.cooldown > 0.0 {
            return None;
        }
        let half = Vec2::new(self.params.racket_half_width, self.params.racket_half_height);
        if !rect_intersects_circle(-half, half, Vec2::new(point.x, point.y), radius) {
            return None;
        }

        let normal = racket.direction_to_world(Vec3::Z);
        shuttle.impact(
            normal * (self.command.impact_speed * self.params.arm_length),
            normal,
            self.params.racket_attenuation,
            true,
        );
        self.impact_count = Some(shuttle.impact_count);
        self.health_percent *= self.params.health_attenuation;
        self.responsible_area = half_court(self.player);
        self.cooldown = self.params.hit_cooldown;

        let hit = Hit {
            player: self.player,
            impact_type: self.impact_type,
            target_position: self.target_position,
            impact_count: shuttle.impact_count,
            point: racket.to_world(point),
        };
        log::debug!(
            "player {} hit #{} ({:?}) toward {:?}",
            self.player.number(),
            hit.impact_count,
            hit.impact_type,
            hit.target_position
        );
        Some(hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::court::service_box;
    use crate::sim::shuttle::ShuttleParams;
    use proptest::prelude::*;

    fn falling_shuttle(position: Vec3, velocity: Vec3) -> Shuttlecock {
        let mut s = Shuttlecock::new(ShuttleParams::default());
        s.reset(position, velocity);
        s
    }

    #[test]
    fn test_predict_falling() {
        let s = falling_shuttle(Vec3::new(0.0, 300.0, 100.0), Vec3::new(0.0, -200.0, 400.0));
        let t = predict_falling_time(&s, 100.0, 0.02).unwrap();
        assert!((t - 1.0).abs() < 1e-6);
        let p = predict_falling_position(&s, 100.0, 0.02).unwrap();
        assert!((p - Vec3::new(0.0, 100.0, 500.0)).length() < 1e-4);

        // Already below and still falling away
        let s = falling_shuttle(Vec3::new(0.0, 50.0, 0.0), Vec3::new(0.0, -200.0, 0.0));
        assert!(predict_falling_time(&s, 100.0, 0.02).is_none());
        // Level flight never arrives
        let s = falling_shuttle(Vec3::new(0.0, 50.0, 0.0), Vec3::new(0.0, 0.0, 300.0));
        assert!(predict_falling_time(&s, 100.0, 0.02).is_none());
    }

    #[test]
    fn test_ray_plane() {
        let plane = Vec3::new(0.0, 0.0, 10.0);
        let t = ray_plane_intersection(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0), plane, Vec3::Z);
        assert_eq!(t, Some(5.0));
        assert!(ray_plane_intersection(Vec3::ZERO, Vec3::X, plane, Vec3::Z).is_none());
    }

    #[test]
    fn test_idle_when_not_my_turn() {
        let mut robot = Robot::new(Player::Two, RobotParams::default());
        let mut s = falling_shuttle(Vec3::new(0.0, 300.0, 300.0), Vec3::new(0.0, -100.0, 0.0));
        s.impact_count = 3;
        robot.impact_count = Some(3);
        let cmd = robot.decide(&s);
        assert!(!cmd.ready);
        assert_eq!(cmd.position, robot.responsible_area.center());
        assert_eq!(cmd.attack_angle, 0.0);
        assert_eq!(cmd.spin_angle, 0.0);

        robot.impact_count = Some(2);
        assert!(robot.decide(&s).ready);

        s.state = ShuttleState::StopGround;
        assert!(!robot.decide(&s).ready);
    }

    #[test]
    fn test_idle_outside_responsible_area() {
        let robot = Robot::new(Player::Two, RobotParams::default());
        // Lands on player one's half
        let s = falling_shuttle(Vec3::new(0.0, 300.0, -300.0), Vec3::new(0.0, -100.0, 0.0));
        assert!(!robot.decide(&s).ready);
    }

    #[test]
    fn test_command_places_racket_on_impact_point() {
        let mut robot = Robot::new(Player::One, RobotParams::default());
        robot.set_decision(ImpactType::Left, Vec3::new(0.0, 0.0, 400.0));
        let s = falling_shuttle(Vec3::new(-50.0, 200.0, -300.0), Vec3::new(0.0, -300.0, 0.0));
        let cmd = robot.decide(&s);
        assert!(cmd.ready);

        robot.position = cmd.position;
        robot.body_angle = cmd.body_angle;
        let racket = robot.racket_pose(Link::Left).translation;
        assert!((racket.x - -50.0).abs() < 1e-3);
        assert!((racket.z - -300.0).abs() < 1e-3);
        assert!((racket.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_actuation_is_rate_limited() {
        let mut robot = Robot::new(Player::One, RobotParams::default());
        robot.health_percent = 50.0;
        robot.command = Command {
            position: robot.position + Vec3::new(1000.0, 0.0, 0.0),
            body_angle: 1.0,
            attack_angle: 1.0,
            ..Default::default()
        };
        let start = robot.position;
        robot.actuate(0.1);
        // 500 cm/s at half health for 0.1 s
        assert!(((robot.position - start).length() - 25.0).abs() < 1e-3);
        assert!((robot.body_angle - 0.6).abs() < 1e-5);
        assert!((robot.links[Link::Right.index()].attack_angle - 0.6).abs() < 1e-5);
    }

    /// Player one in the stance for a right-side serve under a dropped toss
    fn serve_setup() -> (Robot, Shuttlecock) {
        let mut robot = Robot::new(Player::One, RobotParams::default());
        robot.responsible_area = service_box(Player::One, true);
        robot.set_decision(ImpactType::Right, Vec3::new(120.0, 0.0, 420.0));

        let toss = Vec3::new(-130.0, 140.0, -430.0);
        assert!(robot.responsible_area.contains(toss, 0.0));
        let mut s = falling_shuttle(toss, Vec3::ZERO);
        s.rotation = Quat::from_rotation_x(std::f32::consts::PI);

        let mut strike = toss;
        strike.y = robot.params.strike_height(Link::Right);
        robot.take_stance(strike);
        (robot, s)
    }

    fn run_serve(robot: &mut Robot, s: &mut Shuttlecock) -> Vec<Hit> {
        let mut hits = Vec::new();
        for _ in 0..120 {
            s.update(SIM_DT);
            if let Some(hit) = robot.update(s, SIM_DT) {
                hits.push(hit);
            }
        }
        hits
    }

    #[test]
    fn test_serve_hit_registers_once() {
        let (mut robot, mut s) = serve_setup();
        let hits = run_serve(&mut robot, &mut s);
        assert_eq!(hits.len(), 1);
        assert_eq!(s.impact_count, 1);
        assert_eq!(robot.impact_count, Some(1));
        assert!((robot.health_percent - 98.0).abs() < 1e-4);
        assert_eq!(robot.responsible_area, half_court(Player::One));
        // Sent toward the far half
        assert!(s.position.z > -430.0 || s.velocity.z > 0.0);
    }

    #[test]
    fn test_cooldown_blocks_contact() {
        let (mut robot, mut s) = serve_setup();
        // Outlasts the whole drop past the racket
        robot.cooldown = 10.0;
        let hits = run_serve(&mut robot, &mut s);
        assert!(hits.is_empty());
        assert_eq!(s.impact_count, 0);
        assert_eq!(robot.impact_count, None);
        assert_eq!(robot.health_percent, 100.0);
    }

    /// Player two at the centre of its half, top racket raised at z = 335
    fn smash_robot() -> Robot {
        let mut robot = Robot::new(Player::Two, RobotParams::default());
        robot.set_decision(ImpactType::Smash, Vec3::new(0.0, 0.0, -400.0));
        robot
    }

    #[test]
    fn test_smash_meets_shuttle_at_racket_plane() {
        let robot = smash_robot();
        let racket = robot.racket_pose(Link::Top).translation;
        assert!((racket - Vec3::new(0.0, 250.0, 335.0)).length() < 1e-3);

        let s = falling_shuttle(Vec3::new(0.0, 300.0, 0.0), Vec3::new(0.0, 0.0, 400.0));
        let plan = robot.plan_smash(&s).unwrap();
        assert!((plan.impact_point - Vec3::new(0.0, 300.0, 335.0)).length() < 1e-3);
        assert_eq!(plan.angular_speed, robot.params.smash_angular_speed);
        // Face points down toward the target on the far half
        assert!(plan.attack_angle < 0.0);

        let cmd = robot.decide(&s);
        assert!(cmd.ready);
        assert_eq!(cmd.impact_speed, robot.params.smash_angular_speed);
    }

    #[test]
    fn test_smash_rejections() {
        let robot = smash_robot();
        let cases = [
            // Moving away: the plane is behind the shuttlecock
            (Vec3::new(0.0, 300.0, 0.0), Vec3::new(0.0, 0.0, -400.0)),
            // Reaches the plane after 3.35 s
            (Vec3::new(0.0, 300.0, 0.0), Vec3::new(0.0, 0.0, 100.0)),
            // Crosses below the net tape
            (Vec3::new(0.0, 100.0, 0.0), Vec3::new(0.0, 0.0, 400.0)),
        ];
        for (position, velocity) in cases {
            let s = falling_shuttle(position, velocity);
            assert!(robot.plan_smash(&s).is_none(), "{position:?} {velocity:?}");
            assert!(!robot.decide(&s).ready);
        }
    }

    #[test]
    fn test_top_shot_uses_top_table() {
        let mut robot = Robot::new(Player::Two, RobotParams::default());
        let target = Vec3::new(0.0, 0.0, -400.0);
        robot.set_decision(ImpactType::Top, target);

        let s = falling_shuttle(Vec3::new(0.0, 400.0, 300.0), Vec3::new(0.0, -200.0, 0.0));
        let cmd = robot.decide(&s);
        assert!(cmd.ready);
        let p = Vec3::new(0.0, 250.0, 300.0);
        let expected = shot_table::top_shot(TOP_TABLE, p.distance(target)).unwrap();
        assert_eq!(cmd.attack_angle, robot.params.top_attack_angle);
        assert!((cmd.impact_speed - expected).abs() < 1e-4);
    }

    #[test]
    fn test_side_row_follows_robot_distance_from_net() {
        let target = Vec3::new(0.0, 0.0, -400.0);
        let p = Vec3::new(0.0, 100.0, 300.0);
        let speed_at = |z: f32| {
            let mut robot = Robot::new(Player::Two, RobotParams::default());
            robot.set_decision(ImpactType::Left, target);
            robot.position.z = z;
            let plan = robot.side_plan_at(p).unwrap();
            let expected = shot_table::side_shot(SHOT_TABLE, z, 700.0, robot.params.shot_damping);
            assert_eq!(Some(plan.angular_speed), expected.map(|power| power.angular_speed));
            plan.angular_speed
        };
        // Same impact point, different rows
        assert!((speed_at(150.0) - speed_at(550.0)).abs() > 1.0);
    }

    proptest! {
        #[test]
        fn commanded_position_stays_in_area(
            x in -800.0f32..800.0, z in -900.0f32..900.0,
            vx in -500.0f32..500.0, vz in -900.0f32..900.0,
        ) {
            let robot = Robot::new(Player::Two, RobotParams::default());
            let s = falling_shuttle(Vec3::new(x, 250.0, z), Vec3::new(vx, -300.0, vz));
            let cmd = robot.decide(&s);
            let epsilon = robot.params.area_epsilon + 1e-3;
            prop_assert!(robot.responsible_area.contains(cmd.position, epsilon));
        }
    }
}
