//! Hover and propulsion model of the board.
//!
//! Each fixed tick the board senses the ground below it, holds itself at
//! hover height with a PID-scaled lift, keeps its deck aligned with the
//! ground, and (while grounded) turns, drifts, drives, brakes and jumps
//! from the rider's [`InputFrame`]. Velocity changes are written straight
//! into the board's [`VehicleState`].

use engine_core::{look_rotation, project_on_plane};
use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::{self, AnimationDriver};
use crate::body::VehicleState;
use crate::mode::PlayerMode;
use crate::pid::{PidController, PidGains, MIN_DT};
use crate::probe::{GroundHit, GroundProbe};
use crate::tricks::Tricks;

/// Scale between body speed and the km/h figure the dismount ceiling is tuned against.
pub const SPEED_TO_KMH: f32 = 1.60934;

/// Analog trigger travel above which the trigger owns the thruster.
const THRUSTER_TRIGGER_DEADZONE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    // Drive
    pub drive_force: f32,
    pub jump_force: f32,
    /// Upper clamp of the charge converted into jump force.
    pub jump_max_load_time: f32,
    /// Lower clamp of the charge, so a tap still jumps visibly.
    pub jump_min_load_time: f32,
    /// Longest the jump button keeps charging.
    pub jump_max_press_time: f32,
    pub slowing_velocity_factor: f32,
    pub braking_velocity_factor: f32,
    pub rotation_torque_multiplier: f32,
    /// Divisor on lateral friction; larger values drift more.
    pub drift_amount: f32,
    /// Visual roll in degrees at full rudder.
    pub angle_of_roll: f32,
    pub backward_velocity_divider: f32,

    // Hover
    pub hover_height: f32,
    pub hover_force: f32,

    // Physics
    pub maximum_velocity: f32,
    pub hover_gravity: f32,
    pub fall_gravity: f32,
    pub fall_incline_multiplier: f32,
    /// Furthest the nose may drop below the horizon while falling, in degrees.
    pub max_fall_incline: f32,
    pub downhill_gravity: f32,
    /// Rate at which the deck slerps toward the ground plane, per second.
    pub alignment_rate: f32,

    // Trick boost
    pub min_trick_value: f32,
    pub min_boost: f32,
    pub max_boost: f32,
    pub boost_divide_factor: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            drive_force: 17.0,
            jump_force: 500.0,
            jump_max_load_time: 3.0,
            jump_min_load_time: 0.5,
            jump_max_press_time: 2.0,
            slowing_velocity_factor: 0.997,
            braking_velocity_factor: 0.75,
            rotation_torque_multiplier: 2.0,
            drift_amount: 25.0,
            angle_of_roll: 30.0,
            backward_velocity_divider: 2.0,
            hover_height: 1.0,
            hover_force: 60.0,
            maximum_velocity: 100.0,
            hover_gravity: 20.0,
            fall_gravity: 25.0,
            fall_incline_multiplier: 0.9,
            max_fall_incline: 35.0,
            downhill_gravity: 75.0,
            alignment_rate: 10.0,
            min_trick_value: 20.0,
            min_boost: 5.0,
            max_boost: 50.0,
            boost_divide_factor: 5.0,
        }
    }
}

impl BoardConfig {
    /// Linear drag that caps drive at `maximum_velocity`.
    pub fn drag(&self) -> f32 {
        if self.maximum_velocity > 0.0 {
            self.drive_force / self.maximum_velocity
        } else {
            0.0
        }
    }

    /// Speed boost earned by `trick_amount`, before the braking/fallen gates.
    pub fn trick_boost(&self, trick_amount: f32) -> f32 {
        if trick_amount <= self.min_trick_value {
            return 0.0;
        }
        (trick_amount / self.boost_divide_factor.max(f32::EPSILON)).clamp(self.min_boost, self.max_boost)
    }
}

/// The board's consumed input for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub thruster_axis: f32,
    pub rudder_axis: f32,
    pub brake_held: bool,
    /// Seconds the jump has been charged.
    pub jump_charge_time: f32,
    /// The jump button is still held; the jump fires on release.
    pub jump_charging: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TurnDirection {
    #[default]
    None,
    Left,
    Right,
}

/// What happened to the board during one fixed tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoardTick {
    pub grounded: bool,
    /// The sensor result differs from the previous tick.
    pub grounded_changed: bool,
    /// Ground distance when grounded.
    pub ground_distance: Option<f32>,
    /// Clamped charge of a jump released this tick.
    pub jump: Option<f32>,
    /// Speed boost granted on landing this tick.
    pub trick_boost: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct HoverBoard {
    pub config: BoardConfig,
    pub body: VehicleState,
    pid: PidController,
    input: InputFrame,
    thruster_trigger_held: bool,
    turning: TurnDirection,
    last_grounded: bool,
    direction_x: f32,
    visual_roll: f32,
}

impl HoverBoard {
    pub fn new(config: BoardConfig, gains: PidGains) -> Self {
        Self {
            config,
            body: VehicleState::default(),
            pid: PidController::new(gains),
            input: InputFrame::default(),
            thruster_trigger_held: false,
            turning: TurnDirection::None,
            last_grounded: true,
            direction_x: 0.5,
            visual_roll: 0.0,
        }
    }

    pub fn input(&self) -> &InputFrame {
        &self.input
    }

    pub fn pid(&self) -> &PidController {
        &self.pid
    }

    pub fn turning(&self) -> TurnDirection {
        self.turning
    }

    /// Cosmetic roll of the deck around its forward axis, in degrees.
    pub fn visual_roll(&self) -> f32 {
        self.visual_roll
    }

    /// Forward component of the board's velocity.
    pub fn speed(&self) -> f32 {
        self.body.forward_speed()
    }

    /// Fraction of maximum velocity, from total speed.
    pub fn speed_percentage(&self) -> f32 {
        if self.config.maximum_velocity > 0.0 {
            self.body.speed() / self.config.maximum_velocity
        } else {
            0.0
        }
    }

    pub fn speed_kmh(&self) -> f32 {
        self.body.speed() * SPEED_TO_KMH
    }

    // Inputs

    /// Stick input: x steers, y drives unless the analog thruster is held.
    pub fn move_input(&mut self, stick: Vec2) {
        if !self.thruster_trigger_held {
            self.input.thruster_axis = stick.y.clamp(-1.0, 1.0);
        }
        self.input.rudder_axis = stick.x.clamp(-1.0, 1.0);
        self.turning = if self.input.rudder_axis < 0.0 {
            TurnDirection::Left
        } else if self.input.rudder_axis > 0.0 {
            TurnDirection::Right
        } else {
            TurnDirection::None
        };
    }

    /// Analog thruster trigger; overrides the stick while pressed.
    pub fn set_thruster(&mut self, value: f32) {
        self.input.thruster_axis = value.clamp(-1.0, 1.0);
        self.thruster_trigger_held = value >= THRUSTER_TRIGGER_DEADZONE;
    }

    pub fn set_brake(&mut self, held: bool) {
        self.input.brake_held = held;
    }

    /// Start (`true`) or release (`false`) charging a jump.
    pub fn set_jump(&mut self, charging: bool) {
        self.input.jump_charging = charging;
    }

    /// Drop every pending input, including a charging jump.
    pub fn reset_inputs(&mut self) {
        self.input = InputFrame::default();
        self.thruster_trigger_held = false;
        self.turning = TurnDirection::None;
    }

    /// Put the board down at `position`, at rest.
    pub fn place(&mut self, position: Vec3, rotation: Quat) {
        self.body.teleport(position, rotation);
        self.body.is_grounded = true;
        self.last_grounded = true;
        self.pid.reset();
    }

    /// Per-frame work: jump charging and the lean animation.
    pub fn frame_update(&mut self, dt: f32, animator: &mut dyn AnimationDriver) {
        animator.set_float(
            animation::JUMP_METER,
            (self.input.jump_charge_time + 0.01).clamp(0.01, 2.0),
        );
        if self.input.jump_charging {
            self.input.jump_charge_time =
                (self.input.jump_charge_time + dt).min(self.config.jump_max_press_time);
        }

        let rudder = self.input.rudder_axis;
        if rudder == 0.0 {
            if self.direction_x > 0.52 {
                self.direction_x -= dt;
            } else if self.direction_x < 0.48 {
                self.direction_x += dt;
            } else {
                self.direction_x = 0.5;
            }
        } else {
            self.direction_x += dt * rudder;
        }
        self.direction_x = self.direction_x.clamp(0.0, 1.0);
        animator.set_float(animation::DIRECTION_X, self.direction_x);

        let target_roll = self.config.angle_of_roll * -rudder;
        let t = (dt * self.config.alignment_rate).min(1.0);
        self.visual_roll += (target_roll - self.visual_roll) * t;
    }

    /// One fixed tick of hover and propulsion.
    ///
    /// `mode` is the mode at the start of the tick; transitions caused by
    /// the sensor result are decided by the caller afterwards.
    pub fn fixed_update(
        &mut self,
        dt: f32,
        mode: PlayerMode,
        probe: &dyn GroundProbe,
        tricks: &mut Tricks,
        animator: &mut dyn AnimationDriver,
    ) -> BoardTick {
        let dt = dt.max(MIN_DT);
        let speed = self.speed();

        let hit = probe.cast(self.body.position(), -self.body.up(), self.config.hover_height);
        let grounded = hit.is_some();
        let grounded_changed = grounded != self.last_grounded;
        self.body.is_grounded = grounded;
        if grounded_changed && !grounded {
            self.pid.reset();
        }

        let mut tick = BoardTick {
            grounded,
            grounded_changed,
            ground_distance: hit.map(|h| h.distance),
            ..Default::default()
        };

        self.apply_hover(hit, dt);
        if grounded {
            self.apply_propulsion(speed, grounded_changed, mode, tricks, dt, &mut tick);
        } else {
            // No charging a jump in the air.
            self.input.jump_charge_time = 0.0;
        }

        animator.set_float(
            animation::BOARD_VELOCITY,
            (self.speed_kmh() / 100.0).clamp(0.0, 1.0),
        );
        self.last_grounded = grounded;
        tick
    }

    fn apply_hover(&mut self, hit: Option<GroundHit>, dt: f32) {
        let cfg = self.config;
        match hit {
            Some(hit) => {
                if let Some(normal) = hit.normal.try_normalize() {
                    self.body.ground_normal = normal;
                }
                let normal = self.body.ground_normal;
                let force_percent = self.pid.compute(cfg.hover_height, hit.distance, dt);
                self.body.accelerate(normal * cfg.hover_force * force_percent, dt);
                self.body.accelerate(-normal * cfg.hover_gravity * hit.distance, dt);
            }
            None => {
                self.body.accelerate(-Vec3::Y * cfg.fall_gravity, dt);
                if self.body.ground_normal != Vec3::ZERO {
                    self.pitch_with_fall(dt);
                }
            }
        }

        // Ease the deck toward the ground plane instead of snapping to it.
        let normal = self.body.ground_normal;
        if let Some(target) = look_rotation(project_on_plane(self.body.forward(), normal), normal) {
            let t = (dt * cfg.alignment_rate).min(1.0);
            let rotation = self.body.transform.rotation.slerp(target, t);
            self.body.transform.rotation = rotation.normalize();
        }
    }

    /// Drop the nose in proportion to vertical speed, bounded below the horizon.
    fn pitch_with_fall(&mut self, dt: f32) {
        let incline = (self.body.velocity.linear.y * dt * self.config.fall_incline_multiplier)
            .abs()
            .to_radians();
        let current = self.body.forward().y.clamp(-1.0, 1.0).asin();
        let floor = -self.config.max_fall_incline.to_radians();
        let step = incline.min((current - floor).max(0.0));
        if step > 0.0 {
            let right = self.body.right();
            self.body.transform.rotation =
                (Quat::from_axis_angle(right, -step) * self.body.transform.rotation).normalize();
        }
    }

    fn apply_propulsion(
        &mut self,
        speed: f32,
        landed_changed: bool,
        mode: PlayerMode,
        tricks: &mut Tricks,
        dt: f32,
        tick: &mut BoardTick,
    ) {
        let cfg = self.config;
        let input = self.input;

        // Steering: cancel current yaw rate and replace it with the requested one.
        // Positive rudder turns right, which is a negative rotation about +Y.
        let target_yaw_rate = -cfg.rotation_torque_multiplier * input.rudder_axis;
        let yaw_change = target_yaw_rate - self.body.velocity.angular.y;
        self.body.velocity.angular += self.body.up() * yaw_change;

        // Lateral friction; the drift amount decides how much slide survives.
        let right = self.body.right();
        let sideways_speed = self.body.velocity.linear.dot(right);
        self.body.accelerate(
            -right * (sideways_speed / dt / cfg.drift_amount.max(f32::EPSILON)),
            dt,
        );

        if input.thruster_axis <= 0.0 {
            self.body.velocity.linear *= cfg.slowing_velocity_factor;
        }
        if input.brake_held {
            self.body.velocity.linear *= cfg.braking_velocity_factor;
        }

        if input.jump_charge_time > 0.0 && !input.jump_charging {
            let charge = input
                .jump_charge_time
                .clamp(cfg.jump_min_load_time, cfg.jump_max_load_time);
            let up = self.body.up();
            self.body.accelerate(up * cfg.jump_force * charge, dt);
            self.input.jump_charge_time = 0.0;
            tick.jump = Some(charge);
            log::debug!("board jump, charge {charge:.2}s");
        }

        let mut propulsion =
            cfg.drive_force * input.thruster_axis - cfg.drag() * speed.clamp(0.0, cfg.maximum_velocity);
        if speed >= 0.0 && input.thruster_axis < 0.0 {
            // Reversing against forward motion brakes harder.
            propulsion *= cfg.backward_velocity_divider;
        } else if input.thruster_axis < 0.0 {
            propulsion /= cfg.backward_velocity_divider.max(f32::EPSILON);
        }

        let forward = self.body.forward();
        self.body.accelerate(forward * propulsion, dt);
        if landed_changed {
            let boost = self.landing_boost(mode, tricks);
            if boost > 0.0 {
                self.body.add_velocity(forward * boost);
                tick.trick_boost = Some(boost);
                log::debug!("landing boost {boost:.1}");
            }
        }

        // Keep the board pinned on steep slopes.
        let n = self.body.ground_normal;
        let steepness = if n.x.abs() > n.z.abs() { n.x.abs() } else { n.z.abs() };
        self.body.accelerate(-Vec3::Y * steepness * cfg.downhill_gravity, dt);
    }

    fn landing_boost(&self, mode: PlayerMode, tricks: &mut Tricks) -> f32 {
        if self.input.brake_held || mode == PlayerMode::Fall {
            return 0.0;
        }
        let boost = self.config.trick_boost(tricks.amount());
        if boost > 0.0 {
            tricks.set_amount(0.0);
        }
        boost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationRecorder, NullAnimator};
    use crate::probe::{FlatGround, NoGround};
    use crate::tricks::TrickConfig;

    const DT: f32 = 0.02;

    fn board() -> HoverBoard {
        let mut board = HoverBoard::new(BoardConfig::default(), PidGains::default());
        board.place(Vec3::new(0.0, 0.8, 0.0), Quat::IDENTITY);
        board
    }

    fn tricks() -> Tricks {
        Tricks::new(TrickConfig::default())
    }

    #[test]
    fn coasting_speed_decays_geometrically() {
        let config = BoardConfig {
            drive_force: 0.0,
            ..BoardConfig::default()
        };
        let mut board = HoverBoard::new(config, PidGains::default());
        board.place(Vec3::new(0.0, 0.8, 0.0), Quat::IDENTITY);
        board.body.velocity.linear = board.body.forward() * 10.0;
        let ground = FlatGround::new(0.0);
        let mut tricks = tricks();

        let start = board.speed();
        for tick in 1..=10 {
            board.fixed_update(DT, PlayerMode::Slide, &ground, &mut tricks, &mut NullAnimator);
            let expected = start * config.slowing_velocity_factor.powi(tick);
            assert!(
                (board.speed() - expected).abs() < 1.0e-3,
                "tick {tick}: {} vs {expected}",
                board.speed()
            );
        }
    }

    #[test]
    fn lift_pushes_up_below_hover_height() {
        let mut board = board();
        let ground = FlatGround::new(0.0);
        let tick = board.fixed_update(DT, PlayerMode::Slide, &ground, &mut tricks(), &mut NullAnimator);
        assert!(tick.grounded);
        assert_eq!(tick.ground_distance, Some(0.8));
        // PID lift (60 * 0.76) outweighs hover gravity (20 * 0.8).
        assert!(board.body.velocity.linear.y > 0.0);
    }

    #[test]
    fn airborne_board_falls_and_keeps_jump_uncharged() {
        let mut board = board();
        board.set_jump(true);
        board.frame_update(0.5, &mut NullAnimator);
        assert!(board.input().jump_charge_time > 0.0);

        let tick = board.fixed_update(DT, PlayerMode::InAir, &NoGround, &mut tricks(), &mut NullAnimator);
        assert!(!tick.grounded);
        assert!(tick.grounded_changed);
        assert!((board.body.velocity.linear.y + 25.0 * DT).abs() < 1.0e-5);
        assert_eq!(board.input().jump_charge_time, 0.0);
    }

    #[test]
    fn leaving_the_ground_clears_hover_integral() {
        let mut board = board();
        let mut tricks = tricks();
        board.fixed_update(DT, PlayerMode::Slide, &FlatGround::new(0.0), &mut tricks, &mut NullAnimator);
        assert!(board.pid().integral() > 0.0);

        let tick = board.fixed_update(DT, PlayerMode::Slide, &NoGround, &mut tricks, &mut NullAnimator);
        assert!(tick.grounded_changed);
        assert_eq!(board.pid().integral(), 0.0);
        assert_eq!(board.pid().last_error(), 0.0);
    }

    #[test]
    fn slope_adds_downhill_pull() {
        let config = BoardConfig {
            hover_force: 0.0,
            hover_gravity: 0.0,
            ..BoardConfig::default()
        };
        let mut flat = HoverBoard::new(config, PidGains::default());
        flat.place(Vec3::new(0.0, 0.8, 0.0), Quat::IDENTITY);
        let mut sloped = flat.clone();

        flat.fixed_update(DT, PlayerMode::Slide, &SlopeProbe { normal: Vec3::Y }, &mut tricks(), &mut NullAnimator);
        assert_eq!(flat.body.velocity.linear.y, 0.0);

        let slope = SlopeProbe { normal: Quat::from_rotation_x(0.3) * Vec3::Y };
        sloped.fixed_update(DT, PlayerMode::Slide, &slope, &mut tricks(), &mut NullAnimator);
        let expected = -0.3f32.sin() * config.downhill_gravity * DT;
        assert!((sloped.body.velocity.linear.y - expected).abs() < 1.0e-4);
    }

    #[test]
    fn released_jump_clamps_charge_and_fires_once() {
        let mut board = board();
        let ground = FlatGround::new(0.0);
        board.set_jump(true);
        board.frame_update(0.1, &mut NullAnimator);
        board.set_jump(false);

        let before = board.body.velocity.linear.y;
        let tick = board.fixed_update(DT, PlayerMode::Slide, &ground, &mut tricks(), &mut NullAnimator);
        assert_eq!(tick.jump, Some(0.5));
        assert!(board.body.velocity.linear.y - before > 500.0 * 0.5 * DT * 0.9);
        assert_eq!(board.input().jump_charge_time, 0.0);

        let tick = board.fixed_update(DT, PlayerMode::Slide, &ground, &mut tricks(), &mut NullAnimator);
        assert_eq!(tick.jump, None);
    }

    #[test]
    fn charge_is_capped_by_press_time() {
        let mut board = board();
        board.set_jump(true);
        for _ in 0..10 {
            board.frame_update(1.0, &mut NullAnimator);
        }
        assert_eq!(board.input().jump_charge_time, board.config.jump_max_press_time);
    }

    #[test]
    fn steering_replaces_existing_spin() {
        let mut board = board();
        board.body.velocity.angular = Vec3::new(0.0, 3.0, 0.0);
        board.move_input(Vec2::new(1.0, 0.0));
        board.fixed_update(DT, PlayerMode::Slide, &FlatGround::new(0.0), &mut tricks(), &mut NullAnimator);
        assert!((board.body.velocity.angular.y + 2.0).abs() < 1.0e-4);
        assert_eq!(board.turning(), TurnDirection::Right);
    }

    #[test]
    fn lateral_velocity_is_resisted_not_removed() {
        let mut board = board();
        board.body.velocity.linear = Vec3::X * 10.0;
        board.move_input(Vec2::new(0.0, 1.0));
        board.fixed_update(DT, PlayerMode::Slide, &FlatGround::new(0.0), &mut tricks(), &mut NullAnimator);
        let lateral = board.body.velocity.linear.dot(board.body.right());
        // One tick removes 1/drift_amount of the slide.
        assert!((lateral - 10.0 * (1.0 - 1.0 / 25.0)).abs() < 0.05);
    }

    #[test]
    fn reversing_while_rolling_forward_brakes_harder() {
        let mut forward = board();
        forward.body.velocity.linear = forward.body.forward() * 5.0;
        forward.move_input(Vec2::new(0.0, -1.0));
        forward.fixed_update(DT, PlayerMode::Slide, &FlatGround::new(0.0), &mut tricks(), &mut NullAnimator);

        let mut backward = board();
        backward.body.velocity.linear = backward.body.forward() * -5.0;
        backward.move_input(Vec2::new(0.0, -1.0));
        backward.fixed_update(DT, PlayerMode::Slide, &FlatGround::new(0.0), &mut tricks(), &mut NullAnimator);

        let slowed = 5.0 * 0.997 - forward.speed();
        let pushed = -backward.speed() - 5.0 * 0.997;
        assert!(slowed > 0.0 && pushed > 0.0);
        assert!(slowed > pushed * 3.0);
    }

    #[test]
    fn trigger_thruster_overrides_stick() {
        let mut board = board();
        board.set_thruster(0.8);
        board.move_input(Vec2::new(0.3, -1.0));
        assert_eq!(board.input().thruster_axis, 0.8);
        assert_eq!(board.input().rudder_axis, 0.3);
        board.set_thruster(0.0);
        board.move_input(Vec2::new(0.0, -1.0));
        assert_eq!(board.input().thruster_axis, -1.0);
    }

    #[test]
    fn trick_boost_thresholds() {
        let config = BoardConfig::default();
        assert_eq!(config.trick_boost(config.min_trick_value), 0.0);
        assert_eq!(config.trick_boost(config.min_trick_value + 0.1), config.min_boost);
        assert_eq!(config.trick_boost(100.0), 20.0);

        // The boost divides the whole amount, not the excess over the threshold,
        // so only this threshold puts the saturation point exactly on max_boost.
        let config = BoardConfig {
            min_trick_value: 25.0,
            ..BoardConfig::default()
        };
        let saturation =
            config.min_trick_value + config.boost_divide_factor * (config.max_boost - config.min_boost);
        assert_eq!(config.trick_boost(saturation), config.max_boost);
        assert_eq!(config.trick_boost(saturation * 10.0), config.max_boost);
    }

    #[test]
    fn landing_grants_boost_and_consumes_tricks() {
        let mut board = board();
        let mut tricks = tricks();
        board.fixed_update(DT, PlayerMode::InAir, &NoGround, &mut tricks, &mut NullAnimator);
        tricks.set_amount(100.0);

        let tick = board.fixed_update(DT, PlayerMode::InAir, &FlatGround::new(0.0), &mut tricks, &mut NullAnimator);
        assert!(tick.grounded_changed);
        assert_eq!(tick.trick_boost, Some(20.0));
        assert_eq!(tricks.amount(), 0.0);
    }

    #[test]
    fn braking_landing_keeps_tricks() {
        let mut board = board();
        let mut tricks = tricks();
        board.fixed_update(DT, PlayerMode::InAir, &NoGround, &mut tricks, &mut NullAnimator);
        tricks.set_amount(100.0);
        board.set_brake(true);

        let tick = board.fixed_update(DT, PlayerMode::InAir, &FlatGround::new(0.0), &mut tricks, &mut NullAnimator);
        assert_eq!(tick.trick_boost, None);
        assert_eq!(tricks.amount(), 100.0);
    }

    #[test]
    fn falling_pitch_stays_inside_envelope() {
        let mut board = board();
        board.body.ground_normal = Vec3::Y;
        board.body.velocity.linear.y = -200.0;
        for _ in 0..200 {
            board.fixed_update(DT, PlayerMode::InAir, &NoGround, &mut tricks(), &mut NullAnimator);
            let pitch = board.body.forward().y.asin().to_degrees();
            assert!(pitch >= -35.5, "pitch {pitch}");
        }
    }

    #[test]
    fn deck_eases_toward_slope() {
        let mut board = board();
        let slope = Quat::from_rotation_x(0.3);
        let tilted_ground = SlopeProbe { normal: slope * Vec3::Y };
        let before = board.body.up().angle_between(tilted_ground.normal);
        board.fixed_update(DT, PlayerMode::Slide, &tilted_ground, &mut tricks(), &mut NullAnimator);
        let after = board.body.up().angle_between(tilted_ground.normal);
        assert!(after < before);
        assert!(after > 0.0, "alignment must not snap");
    }

    #[test]
    fn lean_parameter_recentres() {
        let mut board = board();
        let mut animator = AnimationRecorder::default();
        board.move_input(Vec2::new(1.0, 0.0));
        board.frame_update(0.3, &mut animator);
        assert!((animator.float(animation::DIRECTION_X).unwrap() - 0.8).abs() < 1.0e-5);
        board.move_input(Vec2::ZERO);
        for _ in 0..10 {
            board.frame_update(0.1, &mut animator);
        }
        assert_eq!(animator.float(animation::DIRECTION_X), Some(0.5));
    }

    struct SlopeProbe {
        normal: Vec3,
    }

    impl GroundProbe for SlopeProbe {
        fn cast(&self, origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<GroundHit> {
            Some(GroundHit {
                distance: 0.9,
                point: origin - Vec3::Y * 0.9,
                normal: self.normal,
            })
        }
    }
}
