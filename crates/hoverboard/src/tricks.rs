//! In-air tricks: spinning the board and banking the trick amount.

use glam::{EulerRot, Quat, Vec2};
use serde::{Deserialize, Serialize};

use crate::animation::{self, AnimationDriver};
use crate::body::VehicleState;
use crate::mode::PlayerMode;

/// Axis magnitude below which a trick direction is not announced.
const TRICK_AXIS_DEADZONE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrickConfig {
    /// Degrees per second of rotation at full speed.
    pub execution_speed_factor: f32,
    /// Cap on degrees rotated in a single frame.
    pub max_trick_speed: f32,
}

impl Default for TrickConfig {
    fn default() -> Self {
        Self {
            execution_speed_factor: 250.0,
            max_trick_speed: 30.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tricks {
    pub config: TrickConfig,
    input: Vec2,
    toggle: Vec2,
    amount: f32,
}

impl Tricks {
    pub fn new(config: TrickConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn set_amount(&mut self, amount: f32) {
        self.amount = amount.max(0.0);
    }

    pub fn input(&self) -> Vec2 {
        self.input
    }

    pub fn move_input(&mut self, input: Vec2) {
        self.input = input;
    }

    /// Whether the trick button is held. The rider crouches while it is.
    pub fn is_engaged(&self) -> bool {
        self.toggle != Vec2::ZERO
    }

    pub fn set_toggle(&mut self, toggle: Vec2, animator: &mut dyn AnimationDriver) {
        self.toggle = toggle;
        animator.set_bool(animation::TRICKS_TRIGGERED, self.is_engaged());
    }

    /// Clear inputs and the banked amount.
    pub fn reset(&mut self) {
        self.input = Vec2::ZERO;
        self.amount = 0.0;
    }

    /// Per-frame trick rotation. Returns the degrees rotated this frame.
    pub fn frame_update(
        &mut self,
        dt: f32,
        mode: PlayerMode,
        speed_percentage: f32,
        board: &mut VehicleState,
        animator: &mut dyn AnimationDriver,
    ) -> f32 {
        if mode != PlayerMode::InAir || self.input == Vec2::ZERO || !self.is_engaged() {
            return 0.0;
        }

        let speed = (self.config.execution_speed_factor * speed_percentage * dt)
            .min(self.config.max_trick_speed)
            .max(0.0);
        let spin = Quat::from_euler(
            EulerRot::YXZ,
            (self.input.x * speed).to_radians(),
            (self.input.y * speed).to_radians(),
            0.0,
        );
        board.transform.rotation = (board.transform.rotation * spin).normalize();

        // Faster boards score more for the same rotation.
        self.amount += speed * (speed_percentage * 0.5);

        let (x, y) = (self.input.x.abs(), self.input.y.abs());
        let direction = if y >= x && y > TRICK_AXIS_DEADZONE {
            1
        } else if x > TRICK_AXIS_DEADZONE {
            -1
        } else {
            0
        };
        animator.set_int(animation::TRICK_DIRECTION, direction);
        speed
    }
}
