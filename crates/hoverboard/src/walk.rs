//! On-foot locomotion, active only while the rider walks.

use engine_core::look_rotation;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::{self, AnimationDriver};
use crate::body::VehicleState;
use crate::probe::GroundProbe;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Planar speed at full stick, in units per second.
    pub movement_speed: f32,
    /// Distance from the body origin down to the feet.
    pub stand_height: f32,
    pub grounded_ray_length: f32,
    pub fall_gravity: f32,
    pub downhill_gravity: f32,
    /// Rate at which the rider turns to face the move direction, per second.
    pub turn_rate: f32,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            movement_speed: 5.0,
            stand_height: 1.0,
            grounded_ray_length: 1.1,
            fall_gravity: 25.0,
            downhill_gravity: 20.0,
            turn_rate: 7.5,
        }
    }
}

/// Horizontal camera basis the stick is interpreted in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self {
            forward: -Vec3::Z,
            right: Vec3::X,
        }
    }
}

impl CameraBasis {
    /// Flatten a camera's axes onto the ground plane.
    pub fn flattened(forward: Vec3, right: Vec3) -> Self {
        let flat = |v: Vec3| Vec3::new(v.x, 0.0, v.z).normalize_or_zero();
        Self {
            forward: flat(forward),
            right: flat(right),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Walker {
    pub config: WalkConfig,
    pub body: VehicleState,
    input: Vec2,
    move_direction: Vec3,
}

impl Walker {
    pub fn new(config: WalkConfig) -> Self {
        Self {
            config,
            body: VehicleState::default(),
            input: Vec2::ZERO,
            move_direction: Vec3::ZERO,
        }
    }

    pub fn input(&self) -> Vec2 {
        self.input
    }

    pub fn move_input(&mut self, input: Vec2) {
        self.input = input;
    }

    /// Drop the stick and the move direction derived from it.
    pub fn reset_inputs(&mut self) {
        self.input = Vec2::ZERO;
        self.move_direction = Vec3::ZERO;
    }

    /// One fixed tick of walking. `facing_locked` keeps the current heading (photo mode).
    pub fn fixed_update(
        &mut self,
        dt: f32,
        camera: CameraBasis,
        facing_locked: bool,
        probe: &dyn GroundProbe,
        animator: &mut dyn AnimationDriver,
    ) {
        let cfg = self.config;

        // Stick y walks along the camera, stick x strafes.
        self.move_direction = (camera.forward * self.input.y + camera.right * self.input.x)
            * cfg.movement_speed;
        if !facing_locked && self.input != Vec2::ZERO {
            if let Some(wanted) = look_rotation(self.move_direction, Vec3::Y) {
                let t = (cfg.turn_rate * dt).min(1.0);
                self.body.transform.rotation = self.body.transform.rotation.slerp(wanted, t).normalize();
            }
        }

        let hit = probe.cast(self.body.position(), -self.body.up(), cfg.grounded_ray_length);
        self.body.is_grounded = hit.is_some();
        match hit {
            Some(hit) => {
                if let Some(normal) = hit.normal.try_normalize() {
                    self.body.ground_normal = normal;
                }
                // Feet rest on the ground while it is within reach of the ray.
                self.body.transform.position += self.body.up() * (cfg.stand_height - hit.distance);
                let v = &mut self.body.velocity.linear;
                *v = Vec3::new(self.move_direction.x, v.y.max(0.0), self.move_direction.z);
                animator.set_float(animation::WALK_VELOCITY, v.z.abs());
            }
            None => self.body.accelerate(-Vec3::Y * cfg.fall_gravity, dt),
        }

        let n = self.body.ground_normal;
        let steepness = if n.x.abs() > n.z.abs() { n.x.abs() } else { n.z.abs() };
        self.body.accelerate(-Vec3::Y * steepness * cfg.downhill_gravity, dt);
    }
}
