//! Common components shared by simulated bodies.

use glam::Vec3;

/// Linear and angular velocity of a body.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

impl Velocity {
    pub fn new(linear: Vec3) -> Self {
        Self {
            linear,
            angular: Vec3::ZERO,
        }
    }

    pub fn with_angular(linear: Vec3, angular: Vec3) -> Self {
        Self { linear, angular }
    }

    /// Zero both linear and angular velocity.
    pub fn stop(&mut self) {
        self.linear = Vec3::ZERO;
        self.angular = Vec3::ZERO;
    }

    pub fn speed(&self) -> f32 {
        self.linear.length()
    }
}

/// Countdown timer gating repeated actions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cooldown {
    pub duration: f32,
    pub remaining: f32,
}

impl Cooldown {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: 0.0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Restart the countdown from the full duration.
    pub fn trigger(&mut self) {
        self.remaining = self.duration;
    }

    pub fn update(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining -= dt;
        }
    }
}
