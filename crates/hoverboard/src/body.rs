//! Kinematic state of a simulated body (the board or the rider on foot).

use engine_core::{Transform, Velocity};
use glam::{Quat, Vec3};

/// Pose, velocity and ground contact of one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    pub transform: Transform,
    pub velocity: Velocity,
    /// Last ground normal seen by the sensor; zero until ground was found once.
    pub ground_normal: Vec3,
    pub is_grounded: bool,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            velocity: Velocity::default(),
            ground_normal: Vec3::ZERO,
            is_grounded: false,
        }
    }
}

impl VehicleState {
    pub fn at(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            ..Default::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    pub fn right(&self) -> Vec3 {
        self.transform.right()
    }

    pub fn up(&self) -> Vec3 {
        self.transform.up()
    }

    /// Velocity component along the body's forward axis.
    pub fn forward_speed(&self) -> f32 {
        self.velocity.linear.dot(self.forward())
    }

    pub fn speed(&self) -> f32 {
        self.velocity.speed()
    }

    /// Continuous acceleration for one step.
    pub fn accelerate(&mut self, acceleration: Vec3, dt: f32) {
        self.velocity.linear += acceleration * dt;
    }

    /// Instantaneous velocity change.
    pub fn add_velocity(&mut self, delta: Vec3) {
        self.velocity.linear += delta;
    }

    /// Place the body and drop any momentum it carried.
    pub fn teleport(&mut self, position: Vec3, rotation: Quat) {
        self.transform = Transform::from_position_rotation(position, rotation);
        self.velocity.stop();
    }

    /// Semi-implicit Euler step of pose from current velocity.
    pub fn integrate(&mut self, dt: f32) {
        self.transform.position += self.velocity.linear * dt;
        let spin = self.velocity.angular * dt;
        let angle = spin.length();
        if angle > f32::EPSILON {
            let delta = Quat::from_axis_angle(spin / angle, angle);
            self.transform.rotation = (delta * self.transform.rotation).normalize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrate_moves_and_spins() {
        let mut body = VehicleState::at(Vec3::ZERO);
        body.velocity.linear = Vec3::new(0.0, 0.0, -2.0);
        body.velocity.angular = Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0);
        body.integrate(1.0);
        assert!((body.position() - Vec3::new(0.0, 0.0, -2.0)).length() < 1.0e-5);
        // Quarter turn counter-clockwise seen from above: forward -Z becomes -X.
        assert!((body.forward() - -Vec3::X).length() < 1.0e-4);
    }

    #[test]
    fn forward_speed_projects_velocity() {
        let mut body = VehicleState::default();
        body.velocity.linear = Vec3::new(3.0, 0.0, -4.0);
        assert!((body.forward_speed() - 4.0).abs() < 1.0e-6);
        assert!((body.speed() - 5.0).abs() < 1.0e-6);
    }

    #[test]
    fn teleport_zeroes_momentum() {
        let mut body = VehicleState::at(Vec3::ONE);
        body.velocity.linear = Vec3::X;
        body.teleport(Vec3::ZERO, Quat::IDENTITY);
        assert_eq!(body.speed(), 0.0);
        assert_eq!(body.position(), Vec3::ZERO);
    }
}
