//! Ground sensing boundary: anything that can answer a ray query.

use glam::Vec3;

/// Result of a ground ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

/// Ray queries against the world the board rides on.
pub trait GroundProbe {
    /// First surface hit along `direction` within `max_distance`, if any.
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<GroundHit>;
}

impl<P: GroundProbe + ?Sized> GroundProbe for &P {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<GroundHit> {
        (**self).cast(origin, direction, max_distance)
    }
}

/// Infinite horizontal plane at a fixed height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround {
    pub height: f32,
}

impl FlatGround {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl GroundProbe for FlatGround {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<GroundHit> {
        let direction = direction.try_normalize()?;
        if direction.y >= 0.0 || origin.y < self.height {
            return None;
        }
        let distance = (origin.y - self.height) / -direction.y;
        if distance > max_distance {
            return None;
        }
        Some(GroundHit {
            distance,
            point: origin + direction * distance,
            normal: Vec3::Y,
        })
    }
}

/// A probe that never hits anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGround;

impl GroundProbe for NoGround {
    fn cast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<GroundHit> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_ground_hits_below_within_range() {
        let ground = FlatGround::new(1.0);
        let hit = ground.cast(Vec3::new(3.0, 1.5, -2.0), -Vec3::Y, 1.0).unwrap();
        assert!((hit.distance - 0.5).abs() < 1.0e-6);
        assert_eq!(hit.normal, Vec3::Y);
        assert!((hit.point - Vec3::new(3.0, 1.0, -2.0)).length() < 1.0e-6);
    }

    #[test]
    fn flat_ground_misses_out_of_range_or_upward() {
        let ground = FlatGround::new(0.0);
        assert!(ground.cast(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, 1.0).is_none());
        assert!(ground.cast(Vec3::new(0.0, 0.5, 0.0), Vec3::Y, 10.0).is_none());
        assert!(ground.cast(Vec3::new(0.0, -0.5, 0.0), -Vec3::Y, 10.0).is_none());
        assert!(ground.cast(Vec3::new(0.0, 0.5, 0.0), Vec3::ZERO, 10.0).is_none());
    }

    #[test]
    fn slanted_ray_measures_along_ray() {
        let ground = FlatGround::new(0.0);
        let dir = Vec3::new(1.0, -1.0, 0.0);
        let hit = ground.cast(Vec3::new(0.0, 1.0, 0.0), dir, 2.0).unwrap();
        assert!((hit.distance - 2.0_f32.sqrt()).abs() < 1.0e-5);
    }
}
