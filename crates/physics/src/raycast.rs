//! Raycasting for ground sensing and landing checks.

use crate::physics_world::{to_vec3, to_vector};
use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

impl PhysicsWorld {
    /// Cast a ray and return the first hit.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        self.raycast_filtered(origin, direction, max_distance, QueryFilter::default())
    }

    /// Cast a ray that skips every collider attached to `body`.
    pub fn raycast_excluding(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        body: RigidBodyHandle,
    ) -> Option<RaycastHit> {
        self.raycast_filtered(
            origin,
            direction,
            max_distance,
            QueryFilter::default().exclude_rigid_body(body),
        )
    }

    fn raycast_filtered(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RaycastHit> {
        let direction = direction.try_normalize()?;
        let ray = Ray::new(point![origin.x, origin.y, origin.z], to_vector(direction));

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(collider, intersection)| {
                let point = ray.point_at(intersection.time_of_impact);
                RaycastHit {
                    collider,
                    distance: intersection.time_of_impact,
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: to_vec3(&intersection.normal),
                }
            })
    }
}
