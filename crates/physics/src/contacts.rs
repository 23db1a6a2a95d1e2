//! New-contact detection and impulse extraction after a solver step.

use crate::physics_world::to_vec3;
use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::prelude::*;
use std::collections::HashSet;

/// A contact that started during the last step.
#[derive(Debug, Clone, Copy)]
pub struct ContactStart {
    /// The collider touched by the tracked collider.
    pub other: ColliderHandle,
    /// Total impulse the solver applied to the tracked collider's body.
    pub impulse: Vec3,
    /// Tracked body velocity minus the other body's velocity.
    pub relative_velocity: Vec3,
    /// Membership bits of the other collider.
    pub other_layer: u32,
}

/// Remembers which colliders touched a tracked collider on the previous step,
/// so each physical contact is reported once when it begins.
#[derive(Debug)]
pub struct ContactTracker {
    collider: ColliderHandle,
    touching: HashSet<ColliderHandle>,
}

impl ContactTracker {
    pub fn new(collider: ColliderHandle) -> Self {
        Self {
            collider,
            touching: HashSet::new(),
        }
    }

    /// Collect contacts that became active since the previous call.
    pub fn poll(&mut self, world: &PhysicsWorld) -> Vec<ContactStart> {
        let mut still_touching = HashSet::new();
        let mut started = Vec::new();

        for pair in world.narrow_phase.contact_pairs_with(self.collider) {
            if !pair.has_any_active_contact {
                continue;
            }
            let (other, sign) = if pair.collider1 == self.collider {
                (pair.collider2, -1.0)
            } else {
                (pair.collider1, 1.0)
            };
            still_touching.insert(other);
            if self.touching.contains(&other) {
                continue;
            }

            // Manifold normals point from collider1 toward collider2.
            let mut impulse = Vec3::ZERO;
            for manifold in &pair.manifolds {
                let normal = to_vec3(&manifold.data.normal);
                for point in &manifold.points {
                    impulse += normal * point.data.impulse * sign;
                }
            }

            started.push(ContactStart {
                other,
                impulse,
                relative_velocity: body_velocity(world, self.collider) - body_velocity(world, other),
                other_layer: world.collider_layer(other),
            });
        }

        self.touching = still_touching;
        started
    }
}

/// An overlap that started during the last step on a tracked sensor.
#[derive(Debug, Clone, Copy)]
pub struct OverlapStart {
    pub other: ColliderHandle,
    /// Membership bits of the other collider.
    pub other_layer: u32,
}

/// Same as [`ContactTracker`] for sensor colliders, which report overlaps instead of impulses.
#[derive(Debug)]
pub struct OverlapTracker {
    sensor: ColliderHandle,
    overlapping: HashSet<ColliderHandle>,
}

impl OverlapTracker {
    pub fn new(sensor: ColliderHandle) -> Self {
        Self {
            sensor,
            overlapping: HashSet::new(),
        }
    }

    pub fn poll(&mut self, world: &PhysicsWorld) -> Vec<OverlapStart> {
        let mut still_overlapping = HashSet::new();
        let mut started = Vec::new();

        for (c1, c2, intersecting) in world.narrow_phase.intersection_pairs_with(self.sensor) {
            if !intersecting {
                continue;
            }
            let other = if c1 == self.sensor { c2 } else { c1 };
            still_overlapping.insert(other);
            if !self.overlapping.contains(&other) {
                started.push(OverlapStart {
                    other,
                    other_layer: world.collider_layer(other),
                });
            }
        }

        self.overlapping = still_overlapping;
        started
    }
}

fn body_velocity(world: &PhysicsWorld, collider: ColliderHandle) -> Vec3 {
    world
        .collider_set
        .get(collider)
        .and_then(|c| c.parent())
        .and_then(|body| world.rigid_body_set.get(body))
        .map(|body| to_vec3(body.linvel()))
        .unwrap_or(Vec3::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CollisionGroup;
    use engine_core::{Transform, Velocity};

    #[test]
    fn falling_box_reports_ground_contact() {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane();
        let body = world.add_dynamic_body(Vec3::new(0.0, 0.6, 0.0));
        let collider = world.add_box_collider(body, Vec3::new(0.5, 0.5, 0.5), CollisionGroup::board());
        world.set_body_velocity(body, Velocity::new(Vec3::new(0.0, -5.0, 0.0)));

        let mut tracker = ContactTracker::new(collider);
        let mut starts = Vec::new();
        for _ in 0..30 {
            world.step();
            starts.extend(tracker.poll(&world));
        }

        assert!(!starts.is_empty());
        assert!(starts[0].impulse.y >= 0.0);
        assert_eq!(starts[0].other_layer, CollisionGroup::Environment.bits());
    }

    #[test]
    fn sensor_reports_overlap_once() {
        let mut world = PhysicsWorld::new();
        world.add_static_cuboid(
            Vec3::new(0.0, 1.0, 0.0),
            engine_core::Quat::IDENTITY,
            Vec3::splat(0.5),
            CollisionGroup::scenery(),
        );
        let body = world.add_controlled_body(Transform::from_position(Vec3::new(0.0, 1.0, 0.0)));
        let sensor = world.add_sensor_capsule(body, Vec3::ZERO, 0.5, 0.3, CollisionGroup::rider());
        let mut tracker = OverlapTracker::new(sensor);

        world.step();
        let first = tracker.poll(&world);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].other_layer, CollisionGroup::Scenery.bits());

        world.step();
        assert!(tracker.poll(&world).is_empty());
    }

    #[test]
    fn untouched_collider_reports_nothing() {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane();
        let body = world.add_controlled_body(Transform::from_position(Vec3::new(0.0, 5.0, 0.0)));
        let collider = world.add_box_collider(body, Vec3::splat(0.5), CollisionGroup::board());
        let mut tracker = ContactTracker::new(collider);
        world.step();
        assert!(tracker.poll(&world).is_empty());
    }
}
