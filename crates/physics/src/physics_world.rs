//! Physics world management with Rapier3D.

use crate::collision::CollisionGroup;
use engine_core::{Quat, Transform, Vec3, Velocity};
use rapier3d::na::{Isometry3, Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;

/// Environment collision groups so static geometry collides with board and rider.
fn env_collision_groups() -> InteractionGroups {
    CollisionGroup::interaction(CollisionGroup::environment())
}

pub(crate) fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub(crate) fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn to_rotation(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

fn to_isometry(translation: Vec3, rotation: Quat) -> Isometry3<Real> {
    Isometry3::from_parts(
        Translation3::new(translation.x, translation.y, translation.z),
        to_rotation(rotation),
    )
}

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with default gravity.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, -9.81, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Set the solver timestep in seconds.
    pub fn set_timestep(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Step the physics simulation.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Update query pipeline for raycasting.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a dynamic body whose forces come from a controller rather than world gravity.
    pub fn add_controlled_body(&mut self, transform: Transform) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::dynamic()
            .position(to_isometry(transform.position, transform.rotation))
            .gravity_scale(0.0)
            .ccd_enabled(true)
            .build();
        self.rigid_body_set.insert(rigid_body)
    }

    /// Add a dynamic rigid body and return its handle.
    pub fn add_dynamic_body(&mut self, position: Vec3) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(to_vector(position))
            .build();
        self.rigid_body_set.insert(rigid_body)
    }

    /// Add a box collider to a rigid body.
    pub fn add_box_collider(
        &mut self,
        body_handle: RigidBodyHandle,
        half_extents: Vec3,
        groups: (Group, Group),
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .collision_groups(CollisionGroup::interaction(groups))
            .build();
        self.collider_set.insert_with_parent(collider, body_handle, &mut self.rigid_body_set)
    }

    /// Add a capsule sensor to a rigid body, offset in body space. Sensors overlap but never push.
    pub fn add_sensor_capsule(
        &mut self,
        body_handle: RigidBodyHandle,
        offset: Vec3,
        half_height: f32,
        radius: f32,
        groups: (Group, Group),
    ) -> ColliderHandle {
        let collider = ColliderBuilder::capsule_y(half_height, radius)
            .translation(to_vector(offset))
            .sensor(true)
            .collision_groups(CollisionGroup::interaction(groups))
            .build();
        self.collider_set.insert_with_parent(collider, body_handle, &mut self.rigid_body_set)
    }

    /// Add a ground plane collider (flat Y=0 half-space).
    pub fn add_ground_plane(&mut self) -> ColliderHandle {
        let collider = ColliderBuilder::halfspace(Vector::y_axis())
            .collision_groups(env_collision_groups())
            .build();
        self.collider_set.insert(collider)
    }

    /// Add a fixed cuboid collider (ramps, walls). No parent body.
    pub fn add_static_cuboid(
        &mut self,
        translation: Vec3,
        rotation: Quat,
        half_extents: Vec3,
        groups: (Group, Group),
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .position(to_isometry(translation, rotation))
            .collision_groups(CollisionGroup::interaction(groups))
            .build();
        self.collider_set.insert(collider)
    }

    /// Membership bits of a collider, or 0 if it no longer exists.
    pub fn collider_layer(&self, handle: ColliderHandle) -> u32 {
        self.collider_set
            .get(handle)
            .map(|c| c.collision_groups().memberships.bits())
            .unwrap_or(0)
    }

    /// Get the pose of a rigid body.
    pub fn body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        self.rigid_body_set.get(handle).map(|body| {
            let pos = body.translation();
            let rot = body.rotation();
            Transform {
                position: Vec3::new(pos.x, pos.y, pos.z),
                rotation: Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w),
            }
        })
    }

    /// Get the velocity of a rigid body.
    pub fn body_velocity(&self, handle: RigidBodyHandle) -> Option<Velocity> {
        self.rigid_body_set
            .get(handle)
            .map(|body| Velocity::with_angular(to_vec3(body.linvel()), to_vec3(body.angvel())))
    }

    /// Overwrite the pose of a rigid body.
    pub fn set_body_transform(&mut self, handle: RigidBodyHandle, transform: Transform) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_position(to_isometry(transform.position, transform.rotation), true);
        }
    }

    /// Overwrite the velocity of a rigid body.
    pub fn set_body_velocity(&mut self, handle: RigidBodyHandle, velocity: Velocity) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(to_vector(velocity.linear), true);
            body.set_angvel(to_vector(velocity.angular), true);
        }
    }

    /// Take a body (and its colliders) out of the simulation without removing it.
    pub fn set_body_enabled(&mut self, handle: RigidBodyHandle, enabled: bool) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_enabled(enabled);
        }
    }
}
