//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for the rider scene.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static environment (terrain, ramps, walls)
    Environment = 1 << 0,
    /// The hoverboard chassis
    Board = 1 << 1,
    /// The rider on foot or on the board
    Rider = 1 << 2,
    /// Props the rider can brush through without crashing (foliage, decals)
    Scenery = 1 << 3,
    /// Triggers and sensors
    Trigger = 1 << 4,
}

impl CollisionGroup {
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Create a collision group for environment.
    pub fn environment() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Environment as u32);
        let filter = Group::ALL;
        (membership, filter)
    }

    /// Create a collision group for the board chassis.
    pub fn board() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Board as u32);
        let filter = Group::from_bits_retain(Self::Environment as u32 | Self::Scenery as u32);
        (membership, filter)
    }

    /// Create a collision group for the rider.
    pub fn rider() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Rider as u32);
        let filter = Group::from_bits_retain(Self::Environment as u32 | Self::Scenery as u32);
        (membership, filter)
    }

    /// Create a collision group for scenery props.
    pub fn scenery() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Scenery as u32);
        let filter = Group::from_bits_retain(Self::Board as u32 | Self::Rider as u32);
        (membership, filter)
    }

    pub(crate) fn interaction(groups: (Group, Group)) -> InteractionGroups {
        InteractionGroups::new(groups.0, groups.1)
    }
}

/// Links a simulated entity to its physics handles.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub rigid_body: RigidBodyHandle,
    pub collider: Option<ColliderHandle>,
}

impl PhysicsBody {
    pub fn with_collider(rigid_body: RigidBodyHandle, collider: ColliderHandle) -> Self {
        Self {
            rigid_body,
            collider: Some(collider),
        }
    }
}
