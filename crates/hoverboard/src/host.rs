//! Rapier host: runs the player against a [`PhysicsWorld`].
//!
//! The board is a gravity-free dynamic body the player pushes around by
//! writing its velocity; the solver resolves collisions and reports new
//! contacts, which come back to the player as impacts. A sensor capsule
//! above the deck stands in for the rider's body and feeds the velocity
//! hit detector.

use engine_core::{Transform, Vec3};
use physics::{CollisionGroup, ContactTracker, OverlapTracker, PhysicsBody, PhysicsWorld, RigidBodyHandle};

use crate::animation::AnimationDriver;
use crate::impact::{ImpactEvent, TriggerEvent};
use crate::player::{Integration, Player, TickReport};
use crate::probe::{GroundHit, GroundProbe};

const BOARD_HALF_EXTENTS: Vec3 = Vec3::new(0.3, 0.05, 0.9);
const RIDER_VOLUME_OFFSET: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const RIDER_VOLUME_HALF_HEIGHT: f32 = 0.5;
const RIDER_VOLUME_RADIUS: f32 = 0.3;

/// Ground probe over the Rapier query pipeline.
pub struct WorldProbe<'a> {
    world: &'a PhysicsWorld,
    exclude: Option<RigidBodyHandle>,
}

impl<'a> WorldProbe<'a> {
    pub fn new(world: &'a PhysicsWorld) -> Self {
        Self {
            world,
            exclude: None,
        }
    }

    /// Probe that never sees the colliders of `body` (the board sensing past itself).
    pub fn excluding(world: &'a PhysicsWorld, body: RigidBodyHandle) -> Self {
        Self {
            world,
            exclude: Some(body),
        }
    }
}

impl GroundProbe for WorldProbe<'_> {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<GroundHit> {
        let hit = match self.exclude {
            Some(body) => self.world.raycast_excluding(origin, direction, max_distance, body),
            None => self.world.raycast(origin, direction, max_distance),
        }?;
        Some(GroundHit {
            distance: hit.distance,
            point: hit.point,
            normal: hit.normal,
        })
    }
}

/// Board body, rider volume and their contact trackers.
#[derive(Debug)]
pub struct RapierRig {
    pub board: PhysicsBody,
    contacts: ContactTracker,
    overlaps: OverlapTracker,
    board_enabled: bool,
}

impl RapierRig {
    /// Create the board body (disabled until the player mounts it).
    pub fn new(world: &mut PhysicsWorld) -> Self {
        let body = world.add_controlled_body(Transform::default());
        let collider = world.add_box_collider(body, BOARD_HALF_EXTENTS, CollisionGroup::board());
        let rider_volume = world.add_sensor_capsule(
            body,
            RIDER_VOLUME_OFFSET,
            RIDER_VOLUME_HALF_HEIGHT,
            RIDER_VOLUME_RADIUS,
            CollisionGroup::rider(),
        );
        world.set_body_enabled(body, false);
        Self {
            board: PhysicsBody::with_collider(body, collider),
            contacts: ContactTracker::new(collider),
            overlaps: OverlapTracker::new(rider_volume),
            board_enabled: false,
        }
    }

    /// One fixed step: player forces, solver, contacts, rider pinning.
    pub fn step<A: AnimationDriver>(
        &mut self,
        world: &mut PhysicsWorld,
        player: &mut Player<A>,
        dt: f32,
    ) -> TickReport {
        let body = self.board.rigid_body;
        let report = player.fixed_update(dt, &WorldProbe::excluding(world, body));

        let active = player.board_active();
        if active != self.board_enabled {
            world.set_body_enabled(body, active);
            self.board_enabled = active;
        }
        if active && player.integration() == Integration::External {
            let state = player.board().body;
            world.set_body_transform(body, state.transform);
            world.set_body_velocity(body, state.velocity);
        }

        world.set_timestep(dt);
        world.step();

        if active && player.integration() == Integration::External {
            let state = &mut player.board_mut().body;
            if let Some(transform) = world.body_transform(body) {
                state.transform = transform;
            }
            if let Some(velocity) = world.body_velocity(body) {
                state.velocity = velocity;
            }
        }

        if active {
            self.report_contacts(world, player, dt);
        }
        player.late_update();
        report
    }

    fn report_contacts<A: AnimationDriver>(
        &mut self,
        world: &PhysicsWorld,
        player: &mut Player<A>,
        dt: f32,
    ) {
        let player_bits = CollisionGroup::Rider.bits() | CollisionGroup::Board.bits();
        let probe = WorldProbe::excluding(world, self.board.rigid_body);
        for contact in self.contacts.poll(world) {
            let event = ImpactEvent {
                impulse: contact.impulse,
                relative_velocity: contact.relative_velocity,
                other_is_player: contact.other_layer & player_bits != 0,
            };
            player.handle_impact(&event, dt, &probe);
        }
        for overlap in self.overlaps.poll(world) {
            let event = TriggerEvent {
                other_layer: overlap.other_layer,
                other_is_player: overlap.other_layer & player_bits != 0,
            };
            player.handle_trigger(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::NullAnimator;
    use crate::config::TuningConfig;
    use crate::mode::PlayerMode;
    use glam::Quat;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn probe_sees_ground_but_not_excluded_body() {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane();
        let body = world.add_controlled_body(Transform::from_position(Vec3::new(0.0, 0.5, 0.0)));
        world.add_box_collider(body, Vec3::splat(0.2), CollisionGroup::board());
        world.update_query_pipeline();

        let hit = WorldProbe::new(&world)
            .cast(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, 5.0)
            .unwrap();
        assert!((hit.distance - 1.3).abs() < 1.0e-3);

        let hit = WorldProbe::excluding(&world, body)
            .cast(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, 5.0)
            .unwrap();
        assert!((hit.distance - 2.0).abs() < 1.0e-3);
        assert!((hit.normal - Vec3::Y).length() < 1.0e-4);
    }

    #[test]
    fn board_hovers_over_rapier_ground() {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane();
        world.update_query_pipeline();
        let mut rig = RapierRig::new(&mut world);
        let mut player =
            Player::new(&TuningConfig::default(), NullAnimator).with_integration(Integration::External);
        player.spawn(Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY);
        player.toggle_mode();

        for _ in 0..240 {
            player.frame_update(DT);
            rig.step(&mut world, &mut player, DT);
        }

        assert!(player.mode().is_riding());
        let y = player.board().body.position().y;
        assert!(y > 0.1 && y < 2.0, "board at {y}");
        // The rider rides on top of the deck.
        assert!(player.walker().body.position().y > y);
    }

    #[test]
    fn walking_keeps_the_board_out_of_the_world() {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane();
        let mut rig = RapierRig::new(&mut world);
        let mut player = Player::new(&TuningConfig::default(), NullAnimator);
        player.spawn(Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY);

        let report = rig.step(&mut world, &mut player, DT);
        assert_eq!(report.mode, PlayerMode::Walk);
        assert!(report.board.is_none());
        let body = world.rigid_body_set.get(rig.board.rigid_body).unwrap();
        assert!(!body.is_enabled());
    }
}
