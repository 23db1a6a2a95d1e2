//! The player: mode machine, board, walker and detectors wired together.
//!
//! [`Player`] owns every collaborator and is driven by explicit tick calls
//! from the host loop:
//!
//! ```text
//! frame_update(dt)            once per rendered frame
//! fixed_update(dt, probe)     once per physics step: sensor, forces, transition
//! late_update()               after the host solver, pins the rider to the board
//! handle_impact / handle_trigger   for contacts the host reports between steps
//! ```
//!
//! The mode machine decides transitions; this module carries out their side
//! effects and publishes them on the [`EventBus`].

use glam::{Quat, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::{self, AnimationDriver, NullAnimator};
use crate::board::{BoardTick, HoverBoard};
use crate::config::{PlayerConfig, TuningConfig};
use crate::events::{EventBus, PlayerEvent, PlayerObserver};
use crate::impact::{ImpactClassifier, ImpactEvent, ImpactVerdict, TriggerEvent, VelocityHitDetector};
use crate::input::ControlSnapshot;
use crate::mode::{FallCause, ModeMachine, PlayerMode, ToggleGates, Transition, TransitionCause};
use crate::probe::GroundProbe;
use crate::tricks::Tricks;
use crate::walk::{CameraBasis, Walker};

/// Who moves the board after forces are applied. The walking character is always stepped here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Integration {
    /// The player steps the board pose itself (semi-implicit Euler).
    #[default]
    Internal,
    /// A host solver owns the board pose; the player only writes its velocity.
    External,
}

/// Outcome of one fixed tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Mode after the tick.
    pub mode: PlayerMode,
    /// Board sensor and propulsion results, when the board was simulated.
    pub board: Option<BoardTick>,
    pub transition: Option<Transition>,
}

pub struct Player<A: AnimationDriver = NullAnimator> {
    config: PlayerConfig,
    board: HoverBoard,
    walker: Walker,
    tricks: Tricks,
    modes: ModeMachine,
    impact: ImpactClassifier,
    velocity_hit: VelocityHitDetector,
    events: EventBus,
    animator: A,
    rng: StdRng,
    integration: Integration,
    camera: CameraBasis,
    photo_mode: bool,
    board_active: bool,
    ragdoll_engaged: bool,
    ragdoll_speed: f32,
    last_controls: ControlSnapshot,
}

impl<A: AnimationDriver> Player<A> {
    pub fn new(tuning: &TuningConfig, animator: A) -> Self {
        Self {
            config: tuning.player,
            board: HoverBoard::new(tuning.board, tuning.pid),
            walker: Walker::new(tuning.walk),
            tricks: Tricks::new(tuning.tricks),
            modes: ModeMachine::new(tuning.mode),
            impact: ImpactClassifier::new(tuning.impact.clone()),
            velocity_hit: VelocityHitDetector::new(tuning.velocity_hit),
            events: EventBus::new(),
            animator,
            rng: StdRng::seed_from_u64(tuning.player.seed),
            integration: Integration::default(),
            camera: CameraBasis::default(),
            photo_mode: false,
            board_active: false,
            ragdoll_engaged: false,
            ragdoll_speed: 0.0,
            last_controls: ControlSnapshot::default(),
        }
    }

    pub fn with_integration(mut self, integration: Integration) -> Self {
        self.integration = integration;
        self
    }

    /// Put the character on foot at `position` and announce the initial mode.
    pub fn spawn(&mut self, position: Vec3, rotation: Quat) {
        self.walker.body.teleport(position, rotation);
        self.set_ragdoll(false);
        self.apply_transition(Transition {
            from: PlayerMode::Walk,
            to: PlayerMode::Walk,
            cause: TransitionCause::Spawn,
        });
    }

    // Accessors

    pub fn mode(&self) -> PlayerMode {
        self.modes.mode()
    }

    pub fn modes(&self) -> &ModeMachine {
        &self.modes
    }

    pub fn board(&self) -> &HoverBoard {
        &self.board
    }

    /// Mutable board access for hosts syncing an external solver.
    pub fn board_mut(&mut self) -> &mut HoverBoard {
        &mut self.board
    }

    pub fn walker(&self) -> &Walker {
        &self.walker
    }

    pub fn walker_mut(&mut self) -> &mut Walker {
        &mut self.walker
    }

    pub fn tricks(&self) -> &Tricks {
        &self.tricks
    }

    pub fn tricks_mut(&mut self) -> &mut Tricks {
        &mut self.tricks
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn integration(&self) -> Integration {
        self.integration
    }

    /// The board body is in the world (every mode but walking).
    pub fn board_active(&self) -> bool {
        self.board_active
    }

    pub fn ragdoll_engaged(&self) -> bool {
        self.ragdoll_engaged
    }

    /// The rider crouches while the trick button is held; hosts shrink the rider colliders.
    pub fn is_crouched(&self) -> bool {
        self.tricks.is_engaged()
    }

    pub fn is_photo_mode(&self) -> bool {
        self.photo_mode
    }

    pub fn set_photo_mode(&mut self, enabled: bool) {
        self.photo_mode = enabled;
    }

    pub fn set_camera(&mut self, camera: CameraBasis) {
        self.camera = camera;
    }

    /// Where the ragdoll lies and how fast it still moves. The rider gets up there.
    pub fn report_ragdoll(&mut self, position: Vec3, velocity: Vec3) {
        self.walker.body.transform.position = position;
        self.ragdoll_speed = velocity.length();
    }

    // Events

    pub fn subscribe(&mut self, observer: Box<dyn PlayerObserver>) {
        self.events.subscribe(observer);
    }

    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        self.events.drain()
    }

    // Inputs

    /// Left stick. Clears every locomotion input, then feeds walker, board and tricks.
    pub fn move_input(&mut self, stick: Vec2) {
        if self.mode() == PlayerMode::Fall {
            return;
        }
        self.clear_locomotion();
        self.walker.move_input(stick);
        self.board.move_input(stick);
        self.tricks.move_input(stick);
    }

    /// Trick stick. Clears every locomotion input, then feeds only the tricks.
    pub fn trick_input(&mut self, stick: Vec2) {
        if self.mode() == PlayerMode::Fall {
            return;
        }
        self.clear_locomotion();
        self.tricks.move_input(stick);
    }

    pub fn set_trick_toggle(&mut self, toggle: Vec2) {
        self.tricks.set_toggle(toggle, &mut self.animator);
    }

    pub fn set_thruster(&mut self, value: f32) {
        self.board.set_thruster(value);
    }

    pub fn set_brake(&mut self, held: bool) {
        self.board.set_brake(held);
    }

    pub fn set_jump(&mut self, charging: bool) {
        self.board.set_jump(charging);
    }

    pub fn interact(&mut self) {
        self.events.publish(PlayerEvent::Interact);
    }

    /// The mode toggle was pressed.
    pub fn toggle_mode(&mut self) -> Option<Transition> {
        let gates = ToggleGates {
            board_speed_kmh: self.board.speed_kmh(),
            residual_speed: self.walker.body.speed().max(self.ragdoll_speed),
        };
        let transition = self.modes.request_toggle(gates)?;
        self.apply_transition(transition);
        Some(transition)
    }

    /// Translate one frame of raw controls into the calls above.
    pub fn apply_controls(&mut self, controls: &ControlSnapshot) {
        let edges = controls.edges_from(&self.last_controls);
        if edges.movement_changed {
            self.move_input(controls.movement);
        }
        if edges.trick_axes_changed {
            self.trick_input(controls.trick_axes);
        }
        if edges.trick_toggle_changed {
            self.set_trick_toggle(controls.trick_toggle);
        }
        if edges.thruster_changed {
            self.set_thruster(controls.thruster_trigger);
        }
        if edges.brake_changed {
            self.set_brake(controls.brake_held);
        }
        if edges.jump_pressed {
            self.set_jump(true);
        }
        if edges.jump_released {
            self.set_jump(false);
        }
        if controls.toggle_mode {
            self.toggle_mode();
        }
        if controls.interact {
            self.interact();
        }
        self.last_controls = *controls;
    }

    // Ticks

    pub fn frame_update(&mut self, dt: f32) {
        self.modes.tick(dt);
        let mode = self.mode();
        if !mode.is_riding() {
            return;
        }
        self.board.frame_update(dt, &mut self.animator);
        let speed_percentage = self.board.speed_percentage();
        self.tricks
            .frame_update(dt, mode, speed_percentage, &mut self.board.body, &mut self.animator);
    }

    pub fn fixed_update(&mut self, dt: f32, probe: &dyn GroundProbe) -> TickReport {
        let mode = self.mode();
        let mut report = TickReport {
            mode,
            board: None,
            transition: None,
        };

        if mode == PlayerMode::Walk {
            self.walker
                .fixed_update(dt, self.camera, self.photo_mode, probe, &mut self.animator);
            self.walker.body.integrate(dt);
            return report;
        }

        // A fallen rider no longer drives the animation.
        let mut muted = NullAnimator;
        let animator: &mut dyn AnimationDriver = if mode == PlayerMode::Fall {
            &mut muted
        } else {
            &mut self.animator
        };
        let tick = self
            .board
            .fixed_update(dt, mode, probe, &mut self.tricks, animator);
        report.board = Some(tick);

        if let Some(charge) = tick.jump {
            self.events.publish(PlayerEvent::Jumped { charge });
        }
        if let Some(amount) = tick.trick_boost {
            self.events.publish(PlayerEvent::TrickBoost { amount });
        }
        if tick.grounded_changed {
            if let Some(transition) = self.modes.grounded_changed(tick.grounded) {
                self.apply_transition(transition);
                report.transition = Some(transition);
            }
        }
        if self.integration == Integration::Internal {
            self.board.body.integrate(dt);
        }

        report.mode = self.mode();
        report
    }

    /// Pin the rider to the board's mount while riding.
    pub fn late_update(&mut self) {
        if !self.mode().is_riding() {
            return;
        }
        let board = &self.board.body.transform;
        self.walker.body.transform.position = board.transform_point(self.config.rider_offset);
        self.walker.body.transform.rotation = board.rotation;
    }

    /// A new contact on the board.
    pub fn handle_impact(
        &mut self,
        event: &ImpactEvent,
        dt: f32,
        probe: &dyn GroundProbe,
    ) -> Option<Transition> {
        if self.mode() == PlayerMode::Fall || event.other_is_player {
            return None;
        }
        match self
            .impact
            .classify(event.impulse, dt, &self.board.body.transform, probe)
        {
            ImpactVerdict::Ignore => None,
            ImpactVerdict::Fall(cause) => {
                log::debug!("impact {:?} knocked the rider off: {:?}", event.impulse, cause);
                self.fall(cause)
            }
        }
    }

    /// Something entered the rider's hit volume.
    pub fn handle_trigger(&mut self, event: &TriggerEvent) -> Option<Transition> {
        if self.mode() == PlayerMode::Fall {
            return None;
        }
        match self
            .velocity_hit
            .classify(event, self.board.body.velocity.linear)
        {
            ImpactVerdict::Ignore => None,
            ImpactVerdict::Fall(cause) => {
                log::debug!("rider hit layer {:#x} too fast", event.other_layer);
                self.fall(cause)
            }
        }
    }

    fn fall(&mut self, cause: FallCause) -> Option<Transition> {
        let transition = self.modes.request_fall(cause)?;
        self.apply_transition(transition);
        Some(transition)
    }

    // Side effects

    fn apply_transition(&mut self, transition: Transition) {
        let Transition { from, to, cause } = transition;
        match to {
            PlayerMode::Walk => {
                self.animator.set_enabled(true);
                self.board_active = false;
                self.board.reset_inputs();
                self.walker.body.velocity.stop();
                self.animator.set_bool(animation::IS_WALKING, true);
            }
            PlayerMode::Slide => {
                self.animator.set_bool(animation::IS_GROUNDED, true);
                if !from.is_riding() {
                    self.mount_board(from);
                }
                self.animator.set_bool(animation::TRICKS_TRIGGERED, false);
            }
            PlayerMode::InAir => {
                self.animator.set_bool(animation::IS_GROUNDED, false);
                let variant = self.rng.gen_bool(0.5);
                self.animator.set_bool(animation::TRICKS_RAND, variant);
                if !from.is_riding() {
                    self.mount_board(from);
                }
            }
            PlayerMode::Fall => {
                self.events.publish(PlayerEvent::Fell);
                self.clear_locomotion();
                self.board.reset_inputs();
                self.tricks.reset();
                self.tricks.set_toggle(Vec2::ZERO, &mut self.animator);
                self.walker.body.velocity.stop();
                self.set_ragdoll(true);
                self.animator.set_enabled(false);
            }
        }

        log::info!("player {} -> {} ({:?})", from.label(), to.label(), cause);
        self.events.publish(PlayerEvent::ModeChanged { from, to, cause });
    }

    /// Bring the board out under the rider, at rest and level.
    fn mount_board(&mut self, from: PlayerMode) {
        self.animator.set_enabled(true);
        self.board.reset_inputs();
        let position = self.walker.body.position() + self.config.board_spawn_offset;
        let heading = self.walker.body.transform.yaw_only();
        self.board.place(position, heading);
        self.board_active = true;
        self.animator.set_bool(animation::IS_WALKING, false);
        if from == PlayerMode::Fall {
            self.set_ragdoll(false);
            self.ragdoll_speed = 0.0;
            self.events.publish(PlayerEvent::Recovered);
        }
    }

    fn clear_locomotion(&mut self) {
        self.walker.reset_inputs();
        self.board.move_input(Vec2::ZERO);
        self.tricks.move_input(Vec2::ZERO);
    }

    fn set_ragdoll(&mut self, engaged: bool) {
        if self.ragdoll_engaged == engaged {
            return;
        }
        self.ragdoll_engaged = engaged;
        self.events.publish(PlayerEvent::RagdollToggled(engaged));
    }
}

impl<A: AnimationDriver> std::fmt::Debug for Player<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("mode", &self.mode())
            .field("board", &self.board.body)
            .field("walker", &self.walker.body)
            .field("trick_amount", &self.tricks.amount())
            .field("events", &self.events)
            .finish()
    }
}
