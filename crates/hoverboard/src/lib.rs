//! Hoverboard rider simulation core.
//!
//! A hover-height PID controller, the board's hover and propulsion model,
//! on-foot walking, in-air tricks, the player mode machine
//! (walk / slide / in-air / fall) and the two fall detectors, all driven
//! by explicit tick calls on a [`Player`].
//!
//! The world is reached through [`GroundProbe`] for ray queries and
//! [`AnimationDriver`] for animation parameters. [`host::RapierRig`] runs
//! the player against the Rapier world of the `physics` crate.

pub mod animation;
pub mod board;
pub mod body;
pub mod config;
pub mod events;
pub mod host;
pub mod impact;
pub mod input;
pub mod mode;
pub mod pid;
pub mod player;
pub mod probe;
pub mod tricks;
pub mod walk;

pub use animation::{AnimationDriver, AnimationRecorder, NullAnimator};
pub use board::{BoardConfig, BoardTick, HoverBoard, InputFrame};
pub use body::VehicleState;
pub use config::{ConfigError, TuningConfig};
pub use events::{EventBus, PlayerEvent, PlayerObserver};
pub use impact::{ImpactClassifier, ImpactEvent, ImpactVerdict, TriggerEvent, VelocityHitDetector};
pub use input::ControlSnapshot;
pub use mode::{FallCause, ModeMachine, PlayerMode, Transition, TransitionCause};
pub use pid::{PidController, PidGains};
pub use player::{Integration, Player, TickReport};
pub use probe::{FlatGround, GroundHit, GroundProbe, NoGround};
pub use tricks::Tricks;
pub use walk::{CameraBasis, Walker};
