//! Fall detection.
//!
//! Two independent detectors can knock the rider off the board:
//! [`ImpactClassifier`] looks at the impulse of a new board contact and, for
//! hard vertical hits, at whether the board landed flat; [`VelocityHitDetector`]
//! fires when the rider's body brushes something while the board moves fast.
//! Their thresholds are tuned separately and they never consult each other.

use engine_core::Transform;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::mode::FallCause;
use crate::pid::MIN_DT;
use crate::probe::GroundProbe;

/// A new physical contact on the board.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImpactEvent {
    pub impulse: Vec3,
    pub relative_velocity: Vec3,
    /// The other body belongs to the player (rider colliders, ragdoll).
    pub other_is_player: bool,
}

/// Something entered the rider's hit volume.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TriggerEvent {
    /// Layer bits of the other collider.
    pub other_layer: u32,
    pub other_is_player: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactVerdict {
    Ignore,
    Fall(FallCause),
}

/// A point under the board that must find ground after a hard landing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StanceProbe {
    /// Ray origin in board space.
    pub offset: Vec3,
    pub max_distance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactConfig {
    /// Implied force above which a hit may end the ride.
    pub ragdoll_threshold: f32,
    /// Weight of the vertical impulse component.
    pub y_collision_importance: f32,
    pub stance_probes: Vec<StanceProbe>,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            ragdoll_threshold: 1750.0,
            y_collision_importance: 1.0,
            stance_probes: vec![
                StanceProbe {
                    offset: Vec3::new(0.0, 0.0, -0.8),
                    max_distance: 1.5,
                },
                StanceProbe {
                    offset: Vec3::new(0.0, 0.0, 0.8),
                    max_distance: 1.2,
                },
                StanceProbe {
                    offset: Vec3::ZERO,
                    max_distance: 1.2,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImpactClassifier {
    pub config: ImpactConfig,
}

impl ImpactClassifier {
    pub fn new(config: ImpactConfig) -> Self {
        Self { config }
    }

    /// Implied force of `impulse` over one step, vertical part weighted.
    pub fn implied_force(&self, impulse: Vec3, dt: f32) -> Vec3 {
        let dt = dt.max(MIN_DT);
        Vec3::new(
            impulse.x / dt,
            impulse.y * self.config.y_collision_importance / dt,
            impulse.z / dt,
        )
    }

    pub fn classify(
        &self,
        impulse: Vec3,
        dt: f32,
        board: &Transform,
        probe: &dyn GroundProbe,
    ) -> ImpactVerdict {
        let force = self.implied_force(impulse, dt);
        let threshold = self.config.ragdoll_threshold;

        if force.y > threshold {
            if self.landed_flat(board, probe) {
                ImpactVerdict::Ignore
            } else {
                ImpactVerdict::Fall(FallCause::BadLanding)
            }
        } else if force.length() > threshold {
            ImpactVerdict::Fall(FallCause::ViolentImpact)
        } else {
            ImpactVerdict::Ignore
        }
    }

    /// Every stance probe finds ground along the board's down axis.
    fn landed_flat(&self, board: &Transform, probe: &dyn GroundProbe) -> bool {
        let down = -board.up();
        self.config.stance_probes.iter().all(|stance| {
            probe
                .cast(board.transform_point(stance.offset), down, stance.max_distance)
                .is_some()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityHitConfig {
    /// Per-axis board speed at which touching something knocks the rider off.
    pub min_velocity_needed: f32,
    /// Also test the vertical axis.
    pub check_vertical: bool,
    /// Layers the rider can touch at any speed.
    pub ignored_layers: u32,
}

impl Default for VelocityHitConfig {
    fn default() -> Self {
        Self {
            min_velocity_needed: 12.0,
            check_vertical: false,
            ignored_layers: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityHitDetector {
    pub config: VelocityHitConfig,
}

impl VelocityHitDetector {
    pub fn new(config: VelocityHitConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, event: &TriggerEvent, board_velocity: Vec3) -> ImpactVerdict {
        if event.other_is_player || event.other_layer & self.config.ignored_layers != 0 {
            return ImpactVerdict::Ignore;
        }
        let min = self.config.min_velocity_needed;
        let too_fast = board_velocity.x.abs() >= min
            || board_velocity.z.abs() >= min
            || (self.config.check_vertical && board_velocity.y.abs() >= min);
        if too_fast {
            ImpactVerdict::Fall(FallCause::ExcessiveVelocity)
        } else {
            ImpactVerdict::Ignore
        }
    }
}
