//! Player mode state machine.
//!
//! The machine only decides. It answers "may the rider go from here to there
//! right now?" and hands back a [`Transition`]; carrying out the transition
//! (activating the board, clearing inputs, notifying observers) is the job
//! of [`crate::player::Player`].

use engine_core::Cooldown;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerMode {
    /// On foot.
    #[default]
    Walk,
    /// Riding the board on the ground.
    Slide,
    /// Riding the board in the air.
    InAir,
    /// Knocked off the board, ragdolled.
    Fall,
}

impl PlayerMode {
    /// Board modes where the rider stands on the board.
    pub fn is_riding(self) -> bool {
        matches!(self, PlayerMode::Slide | PlayerMode::InAir)
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerMode::Walk => "walk",
            PlayerMode::Slide => "slide",
            PlayerMode::InAir => "in-air",
            PlayerMode::Fall => "fall",
        }
    }
}

/// Why a transition happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    /// Initial mode at spawn.
    Spawn,
    /// The player pressed the mode toggle.
    Toggle,
    /// The ground sensor found or lost the ground.
    GroundedChanged,
    /// The board hit something hard enough, or landed badly.
    Impact(FallCause),
}

/// What knocked the rider off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallCause {
    /// Hard vertical landing with the board not flat on the ground.
    BadLanding,
    /// Impact force over the ragdoll threshold.
    ViolentImpact,
    /// Rider volume touched something while moving too fast.
    ExcessiveVelocity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: PlayerMode,
    pub to: PlayerMode,
    pub cause: TransitionCause,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeConfig {
    /// Seconds between two accepted mode toggles.
    pub state_switch_cooldown: f32,
    /// Rider must be slower than this to get up after a fall.
    pub fall_max_stop_speed: f32,
    /// Board must be slower than this (km/h) to step off.
    pub walk_max_speed_kmh: f32,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            state_switch_cooldown: 0.5,
            fall_max_stop_speed: 0.5,
            walk_max_speed_kmh: 25.0,
        }
    }
}

/// Measurements the toggle gates look at.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ToggleGates {
    /// Board speed in km/h.
    pub board_speed_kmh: f32,
    /// Remaining motion of the fallen rider.
    pub residual_speed: f32,
}

#[derive(Debug, Clone)]
pub struct ModeMachine {
    config: ModeConfig,
    mode: PlayerMode,
    cooldown: Cooldown,
}

impl ModeMachine {
    pub fn new(config: ModeConfig) -> Self {
        Self {
            config,
            mode: PlayerMode::Walk,
            cooldown: Cooldown::new(config.state_switch_cooldown),
        }
    }

    pub fn mode(&self) -> PlayerMode {
        self.mode
    }

    pub fn config(&self) -> &ModeConfig {
        &self.config
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown.remaining
    }

    /// Count the toggle cooldown down; called every frame.
    pub fn tick(&mut self, dt: f32) {
        self.cooldown.update(dt);
    }

    /// The player pressed the mode toggle.
    ///
    /// Any press that finds the cooldown expired restarts it, even when a
    /// later gate (speed, airborne, still tumbling) turns the press down.
    pub fn request_toggle(&mut self, gates: ToggleGates) -> Option<Transition> {
        if !self.cooldown.is_ready() {
            return None;
        }
        self.cooldown.trigger();

        let to = match self.mode {
            PlayerMode::Walk => PlayerMode::Slide,
            PlayerMode::Fall => {
                if gates.residual_speed >= self.config.fall_max_stop_speed {
                    return None;
                }
                PlayerMode::Slide
            }
            PlayerMode::InAir => return None,
            PlayerMode::Slide => {
                if gates.board_speed_kmh >= self.config.walk_max_speed_kmh {
                    return None;
                }
                PlayerMode::Walk
            }
        };
        self.enter(to, TransitionCause::Toggle)
    }

    /// The board's ground sensor flipped. Ignored unless riding.
    pub fn grounded_changed(&mut self, grounded: bool) -> Option<Transition> {
        if !self.mode.is_riding() {
            return None;
        }
        let to = if grounded {
            PlayerMode::Slide
        } else {
            PlayerMode::InAir
        };
        self.enter(to, TransitionCause::GroundedChanged)
    }

    /// A fall detector fired. Only a riding player can fall.
    pub fn request_fall(&mut self, cause: FallCause) -> Option<Transition> {
        if !self.mode.is_riding() {
            return None;
        }
        self.enter(PlayerMode::Fall, TransitionCause::Impact(cause))
    }

    fn enter(&mut self, to: PlayerMode, cause: TransitionCause) -> Option<Transition> {
        if to == self.mode {
            return None;
        }
        let from = self.mode;
        self.mode = to;
        Some(Transition { from, to, cause })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> ModeMachine {
        ModeMachine::new(ModeConfig {
            state_switch_cooldown: 1.0,
            fall_max_stop_speed: 0.5,
            walk_max_speed_kmh: 25.0,
        })
    }

    fn slow() -> ToggleGates {
        ToggleGates::default()
    }

    #[test]
    fn starts_walking() {
        assert_eq!(machine().mode(), PlayerMode::Walk);
    }

    #[test]
    fn toggle_walk_to_slide_then_back() {
        let mut m = machine();
        let t = m.request_toggle(slow()).unwrap();
        assert_eq!((t.from, t.to), (PlayerMode::Walk, PlayerMode::Slide));
        m.tick(1.0);
        let t = m.request_toggle(slow()).unwrap();
        assert_eq!((t.from, t.to), (PlayerMode::Slide, PlayerMode::Walk));
    }

    #[test]
    fn cooldown_blocks_second_toggle() {
        let mut m = machine();
        assert!(m.request_toggle(slow()).is_some());
        m.tick(0.6);
        assert!(m.request_toggle(slow()).is_none());
        assert_eq!(m.mode(), PlayerMode::Slide);
        m.tick(0.4);
        assert!(m.request_toggle(slow()).is_some());
        assert_eq!(m.mode(), PlayerMode::Walk);
    }

    #[test]
    fn cannot_step_off_fast_board_or_in_air() {
        let mut m = machine();
        m.request_toggle(slow());
        m.tick(1.0);
        let fast = ToggleGates {
            board_speed_kmh: 30.0,
            ..slow()
        };
        assert!(m.request_toggle(fast).is_none());
        assert_eq!(m.mode(), PlayerMode::Slide);

        m.grounded_changed(false);
        assert_eq!(m.mode(), PlayerMode::InAir);
        m.tick(1.0);
        assert!(m.request_toggle(slow()).is_none());
        assert_eq!(m.mode(), PlayerMode::InAir);
    }

    #[test]
    fn rejected_toggle_still_restarts_cooldown() {
        let mut m = machine();
        m.request_toggle(slow());
        m.tick(1.0);
        let fast = ToggleGates {
            board_speed_kmh: 30.0,
            ..slow()
        };
        assert!(m.request_toggle(fast).is_none());
        assert!(m.cooldown_remaining() > 0.0);
        assert!(m.request_toggle(slow()).is_none());
    }

    #[test]
    fn grounded_flips_between_slide_and_air() {
        let mut m = machine();
        assert!(m.grounded_changed(false).is_none(), "walking ignores the board sensor");
        m.request_toggle(slow());
        let t = m.grounded_changed(false).unwrap();
        assert_eq!(t.to, PlayerMode::InAir);
        assert_eq!(t.cause, TransitionCause::GroundedChanged);
        let t = m.grounded_changed(true).unwrap();
        assert_eq!(t.to, PlayerMode::Slide);
    }

    #[test]
    fn fall_suppresses_sensor_and_waits_for_rest() {
        let mut m = machine();
        m.request_toggle(slow());
        let t = m.request_fall(FallCause::ViolentImpact).unwrap();
        assert_eq!(t.to, PlayerMode::Fall);
        assert!(m.grounded_changed(true).is_none());
        assert!(m.grounded_changed(false).is_none());
        assert!(m.request_fall(FallCause::BadLanding).is_none());

        let tumbling = ToggleGates {
            residual_speed: 3.0,
            ..slow()
        };
        for _ in 0..5 {
            m.tick(1.0);
            assert!(m.request_toggle(tumbling).is_none());
            assert_eq!(m.mode(), PlayerMode::Fall);
        }

        m.tick(1.0);
        let t = m.request_toggle(slow()).unwrap();
        assert_eq!((t.from, t.to), (PlayerMode::Fall, PlayerMode::Slide));
    }

    #[test]
    fn walking_player_cannot_fall() {
        let mut m = machine();
        assert!(m.request_fall(FallCause::ExcessiveVelocity).is_none());
        assert_eq!(m.mode(), PlayerMode::Walk);
    }
}
