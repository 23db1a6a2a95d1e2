//! Animation driver boundary. The simulation writes named parameters; it never reads them back.

use std::collections::HashMap;

pub const JUMP_METER: &str = "jump_meter";
pub const BOARD_VELOCITY: &str = "board_velocity";
pub const DIRECTION_X: &str = "direction_x";
pub const WALK_VELOCITY: &str = "walk_velocity";
pub const IS_WALKING: &str = "is_walking";
pub const IS_GROUNDED: &str = "is_grounded";
pub const TRICKS_TRIGGERED: &str = "tricks_triggered";
pub const TRICKS_RAND: &str = "tricks_rand";
pub const TRICK_DIRECTION: &str = "trick_direction";

/// Receives animation parameters from the simulation.
pub trait AnimationDriver {
    fn set_float(&mut self, name: &'static str, value: f32);
    fn set_bool(&mut self, name: &'static str, value: bool);
    fn set_int(&mut self, name: &'static str, value: i32);
    /// Enable or disable animation playback entirely (disabled while ragdolled).
    fn set_enabled(&mut self, enabled: bool);
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullAnimator;

impl AnimationDriver for NullAnimator {
    fn set_float(&mut self, _name: &'static str, _value: f32) {}
    fn set_bool(&mut self, _name: &'static str, _value: bool) {}
    fn set_int(&mut self, _name: &'static str, _value: i32) {}
    fn set_enabled(&mut self, _enabled: bool) {}
}

/// Keeps the latest value of every parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRecorder {
    pub floats: HashMap<&'static str, f32>,
    pub bools: HashMap<&'static str, bool>,
    pub ints: HashMap<&'static str, i32>,
    pub enabled: bool,
}

impl Default for AnimationRecorder {
    fn default() -> Self {
        Self {
            floats: HashMap::new(),
            bools: HashMap::new(),
            ints: HashMap::new(),
            enabled: true,
        }
    }
}

impl AnimationRecorder {
    pub fn float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.bools.get(name).copied()
    }

    pub fn int(&self, name: &str) -> Option<i32> {
        self.ints.get(name).copied()
    }
}

impl AnimationDriver for AnimationRecorder {
    fn set_float(&mut self, name: &'static str, value: f32) {
        self.floats.insert(name, value);
    }

    fn set_bool(&mut self, name: &'static str, value: bool) {
        self.bools.insert(name, value);
    }

    fn set_int(&mut self, name: &'static str, value: i32) {
        self.ints.insert(name, value);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
