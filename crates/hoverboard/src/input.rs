//! Per-frame device state handed to the player by the host.

use glam::Vec2;

/// Raw controls for one frame. Axes are already mapped to [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlSnapshot {
    /// Left stick: walk direction, or board thruster (y) and rudder (x).
    pub movement: Vec2,
    /// Right stick: trick rotation.
    pub trick_axes: Vec2,
    /// Trick button(s); non-zero while held.
    pub trick_toggle: Vec2,
    /// Analog thruster trigger travel.
    pub thruster_trigger: f32,
    pub brake_held: bool,
    pub jump_held: bool,
    /// Mode toggle pressed this frame.
    pub toggle_mode: bool,
    /// Interact pressed this frame.
    pub interact: bool,
}

/// What changed between two snapshots. Held buttons become press/release edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlEdges {
    pub movement_changed: bool,
    pub trick_axes_changed: bool,
    pub jump_pressed: bool,
    pub jump_released: bool,
    pub brake_changed: bool,
    pub thruster_changed: bool,
    pub trick_toggle_changed: bool,
}

impl ControlSnapshot {
    pub fn edges_from(&self, previous: &ControlSnapshot) -> ControlEdges {
        ControlEdges {
            movement_changed: self.movement != previous.movement,
            trick_axes_changed: self.trick_axes != previous.trick_axes,
            jump_pressed: self.jump_held && !previous.jump_held,
            jump_released: !self.jump_held && previous.jump_held,
            brake_changed: self.brake_held != previous.brake_held,
            thruster_changed: self.thruster_trigger != previous.thruster_trigger,
            trick_toggle_changed: self.trick_toggle != previous.trick_toggle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_edges() {
        let idle = ControlSnapshot::default();
        let held = ControlSnapshot {
            jump_held: true,
            ..idle
        };
        let press = held.edges_from(&idle);
        assert!(press.jump_pressed && !press.jump_released);
        assert_eq!(held.edges_from(&held), ControlEdges::default());
        let release = idle.edges_from(&held);
        assert!(release.jump_released && !release.jump_pressed);
    }

    #[test]
    fn analog_changes_are_reported() {
        let idle = ControlSnapshot::default();
        let pressed = ControlSnapshot {
            thruster_trigger: 0.4,
            trick_toggle: Vec2::X,
            ..idle
        };
        let edges = pressed.edges_from(&idle);
        assert!(edges.thruster_changed);
        assert!(edges.trick_toggle_changed);
        assert!(!edges.brake_changed);
    }
}
