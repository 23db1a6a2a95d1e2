//! Single-axis PID controller used to hold the board at its hover height.

use serde::{Deserialize, Serialize};

/// Smallest timestep the controller will differentiate over.
pub const MIN_DT: f32 = 1.0e-4;

/// Gains and output range of a [`PidController`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub min_output: f32,
    pub max_output: f32,
}

impl Default for PidGains {
    fn default() -> Self {
        Self {
            kp: 0.8,
            ki: 0.0002,
            kd: 0.06,
            min_output: -1.0,
            max_output: 1.0,
        }
    }
}

/// PID controller state. The integral is unbounded; callers reset it
/// when the measured quantity loses meaning (e.g. the board leaves the ground).
#[derive(Debug, Clone, Copy, Default)]
pub struct PidController {
    pub gains: PidGains,
    integral: f32,
    last_error: f32,
}

impl PidController {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            integral: 0.0,
            last_error: 0.0,
        }
    }

    /// Correction toward `target`, clamped to the configured output range.
    pub fn compute(&mut self, target: f32, measured: f32, dt: f32) -> f32 {
        let dt = dt.max(MIN_DT);
        let error = target - measured;

        let derivative = (error - self.last_error) / dt;
        self.integral += error * dt;
        self.last_error = error;

        let g = &self.gains;
        let output = g.kp * error + g.ki * self.integral + g.kd * derivative;
        // Opposing infinite terms sum to NaN, which clamp passes through.
        let output = if output.is_nan() { 0.0 } else { output };
        output.clamp(g.min_output, g.max_output)
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = 0.0;
    }

    pub fn integral(&self) -> f32 {
        self.integral
    }

    pub fn last_error(&self) -> f32 {
        self.last_error
    }
}
