//! Simulation slider and prediction types.

use serde::{Deserialize, Serialize};

/// A bounded slider with a fixed step, mirroring the dashboard controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl SliderRange {
    pub const fn new(min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            min,
            max,
            step,
            default,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp into bounds and round to the nearest step from `min`.
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default;
        }
        if self.min > self.max {
            return value;
        }
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step).round();
        // Round away accumulated binary noise (0.1 steps)
        let snapped = ((self.min + steps * self.step) * 1e9).round() / 1e9;
        snapped.clamp(self.min, self.max)
    }
}

/// The two slider values fed to the models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub log_spending: f64,
    pub log_output: f64,
}

impl SimulationInput {
    pub const fn new(log_spending: f64, log_output: f64) -> Self {
        Self {
            log_spending,
            log_output,
        }
    }
}

/// Predicted outcomes for one simulation input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub life_expectancy: f64,
    pub unmet_need: f64,
}
