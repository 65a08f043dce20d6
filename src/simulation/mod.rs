//! What-if simulation: apply a coefficient pair to slider inputs.

use crate::regression::predict;
use crate::types::{CoefficientPair, Prediction, SimulationInput, SliderRange};
use tracing::warn;

/// Predict both outcomes for one input.
pub fn simulate(coefficients: &CoefficientPair, input: SimulationInput) -> Prediction {
    Prediction {
        life_expectancy: predict(
            &coefficients.life_expectancy,
            input.log_spending,
            input.log_output,
        ),
        unmet_need: predict(&coefficients.unmet_need, input.log_spending, input.log_output),
    }
}

/// Slider-constrained input builder; missing values take the slider defaults.
#[derive(Debug, Clone, Copy)]
pub struct Sliders {
    pub spending: SliderRange,
    pub output: SliderRange,
}

impl Sliders {
    pub const fn new(spending: SliderRange, output: SliderRange) -> Self {
        Self { spending, output }
    }

    /// Snap requested values onto the slider grids.
    pub fn input(&self, log_spending: Option<f64>, log_output: Option<f64>) -> SimulationInput {
        SimulationInput::new(
            Self::snap("log_spending", &self.spending, log_spending),
            Self::snap("log_output", &self.output, log_output),
        )
    }

    fn snap(name: &str, range: &SliderRange, requested: Option<f64>) -> f64 {
        let Some(value) = requested else {
            return range.default;
        };
        let snapped = range.snap(value);
        if (snapped - value).abs() > 1e-9 {
            warn!(
                slider = name,
                requested = value,
                applied = snapped,
                min = range.min,
                max = range.max,
                "Simulation input adjusted to slider range"
            );
        }
        snapped
    }
}
