//! Shared data types for the spending impact pipeline.
//!
//! - `observation`: prepared rows and region/year selection
//! - `regression`: parameter triples, coefficient pairs, fit diagnostics
//! - `simulation`: slider ranges, simulation input, predictions

mod observation;
mod regression;
mod simulation;

pub use observation::{Observation, ObservationTable, Selection};
pub use regression::{
    CoefficientInference, CoefficientMode, CoefficientPair, FitSummary, RegressionParams,
    RegressionReport, Trendline,
};
pub use simulation::{Prediction, SimulationInput, SliderRange};
