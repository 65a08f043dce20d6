//! Spending Impact: regional spending vs. health outcome regression
//!
//! Loads regional health + education spending statistics, fits two OLS models
//! of health outcomes on log spending and log service output, and runs
//! what-if simulations against either the live fit or fixed fallback
//! coefficients.
//!
//! ## Architecture
//!
//! - **Data Preparation**: source reading, missing-row filtering, log predictors
//! - **Regression Engine**: OLS fit, static fallback, prediction
//! - **Simulation**: slider-bounded inputs applied to a coefficient pair
//! - **Report**: selection, trend series, trendlines and predictions for display
//!
//! Every pipeline call is a pure function of its explicit inputs.

pub mod config;
pub mod data_prep;
pub mod error;
pub mod regression;
pub mod report;
pub mod simulation;
pub mod types;

pub use config::DashboardConfig;
pub use error::{DataSourceError, PipelineError};

pub use types::{
    CoefficientMode, CoefficientPair, FitSummary, Observation, ObservationTable, Prediction,
    RegressionParams, RegressionReport, Selection, SimulationInput, SliderRange, Trendline,
};

pub use data_prep::{load_from_source, load_observations, DataSource, NonPositivePolicy, RawTable};
pub use regression::{
    fit_dynamic, predict, static_params, CoefficientSource, DynamicFit, StaticCoefficients,
};
pub use report::{DashboardReport, ReportOptions};
pub use simulation::{simulate, Sliders};
