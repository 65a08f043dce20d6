//! Regression result types: parameter triples, per-outcome pairs, fit diagnostics.

use serde::{Deserialize, Serialize};

/// One fitted linear model: `outcome = intercept + b1 * log_spending + b2 * log_output`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionParams {
    pub intercept: f64,
    pub coef_log_spending: f64,
    pub coef_log_output: f64,
}

impl RegressionParams {
    pub const fn new(intercept: f64, coef_log_spending: f64, coef_log_output: f64) -> Self {
        Self {
            intercept,
            coef_log_spending,
            coef_log_output,
        }
    }

    /// Evaluate the model. Inputs are not range-checked.
    pub fn predict(&self, log_spending: f64, log_output: f64) -> f64 {
        self.intercept + self.coef_log_spending * log_spending + self.coef_log_output * log_output
    }

    /// Coefficients in design-matrix column order `[const, log_spending, log_output]`.
    pub fn as_array(&self) -> [f64; 3] {
        [self.intercept, self.coef_log_spending, self.coef_log_output]
    }
}

/// The two independent parameter sets, one per outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientPair {
    /// Model for life expectancy (AHH)
    pub life_expectancy: RegressionParams,
    /// Model for unmet need
    pub unmet_need: RegressionParams,
}

/// Where a coefficient pair came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoefficientMode {
    /// Live OLS fit on the observation table
    Dynamic,
    /// Hardcoded fallback coefficients
    Static,
}

impl std::fmt::Display for CoefficientMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dynamic => write!(f, "dynamic"),
            Self::Static => write!(f, "static"),
        }
    }
}

/// Per-coefficient inference, only available with positive residual degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientInference {
    pub std_errors: [f64; 3],
    pub t_values: [f64; 3],
    pub p_values: [f64; 3],
}

/// Goodness-of-fit diagnostics for one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    pub n_obs: usize,
    pub residual_df: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub residual_std_error: f64,
    pub inference: Option<CoefficientInference>,
}

/// Coefficients plus diagnostics for both outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionReport {
    pub coefficients: CoefficientPair,
    pub life_expectancy: FitSummary,
    pub unmet_need: FitSummary,
}

/// Simple OLS line of life expectancy on log spending for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trendline {
    pub region: String,
    pub intercept: f64,
    pub slope: f64,
    pub r_squared: f64,
    pub n_obs: usize,
}

impl Trendline {
    pub fn at(&self, log_spending: f64) -> f64 {
        self.intercept + self.slope * log_spending
    }
}
