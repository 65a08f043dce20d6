//! Regression Engine
//!
//! Two independent OLS models share one design matrix:
//! - life expectancy (AHH) ~ 1 + log_spending + log_output
//! - unmet need ~ 1 + log_spending + log_output
//!
//! ## Architecture
//! - `ols`: SVD least squares with rank check and fit diagnostics (nalgebra, statrs)
//! - `coefficients`: `CoefficientSource` trait with dynamic and static implementations
//! - `trendline`: per-region simple OLS for the scatter chart

pub mod coefficients;
pub mod ols;
pub mod trendline;

pub use coefficients::{fit_dynamic, static_params, CoefficientSource, DynamicFit, StaticCoefficients};
pub use trendline::region_trendlines;

use crate::types::RegressionParams;

/// `intercept + coef_log_spending * log_spending_input + coef_log_output * log_output_input`
///
/// Inputs are not bounds-checked; slider ranges are the caller's concern.
pub fn predict(params: &RegressionParams, log_spending_input: f64, log_output_input: f64) -> f64 {
    params.predict(log_spending_input, log_output_input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_reference_value() {
        let params = RegressionParams::new(4.105, 0.00183, 0.00884);
        let result = predict(&params, 26.5, 11.0);
        assert_eq!(result, 4.105 + 0.00183 * 26.5 + 0.00884 * 11.0);
        assert!((result - 4.249795).abs() < 1e-12);
    }

    #[test]
    fn test_predict_not_bounds_checked() {
        let params = RegressionParams::new(1.0, 2.0, 3.0);
        assert_eq!(predict(&params, -10.0, 100.0), 1.0 - 20.0 + 300.0);
    }
}
