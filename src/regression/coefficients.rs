//! Coefficient sources: live OLS fit or the hardcoded fallback.
//!
//! Both implement [`CoefficientSource`]; `predict` never needs to know which
//! one produced its parameters.

use super::ols;
use crate::config::defaults::{STATIC_LIFE_EXPECTANCY, STATIC_UNMET_NEED};
use crate::error::PipelineError;
use crate::types::{CoefficientMode, CoefficientPair, ObservationTable, RegressionReport};

/// Something that yields a coefficient pair for an observation table.
pub trait CoefficientSource {
    fn mode(&self) -> CoefficientMode;

    fn coefficients(&self, table: &ObservationTable) -> Result<CoefficientPair, PipelineError>;
}

/// Ordinary least squares on the supplied table
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicFit;

impl DynamicFit {
    /// Coefficients plus per-outcome fit diagnostics.
    pub fn report(&self, table: &ObservationTable) -> Result<RegressionReport, PipelineError> {
        ols::fit(table)
    }
}

impl CoefficientSource for DynamicFit {
    fn mode(&self) -> CoefficientMode {
        CoefficientMode::Dynamic
    }

    fn coefficients(&self, table: &ObservationTable) -> Result<CoefficientPair, PipelineError> {
        fit_dynamic(table)
    }
}

/// Hardcoded coefficients; ignores the table
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCoefficients;

impl CoefficientSource for StaticCoefficients {
    fn mode(&self) -> CoefficientMode {
        CoefficientMode::Static
    }

    fn coefficients(&self, _table: &ObservationTable) -> Result<CoefficientPair, PipelineError> {
        Ok(static_params())
    }
}

impl CoefficientMode {
    pub fn source(self) -> Box<dyn CoefficientSource> {
        match self {
            Self::Dynamic => Box::new(DynamicFit),
            Self::Static => Box::new(StaticCoefficients),
        }
    }
}

/// Fit both outcome models on `table`.
pub fn fit_dynamic(table: &ObservationTable) -> Result<CoefficientPair, PipelineError> {
    ols::fit(table).map(|report| report.coefficients)
}

/// The documented fallback coefficients.
pub const fn static_params() -> CoefficientPair {
    CoefficientPair {
        life_expectancy: STATIC_LIFE_EXPECTANCY,
        unmet_need: STATIC_UNMET_NEED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegressionParams;

    #[test]
    fn test_static_params_fixed_values() {
        let pair = static_params();
        assert_eq!(pair.life_expectancy, RegressionParams::new(4.105, 0.00183, 0.00884));
        assert_eq!(pair.unmet_need, RegressionParams::new(1.870, 0.0222, -0.0721));
        assert_eq!(pair, static_params());
    }

    #[test]
    fn test_static_source_ignores_table() {
        let empty = ObservationTable::default();
        let pair = StaticCoefficients.coefficients(&empty).unwrap();
        assert_eq!(pair, static_params());
    }

    #[test]
    fn test_dynamic_source_propagates_errors() {
        let err = DynamicFit.coefficients(&ObservationTable::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InsufficientData { needed: 3, available: 0 }
        ));
    }

    #[test]
    fn test_mode_selects_source() {
        assert_eq!(CoefficientMode::Dynamic.source().mode(), CoefficientMode::Dynamic);
        assert_eq!(CoefficientMode::Static.source().mode(), CoefficientMode::Static);
    }
}
