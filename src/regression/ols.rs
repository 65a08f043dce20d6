//! Ordinary Least Squares on the `[1, log_spending, log_output]` design
//!
//! Solves both outcome models against one SVD of the design matrix:
//! `beta = X⁺ y`, with `X⁺` the Moore-Penrose pseudo-inverse. Numerical rank
//! is checked first so a rank-deficient design fails instead of returning a
//! minimum-norm solution.
//!
//! Diagnostics follow the usual OLS summary:
//! - R² = 1 - SSR / SST, adjusted by `(n - 1) / (n - p)`
//! - `se(b_j) = sqrt(s² · [(XᵀX)⁻¹]_jj)` with `(XᵀX)⁻¹ = X⁺ X⁺ᵀ`
//! - two-tailed p-values from Student's t with `n - p` degrees of freedom (statrs)

use crate::config::defaults::{DESIGN_COLUMNS, MIN_FIT_ROWS, RANK_TOLERANCE};
use crate::error::PipelineError;
use crate::types::{
    CoefficientInference, CoefficientPair, FitSummary, ObservationTable, RegressionParams,
    RegressionReport,
};
use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::debug;

/// Build the design matrix with an intercept column.
pub fn design_matrix(table: &ObservationTable) -> DMatrix<f64> {
    DMatrix::from_fn(table.len(), DESIGN_COLUMNS, |i, j| {
        let row = &table.rows()[i];
        match j {
            0 => 1.0,
            1 => row.log_spending,
            _ => row.log_output,
        }
    })
}

/// Fit both outcomes and compute diagnostics.
pub fn fit(table: &ObservationTable) -> Result<RegressionReport, PipelineError> {
    let n = table.len();
    if n < MIN_FIT_ROWS {
        return Err(PipelineError::InsufficientData {
            needed: MIN_FIT_ROWS,
            available: n,
        });
    }

    let x = design_matrix(table);
    let pinv = pseudo_inverse(&x)?;

    let y_ahh = DVector::from_iterator(n, table.iter().map(|r| r.life_expectancy));
    let y_unmet = DVector::from_iterator(n, table.iter().map(|r| r.unmet_need));

    let (ahh_params, ahh_summary) = solve(&x, &pinv, &y_ahh);
    let (unmet_params, unmet_summary) = solve(&x, &pinv, &y_unmet);

    debug!(
        n_obs = n,
        r2_life_expectancy = ahh_summary.r_squared,
        r2_unmet_need = unmet_summary.r_squared,
        "OLS fit complete"
    );

    Ok(RegressionReport {
        coefficients: CoefficientPair {
            life_expectancy: ahh_params,
            unmet_need: unmet_params,
        },
        life_expectancy: ahh_summary,
        unmet_need: unmet_summary,
    })
}

/// Pseudo-inverse of a full-column-rank design, or `SingularDesign`.
fn pseudo_inverse(x: &DMatrix<f64>) -> Result<DMatrix<f64>, PipelineError> {
    let svd = x.clone().svd(true, true);
    let largest = svd.singular_values.max();
    let eps = largest * RANK_TOLERANCE;
    let rank = if largest > 0.0 { svd.rank(eps) } else { 0 };

    if rank < DESIGN_COLUMNS {
        return Err(PipelineError::SingularDesign {
            rank,
            required: DESIGN_COLUMNS,
        });
    }

    svd.pseudo_inverse(eps)
        .map_err(|_| PipelineError::SingularDesign {
            rank,
            required: DESIGN_COLUMNS,
        })
}

#[allow(clippy::cast_precision_loss)]
fn solve(
    x: &DMatrix<f64>,
    pinv: &DMatrix<f64>,
    y: &DVector<f64>,
) -> (RegressionParams, FitSummary) {
    let beta = pinv * y;
    let params = RegressionParams::new(beta[0], beta[1], beta[2]);

    let n = y.len();
    let p = DESIGN_COLUMNS;
    let residuals = y - x * &beta;
    let ssr = residuals.norm_squared();
    let mean = y.mean();
    let sst: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();

    // A constant outcome is fitted exactly by the intercept
    let r_squared = if sst > 0.0 { 1.0 - ssr / sst } else { 1.0 };
    let residual_df = n - p;

    let (adj_r_squared, residual_std_error, inference) = if residual_df > 0 {
        let df = residual_df as f64;
        let adj = 1.0 - (1.0 - r_squared) * ((n - 1) as f64) / df;
        let sigma2 = ssr / df;
        let cov_unscaled = pinv * pinv.transpose();
        (adj, sigma2.sqrt(), Some(coefficient_inference(&beta, &cov_unscaled, sigma2, df)))
    } else {
        (f64::NAN, 0.0, None)
    };

    let summary = FitSummary {
        n_obs: n,
        residual_df,
        r_squared,
        adj_r_squared,
        residual_std_error,
        inference,
    };
    (params, summary)
}

fn coefficient_inference(
    beta: &DVector<f64>,
    cov_unscaled: &DMatrix<f64>,
    sigma2: f64,
    df: f64,
) -> CoefficientInference {
    let t_dist = StudentsT::new(0.0, 1.0, df).ok();
    let mut std_errors = [0.0; DESIGN_COLUMNS];
    let mut t_values = [0.0; DESIGN_COLUMNS];
    let mut p_values = [1.0; DESIGN_COLUMNS];

    for j in 0..DESIGN_COLUMNS {
        let se = (sigma2 * cov_unscaled[(j, j)]).max(0.0).sqrt();
        std_errors[j] = se;
        if se > 0.0 {
            let t = beta[j] / se;
            t_values[j] = t;
            p_values[j] = t_dist
                .as_ref()
                .map_or(1.0, |d| 2.0 * (1.0 - d.cdf(t.abs())));
        } else {
            // Exact fit: the coefficient is known without error
            t_values[j] = f64::INFINITY.copysign(beta[j]);
            p_values[j] = 0.0;
        }
    }

    CoefficientInference {
        std_errors,
        t_values,
        p_values,
    }
}
