//! Per-region trendlines for the life expectancy vs. log spending scatter.
//!
//! Simple least squares `AHH = a + b * log_spending`, one line per region.
//! Formula: b = Σ(xi - x̄)(yi - ȳ) / Σ(xi - x̄)², a = ȳ - b·x̄

use crate::types::{ObservationTable, Trendline};

/// Fit one line per region, in first-appearance order.
///
/// Regions with fewer than two points or no spread in log spending are skipped.
pub fn region_trendlines(table: &ObservationTable) -> Vec<Trendline> {
    table
        .regions()
        .into_iter()
        .filter_map(|region| {
            let (x, y): (Vec<f64>, Vec<f64>) = table
                .iter()
                .filter(|r| r.region == region)
                .map(|r| (r.log_spending, r.life_expectancy))
                .unzip();
            simple_ols(&x, &y).map(|(intercept, slope, r_squared)| Trendline {
                region,
                intercept,
                slope,
                r_squared,
                n_obs: x.len(),
            })
        })
        .collect()
}

/// Returns (intercept, slope, r²), or None when the slope is undetermined.
#[allow(clippy::cast_precision_loss)]
pub fn simple_ols(x: &[f64], y: &[f64]) -> Option<(f64, f64, f64)> {
    if x.len() < 2 || x.len() != y.len() {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let ss_xx: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
    let ss_yy: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();
    let ss_xy: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();

    if ss_xx <= f64::EPSILON * mean_x.abs().max(1.0) {
        return None;
    }

    let slope = ss_xy / ss_xx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = if ss_yy > 0.0 {
        (ss_xy * ss_xy) / (ss_xx * ss_yy)
    } else {
        1.0
    };
    Some((intercept, slope, r_squared))
}
