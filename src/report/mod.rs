//! Dashboard Report
//!
//! Assembles everything the presentation layer shows for one request: the
//! selected trend series, per-region trendlines, the coefficients actually
//! used and the simulated outcomes. A failed dynamic fit falls back to the
//! static coefficients here, never inside the pipeline.

use crate::regression::{region_trendlines, static_params, DynamicFit};
use crate::simulation::simulate;
use crate::types::{
    CoefficientMode, CoefficientPair, ObservationTable, Prediction, RegressionReport, Selection,
    SimulationInput, Trendline,
};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// One point of a region's trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub life_expectancy: f64,
    pub unmet_need: f64,
}

/// Year-ordered outcome series for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSeries {
    pub region: String,
    pub points: Vec<SeriesPoint>,
}

/// How coefficients should be obtained for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub mode: CoefficientMode,
    /// Fit on the selected rows rather than the full table
    pub fit_on_selection: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub total_rows: usize,
    pub selection: Selection,
    pub selected_rows: usize,
    pub series: Vec<RegionSeries>,
    pub trendlines: Vec<Trendline>,
    pub requested_mode: CoefficientMode,
    pub coefficient_mode: CoefficientMode,
    pub fallback_reason: Option<String>,
    pub coefficients: CoefficientPair,
    pub fit: Option<RegressionReport>,
    pub input: SimulationInput,
    pub prediction: Prediction,
}

impl DashboardReport {
    pub fn build(
        table: &ObservationTable,
        selection: Selection,
        options: ReportOptions,
        input: SimulationInput,
    ) -> Self {
        let selected = table.filter(&selection);

        let (coefficients, fit, coefficient_mode, fallback_reason) = match options.mode {
            CoefficientMode::Static => (static_params(), None, CoefficientMode::Static, None),
            CoefficientMode::Dynamic => {
                let fit_table = if options.fit_on_selection { &selected } else { table };
                match DynamicFit.report(fit_table) {
                    Ok(report) => {
                        info!(
                            rows = fit_table.len(),
                            r2_life_expectancy = report.life_expectancy.r_squared,
                            r2_unmet_need = report.unmet_need.r_squared,
                            "Dynamic coefficients fitted"
                        );
                        (report.coefficients, Some(report), CoefficientMode::Dynamic, None)
                    }
                    Err(e) => {
                        warn!(error = %e, "Dynamic fit failed, using static coefficients");
                        (
                            static_params(),
                            None,
                            CoefficientMode::Static,
                            Some(e.to_string()),
                        )
                    }
                }
            }
        };

        Self {
            total_rows: table.len(),
            selected_rows: selected.len(),
            series: region_series(&selected),
            trendlines: region_trendlines(&selected),
            selection,
            requested_mode: options.mode,
            coefficient_mode,
            fallback_reason,
            coefficients,
            fit,
            input,
            prediction: simulate(&coefficients, input),
        }
    }
}

/// Group rows by region (first-appearance order), each sorted by year.
pub fn region_series(table: &ObservationTable) -> Vec<RegionSeries> {
    table
        .regions()
        .into_iter()
        .map(|region| {
            let mut points: Vec<SeriesPoint> = table
                .iter()
                .filter(|r| r.region == region)
                .map(|r| SeriesPoint {
                    year: r.year,
                    life_expectancy: r.life_expectancy,
                    unmet_need: r.unmet_need,
                })
                .collect();
            points.sort_by_key(|p| p.year);
            RegionSeries { region, points }
        })
        .collect()
}

impl fmt::Display for DashboardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Spending Impact on Health Outcomes")?;
        writeln!(
            f,
            "Rows: {} loaded, {} selected ({} regions, years {:?})",
            self.total_rows,
            self.selected_rows,
            self.selection.regions.len(),
            self.selection.years
        )?;

        writeln!(f, "\n1. Trends")?;
        for s in &self.series {
            writeln!(f, "  {}", s.region)?;
            for p in &s.points {
                writeln!(
                    f,
                    "    {:>4}  AHH {:>7.2}  Unmet Need {:>7.2}",
                    p.year, p.life_expectancy, p.unmet_need
                )?;
            }
        }
        if !self.trendlines.is_empty() {
            writeln!(f, "  AHH vs log spending trendlines:")?;
            for t in &self.trendlines {
                writeln!(
                    f,
                    "    {:<24} AHH = {:.4} + {:.4} * ln(spending)  (R² {:.3}, n={})",
                    t.region, t.intercept, t.slope, t.r_squared, t.n_obs
                )?;
            }
        }

        writeln!(f, "\n2. Simulation ({} coefficients)", self.coefficient_mode)?;
        if let Some(reason) = &self.fallback_reason {
            writeln!(f, "  Dynamic fit unavailable: {reason}")?;
        }
        let c = &self.coefficients;
        writeln!(
            f,
            "  AHH        = {:.5} + {:.5} * ln_spending + {:.5} * ln_output",
            c.life_expectancy.intercept,
            c.life_expectancy.coef_log_spending,
            c.life_expectancy.coef_log_output
        )?;
        writeln!(
            f,
            "  Unmet Need = {:.5} + {:.5} * ln_spending + {:.5} * ln_output",
            c.unmet_need.intercept, c.unmet_need.coef_log_spending, c.unmet_need.coef_log_output
        )?;
        if let Some(fit) = &self.fit {
            writeln!(
                f,
                "  R²: AHH {:.3}, Unmet Need {:.3} (n={})",
                fit.life_expectancy.r_squared, fit.unmet_need.r_squared, fit.life_expectancy.n_obs
            )?;
        }
        writeln!(
            f,
            "  Input: ln_spending {:.1}, ln_output {:.1}",
            self.input.log_spending, self.input.log_output
        )?;
        writeln!(f, "  Predicted AHH:        {:.2}", self.prediction.life_expectancy)?;
        write!(f, "  Predicted Unmet Need: {:.2}", self.prediction.unmet_need)
    }
}
