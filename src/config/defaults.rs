//! System-wide default constants.
//!
//! Grouped by subsystem for easy discovery.

use crate::types::{RegressionParams, SliderRange};

// ============================================================================
// Source Table
// ============================================================================

/// Default workbook file name.
pub const DEFAULT_DATA_PATH: &str = "DATASET 211024.xlsx";

/// Default sheet holding the observations.
pub const DEFAULT_SHEET: &str = "BENER";

/// Region identifier column.
pub const COL_REGION: &str = "Provinsi";

/// Year column.
pub const COL_YEAR: &str = "Tahun";

/// Combined health + education expenditure column.
pub const COL_SPENDING: &str = "Kesehatan + Pendidikan";

/// Health service output index column.
pub const COL_SERVICE_OUTPUT: &str = "Output Layanan Kesehatan";

/// Life expectancy outcome column.
pub const COL_LIFE_EXPECTANCY: &str = "AHH";

/// Unmet need outcome column. The misspelling matches the source sheet.
pub const COL_UNMET_NEED: &str = "Unmeet Need";

/// Cell tokens read as missing (pandas' default NA markers).
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ============================================================================
// Regression
// ============================================================================

/// Design matrix columns: constant, log spending, log output.
pub const DESIGN_COLUMNS: usize = 3;

/// Minimum rows for a determined two-predictor fit with intercept.
pub const MIN_FIT_ROWS: usize = DESIGN_COLUMNS;

/// Singular values below `RANK_TOLERANCE * largest` count as zero.
pub const RANK_TOLERANCE: f64 = 1e-10;

/// Fallback life expectancy model.
pub const STATIC_LIFE_EXPECTANCY: RegressionParams = RegressionParams::new(4.105, 0.00183, 0.00884);

/// Fallback unmet need model.
pub const STATIC_UNMET_NEED: RegressionParams = RegressionParams::new(1.870, 0.0222, -0.0721);

// ============================================================================
// Selection & Simulation
// ============================================================================

/// Regions preselected when no explicit selection is given.
pub const DEFAULT_REGION_COUNT: usize = 3;

/// Log spending slider.
pub const SPENDING_SLIDER: SliderRange = SliderRange::new(22.0, 29.0, 0.1, 26.5);

/// Log service output slider.
pub const OUTPUT_SLIDER: SliderRange = SliderRange::new(9.0, 13.5, 0.1, 11.0);
