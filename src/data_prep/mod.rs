//! Data Preparation
//!
//! Turns a raw source table into an [`ObservationTable`]:
//! 1. Resolve the six required columns by name
//! 2. Drop every row missing any required value
//! 3. Coerce cells to their column types
//! 4. Enforce finite outcomes and strictly positive spending / service output
//! 5. Derive `log_spending` and `log_output`
//!
//! Pure with respect to its input: the same table always yields the same rows.

pub mod source;

use crate::config::defaults::{
    COL_LIFE_EXPECTANCY, COL_REGION, COL_SERVICE_OUTPUT, COL_SPENDING, COL_UNMET_NEED, COL_YEAR,
};
use crate::error::{DataSourceError, PipelineError};
use crate::types::{Observation, ObservationTable};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use source::{Cell, DataSource, RawTable, SourceFormat};

/// What to do with a spending or service output value that is not strictly positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonPositivePolicy {
    /// Fail with a domain error
    #[default]
    Reject,
    /// Drop the row and log a warning
    Exclude,
}

/// Column positions of the required fields in a raw table
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    region: usize,
    year: usize,
    spending: usize,
    service_output: usize,
    life_expectancy: usize,
    unmet_need: usize,
}

impl ColumnMap {
    fn resolve(raw: &RawTable) -> Result<Self, DataSourceError> {
        let find = |name: &'static str| {
            raw.column_index(name)
                .ok_or(DataSourceError::MissingColumn(name))
        };
        Ok(Self {
            region: find(COL_REGION)?,
            year: find(COL_YEAR)?,
            spending: find(COL_SPENDING)?,
            service_output: find(COL_SERVICE_OUTPUT)?,
            life_expectancy: find(COL_LIFE_EXPECTANCY)?,
            unmet_need: find(COL_UNMET_NEED)?,
        })
    }

    fn indices(&self) -> [usize; 6] {
        [
            self.region,
            self.year,
            self.spending,
            self.service_output,
            self.life_expectancy,
            self.unmet_need,
        ]
    }
}

/// Prepare observations with the default policy (reject non-positive values).
pub fn load_observations(raw: &RawTable) -> Result<ObservationTable, PipelineError> {
    prepare(raw, NonPositivePolicy::default())
}

/// Read a source from disk and prepare it.
pub fn load_from_source(
    source: &DataSource,
    policy: NonPositivePolicy,
) -> Result<ObservationTable, PipelineError> {
    let raw = source.read()?;
    let table = prepare(&raw, policy)?;
    info!(
        path = %source.path.display(),
        rows = table.len(),
        regions = table.regions().len(),
        "Loaded observations"
    );
    Ok(table)
}

/// Prepare observations from a raw table under an explicit non-positive policy.
pub fn prepare(
    raw: &RawTable,
    policy: NonPositivePolicy,
) -> Result<ObservationTable, PipelineError> {
    let columns = ColumnMap::resolve(raw)?;

    let mut rows = Vec::with_capacity(raw.row_count());
    let mut dropped_missing = 0usize;
    let mut dropped_non_positive = 0usize;

    for row in 0..raw.row_count() {
        if columns
            .indices()
            .iter()
            .any(|&col| raw.cell(row, col).is_missing())
        {
            dropped_missing += 1;
            continue;
        }

        let spending = number(raw.cell(row, columns.spending), COL_SPENDING, row)?;
        let service_output =
            number(raw.cell(row, columns.service_output), COL_SERVICE_OUTPUT, row)?;
        let life_expectancy =
            number(raw.cell(row, columns.life_expectancy), COL_LIFE_EXPECTANCY, row)?;
        let unmet_need = number(raw.cell(row, columns.unmet_need), COL_UNMET_NEED, row)?;
        let year = year(raw.cell(row, columns.year), row)?;
        let region = text(raw.cell(row, columns.region));

        // Outcomes must be finite under either policy
        if let Some((column, value)) = [
            (COL_LIFE_EXPECTANCY, life_expectancy),
            (COL_UNMET_NEED, unmet_need),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        {
            return Err(PipelineError::Domain { column, row, value });
        }

        let violation = [(COL_SPENDING, spending), (COL_SERVICE_OUTPUT, service_output)]
            .into_iter()
            .find(|(_, v)| !(v.is_finite() && *v > 0.0));

        if let Some((column, value)) = violation {
            match policy {
                NonPositivePolicy::Reject => {
                    return Err(PipelineError::Domain { column, row, value });
                }
                NonPositivePolicy::Exclude => {
                    debug!(row, column, value, "Excluding row with non-positive value");
                    dropped_non_positive += 1;
                    continue;
                }
            }
        }

        rows.push(Observation {
            source_index: row,
            region,
            year,
            spending,
            service_output,
            life_expectancy,
            unmet_need,
            log_spending: spending.ln(),
            log_output: service_output.ln(),
        });
    }

    if dropped_missing > 0 {
        debug!(dropped = dropped_missing, "Dropped rows with missing required values");
    }
    if dropped_non_positive > 0 {
        warn!(
            dropped = dropped_non_positive,
            "Excluded rows with non-positive spending or service output"
        );
    }

    Ok(ObservationTable::new(rows))
}

fn number(cell: &Cell, column: &'static str, row: usize) -> Result<f64, DataSourceError> {
    match cell {
        Cell::Number(v) => Ok(*v),
        Cell::Text(s) => s.parse::<f64>().map_err(|_| invalid(column, row, s)),
        Cell::Missing => Err(invalid(column, row, "")),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn year(cell: &Cell, row: usize) -> Result<i32, DataSourceError> {
    let integral = |v: f64| {
        (v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX))
            .then_some(v as i32)
    };
    match cell {
        Cell::Number(v) => integral(*v).ok_or_else(|| invalid(COL_YEAR, row, &v.to_string())),
        Cell::Text(s) => s
            .parse::<i32>()
            .ok()
            .or_else(|| s.parse::<f64>().ok().and_then(integral))
            .ok_or_else(|| invalid(COL_YEAR, row, s)),
        Cell::Missing => Err(invalid(COL_YEAR, row, "")),
    }
}

fn text(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.clone(),
        Cell::Number(v) => v.to_string(),
        Cell::Missing => String::new(),
    }
}

fn invalid(column: &'static str, row: usize, raw: &str) -> DataSourceError {
    DataSourceError::InvalidCell {
        column,
        row,
        raw: raw.to_string(),
    }
}
