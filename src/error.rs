//! Pipeline error taxonomy.
//!
//! Every error is raised to the immediate caller. Falling back to static
//! coefficients is the caller's decision, never the pipeline's.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by data preparation and the regression engine.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Source unreadable or malformed
    #[error("Data source error: {0}")]
    DataSource(#[from] DataSourceError),

    /// A value violates a mathematical precondition (logarithm of a non-positive number)
    #[error("Domain error: column '{column}' at source row {row} has value {value}, expected a finite value > 0")]
    Domain {
        column: &'static str,
        row: usize,
        value: f64,
    },

    /// Too few rows to determine the model
    #[error("Insufficient data: need {needed} rows, have {available}")]
    InsufficientData { needed: usize, available: usize },

    /// Design matrix is rank-deficient
    #[error("Singular design matrix: rank {rank}, need {required}")]
    SingularDesign { rank: usize, required: usize },
}

/// Ways a tabular source can fail to yield a usable table.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Workbook error in {}: {message}", .path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("Sheet '{sheet}' not found (available: {available:?})")]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Source has no header row")]
    MissingHeader,

    #[error("Required column '{0}' not found")]
    MissingColumn(&'static str),

    #[error("Invalid value {raw:?} in column '{column}' at source row {row}")]
    InvalidCell {
        column: &'static str,
        row: usize,
        raw: String,
    },

    #[error("Unsupported source format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}
