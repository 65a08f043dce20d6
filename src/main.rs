//! spending-impact - regional spending impact dashboard (command line)
//!
//! Loads the observation sheet, fits the outcome models and prints the
//! dashboard report with a what-if simulation.
//!
//! # Usage
//!
//! ```bash
//! # Default workbook and sheet (DATASET 211024.xlsx / BENER)
//! cargo run --release
//!
//! # CSV export, two regions, custom simulation input, JSON output
//! ./spending-impact --data data.csv --region Aceh --region Bali \
//!     --spending 27.0 --output 11.5 --json
//!
//! # Use the fixed fallback coefficients
//! ./spending-impact --static
//! ```
//!
//! # Environment Variables
//!
//! - `SPENDING_IMPACT_CONFIG`: Path to a dashboard TOML config
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use spending_impact::config::DashboardConfig;
use spending_impact::data_prep::{load_from_source, DataSource};
use spending_impact::report::{DashboardReport, ReportOptions};
use spending_impact::simulation::Sliders;
use spending_impact::types::{CoefficientMode, ObservationTable, Selection};
use std::path::PathBuf;
use tracing::{info, warn};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "spending-impact")]
#[command(about = "Impact of health + education spending on regional health outcomes")]
#[command(version)]
struct CliArgs {
    /// Path to a dashboard TOML config (overrides SPENDING_IMPACT_CONFIG)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// CSV file or workbook with the observations
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Workbook sheet name
    #[arg(long)]
    sheet: Option<String>,

    /// Region to chart (repeatable; default: first regions in the source)
    #[arg(long = "region", value_name = "NAME")]
    regions: Vec<String>,

    /// Year to chart (repeatable; default: all years)
    #[arg(long = "year", value_name = "YEAR")]
    years: Vec<i32>,

    /// Use the fixed fallback coefficients instead of a live fit
    #[arg(long = "static")]
    use_static: bool,

    /// Fit the models on the selected rows only
    #[arg(long)]
    fit_on_selection: bool,

    /// Simulated log health + education spending
    #[arg(long, value_name = "LN")]
    spending: Option<f64>,

    /// Simulated log health service output
    #[arg(long, value_name = "LN")]
    output: Option<f64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl CliArgs {
    fn load_config(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::load_from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => DashboardConfig::load(),
        };

        if let Some(data) = &self.data {
            config.data.path.clone_from(data);
        }
        if let Some(sheet) = &self.sheet {
            config.data.sheet.clone_from(sheet);
        }
        if !self.regions.is_empty() {
            config.selection.regions.clone_from(&self.regions);
        }
        if !self.years.is_empty() {
            config.selection.years.clone_from(&self.years);
        }
        if self.use_static {
            config.model.mode = CoefficientMode::Static;
        }
        if self.fit_on_selection {
            config.model.fit_on_selection = true;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

/// Explicit regions/years from config, else the default leading regions and all years.
fn build_selection(config: &DashboardConfig, table: &ObservationTable) -> Selection {
    let mut selection = Selection::default_for(table, config.selection.default_region_count);
    if !config.selection.regions.is_empty() {
        let known = table.regions();
        for region in &config.selection.regions {
            if !known.contains(region) {
                warn!(region = %region, "Selected region not present in data");
            }
        }
        selection.regions.clone_from(&config.selection.regions);
    }
    if !config.selection.years.is_empty() {
        selection.years.clone_from(&config.selection.years);
    }
    selection
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = args.load_config()?;

    let source: DataSource = config.data.source();
    info!(path = %source.path.display(), sheet = %source.sheet, "Loading observations");
    let table = load_from_source(&source, config.data.non_positive)
        .with_context(|| format!("loading observations from {}", source.path.display()))?;

    let selection = build_selection(&config, &table);
    let sliders = Sliders::new(config.simulation.spending, config.simulation.output);
    let input = sliders.input(args.spending, args.output);

    let report = DashboardReport::build(
        &table,
        selection,
        ReportOptions {
            mode: config.model.mode,
            fit_on_selection: config.model.fit_on_selection,
        },
        input,
    );

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing report")?
        );
    } else {
        println!("{report}");
    }

    Ok(())
}
