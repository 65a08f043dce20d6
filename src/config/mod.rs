//! Dashboard Configuration Module
//!
//! Provides the data source, selection defaults, coefficient mode and slider
//! ranges from a TOML file.
//!
//! ## Loading Order
//!
//! 1. `SPENDING_IMPACT_CONFIG` environment variable (path to TOML file)
//! 2. `dashboard.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded config is an ordinary value handed to whoever needs it; there
//! is no process-wide instance.

mod dashboard_config;
pub mod defaults;
pub mod validation;

pub use dashboard_config::*;
