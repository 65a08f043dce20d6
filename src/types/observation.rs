//! Observation table types: one row per (region, year) pair.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// A single prepared (region, year) observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Zero-based position among the data rows of the source (header excluded)
    pub source_index: usize,
    /// Region identifier ("Provinsi")
    pub region: String,
    /// Observation year ("Tahun")
    pub year: i32,
    /// Combined health + education expenditure ("Kesehatan + Pendidikan")
    pub spending: f64,
    /// Health service output index ("Output Layanan Kesehatan")
    pub service_output: f64,
    /// Life expectancy outcome ("AHH")
    pub life_expectancy: f64,
    /// Unmet need outcome ("Unmeet Need")
    pub unmet_need: f64,
    /// ln(spending)
    pub log_spending: f64,
    /// ln(service_output)
    pub log_output: f64,
}

/// Ordered, read-only collection of observations.
///
/// Row order follows the source table after incomplete rows were dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationTable {
    rows: Vec<Observation>,
}

impl ObservationTable {
    pub fn new(rows: Vec<Observation>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.rows.iter()
    }

    /// Distinct regions in order of first appearance.
    pub fn regions(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter(|r| seen.insert(r.region.as_str()))
            .map(|r| r.region.clone())
            .collect()
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.rows
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Keep only rows whose region and year are both selected.
    pub fn filter(&self, selection: &Selection) -> Self {
        let rows = self
            .rows
            .iter()
            .filter(|r| selection.contains(r))
            .cloned()
            .collect();
        Self { rows }
    }
}

impl<'a> IntoIterator for &'a ObservationTable {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Region/year set-membership selection used by the charts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub regions: Vec<String>,
    pub years: Vec<i32>,
}

impl Selection {
    pub fn new(regions: Vec<String>, years: Vec<i32>) -> Self {
        Self { regions, years }
    }

    /// First `region_count` regions of the table and every year.
    pub fn default_for(table: &ObservationTable, region_count: usize) -> Self {
        Self {
            regions: table.regions().into_iter().take(region_count).collect(),
            years: table.years(),
        }
    }

    pub fn contains(&self, row: &Observation) -> bool {
        self.regions.iter().any(|r| *r == row.region) && self.years.contains(&row.year)
    }
}
