//! Reference population
//!
//! A read-only table of historical (profile, realized premium) rows
//! with precomputed brackets, produced by the offline pipeline and
//! loaded once per process. Comparative analytics runs bounded scans
//! over it; populations in the low thousands keep that cheap.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::models::{FuelType, Region, Sex, Smoker, UsageType};

fn bool_from_int<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = u8::deserialize(deserializer)?;
    Ok(value != 0)
}

/// One historical policy row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub age: u32,
    pub sex: Sex,
    pub smoker: Smoker,
    pub bmi: f64,
    pub children: u32,
    pub region: Region,
    pub vehicle_make: String,
    pub vehicle_age: i32,
    pub annual_mileage: u32,
    pub usage_type: UsageType,
    pub fuel_type: FuelType,
    pub monthly_premium: f64,
    /// Bracket label as encoded offline, e.g. "Adult (26-40)".
    pub age_group: String,
    /// Category label as encoded offline, e.g. "Economy".
    pub vehicle_category: String,
    #[serde(deserialize_with = "bool_from_int")]
    pub high_mileage: bool,
    #[serde(deserialize_with = "bool_from_int")]
    pub old_vehicle: bool,
}

/// Mean/min/max/count over a filtered group of rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GroupStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Per-make premium statistics for the brand comparison endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandStats {
    pub vehicle_make: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// The loaded, immutable reference population.
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    rows: Vec<ReferenceRow>,
}

impl ReferenceDataset {
    pub fn new(rows: Vec<ReferenceRow>) -> Self {
        Self { rows }
    }

    /// Load the dataset from its CSV artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| Error::artifact(path, e))?;
        Self::from_reader(file).map_err(|e| match e {
            // Attach the artifact path to parse failures.
            Error::Csv(inner) => Error::artifact(path, inner),
            other => other,
        })
    }

    /// Parse CSV rows from any reader.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut rows = Vec::new();
        for record in csv_reader.deserialize() {
            let row: ReferenceRow = record?;
            rows.push(row);
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    /// Mean premium over the whole population. `None` when empty.
    pub fn mean_premium(&self) -> Option<f64> {
        self.group_mean(|_| true)
    }

    /// Mean premium over rows matching the predicate. `None` when the
    /// filtered set is empty.
    pub fn group_mean<F>(&self, predicate: F) -> Option<f64>
    where
        F: Fn(&ReferenceRow) -> bool,
    {
        let mut sum = 0.0;
        let mut count = 0usize;
        for row in &self.rows {
            if predicate(row) {
                sum += row.monthly_premium;
                count += 1;
            }
        }
        (count > 0).then(|| sum / count as f64)
    }

    /// Full statistics over rows matching the predicate.
    pub fn group_stats<F>(&self, predicate: F) -> Option<GroupStats>
    where
        F: Fn(&ReferenceRow) -> bool,
    {
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut count = 0usize;
        for row in &self.rows {
            if predicate(row) {
                sum += row.monthly_premium;
                min = min.min(row.monthly_premium);
                max = max.max(row.monthly_premium);
                count += 1;
            }
        }
        (count > 0).then(|| GroupStats {
            mean: sum / count as f64,
            min,
            max,
            count,
        })
    }

    /// Premium statistics grouped by vehicle make, sorted by make.
    pub fn brand_comparison(&self) -> Vec<BrandStats> {
        let mut makes: Vec<&str> = self.rows.iter().map(|r| r.vehicle_make.as_str()).collect();
        makes.sort_unstable();
        makes.dedup();

        makes
            .into_iter()
            .filter_map(|make| {
                self.group_stats(|r| r.vehicle_make == make)
                    .map(|stats| BrandStats {
                        vehicle_make: make.to_string(),
                        mean: stats.mean,
                        min: stats.min,
                        max: stats.max,
                        count: stats.count,
                    })
            })
            .collect()
    }
}
