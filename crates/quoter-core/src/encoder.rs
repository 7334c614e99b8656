//! Category encoder
//!
//! Maps categorical attribute values to the integer codes assigned when
//! the offline pipeline fit its label encoders. The tables are loaded
//! once from `encoders.json` and are immutable afterwards; a value that
//! was never observed during construction is a client-input error, not
//! a crash.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Immutable value-to-code lookup tables, one per category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEncoder {
    categories: BTreeMap<String, BTreeMap<String, i64>>,
}

impl CategoryEncoder {
    /// Build an encoder from in-memory tables (used by tests and
    /// artifact tooling).
    pub fn new(categories: BTreeMap<String, BTreeMap<String, i64>>) -> Self {
        Self { categories }
    }

    /// Load encoder tables from a JSON artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::artifact(path, e))?;
        let categories: BTreeMap<String, BTreeMap<String, i64>> =
            serde_json::from_str(&content).map_err(|e| Error::artifact(path, e))?;
        Ok(Self { categories })
    }

    /// Return the code for `value` within `category`.
    ///
    /// Fails with [`Error::UnknownCategory`] when the value was not in
    /// the training population, and with [`Error::ArtifactLoad`] when
    /// the category table itself is missing (a deployment problem, not
    /// a user one; engine load validates tables up front).
    pub fn encode(&self, category: &str, value: &str) -> Result<i64> {
        let table = self
            .categories
            .get(category)
            .ok_or_else(|| Error::ArtifactLoad {
                path: "encoders.json".to_string(),
                reason: format!("no encoder table for category {:?}", category),
            })?;
        table
            .get(value)
            .copied()
            .ok_or_else(|| Error::UnknownCategory {
                field: category.to_string(),
                value: value.to_string(),
            })
    }

    /// Whether a table exists for the given category.
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Known values for a category, in code order. Empty if the
    /// category does not exist.
    pub fn known_values(&self, category: &str) -> Vec<&str> {
        let Some(table) = self.categories.get(category) else {
            return Vec::new();
        };
        let mut values: Vec<(&str, i64)> = table.iter().map(|(v, &c)| (v.as_str(), c)).collect();
        values.sort_by_key(|&(_, code)| code);
        values.into_iter().map(|(v, _)| v).collect()
    }
}
