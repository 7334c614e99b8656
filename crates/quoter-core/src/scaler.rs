//! Feature scaler
//!
//! Applies the fixed per-feature z-scaling captured from the training
//! population. Statistics come from `scaler.json`; nothing is ever
//! recomputed at serving time, so the same raw vector always scales to
//! the same result.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Per-position mean/stddev statistics fixed at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl Scaler {
    pub fn new(mean: Vec<f64>, std: Vec<f64>) -> Result<Self> {
        if mean.len() != std.len() {
            return Err(Error::SchemaMismatch {
                expected: mean.len(),
                actual: std.len(),
            });
        }
        Ok(Self { mean, std })
    }

    /// Load scaler statistics from a JSON artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::artifact(path, e))?;
        let scaler: Scaler =
            serde_json::from_str(&content).map_err(|e| Error::artifact(path, e))?;
        if scaler.mean.len() != scaler.std.len() {
            return Err(Error::artifact(
                path,
                format!(
                    "mean has {} entries but std has {}",
                    scaler.mean.len(),
                    scaler.std.len()
                ),
            ));
        }
        Ok(scaler)
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// `scaled[i] = (raw[i] - mean[i]) / std[i]`. Pure and
    /// deterministic. A zero stddev yields 0 for that position
    /// (constant feature in training).
    pub fn transform(&self, raw: &[f64]) -> Result<Vec<f64>> {
        if raw.len() != self.mean.len() {
            return Err(Error::SchemaMismatch {
                expected: self.mean.len(),
                actual: raw.len(),
            });
        }

        Ok(raw
            .iter()
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|(&x, (&mean, &std))| {
                if std > f64::EPSILON {
                    (x - mean) / std
                } else {
                    0.0
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        let scaler = Scaler::new(vec![10.0, 0.0], vec![2.0, 1.0]).unwrap();
        let out = scaler.transform(&[14.0, -3.0]).unwrap();
        assert_eq!(out, vec![2.0, -3.0]);
    }

    #[test]
    fn test_zero_std_maps_to_zero() {
        let scaler = Scaler::new(vec![5.0], vec![0.0]).unwrap();
        assert_eq!(scaler.transform(&[123.0]).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_length_mismatch() {
        let scaler = Scaler::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
        assert!(matches!(
            scaler.transform(&[1.0]),
            Err(Error::SchemaMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_deterministic() {
        let scaler = Scaler::new(vec![1.0, 2.0, 3.0], vec![0.5, 1.5, 2.5]).unwrap();
        let raw = [4.0, 5.0, 6.0];
        assert_eq!(
            scaler.transform(&raw).unwrap(),
            scaler.transform(&raw).unwrap()
        );
    }

    #[test]
    fn test_load_rejects_ragged_stats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler.json");
        std::fs::write(&path, r#"{"mean": [1.0, 2.0], "std": [1.0]}"#).unwrap();
        assert!(matches!(
            Scaler::load(&path),
            Err(Error::ArtifactLoad { .. })
        ));
    }
}
