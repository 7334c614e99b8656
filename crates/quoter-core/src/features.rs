//! Feature schema and vector builder
//!
//! The feature schema is the ordered list of feature names the trained
//! model expects. It is produced by the offline pipeline and loaded
//! verbatim; training and serving must agree on it exactly, so the
//! schema is validated at load time against the set of features this
//! builder knows how to produce.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::encoder::CategoryEncoder;
use crate::error::{Error, Result};
use crate::models::{AgeBracket, Profile, VehicleCategory};

/// Every feature name the builder can produce.
pub const SUPPORTED_FEATURES: &[&str] = &[
    "age",
    "bmi",
    "children",
    "annual_mileage",
    "vehicle_age",
    "sex_encoded",
    "smoker_encoded",
    "region_encoded",
    "vehicle_make_encoded",
    "usage_type_encoded",
    "fuel_type_encoded",
    "age_group_encoded",
    "vehicle_category_encoded",
    "high_mileage",
    "old_vehicle",
];

/// Encoder categories the builder depends on. Checked once at engine
/// load so a truncated encoder artifact fails closed instead of
/// failing per request.
pub const REQUIRED_ENCODER_CATEGORIES: &[&str] = &[
    "sex",
    "smoker",
    "region",
    "vehicle_make",
    "usage_type",
    "fuel_type",
    "age_group",
    "vehicle_category",
];

/// Ordered feature-name list shared verbatim with the offline pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema(Vec<String>);

impl FeatureSchema {
    pub fn new(names: Vec<String>) -> Result<Self> {
        let schema = Self(names);
        schema.validate()?;
        Ok(schema)
    }

    /// Load the schema from a JSON artifact (an ordered string array).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::artifact(path, e))?;
        let names: Vec<String> =
            serde_json::from_str(&content).map_err(|e| Error::artifact(path, e))?;
        let schema = Self(names);
        schema.validate().map_err(|e| Error::artifact(path, e))?;
        Ok(schema)
    }

    /// Every schema name must be one the builder can produce, once.
    fn validate(&self) -> Result<()> {
        for (i, name) in self.0.iter().enumerate() {
            if !SUPPORTED_FEATURES.contains(&name.as_str()) {
                return Err(Error::ArtifactLoad {
                    path: "feature_names.json".to_string(),
                    reason: format!("unsupported feature name {:?}", name),
                });
            }
            if self.0[..i].contains(name) {
                return Err(Error::ArtifactLoad {
                    path: "feature_names.json".to_string(),
                    reason: format!("duplicate feature name {:?}", name),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

/// The assembled vector plus the derived brackets that comparative
/// analytics groups on.
#[derive(Debug, Clone)]
pub struct BuiltFeatures {
    pub values: Vec<f64>,
    pub age_bracket: AgeBracket,
    pub vehicle_category: VehicleCategory,
    pub vehicle_age: i32,
}

/// Assembles the model-ready feature vector from a validated profile.
pub struct FeatureBuilder<'a> {
    config: &'a EngineConfig,
    encoder: &'a CategoryEncoder,
    schema: &'a FeatureSchema,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(
        config: &'a EngineConfig,
        encoder: &'a CategoryEncoder,
        schema: &'a FeatureSchema,
    ) -> Self {
        Self {
            config,
            encoder,
            schema,
        }
    }

    /// Derive engineered attributes and assemble the vector in schema
    /// order.
    pub fn build(&self, profile: &Profile) -> Result<BuiltFeatures> {
        let vehicle_age = self.config.reference_year - profile.vehicle_year;
        let age_bracket = AgeBracket::from_age(profile.age, self.config);
        let vehicle_category = VehicleCategory::from_make(&profile.vehicle_make, self.config);

        let mut values = Vec::with_capacity(self.schema.len());
        for name in self.schema.names() {
            values.push(self.feature_value(name, profile, vehicle_age, age_bracket, vehicle_category)?);
        }

        Ok(BuiltFeatures {
            values,
            age_bracket,
            vehicle_category,
            vehicle_age,
        })
    }

    fn feature_value(
        &self,
        name: &str,
        profile: &Profile,
        vehicle_age: i32,
        age_bracket: AgeBracket,
        vehicle_category: VehicleCategory,
    ) -> Result<f64> {
        let value = match name {
            "age" => f64::from(profile.age),
            "bmi" => profile.bmi,
            "children" => f64::from(profile.children),
            "annual_mileage" => f64::from(profile.annual_mileage),
            "vehicle_age" => f64::from(vehicle_age),
            "sex_encoded" => self.encode("sex", profile.sex.as_str())?,
            "smoker_encoded" => self.encode("smoker", profile.smoker.as_str())?,
            "region_encoded" => self.encode("region", profile.region.as_str())?,
            "vehicle_make_encoded" => self.encode("vehicle_make", &profile.vehicle_make)?,
            "usage_type_encoded" => self.encode("usage_type", profile.usage_type.as_str())?,
            "fuel_type_encoded" => self.encode("fuel_type", profile.fuel_type.as_str())?,
            "age_group_encoded" => self.encode("age_group", age_bracket.as_str())?,
            "vehicle_category_encoded" => {
                self.encode("vehicle_category", vehicle_category.as_str())?
            }
            "high_mileage" => {
                f64::from(u8::from(profile.annual_mileage > self.config.high_mileage_threshold))
            }
            "old_vehicle" => f64::from(u8::from(vehicle_age > self.config.old_vehicle_threshold)),
            // Schema validation rejects anything else at load time.
            other => {
                return Err(Error::ArtifactLoad {
                    path: "feature_names.json".to_string(),
                    reason: format!("unsupported feature name {:?}", other),
                })
            }
        };
        Ok(value)
    }

    fn encode(&self, category: &str, value: &str) -> Result<f64> {
        self.encoder.encode(category, value).map(|code| code as f64)
    }
}
