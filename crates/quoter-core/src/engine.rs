//! Quote engine
//!
//! Loads all offline artifacts once at startup, validates that they
//! agree with each other, and then serves quotes from immutable state.
//! A load failure is fatal; a running engine never re-reads artifacts.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analytics;
use crate::config::EngineConfig;
use crate::encoder::CategoryEncoder;
use crate::error::{Error, Result};
use crate::features::{FeatureBuilder, FeatureSchema, REQUIRED_ENCODER_CATEGORIES};
use crate::model::{ModelArtifact, PremiumModel};
use crate::models::{Profile, ProfileRequest, Quote};
use crate::reference::{BrandStats, ReferenceDataset};
use crate::scaler::Scaler;
use crate::tips::{self, SavingsTips};

/// Artifact filenames, fixed relative to the artifact directory.
pub const ENCODERS_FILE: &str = "encoders.json";
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const MODEL_FILE: &str = "premium_model.json";
pub const REFERENCE_FILE: &str = "insurance_processed.csv";

/// Static facts about the loaded artifacts, for the metadata endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub model_kind: String,
    pub feature_count: usize,
    pub features: Vec<String>,
    pub reference_rows: usize,
    pub reference_year: i32,
}

/// The loaded engine. Cheap to share behind an `Arc`; all methods take
/// `&self` and the state never mutates after load.
#[derive(Debug)]
pub struct QuoteEngine {
    config: EngineConfig,
    encoder: CategoryEncoder,
    schema: FeatureSchema,
    scaler: Scaler,
    model: Box<dyn PremiumModel>,
    reference: ReferenceDataset,
}

impl QuoteEngine {
    /// Assemble an engine from already-loaded parts, checking that
    /// they agree: every category the feature schema encodes must have
    /// an encoder table, and the scaler and model must match the
    /// schema's arity. Fails closed on any disagreement.
    pub fn new(
        config: EngineConfig,
        encoder: CategoryEncoder,
        schema: FeatureSchema,
        scaler: Scaler,
        model: Box<dyn PremiumModel>,
        reference: ReferenceDataset,
    ) -> Result<Self> {
        for category in REQUIRED_ENCODER_CATEGORIES {
            if !encoder.has_category(category) {
                return Err(Error::ArtifactLoad {
                    path: ENCODERS_FILE.to_string(),
                    reason: format!("missing encoder table for category '{category}'"),
                });
            }
        }
        if scaler.len() != schema.len() {
            return Err(Error::SchemaMismatch {
                expected: schema.len(),
                actual: scaler.len(),
            });
        }
        if model.n_features() != schema.len() {
            return Err(Error::SchemaMismatch {
                expected: schema.len(),
                actual: model.n_features(),
            });
        }

        Ok(Self {
            config,
            encoder,
            schema,
            scaler,
            model,
            reference,
        })
    }

    /// Load every artifact from `artifact_dir` and validate the set.
    pub fn load(artifact_dir: &Path, config: EngineConfig) -> Result<Self> {
        let encoder = CategoryEncoder::load(&artifact_dir.join(ENCODERS_FILE))?;
        let schema = FeatureSchema::load(&artifact_dir.join(FEATURE_NAMES_FILE))?;
        let scaler = Scaler::load(&artifact_dir.join(SCALER_FILE))?;
        let model = ModelArtifact::load(&artifact_dir.join(MODEL_FILE))?;
        let reference = ReferenceDataset::load(&artifact_dir.join(REFERENCE_FILE))?;

        let engine = Self::new(config, encoder, schema, scaler, model, reference)?;
        info!(
            dir = %artifact_dir.display(),
            model = engine.model.kind(),
            features = engine.schema.len(),
            reference_rows = engine.reference.len(),
            "loaded quote engine artifacts"
        );
        Ok(engine)
    }

    /// Run the full pipeline for one request: validate, build the
    /// feature vector, normalize, predict, then derive the breakdown,
    /// factors, and peer comparison.
    pub fn compute_quote(&self, request: &ProfileRequest) -> Result<Quote> {
        let profile = Profile::from_request(request)?;
        let built =
            FeatureBuilder::new(&self.config, &self.encoder, &self.schema).build(&profile)?;
        let normalized = self.scaler.transform(&built.values)?;
        let monthly_premium = self.model.predict(&normalized)?;

        let breakdown = analytics::breakdown(monthly_premium, &self.config);
        let factors =
            analytics::attribute_factors(&self.reference, &profile, built.age_bracket, &self.config);
        let comparison = analytics::peer_comparison(
            &self.reference,
            &profile,
            built.age_bracket,
            monthly_premium,
            &self.config,
        );
        let yearly_premium = monthly_premium * 12.0 * self.config.annual_discount;

        debug!(
            age = profile.age,
            make = %profile.vehicle_make,
            monthly_premium,
            percentile = comparison.percentile,
            "computed quote"
        );

        Ok(Quote {
            monthly_premium,
            yearly_premium,
            breakdown,
            factors,
            comparison,
        })
    }

    /// Per-make premium statistics over the reference population.
    pub fn brand_comparison(&self) -> Vec<BrandStats> {
        self.reference.brand_comparison()
    }

    /// Savings tips for a possibly partial profile.
    pub fn savings_tips(&self, request: &ProfileRequest) -> SavingsTips {
        tips::savings_tips(&self.reference, request, &self.config)
    }

    pub fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            model_kind: self.model.kind().to_string(),
            feature_count: self.schema.len(),
            features: self.schema.names().to_vec(),
            reference_rows: self.reference.len(),
            reference_year: self.config.reference_year,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceDataset {
        &self.reference
    }
}
