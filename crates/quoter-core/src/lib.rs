//! Quoter Core Library
//!
//! Shared functionality for the vehicle insurance quoting engine:
//! - Profile validation and the request/quote data model
//! - Category encoding from offline label-encoder tables
//! - Feature vector assembly and z-score normalization
//! - Premium prediction behind a pluggable model trait
//! - Comparative analytics over a reference population
//! - Rule-based savings tips

pub mod analytics;
pub mod config;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod features;
pub mod model;
pub mod models;
pub mod reference;
pub mod scaler;
pub mod tips;

/// Test utilities including in-memory engine fixtures
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::EngineConfig;
pub use encoder::CategoryEncoder;
pub use engine::{ModelMetadata, QuoteEngine};
pub use error::{Error, Result};
pub use features::{BuiltFeatures, FeatureBuilder, FeatureSchema};
pub use model::{LinearModel, ModelArtifact, PremiumModel, TreeEnsembleModel};
pub use models::{
    AgeBracket, Breakdown, Factor, FactorType, MileageBucket, PeerComparison, Profile,
    ProfileRequest, Quote, SimilarProfiles, VehicleCategory,
};
pub use reference::{BrandStats, GroupStats, ReferenceDataset, ReferenceRow};
pub use scaler::Scaler;
pub use tips::{SavingsTip, SavingsTips, TipImpact};
