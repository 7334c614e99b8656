//! Engine configuration
//!
//! Everything the quoting pipeline treats as tunable lives here:
//! the vehicle-age reference year, bracket boundaries, the vehicle
//! category partition, flag thresholds, the factor materiality
//! threshold and the presentation ratios. The bracket boundaries and
//! category partition must match the scheme used when the reference
//! dataset was encoded; the defaults below match the shipped artifacts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Year used to compute vehicle age from the model year. Supplied
    /// at construction so correctness does not silently drift as real
    /// time advances; there is no default.
    pub reference_year: i32,

    /// Upper bound (inclusive) of the Young (18-25) bracket.
    #[serde(default = "default_young_age_max")]
    pub young_age_max: u32,
    /// Upper bound (inclusive) of the Adult (26-40) bracket.
    #[serde(default = "default_adult_age_max")]
    pub adult_age_max: u32,
    /// Upper bound (inclusive) of the Middle (41-55) bracket.
    #[serde(default = "default_middle_age_max")]
    pub middle_age_max: u32,

    /// Makes classified as Economy; everything outside both lists is
    /// Mid-range.
    #[serde(default = "default_economy_makes")]
    pub economy_makes: Vec<String>,
    /// Makes classified as Luxury.
    #[serde(default = "default_luxury_makes")]
    pub luxury_makes: Vec<String>,

    /// Annual mileage above which the high-mileage flag is set.
    #[serde(default = "default_high_mileage_threshold")]
    pub high_mileage_threshold: u32,
    /// Annual mileage below which a driver qualifies as low-mileage
    /// (used for savings tips and the mileage bucket).
    #[serde(default = "default_low_mileage_threshold")]
    pub low_mileage_threshold: u32,
    /// Vehicle age (years) above which the old-vehicle flag is set.
    #[serde(default = "default_old_vehicle_threshold")]
    pub old_vehicle_threshold: i32,

    /// Minimum absolute monthly impact (₹) for a factor to be reported.
    /// The smoker factor is exempt and always reported.
    #[serde(default = "default_materiality_threshold")]
    pub materiality_threshold: f64,

    /// Presentation split of the monthly premium. Taxes take the
    /// remainder so the four parts always sum exactly.
    #[serde(default = "default_base_ratio")]
    pub base_ratio: f64,
    #[serde(default = "default_vehicle_ratio")]
    pub vehicle_ratio: f64,
    #[serde(default = "default_addons_ratio")]
    pub addons_ratio: f64,

    /// Yearly premium = monthly x 12 x this factor (annual-payment
    /// discount).
    #[serde(default = "default_annual_discount")]
    pub annual_discount: f64,

    /// Relative spread of the synthesized peer range when no reference
    /// rows match the caller's (make, age bracket).
    #[serde(default = "default_peer_fallback_spread")]
    pub peer_fallback_spread: f64,
}

fn default_young_age_max() -> u32 {
    25
}

fn default_adult_age_max() -> u32 {
    40
}

fn default_middle_age_max() -> u32 {
    55
}

fn default_economy_makes() -> Vec<String> {
    vec!["Maruti".to_string(), "Tata".to_string()]
}

fn default_luxury_makes() -> Vec<String> {
    vec![
        "BMW".to_string(),
        "Mercedes".to_string(),
        "Audi".to_string(),
    ]
}

fn default_high_mileage_threshold() -> u32 {
    20_000
}

fn default_low_mileage_threshold() -> u32 {
    10_000
}

fn default_old_vehicle_threshold() -> i32 {
    7
}

fn default_materiality_threshold() -> f64 {
    50.0
}

fn default_base_ratio() -> f64 {
    0.60
}

fn default_vehicle_ratio() -> f64 {
    0.25
}

fn default_addons_ratio() -> f64 {
    0.10
}

fn default_annual_discount() -> f64 {
    0.9
}

fn default_peer_fallback_spread() -> f64 {
    0.10
}

impl EngineConfig {
    /// Default configuration for an explicitly supplied reference year.
    pub fn for_year(reference_year: i32) -> Self {
        Self {
            reference_year,
            young_age_max: default_young_age_max(),
            adult_age_max: default_adult_age_max(),
            middle_age_max: default_middle_age_max(),
            economy_makes: default_economy_makes(),
            luxury_makes: default_luxury_makes(),
            high_mileage_threshold: default_high_mileage_threshold(),
            low_mileage_threshold: default_low_mileage_threshold(),
            old_vehicle_threshold: default_old_vehicle_threshold(),
            materiality_threshold: default_materiality_threshold(),
            base_ratio: default_base_ratio(),
            vehicle_ratio: default_vehicle_ratio(),
            addons_ratio: default_addons_ratio(),
            annual_discount: default_annual_discount(),
            peer_fallback_spread: default_peer_fallback_spread(),
        }
    }

    /// Load configuration from a TOML file. `reference_year` is the
    /// only required key; everything else falls back to the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeBracket, MileageBucket, VehicleCategory};

    #[test]
    fn test_defaults() {
        let config = EngineConfig::for_year(2025);
        assert_eq!(config.high_mileage_threshold, 20_000);
        assert_eq!(config.materiality_threshold, 50.0);
        assert!((config.base_ratio + config.vehicle_ratio + config.addons_ratio) < 1.0);
    }

    #[test]
    fn test_load_minimal_toml() {
        let config: EngineConfig = toml::from_str("reference_year = 2025").unwrap();
        assert_eq!(config.reference_year, 2025);
        assert_eq!(config.old_vehicle_threshold, 7);
    }

    #[test]
    fn test_missing_reference_year_fails() {
        assert!(toml::from_str::<EngineConfig>("base_ratio = 0.5").is_err());
    }

    #[test]
    fn test_bracket_boundaries() {
        let config = EngineConfig::for_year(2025);
        assert_eq!(AgeBracket::from_age(25, &config), AgeBracket::Young);
        assert_eq!(AgeBracket::from_age(26, &config), AgeBracket::Adult);
        assert_eq!(AgeBracket::from_age(40, &config), AgeBracket::Adult);
        assert_eq!(AgeBracket::from_age(41, &config), AgeBracket::Middle);
        assert_eq!(AgeBracket::from_age(55, &config), AgeBracket::Middle);
        assert_eq!(AgeBracket::from_age(56, &config), AgeBracket::Senior);
    }

    #[test]
    fn test_vehicle_partition() {
        let config = EngineConfig::for_year(2025);
        assert_eq!(
            VehicleCategory::from_make("Tata", &config),
            VehicleCategory::Economy
        );
        assert_eq!(
            VehicleCategory::from_make("Mercedes", &config),
            VehicleCategory::Luxury
        );
        assert_eq!(
            VehicleCategory::from_make("Honda", &config),
            VehicleCategory::MidRange
        );
    }

    #[test]
    fn test_mileage_buckets() {
        let config = EngineConfig::for_year(2025);
        assert_eq!(
            MileageBucket::from_mileage(8_000, &config),
            MileageBucket::Low
        );
        assert_eq!(
            MileageBucket::from_mileage(15_000, &config),
            MileageBucket::Medium
        );
        assert_eq!(
            MileageBucket::from_mileage(20_001, &config),
            MileageBucket::High
        );
    }
}
