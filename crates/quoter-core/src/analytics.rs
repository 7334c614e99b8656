//! Comparative analytics
//!
//! Pure, deterministic reductions over the reference population:
//! percentile rank, peer-group statistics, factor attribution and the
//! presentation breakdown. Degenerate inputs (empty population, empty
//! peer group) take documented fallbacks and never panic.

use crate::config::EngineConfig;
use crate::models::{
    AgeBracket, Breakdown, Factor, FactorType, PeerComparison, Profile, SimilarProfiles,
};
use crate::reference::ReferenceDataset;

/// Fraction of reference rows with a premium strictly below the
/// prediction, as a percentage. Ties do not count (strict `<`); an
/// empty population ranks at 0.
pub fn percentile(dataset: &ReferenceDataset, prediction: f64) -> f64 {
    if dataset.is_empty() {
        return 0.0;
    }
    let below = dataset
        .rows()
        .iter()
        .filter(|r| r.monthly_premium < prediction)
        .count();
    below as f64 / dataset.len() as f64 * 100.0
}

/// Statistics over rows sharing the caller's vehicle make and age
/// bracket. When no rows match, the range is synthesized as the
/// configured spread around the prediction and the average is the
/// prediction itself, as an explicit fallback rather than a silent
/// default.
pub fn peer_comparison(
    dataset: &ReferenceDataset,
    profile: &Profile,
    age_bracket: AgeBracket,
    prediction: f64,
    config: &EngineConfig,
) -> PeerComparison {
    let bracket_label = age_bracket.as_str();
    let stats = dataset.group_stats(|r| {
        r.vehicle_make == profile.vehicle_make && r.age_group == bracket_label
    });

    let similar = match stats {
        Some(stats) => SimilarProfiles {
            average: stats.mean,
            min: stats.min,
            max: stats.max,
        },
        None => SimilarProfiles {
            average: prediction,
            min: prediction * (1.0 - config.peer_fallback_spread),
            max: prediction * (1.0 + config.peer_fallback_spread),
        },
    };

    let pct = percentile(dataset, prediction);
    let cheaper = prediction < similar.average;
    let message = format!(
        "You're paying {} than {:.0}% of similar drivers!",
        if cheaper { "LESS" } else { "MORE" },
        (pct - 50.0).abs()
    );

    PeerComparison {
        message,
        percentile: pct,
        similar_profiles: similar,
    }
}

/// Attribute the premium to a fixed set of comparison axes.
///
/// Each axis compares a group mean against the overall population mean
/// and is reported only when its absolute impact clears the
/// materiality threshold. The smoker axis is exempt from the threshold
/// and always reported (when both group means exist), signed by the
/// caller's actual status relative to the opposite group.
pub fn attribute_factors(
    dataset: &ReferenceDataset,
    profile: &Profile,
    age_bracket: AgeBracket,
    config: &EngineConfig,
) -> Vec<Factor> {
    let mut factors = Vec::new();
    let Some(overall_mean) = dataset.mean_premium() else {
        // Nothing to attribute against.
        return factors;
    };

    // Age bracket vs population.
    let bracket_label = age_bracket.as_str();
    if let Some(group_mean) = dataset.group_mean(|r| r.age_group == bracket_label) {
        let impact = group_mean - overall_mean;
        if impact.abs() > config.materiality_threshold {
            factors.push(signed_factor(format!("Your age ({})", profile.age), impact));
        }
    }

    // Vehicle make vs population.
    if let Some(group_mean) = dataset.group_mean(|r| r.vehicle_make == profile.vehicle_make) {
        let impact = group_mean - overall_mean;
        if impact.abs() > config.materiality_threshold {
            factors.push(signed_factor(
                format!("Vehicle ({})", profile.vehicle_make),
                impact,
            ));
        }
    }

    // Smoker status, relative to the opposite group. Always reported.
    let smoker_mean = dataset.group_mean(|r| r.smoker.is_smoker());
    let nonsmoker_mean = dataset.group_mean(|r| !r.smoker.is_smoker());
    if let (Some(smoker_mean), Some(nonsmoker_mean)) = (smoker_mean, nonsmoker_mean) {
        let (label, impact) = if profile.smoker.is_smoker() {
            ("Smoker", smoker_mean - nonsmoker_mean)
        } else {
            ("Non-smoker", nonsmoker_mean - smoker_mean)
        };
        factors.push(signed_factor(label.to_string(), impact));
    }

    // High mileage, only when the caller is actually over the threshold.
    if profile.annual_mileage > config.high_mileage_threshold {
        let high_mean = dataset.group_mean(|r| r.high_mileage);
        let low_mean = dataset.group_mean(|r| !r.high_mileage);
        if let (Some(high_mean), Some(low_mean)) = (high_mean, low_mean) {
            let impact = high_mean - low_mean;
            if impact.abs() > config.materiality_threshold {
                factors.push(signed_factor("High mileage".to_string(), impact));
            }
        }
    }

    factors
}

fn signed_factor(label: String, impact: f64) -> Factor {
    Factor {
        factor: label,
        impact,
        direction: if impact > 0.0 {
            FactorType::Negative
        } else {
            FactorType::Positive
        },
    }
}

/// Split the monthly premium into the fixed presentation shares.
///
/// Taxes take the remainder so the four parts sum to the premium
/// exactly despite floating-point ratio products.
pub fn breakdown(monthly_premium: f64, config: &EngineConfig) -> Breakdown {
    let base = monthly_premium * config.base_ratio;
    let vehicle = monthly_premium * config.vehicle_ratio;
    let addons = monthly_premium * config.addons_ratio;
    // Grouped so that base + vehicle + addons + taxes reproduces the
    // premium bit-for-bit.
    let taxes = monthly_premium - (base + vehicle + addons);
    Breakdown {
        base,
        vehicle,
        addons,
        taxes,
    }
}
