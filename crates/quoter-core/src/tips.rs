//! Savings tips
//!
//! Rule-based suggestions estimating what a caller could save by
//! changing a risk attribute, priced from reference-group means. Tips
//! tolerate partial profiles: an absent field simply produces no tip.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::models::{FuelType, ProfileRequest, Smoker, UsageType};
use crate::reference::ReferenceDataset;

/// How much a tip is likely to move the premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipImpact {
    High,
    Medium,
    Low,
}

/// A single savings suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsTip {
    pub tip: String,
    /// Estimated monthly saving (₹), from reference-group means.
    pub monthly_saving: f64,
    pub impact: TipImpact,
}

/// The full tips response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsTips {
    pub tips: Vec<SavingsTip>,
    pub total_potential_savings: f64,
}

/// Compute personalized savings tips against the reference population.
pub fn savings_tips(
    dataset: &ReferenceDataset,
    request: &ProfileRequest,
    config: &EngineConfig,
) -> SavingsTips {
    let mut tips = Vec::new();

    // Luxury vehicle: price the switch to the economy category.
    if let Some(make) = request.vehicle_make.as_deref() {
        if config.luxury_makes.iter().any(|m| m == make) {
            let luxury = dataset.group_mean(|r| r.vehicle_category == "Luxury");
            let economy = dataset.group_mean(|r| r.vehicle_category == "Economy");
            if let (Some(luxury), Some(economy)) = (luxury, economy) {
                tips.push(SavingsTip {
                    tip: format!(
                        "Switch to an economy vehicle ({})",
                        config.economy_makes.join(", ")
                    ),
                    monthly_saving: luxury - economy,
                    impact: TipImpact::High,
                });
            }
        }
    }

    // Smoking.
    if parsed::<Smoker>(request.smoker.as_deref()) == Some(Smoker::Yes) {
        let smoker = dataset.group_mean(|r| r.smoker.is_smoker());
        let nonsmoker = dataset.group_mean(|r| !r.smoker.is_smoker());
        if let (Some(smoker), Some(nonsmoker)) = (smoker, nonsmoker) {
            tips.push(SavingsTip {
                tip: "Quit smoking".to_string(),
                monthly_saving: smoker - nonsmoker,
                impact: TipImpact::High,
            });
        }
    }

    // High mileage.
    if request
        .annual_mileage
        .is_some_and(|m| m > config.high_mileage_threshold)
    {
        let high = dataset.group_mean(|r| r.high_mileage);
        let low = dataset.group_mean(|r| !r.high_mileage);
        if let (Some(high), Some(low)) = (high, low) {
            tips.push(SavingsTip {
                tip: format!(
                    "Reduce annual mileage below {} km",
                    config.high_mileage_threshold
                ),
                monthly_saving: high - low,
                impact: TipImpact::Medium,
            });
        }
    }

    // Combustion fuel.
    if matches!(
        parsed::<FuelType>(request.fuel_type.as_deref()),
        Some(FuelType::Petrol) | Some(FuelType::Diesel)
    ) {
        let petrol = dataset.group_mean(|r| r.fuel_type == FuelType::Petrol);
        let electric = dataset.group_mean(|r| r.fuel_type == FuelType::Electric);
        if let (Some(petrol), Some(electric)) = (petrol, electric) {
            tips.push(SavingsTip {
                tip: "Consider an electric vehicle".to_string(),
                monthly_saving: petrol - electric,
                impact: TipImpact::Low,
            });
        }
    }

    // Commercial or ride-share usage.
    if matches!(
        parsed::<UsageType>(request.usage_type.as_deref()),
        Some(UsageType::Commercial) | Some(UsageType::RideShare)
    ) {
        let non_personal = dataset.group_mean(|r| r.usage_type != UsageType::Personal);
        let personal = dataset.group_mean(|r| r.usage_type == UsageType::Personal);
        if let (Some(non_personal), Some(personal)) = (non_personal, personal) {
            tips.push(SavingsTip {
                tip: "Switch to personal use only".to_string(),
                monthly_saving: non_personal - personal,
                impact: TipImpact::High,
            });
        }
    }

    let total_potential_savings = tips.iter().map(|t| t.monthly_saving).sum();
    SavingsTips {
        tips,
        total_potential_savings,
    }
}

fn parsed<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.parse().ok())
}
