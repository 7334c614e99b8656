//! Domain models for coverquote

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{Error, Result};

/// Policyholder sex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(format!("Unknown sex: {}", s)),
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Smoker status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Smoker {
    Yes,
    No,
}

impl Smoker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    pub fn is_smoker(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl std::str::FromStr for Smoker {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            _ => Err(format!("Unknown smoker status: {}", s)),
        }
    }
}

impl std::fmt::Display for Smoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Residential region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Northeast => "northeast",
            Self::Northwest => "northwest",
            Self::Southeast => "southeast",
            Self::Southwest => "southwest",
        }
    }
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "northeast" => Ok(Self::Northeast),
            "northwest" => Ok(Self::Northwest),
            "southeast" => Ok(Self::Southeast),
            "southwest" => Ok(Self::Southwest),
            _ => Err(format!("Unknown region: {}", s)),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the vehicle is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsageType {
    Personal,
    Commercial,
    #[serde(rename = "Ride-share")]
    RideShare,
}

impl UsageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Commercial => "Commercial",
            Self::RideShare => "Ride-share",
        }
    }
}

impl std::str::FromStr for UsageType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Personal" => Ok(Self::Personal),
            "Commercial" => Ok(Self::Commercial),
            "Ride-share" => Ok(Self::RideShare),
            _ => Err(format!("Unknown usage type: {}", s)),
        }
    }
}

impl std::fmt::Display for UsageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Vehicle fuel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Petrol => "Petrol",
            Self::Diesel => "Diesel",
            Self::Electric => "Electric",
        }
    }
}

impl std::str::FromStr for FuelType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Petrol" => Ok(Self::Petrol),
            "Diesel" => Ok(Self::Diesel),
            "Electric" => Ok(Self::Electric),
            _ => Err(format!("Unknown fuel type: {}", s)),
        }
    }
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Age bracket derived from the policyholder's age.
///
/// Boundaries are configured in [`EngineConfig`] and must match the
/// boundaries used when the reference dataset was encoded, or
/// percentile and attribution results drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBracket {
    Young,
    Adult,
    Middle,
    Senior,
}

impl AgeBracket {
    /// The label as it appears in the reference dataset and encoder tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Young => "Young (18-25)",
            Self::Adult => "Adult (26-40)",
            Self::Middle => "Middle (41-55)",
            Self::Senior => "Senior (56+)",
        }
    }

    pub fn from_age(age: u32, config: &EngineConfig) -> Self {
        if age <= config.young_age_max {
            Self::Young
        } else if age <= config.adult_age_max {
            Self::Adult
        } else if age <= config.middle_age_max {
            Self::Middle
        } else {
            Self::Senior
        }
    }
}

impl std::fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Vehicle category derived from the make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleCategory {
    Economy,
    Luxury,
    MidRange,
}

impl VehicleCategory {
    /// The label as it appears in the reference dataset and encoder tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::Luxury => "Luxury",
            Self::MidRange => "Mid-range",
        }
    }

    pub fn from_make(make: &str, config: &EngineConfig) -> Self {
        if config.economy_makes.iter().any(|m| m == make) {
            Self::Economy
        } else if config.luxury_makes.iter().any(|m| m == make) {
            Self::Luxury
        } else {
            Self::MidRange
        }
    }
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mileage bucket derived from annual mileage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MileageBucket {
    Low,
    Medium,
    High,
}

impl MileageBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_mileage(annual_mileage: u32, config: &EngineConfig) -> Self {
        if annual_mileage < config.low_mileage_threshold {
            Self::Low
        } else if annual_mileage <= config.high_mileage_threshold {
            Self::Medium
        } else {
            Self::High
        }
    }
}

impl std::fmt::Display for MileageBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw quote request as it arrives over the wire.
///
/// Every field is optional here so that validation can enumerate all
/// missing required fields in one pass instead of failing on the first.
/// Categorical fields stay as strings until [`Profile::from_request`]
/// parses them, so a bad value is reported with its field name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRequest {
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub smoker: Option<String>,
    pub bmi: Option<f64>,
    pub children: Option<u32>,
    pub region: Option<String>,
    pub vehicle_make: Option<String>,
    pub vehicle_year: Option<i32>,
    pub annual_mileage: Option<u32>,
    pub usage_type: Option<String>,
    pub fuel_type: Option<String>,
}

/// A validated quote request. Immutable once constructed; lives for a
/// single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub age: u32,
    pub sex: Sex,
    pub smoker: Smoker,
    pub bmi: f64,
    pub children: u32,
    pub region: Region,
    pub vehicle_make: String,
    pub vehicle_year: i32,
    pub annual_mileage: u32,
    pub usage_type: UsageType,
    pub fuel_type: FuelType,
}

/// Default BMI when the caller omits it.
pub const DEFAULT_BMI: f64 = 25.0;

impl Profile {
    /// Validate a raw request into a complete profile.
    ///
    /// Collects every absent required field into a single
    /// [`Error::MissingFields`]; categorical strings outside their
    /// known sets become [`Error::UnknownCategory`].
    pub fn from_request(req: &ProfileRequest) -> Result<Self> {
        let mut missing = Vec::new();

        if req.age.is_none() {
            missing.push("age".to_string());
        }
        if req.sex.is_none() {
            missing.push("sex".to_string());
        }
        if req.smoker.is_none() {
            missing.push("smoker".to_string());
        }
        if req.vehicle_make.is_none() {
            missing.push("vehicle_make".to_string());
        }
        if req.vehicle_year.is_none() {
            missing.push("vehicle_year".to_string());
        }
        if req.annual_mileage.is_none() {
            missing.push("annual_mileage".to_string());
        }
        if req.usage_type.is_none() {
            missing.push("usage_type".to_string());
        }
        if req.fuel_type.is_none() {
            missing.push("fuel_type".to_string());
        }

        if !missing.is_empty() {
            return Err(Error::MissingFields(missing));
        }

        let age = req.age.unwrap_or_default();
        if age == 0 {
            return Err(Error::InvalidField {
                field: "age",
                reason: "must be greater than zero".to_string(),
            });
        }

        let annual_mileage = req.annual_mileage.unwrap_or_default();
        if annual_mileage == 0 {
            return Err(Error::InvalidField {
                field: "annual_mileage",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            age,
            sex: parse_category("sex", req.sex.as_deref())?,
            smoker: parse_category("smoker", req.smoker.as_deref())?,
            bmi: req.bmi.unwrap_or(DEFAULT_BMI),
            children: req.children.unwrap_or(0),
            region: match req.region.as_deref() {
                Some(r) => parse_category("region", Some(r))?,
                None => Region::Northeast,
            },
            vehicle_make: req.vehicle_make.clone().unwrap_or_default(),
            vehicle_year: req.vehicle_year.unwrap_or_default(),
            annual_mileage,
            usage_type: parse_category("usage_type", req.usage_type.as_deref())?,
            fuel_type: parse_category("fuel_type", req.fuel_type.as_deref())?,
        })
    }
}

/// Parse a categorical string, mapping failure to an error that names
/// the offending field and value.
fn parse_category<T: std::str::FromStr>(field: &str, value: Option<&str>) -> Result<T> {
    // Presence was already validated; the unwrap_or covers optional fields.
    let value = value.unwrap_or_default();
    value.parse().map_err(|_| Error::UnknownCategory {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Direction of a price factor from the policyholder's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorType {
    /// Saves the policyholder money
    Positive,
    /// Adds cost
    Negative,
}

/// A single attributed cost driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Factor {
    /// Human-readable label, e.g. "Vehicle (BMW)"
    pub factor: String,
    /// Signed monthly impact relative to the population average.
    /// Positive means the factor adds cost.
    pub impact: f64,
    #[serde(rename = "type")]
    pub direction: FactorType,
}

/// Fixed proportional split of the monthly premium.
///
/// A presentation convention, not a model output: the ratios live in
/// [`EngineConfig`] and the four parts always sum to the monthly premium.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breakdown {
    pub base: f64,
    pub vehicle: f64,
    pub addons: f64,
    pub taxes: f64,
}

/// Mean/range statistics over the peer group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarProfiles {
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

/// Comparison of the prediction against the reference population.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerComparison {
    pub message: String,
    pub percentile: f64,
    pub similar_profiles: SimilarProfiles,
}

/// The assembled quote. Derived fresh per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub monthly_premium: f64,
    pub yearly_premium: f64,
    pub breakdown: Breakdown,
    pub factors: Vec<Factor>,
    pub comparison: PeerComparison,
}
