//! Test utilities: in-memory engine fixtures and on-disk artifact sets.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::EngineConfig;
use crate::encoder::CategoryEncoder;
use crate::engine::{
    QuoteEngine, ENCODERS_FILE, FEATURE_NAMES_FILE, MODEL_FILE, REFERENCE_FILE, SCALER_FILE,
};
use crate::features::{FeatureSchema, SUPPORTED_FEATURES};
use crate::model::LinearModel;
use crate::models::ProfileRequest;
use crate::reference::ReferenceDataset;
use crate::scaler::Scaler;

/// Encoder tables matching what the offline label encoding produces:
/// codes assigned in sorted value order.
pub fn fixture_encoder_tables() -> BTreeMap<String, BTreeMap<String, i64>> {
    fn table(values: &[&str]) -> BTreeMap<String, i64> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.to_string(), i as i64))
            .collect()
    }

    let mut categories = BTreeMap::new();
    categories.insert("sex".to_string(), table(&["female", "male"]));
    categories.insert("smoker".to_string(), table(&["no", "yes"]));
    categories.insert(
        "region".to_string(),
        table(&["northeast", "northwest", "southeast", "southwest"]),
    );
    categories.insert(
        "vehicle_make".to_string(),
        table(&[
            "Audi",
            "BMW",
            "Chevrolet",
            "Ford",
            "Honda",
            "Hyundai",
            "Maruti",
            "Mercedes",
            "Nissan",
            "Tata",
            "Toyota",
        ]),
    );
    categories.insert(
        "usage_type".to_string(),
        table(&["Commercial", "Personal", "Ride-share"]),
    );
    categories.insert(
        "fuel_type".to_string(),
        table(&["Diesel", "Electric", "Petrol"]),
    );
    categories.insert(
        "age_group".to_string(),
        table(&[
            "Adult (26-40)",
            "Middle (41-55)",
            "Senior (56+)",
            "Young (18-25)",
        ]),
    );
    categories.insert(
        "vehicle_category".to_string(),
        table(&["Economy", "Luxury", "Mid-range"]),
    );
    categories
}

pub fn fixture_encoder() -> CategoryEncoder {
    CategoryEncoder::new(fixture_encoder_tables())
}

pub fn fixture_schema() -> FeatureSchema {
    FeatureSchema::new(SUPPORTED_FEATURES.iter().map(|s| s.to_string()).collect()).unwrap()
}

/// Identity scaling keeps fixture predictions easy to reason about.
pub fn fixture_scaler() -> Scaler {
    let n = SUPPORTED_FEATURES.len();
    Scaler::new(vec![0.0; n], vec![1.0; n]).unwrap()
}

/// A hand-picked linear model in `SUPPORTED_FEATURES` order.
pub fn fixture_model() -> LinearModel {
    LinearModel {
        intercept: 500.0,
        coefficients: vec![
            8.0,   // age
            4.0,   // bmi
            15.0,  // children
            0.02,  // annual_mileage
            12.0,  // vehicle_age
            -30.0, // sex_encoded
            900.0, // smoker_encoded
            10.0,  // region_encoded
            5.0,   // vehicle_make_encoded
            60.0,  // usage_type_encoded
            -25.0, // fuel_type_encoded
            40.0,  // age_group_encoded
            350.0, // vehicle_category_encoded
            120.0, // high_mileage
            80.0,  // old_vehicle
        ],
    }
}

pub const FIXTURE_CSV: &str = "\
age,sex,smoker,bmi,children,region,vehicle_make,vehicle_age,annual_mileage,usage_type,fuel_type,monthly_premium,age_group,vehicle_category,high_mileage,old_vehicle
30,male,no,24.5,0,northeast,Maruti,3,12000,Personal,Petrol,1150,Adult (26-40),Economy,0,0
34,female,no,26.0,1,southeast,Maruti,5,15000,Personal,Petrol,1250,Adult (26-40),Economy,0,0
28,male,no,23.0,0,northwest,Tata,2,9000,Personal,Electric,980,Adult (26-40),Economy,0,0
52,male,yes,29.1,2,northwest,BMW,2,25000,Commercial,Diesel,4200,Middle (41-55),Luxury,1,0
45,male,yes,31.0,1,northeast,BMW,4,22000,Personal,Petrol,3800,Middle (41-55),Luxury,1,0
48,female,no,27.5,3,southeast,Mercedes,6,18000,Personal,Petrol,2900,Middle (41-55),Luxury,0,0
61,female,no,27.3,0,southwest,Tata,9,8000,Personal,Electric,1600,Senior (56+),Economy,0,1
22,male,no,22.0,0,southwest,Honda,1,14000,Personal,Petrol,1750,Young (18-25),Mid-range,0,0
24,female,yes,25.5,0,northeast,Hyundai,3,21000,Ride-share,Petrol,2600,Young (18-25),Mid-range,1,0
38,male,no,28.0,2,southeast,Toyota,5,16000,Personal,Diesel,1500,Adult (26-40),Mid-range,0,0
";

pub fn fixture_dataset() -> ReferenceDataset {
    ReferenceDataset::from_reader(FIXTURE_CSV.as_bytes()).unwrap()
}

/// A fully validated in-memory engine over the fixture artifacts.
pub fn fixture_engine() -> QuoteEngine {
    QuoteEngine::new(
        EngineConfig::for_year(2025),
        fixture_encoder(),
        fixture_schema(),
        fixture_scaler(),
        Box::new(fixture_model()),
        fixture_dataset(),
    )
    .unwrap()
}

/// A complete, valid quote request.
pub fn fixture_request() -> ProfileRequest {
    ProfileRequest {
        age: Some(30),
        sex: Some("male".to_string()),
        smoker: Some("no".to_string()),
        bmi: Some(24.5),
        children: Some(0),
        region: Some("northeast".to_string()),
        vehicle_make: Some("Maruti".to_string()),
        vehicle_year: Some(2022),
        annual_mileage: Some(12000),
        usage_type: Some("Personal".to_string()),
        fuel_type: Some("Petrol".to_string()),
    }
}

/// Write the fixture artifact set into `dir`, for tests that exercise
/// the on-disk loading path.
pub fn write_fixture_artifacts(dir: &Path) -> std::io::Result<()> {
    // encoders.json holds the bare category map, not the wrapper struct.
    std::fs::write(
        dir.join(ENCODERS_FILE),
        serde_json::to_string_pretty(&fixture_encoder_tables())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?,
    )?;
    std::fs::write(
        dir.join(FEATURE_NAMES_FILE),
        serde_json::to_string_pretty(&SUPPORTED_FEATURES)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?,
    )?;
    std::fs::write(
        dir.join(SCALER_FILE),
        serde_json::to_string_pretty(&fixture_scaler())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?,
    )?;
    let model = crate::model::ModelArtifact::Linear(fixture_model());
    std::fs::write(
        dir.join(MODEL_FILE),
        serde_json::to_string_pretty(&model)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?,
    )?;
    std::fs::write(dir.join(REFERENCE_FILE), FIXTURE_CSV)?;
    Ok(())
}
