//! Integration tests for quoter-core
//!
//! These tests exercise the full validate → encode → normalize →
//! predict → analyze pipeline, including the on-disk artifact loading
//! path.

use std::collections::BTreeMap;

use quoter_core::{
    CategoryEncoder, EngineConfig, Error, FactorType, FeatureSchema, LinearModel, ProfileRequest,
    QuoteEngine, ReferenceDataset, Scaler,
};

/// Reference rows spanning all four age brackets and both vehicle
/// categories, with a deliberate smoker/non-smoker premium gap.
fn reference_csv() -> &'static str {
    "\
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
"
}

fn encoder_tables() -> BTreeMap<String, BTreeMap<String, i64>> {
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

fn feature_names() -> Vec<String> {
    [
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
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn linear_model() -> LinearModel {
    LinearModel {
        intercept: 500.0,
        coefficients: vec![
            8.0, 4.0, 15.0, 0.02, 12.0, -30.0, 900.0, 10.0, 5.0, 60.0, -25.0, 40.0, 350.0, 120.0,
            80.0,
        ],
    }
}

fn engine() -> QuoteEngine {
    let schema = FeatureSchema::new(feature_names()).expect("valid schema");
    let n = schema.len();
    QuoteEngine::new(
        EngineConfig::for_year(2025),
        CategoryEncoder::new(encoder_tables()),
        schema,
        Scaler::new(vec![0.0; n], vec![1.0; n]).expect("valid scaler"),
        Box::new(linear_model()),
        ReferenceDataset::from_reader(reference_csv().as_bytes()).expect("valid reference csv"),
    )
    .expect("consistent artifacts")
}

fn full_request() -> ProfileRequest {
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

// =============================================================================
// Quote Pipeline Tests
// =============================================================================

#[test]
fn test_full_quote_workflow() {
    let engine = engine();
    let quote = engine.compute_quote(&full_request()).expect("quote");

    assert!(quote.monthly_premium > 0.0);
    assert_eq!(quote.yearly_premium, quote.monthly_premium * 12.0 * 0.9);

    let b = &quote.breakdown;
    assert_eq!(
        b.base + b.vehicle + b.addons + b.taxes,
        quote.monthly_premium,
        "breakdown parts must reproduce the premium exactly"
    );

    assert!((0.0..=100.0).contains(&quote.comparison.percentile));
    assert!(quote.comparison.message.contains("similar drivers"));
}

#[test]
fn test_identical_requests_identical_quotes() {
    let engine = engine();
    let request = full_request();

    let a = engine.compute_quote(&request).expect("first quote");
    let b = engine.compute_quote(&request).expect("second quote");

    assert_eq!(a.monthly_premium, b.monthly_premium);
    assert_eq!(a.yearly_premium, b.yearly_premium);
    assert_eq!(a.breakdown.taxes, b.breakdown.taxes);
    assert_eq!(a.comparison.percentile, b.comparison.percentile);
    assert_eq!(a.factors.len(), b.factors.len());
}

#[test]
fn test_smoker_pays_more_than_nonsmoker() {
    let engine = engine();
    let nonsmoker = engine.compute_quote(&full_request()).expect("quote");

    let mut request = full_request();
    request.smoker = Some("yes".to_string());
    let smoker = engine.compute_quote(&request).expect("quote");

    assert!(smoker.monthly_premium > nonsmoker.monthly_premium);
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_empty_request_lists_every_missing_field() {
    let err = engine()
        .compute_quote(&ProfileRequest::default())
        .expect_err("must fail");

    let Error::MissingFields(fields) = err else {
        panic!("expected MissingFields, got {err:?}");
    };
    for expected in [
        "age",
        "sex",
        "smoker",
        "vehicle_make",
        "vehicle_year",
        "annual_mileage",
        "usage_type",
        "fuel_type",
    ] {
        assert!(fields.iter().any(|f| f == expected), "missing {expected}");
    }
}

#[test]
fn test_unknown_make_names_field_and_value() {
    let mut request = full_request();
    request.vehicle_make = Some("Lada".to_string());

    let err = engine().compute_quote(&request).expect_err("must fail");
    assert!(err.is_client_error());
    let Error::UnknownCategory { field, value } = err else {
        panic!("expected UnknownCategory, got {err:?}");
    };
    assert_eq!(field, "vehicle_make");
    assert_eq!(value, "Lada");
}

// =============================================================================
// Analytics Tests
// =============================================================================

#[test]
fn test_peer_group_match_uses_dataset_stats() {
    // Maruti + Adult (26-40) has two rows: 1150 and 1250.
    let quote = engine().compute_quote(&full_request()).expect("quote");
    let similar = &quote.comparison.similar_profiles;
    assert!((similar.average - 1200.0).abs() < 1e-9);
    assert!((similar.min - 1150.0).abs() < 1e-9);
    assert!((similar.max - 1250.0).abs() < 1e-9);
}

#[test]
fn test_peer_group_fallback_synthesizes_range() {
    // Nissan never appears in the reference rows.
    let mut request = full_request();
    request.vehicle_make = Some("Nissan".to_string());

    let quote = engine().compute_quote(&request).expect("quote");
    let m = quote.monthly_premium;
    let similar = &quote.comparison.similar_profiles;
    assert_eq!(similar.average, m);
    assert!((similar.min - m * 0.9).abs() < 1e-9);
    assert!((similar.max - m * 1.1).abs() < 1e-9);
}

#[test]
fn test_smoker_factor_flips_with_status() {
    let engine = engine();

    let nonsmoker = engine.compute_quote(&full_request()).expect("quote");
    let factor = nonsmoker
        .factors
        .iter()
        .find(|f| f.factor == "Non-smoker")
        .expect("non-smoker factor");
    assert!(factor.impact < 0.0);
    assert_eq!(factor.direction, FactorType::Positive);

    let mut request = full_request();
    request.smoker = Some("yes".to_string());
    let smoker = engine.compute_quote(&request).expect("quote");
    let flipped = smoker
        .factors
        .iter()
        .find(|f| f.factor == "Smoker")
        .expect("smoker factor");
    assert!(flipped.impact > 0.0);
    assert_eq!(flipped.direction, FactorType::Negative);
    // Same gap, opposite sign.
    assert!((flipped.impact + factor.impact).abs() < 1e-9);
}

#[test]
fn test_percentile_grows_with_premium() {
    let engine = engine();

    let cheap = engine.compute_quote(&full_request()).expect("quote");

    let mut expensive_request = full_request();
    expensive_request.smoker = Some("yes".to_string());
    expensive_request.vehicle_make = Some("BMW".to_string());
    expensive_request.annual_mileage = Some(25_000);
    let expensive = engine.compute_quote(&expensive_request).expect("quote");

    assert!(expensive.monthly_premium > cheap.monthly_premium);
    assert!(expensive.comparison.percentile >= cheap.comparison.percentile);
}

// =============================================================================
// Savings Tips Tests
// =============================================================================

#[test]
fn test_tips_for_high_risk_profile() {
    let engine = engine();
    let request = ProfileRequest {
        smoker: Some("yes".to_string()),
        vehicle_make: Some("BMW".to_string()),
        annual_mileage: Some(25_000),
        fuel_type: Some("Diesel".to_string()),
        usage_type: Some("Commercial".to_string()),
        ..Default::default()
    };

    let tips = engine.savings_tips(&request);
    assert_eq!(tips.tips.len(), 5);
    let total: f64 = tips.tips.iter().map(|t| t.monthly_saving).sum();
    assert!((tips.total_potential_savings - total).abs() < 1e-9);
}

// =============================================================================
// Artifact Loading Tests
// =============================================================================

#[test]
fn test_load_from_artifact_directory() {
    let dir = tempfile::tempdir().expect("tempdir");

    std::fs::write(
        dir.path().join("encoders.json"),
        serde_json::to_string(&encoder_tables()).expect("encode"),
    )
    .expect("write encoders");
    std::fs::write(
        dir.path().join("feature_names.json"),
        serde_json::to_string(&feature_names()).expect("encode"),
    )
    .expect("write feature names");
    std::fs::write(
        dir.path().join("scaler.json"),
        serde_json::to_string(&Scaler::new(vec![0.0; 15], vec![1.0; 15]).expect("scaler"))
            .expect("encode"),
    )
    .expect("write scaler");
    std::fs::write(
        dir.path().join("premium_model.json"),
        serde_json::to_string(&quoter_core::ModelArtifact::Linear(linear_model()))
            .expect("encode"),
    )
    .expect("write model");
    std::fs::write(dir.path().join("insurance_processed.csv"), reference_csv())
        .expect("write reference");

    let loaded = QuoteEngine::load(dir.path(), EngineConfig::for_year(2025)).expect("load");
    let from_disk = loaded.compute_quote(&full_request()).expect("quote");
    let in_memory = engine().compute_quote(&full_request()).expect("quote");
    assert_eq!(from_disk.monthly_premium, in_memory.monthly_premium);
}

#[test]
fn test_truncated_encoder_fails_closed() {
    let mut tables = encoder_tables();
    tables.remove("age_group");

    let schema = FeatureSchema::new(feature_names()).expect("schema");
    let n = schema.len();
    let err = QuoteEngine::new(
        EngineConfig::for_year(2025),
        CategoryEncoder::new(tables),
        schema,
        Scaler::new(vec![0.0; n], vec![1.0; n]).expect("scaler"),
        Box::new(linear_model()),
        ReferenceDataset::new(Vec::new()),
    )
    .expect_err("must fail");

    assert!(matches!(err, Error::ArtifactLoad { .. }));
    assert!(!err.is_client_error());
}
