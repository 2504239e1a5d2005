//! Dispatcher flows without the HTTP layer

use std::sync::Arc;

use agripredict_common::{ModelFamily, ServiceError, crop_by_id, district_by_id};
use agripredict_gateway::{
    AppendLog, Dispatcher,
    payload::{CropRequest, ProductionRequest, RegistrationRequest},
};
use ml_inference::{FsArtifactStore, ModelKey, ModelRegistry};
use tempfile::TempDir;

use crate::{StubModel, init_test_env};

struct Fixture {
    _dir: TempDir,
    registry: Arc<ModelRegistry>,
    dispatcher: Dispatcher,
}

fn fixture() -> Fixture {
    init_test_env();
    let dir = TempDir::new().expect("scratch directory");
    let registry = Arc::new(ModelRegistry::new(
        Arc::new(FsArtifactStore::new(dir.path().join("models"))),
        "json",
    ));
    let log = Arc::new(AppendLog::new(dir.path().join("registrations")));
    let dispatcher = Dispatcher::new(Arc::clone(&registry), log);
    Fixture {
        _dir: dir,
        registry,
        dispatcher,
    }
}

fn request(crop: i64, district: i64, area_acres: i64) -> ProductionRequest {
    ProductionRequest {
        crop: crop_by_id(crop).expect("crop"),
        district: district_by_id(district).expect("district"),
        area_acres,
    }
}

fn key(family: ModelFamily, crop: i64) -> ModelKey {
    ModelKey::for_crop(family, crop_by_id(crop).expect("crop"))
}

#[test]
fn test_wrong_width_model_is_unavailable() {
    let f = fixture();
    f.registry
        .register(key(ModelFamily::Production, 1), Arc::new(StubModel::value(42.0, 5)));

    let err = f.dispatcher.predict_production(&request(1, 55, 100)).unwrap_err();

    assert!(matches!(err, ServiceError::ModelUnavailable(ModelFamily::Production)));
}

#[test]
fn test_classifier_in_place_of_regressor_is_unavailable() {
    let f = fixture();
    f.registry
        .register(key(ModelFamily::Production, 2), Arc::new(StubModel::label("high", 3)));

    let err = f.dispatcher.predict_production(&request(2, 56, 100)).unwrap_err();

    assert_eq!(err.to_string(), "Production model not available");
}

#[test]
fn test_estimate_exceeding_demand() {
    let f = fixture();
    f.registry
        .register(key(ModelFamily::Production, 4), Arc::new(StubModel::value(120.7, 3)));
    f.registry
        .register(key(ModelFamily::DistrictDemand, 4), Arc::new(StubModel::value(100.0, 1)));

    let report = f.dispatcher.estimate(&request(4, 60, 250)).expect("estimate");

    assert_eq!(report.area_hectares, 101);
    assert_eq!(report.production_quintals, 120);
    assert_eq!(report.demand_quintals, 100);
    assert_eq!(report.gap, 20);
    assert!(report.exceeds_demand);
    assert_eq!(report.price_per_quintal, 0);
    assert_eq!(report.revenue, 0);
}

#[test]
fn test_register_uses_canonical_crop_and_reference_year() {
    let f = fixture();
    f.registry
        .register(key(ModelFamily::Production, 3), Arc::new(StubModel::value(17.9, 3)));

    let record = f
        .dispatcher
        .register(&RegistrationRequest {
            user: "anil".to_string(),
            production: request(3, 59, 20),
        })
        .expect("registered");

    assert_eq!(record.user_name, "anil");
    assert_eq!(record.year, 2022);
    assert_eq!(record.crop_name, "arhar");
    assert_eq!(record.area, 20);
    assert_eq!(record.predicted_production, 17);
    assert!(f.dispatcher.log().path_for(district_by_id(59).expect("district")).exists());
}

#[test]
fn test_statistics_sums_across_districts() {
    let f = fixture();
    f.registry
        .register(key(ModelFamily::Production, 5), Arc::new(StubModel::value(30.0, 3)));
    f.registry
        .register(key(ModelFamily::DistrictDemand, 5), Arc::new(StubModel::value(100.0, 1)));

    for district in [55, 56, 63] {
        f.dispatcher
            .register(&RegistrationRequest {
                user: format!("user-{district}"),
                production: request(5, district, 10),
            })
            .expect("registered");
    }

    let summary = f
        .dispatcher
        .statistics(&CropRequest {
            crop: crop_by_id(5).expect("crop"),
        })
        .expect("statistics");

    assert!((summary.current_production - 90.0).abs() < f64::EPSILON);
    assert!((summary.production_gap - 10.0).abs() < f64::EPSILON);
    assert!(!summary.exceeds_demand);
}

#[test]
fn test_statistics_ignores_other_crops() {
    let f = fixture();
    f.registry
        .register(key(ModelFamily::Production, 1), Arc::new(StubModel::value(500.0, 3)));
    f.registry
        .register(key(ModelFamily::DistrictDemand, 2), Arc::new(StubModel::value(10.0, 1)));

    f.dispatcher
        .register(&RegistrationRequest {
            user: "ravi".to_string(),
            production: request(1, 55, 100),
        })
        .expect("registered");

    let summary = f
        .dispatcher
        .statistics(&CropRequest {
            crop: crop_by_id(2).expect("crop"),
        })
        .expect("statistics");

    assert!(summary.current_production.abs() < f64::EPSILON);
    assert!((summary.production_gap - 10.0).abs() < f64::EPSILON);
}

#[test]
fn test_estimate_fails_when_present_price_model_fails() {
    let f = fixture();
    f.registry
        .register(key(ModelFamily::Production, 1), Arc::new(StubModel::value(42.0, 3)));
    f.registry
        .register(key(ModelFamily::Price, 1), Arc::new(StubModel::value(1999.0, 5)));

    let err = f.dispatcher.estimate(&request(1, 55, 100)).unwrap_err();

    assert!(matches!(err, ServiceError::ModelUnavailable(ModelFamily::Price)));
}

#[test]
fn test_estimate_fails_when_demand_model_returns_label() {
    let f = fixture();
    f.registry
        .register(key(ModelFamily::Production, 1), Arc::new(StubModel::value(42.0, 3)));
    f.registry
        .register(key(ModelFamily::DistrictDemand, 1), Arc::new(StubModel::label("high", 1)));

    let err = f.dispatcher.estimate(&request(1, 55, 100)).unwrap_err();

    assert_eq!(err.to_string(), "District model not available");
}

#[test]
fn test_register_reports_unwritable_log() {
    init_test_env();
    let dir = TempDir::new().expect("scratch directory");
    let blocked = dir.path().join("registrations");
    std::fs::write(&blocked, "not a directory").expect("blocking file");

    let registry = Arc::new(ModelRegistry::new(
        Arc::new(FsArtifactStore::new(dir.path().join("models"))),
        "json",
    ));
    registry.register(key(ModelFamily::Production, 1), Arc::new(StubModel::value(42.0, 3)));
    let dispatcher = Dispatcher::new(registry, Arc::new(AppendLog::new(&blocked)));

    let err = dispatcher
        .register(&RegistrationRequest {
            user: "ravi".to_string(),
            production: request(1, 55, 100),
        })
        .unwrap_err();

    assert_eq!(err.code(), "io_failure");
    assert_eq!(
        std::fs::read_to_string(&blocked).expect("file untouched"),
        "not a directory"
    );
}
