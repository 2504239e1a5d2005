//! JSON API tests

use agripredict_common::{CROPS, ModelFamily, crop_by_id};
use axum::http::StatusCode;
use ml_inference::ModelKey;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use super::helpers::{get, post_json, post_raw};
use crate::{StubModel, TestContext};

fn paddy(family: ModelFamily) -> ModelKey {
    ModelKey::for_crop(family, crop_by_id(1).expect("paddy"))
}

#[tokio::test]
async fn test_health_without_models_is_initializing() {
    let ctx = TestContext::new();

    let response = get(ctx.router(), "/api/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, r#"{"status":"initializing","models_loaded":0}"#);
}

#[tokio::test]
async fn test_health_counts_production_artifacts() {
    let ctx = TestContext::new();
    ctx.write_linear_artifact("paddy_pro_model.json", &[0.0, 0.0, 1.0], 2.0);

    // Present on disk but not yet cached
    let response = get(ctx.router(), "/api/health").await;
    assert_eq!(response.json(), json!({"status": "healthy", "models_loaded": 0}));

    ctx.seed(paddy(ModelFamily::Production), StubModel::value(1.0, 3));
    ctx.seed(paddy(ModelFamily::Price), StubModel::value(1.0, 3));
    let response = get(ctx.router(), "/api/health").await;
    assert_eq!(response.json(), json!({"status": "healthy", "models_loaded": 1}));
}

#[tokio::test]
async fn test_every_response_carries_request_id() {
    let ctx = TestContext::new();

    let first = get(ctx.router(), "/api/health").await;
    let second = get(ctx.router(), "/api/health").await;

    let id = |r: &super::helpers::TestResponse| {
        r.headers
            .get("x-request-id")
            .expect("request id header")
            .to_str()
            .expect("ASCII header")
            .to_string()
    };
    assert_ne!(id(&first), id(&second));
}

#[tokio::test]
async fn test_metrics_disabled_is_not_found() {
    let ctx = TestContext::new();
    let response = get(ctx.router(), "/metrics").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_predict_production() {
    let ctx = TestContext::new();
    ctx.seed(
        paddy(ModelFamily::Production),
        StubModel::value(42.9, 3).expecting(&[55.0, 2022.0, 40.0]),
    );

    let response = post_json(
        ctx.router(),
        "/api/predict/production",
        &json!({"district": 55, "crop": 1, "area": 100}),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({
            "status": "success",
            "crop": "Paddy (Rice)",
            "district": "Hyderabad",
            "area_acres": 100,
            "area_hectares": 40,
            "production_quintals": 42
        })
    );
}

#[rstest]
#[case(json!("100"))]
#[case(json!(100.7))]
#[tokio::test]
async fn test_area_coerced_to_integer(#[case] area: serde_json::Value) {
    let ctx = TestContext::new();
    ctx.seed(
        paddy(ModelFamily::Production),
        StubModel::value(42.0, 3).expecting(&[55.0, 2022.0, 40.0]),
    );

    let response = post_json(
        ctx.router(),
        "/api/predict/production",
        &json!({"district": "55", "crop": 1, "area": area}),
    )
    .await;

    assert_eq!(response.json()["production_quintals"], json!(42));
    assert_eq!(response.json()["area_acres"], json!(100));
}

#[rstest]
#[case("/api/predict/production", json!({"district": 55, "crop": 99, "area": 100}))]
#[case("/api/predict/production", json!({"district": 1, "crop": 99, "area": 100}))]
#[case("/api/predict/price", json!({"crop": 99, "area": 100, "production": 42}))]
#[case("/api/predict/demand", json!({"crop": 99}))]
#[case(
    "/api/predict/fertilizer",
    json!({
        "temperature": 26, "humidity": 52, "moisture_content": 38, "crop": 99,
        "nitrogen": 37, "phosphorus": 0, "potassium": 0
    })
)]
#[tokio::test]
async fn test_unknown_crop_is_rejected_before_loading(
    #[case] uri: &str,
    #[case] body: serde_json::Value,
) {
    let ctx = TestContext::new();
    ctx.write_linear_artifact("paddy_pro_model.json", &[0.0, 0.0, 1.0], 2.0);
    ctx.write_linear_artifact("fertilizer.json", &[0.0; 7], 1.0);

    let response = post_json(ctx.router(), uri, &body).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, r#"{"status":"error","message":"Invalid crop"}"#);
    assert!(ctx.registry.is_empty());
}

#[tokio::test]
async fn test_unknown_district() {
    let ctx = TestContext::new();
    let response = post_json(
        ctx.router(),
        "/api/predict/production",
        &json!({"district": 1, "crop": 1, "area": 100}),
    )
    .await;
    assert_eq!(response.json(), json!({"status": "error", "message": "Invalid district"}));
}

#[tokio::test]
async fn test_missing_model_reported_in_envelope() {
    let ctx = TestContext::new();

    let response = post_json(
        ctx.router(),
        "/api/predict/production",
        &json!({"district": 55, "crop": 1, "area": 100}),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({"status": "error", "message": "Production model not available"})
    );
}

#[tokio::test]
async fn test_artifact_added_after_miss_is_used() {
    let ctx = TestContext::new();
    let body = json!({"district": 55, "crop": 1, "area": 100});

    let before = post_json(ctx.router(), "/api/predict/production", &body).await;
    assert_eq!(before.json()["status"], "error");

    ctx.write_linear_artifact("paddy_pro_model.json", &[0.0, 0.0, 1.0], 2.0);

    let after = post_json(ctx.router(), "/api/predict/production", &body).await;
    assert_eq!(after.json()["status"], "success");
    assert_eq!(after.json()["production_quintals"], json!(42));
    assert!(ctx.registry.is_loaded(paddy(ModelFamily::Production)));
}

#[tokio::test]
async fn test_corrupt_artifact_is_unavailable() {
    let ctx = TestContext::new();
    std::fs::write(ctx.model_path("paddy_pri_model.json"), "not an artifact").expect("write");

    let response = post_json(
        ctx.router(),
        "/api/predict/price",
        &json!({"crop": 1, "area": 100, "production": 42}),
    )
    .await;

    assert_eq!(
        response.json(),
        json!({"status": "error", "message": "Price model not available"})
    );
}

#[rstest]
#[case("{not json")]
#[case("[1, 2, 3]")]
#[tokio::test]
async fn test_malformed_body(#[case] body: &str) {
    let ctx = TestContext::new();

    let response = post_raw(ctx.router(), "/api/predict/demand", body).await;

    assert_eq!(response.status, StatusCode::OK);
    let json = response.json();
    assert_eq!(json["status"], "error");
    let message = json["message"].as_str().expect("message");
    assert!(message.starts_with("Malformed input"), "{message}");
}

#[tokio::test]
async fn test_missing_field_names_the_field() {
    let ctx = TestContext::new();
    let response = post_json(
        ctx.router(),
        "/api/predict/price",
        &json!({"crop": 1, "area": 100}),
    )
    .await;
    assert_eq!(
        response.json()["message"],
        "Malformed input: missing required field 'production'"
    );
}

#[tokio::test]
async fn test_predict_price_truncates() {
    let ctx = TestContext::new();
    ctx.seed(
        paddy(ModelFamily::Price),
        StubModel::value(1999.7, 3).expecting(&[2022.0, 40.0, 42.0]),
    );

    let response = post_json(
        ctx.router(),
        "/api/predict/price",
        &json!({"crop": 1, "area": 100, "production": 42}),
    )
    .await;

    assert_eq!(
        response.json(),
        json!({
            "status": "success",
            "crop": "Paddy (Rice)",
            "price_per_quintal": 1999,
            "total_revenue": 83958
        })
    );
}

#[tokio::test]
async fn test_predict_demand() {
    let ctx = TestContext::new();
    ctx.seed(
        paddy(ModelFamily::DistrictDemand),
        StubModel::value(1500.9, 1).expecting(&[2022.0]),
    );

    let response = post_json(ctx.router(), "/api/predict/demand", &json!({"crop": 1})).await;

    assert_eq!(
        response.json(),
        json!({
            "status": "success",
            "crop": "Paddy (Rice)",
            "expected_demand_quintals": 1500
        })
    );
}

#[tokio::test]
async fn test_demand_classifier_is_unavailable() {
    let ctx = TestContext::new();
    ctx.seed(paddy(ModelFamily::DistrictDemand), StubModel::label("high", 1));

    let response = post_json(ctx.router(), "/api/predict/demand", &json!({"crop": 1})).await;

    assert_eq!(
        response.json(),
        json!({"status": "error", "message": "District model not available"})
    );
}

#[tokio::test]
async fn test_predict_fertilizer() {
    let ctx = TestContext::new();
    // Potassium precedes phosphorus in the fitted layout
    ctx.seed(
        ModelKey::fertilizer(),
        StubModel::label("Urea", 7).expecting(&[26.0, 52.0, 38.0, 1.0, 37.0, 9.0, 5.0]),
    );

    let response = post_json(
        ctx.router(),
        "/api/predict/fertilizer",
        &json!({
            "temperature": 26, "humidity": 52, "moisture_content": 38, "crop": 1,
            "nitrogen": 37, "phosphorus": 5, "potassium": 9
        }),
    )
    .await;

    assert_eq!(
        response.json(),
        json!({
            "status": "success",
            "recommended_fertilizer": "Urea",
            "parameters": {
                "temperature": 26,
                "humidity": 52,
                "moisture_content": 38,
                "nitrogen": 37,
                "phosphorus": 5,
                "potassium": 9
            }
        })
    );
}

#[tokio::test]
async fn test_predict_recommendation() {
    let ctx = TestContext::new();
    ctx.seed(
        ModelKey::crop_recommendation(),
        StubModel::label("rice", 7).expecting(&[90.0, 42.0, 43.0, 21.0, 82.0, 6.5, 203.0]),
    );

    let response = post_json(
        ctx.router(),
        "/api/predict/recommendation",
        &json!({
            "nitrogen": 90, "phosphorus": 42, "potassium": 43,
            "temperature": 21, "humidity": 82, "ph": 6.5, "rainfall": 203
        }),
    )
    .await;

    let json = response.json();
    assert_eq!(json["status"], "success");
    assert_eq!(json["recommended_crop"], "rice");
    assert_eq!(json["parameters"]["ph"], json!(6.5));
    assert_eq!(json["parameters"]["rainfall"], json!(203));
}

#[tokio::test]
async fn test_recommendation_without_model() {
    let ctx = TestContext::new();
    let response = post_json(
        ctx.router(),
        "/api/predict/recommendation",
        &json!({
            "nitrogen": 90, "phosphorus": 42, "potassium": 43,
            "temperature": 21, "humidity": 82, "ph": 6.5, "rainfall": 203
        }),
    )
    .await;
    assert_eq!(
        response.json(),
        json!({"status": "error", "message": "Recommendation model not available"})
    );
}

#[tokio::test]
async fn test_available_crops_reports_cached_models() {
    let ctx = TestContext::new();
    ctx.seed(paddy(ModelFamily::Production), StubModel::value(1.0, 3));

    let response = get(ctx.router(), "/api/crops/available").await;
    let json = response.json();

    assert_eq!(json["status"], "success");
    let crops = json["crops"].as_array().expect("crops");
    assert_eq!(crops.len(), CROPS.len());
    assert_eq!(
        crops[0],
        json!({
            "id": 1,
            "name": "paddy",
            "display": "Paddy (Rice)",
            "models_available": {"production": true, "price": false, "district": false}
        })
    );
    assert_eq!(crops[1]["models_available"]["production"], json!(false));
}

#[tokio::test]
async fn test_available_districts() {
    let ctx = TestContext::new();
    let json = get(ctx.router(), "/api/districts/available").await.json();

    let districts = json["districts"].as_array().expect("districts");
    assert_eq!(districts.len(), 9);
    assert!(districts.contains(&json!({"id": 55, "name": "Hyderabad"})));
}

#[tokio::test]
async fn test_models_status_resolves_singletons() {
    let ctx = TestContext::new();
    ctx.seed(paddy(ModelFamily::Production), StubModel::value(1.0, 3));
    ctx.write_linear_artifact("fertilizer.json", &[0.0; 7], 1.0);

    let json = get(ctx.router(), "/api/models/status").await.json();

    assert_eq!(
        json,
        json!({
            "status": "success",
            "models": {
                "production_models": 1,
                "price_models": 0,
                "district_models": 0,
                "fertilizer_model": true,
                "recommendation_model": false,
                "total_crops_supported": 5,
                "total_districts": 9
            }
        })
    );
}
