//! Browser form tests

use agripredict_common::{ModelFamily, crop_by_id};
use axum::http::StatusCode;
use ml_inference::ModelKey;
use pretty_assertions::assert_eq;

use super::helpers::{get, post_form};
use crate::{StubModel, TestContext};

const PADDY_IN_HYDERABAD: [(&str, &str); 3] = [("dist", "55"), ("crop", "1"), ("area", "100")];

fn paddy(family: ModelFamily) -> ModelKey {
    ModelKey::for_crop(family, crop_by_id(1).expect("paddy"))
}

fn seed_production(ctx: &TestContext) {
    ctx.seed(
        paddy(ModelFamily::Production),
        StubModel::value(42.0, 3).expecting(&[55.0, 2022.0, 40.0]),
    );
}

#[tokio::test]
async fn test_landing_and_form_pages() {
    let ctx = TestContext::new();

    let landing = get(ctx.router(), "/").await;
    assert_eq!(landing.status, StatusCode::OK);
    assert!(landing.body.contains(r#"href="/cropyield""#));

    let form = get(ctx.router(), "/cropyield").await;
    assert!(form.body.contains(r#"action="/estimation""#));
    assert!(form.body.contains(r#"name="dist""#));

    let form = get(ctx.router(), "/recommendfile").await;
    assert!(form.body.contains(r#"action="/recommend""#));
    assert!(form.body.contains(r#"name="rain""#));
}

#[tokio::test]
async fn test_estimation_report() {
    let ctx = TestContext::new();
    seed_production(&ctx);
    ctx.seed(
        paddy(ModelFamily::Price),
        StubModel::value(1999.7, 3).expecting(&[2022.0, 40.0, 42.0]),
    );
    ctx.seed(paddy(ModelFamily::DistrictDemand), StubModel::value(100.0, 1));

    let page = post_form(ctx.router(), "/estimation", &PADDY_IN_HYDERABAD).await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Paddy (Rice) Prediction Report"));
    assert!(page.body.contains("District: Hyderabad"));
    assert!(page.body.contains("Expected Yield:  42 Quintals"));
    assert!(page.body.contains("District Demand: 100 Quintals"));
    assert!(page.body.contains("below demand"));
    assert!(page.body.contains("Gap:             58 Quintals"));
    assert!(page.body.contains("Rs. 1,999 per Quintal"));
    assert!(page.body.contains("Estimated Revenue: Rs. 83,958"));
    assert!(page.body.contains("Converted Area: 40 hectares"));
}

#[tokio::test]
async fn test_estimation_without_price_or_demand_models() {
    let ctx = TestContext::new();
    seed_production(&ctx);

    let page = post_form(ctx.router(), "/estimation", &PADDY_IN_HYDERABAD).await;

    assert!(page.body.contains("Expected Yield:  42 Quintals"));
    assert!(page.body.contains("Rs. 0 per Quintal"));
    assert!(page.body.contains("exceeds demand"));
}

#[tokio::test]
async fn test_estimation_with_failing_price_model() {
    let ctx = TestContext::new();
    seed_production(&ctx);
    ctx.seed(paddy(ModelFamily::Price), StubModel::value(1999.7, 5));

    let page = post_form(ctx.router(), "/estimation", &PADDY_IN_HYDERABAD).await;

    assert!(page.body.contains("<pre>Price model not available</pre>"));
    assert!(!page.body.contains("Expected Yield"));
}

#[tokio::test]
async fn test_estimation_without_production_model() {
    let ctx = TestContext::new();
    let page = post_form(ctx.router(), "/estimation", &PADDY_IN_HYDERABAD).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<pre>Production model not available</pre>"));
}

#[tokio::test]
async fn test_registration_then_statistics() {
    let ctx = TestContext::new();
    seed_production(&ctx);
    ctx.seed(paddy(ModelFamily::DistrictDemand), StubModel::value(100.0, 1));

    let mut fields = vec![("user", "ravi")];
    fields.extend_from_slice(&PADDY_IN_HYDERABAD);
    let page = post_form(ctx.router(), "/registration", &fields).await;
    assert!(page.body.contains("Registration successful"));

    let log = std::fs::read_to_string(ctx.registration_path("hyderabad_user_crop_entry.csv"))
        .expect("district log");
    assert_eq!(log, "Name,Year,Crop,Area,Production\nravi,2022,paddy,100,42\n");

    let page = post_form(ctx.router(), "/statistics", &[("crop", "1")]).await;
    assert!(page.body.contains("Production Below Demand"));
    assert!(page.body.contains("<td>42 Quintals</td>"));
    assert!(page.body.contains("<td>100 Quintals</td>"));
    assert!(page.body.contains("<td>58 Quintals</td>"));
    assert!(page.body.contains("data:image/svg+xml;base64,"));
}

#[tokio::test]
async fn test_registrations_append_to_district_log() {
    let ctx = TestContext::new();
    seed_production(&ctx);

    for user in ["ravi", "lakshmi"] {
        let mut fields = vec![("user", user)];
        fields.extend_from_slice(&PADDY_IN_HYDERABAD);
        post_form(ctx.router(), "/registration", &fields).await;
    }

    let log = std::fs::read_to_string(ctx.registration_path("hyderabad_user_crop_entry.csv"))
        .expect("district log");
    assert_eq!(
        log,
        "Name,Year,Crop,Area,Production\nravi,2022,paddy,100,42\nlakshmi,2022,paddy,100,42\n"
    );
}

#[tokio::test]
async fn test_registration_requires_user() {
    let ctx = TestContext::new();
    seed_production(&ctx);

    let page = post_form(ctx.router(), "/registration", &PADDY_IN_HYDERABAD).await;

    assert!(page.body.contains("Malformed input: missing required field &#39;user&#39;"));
    assert!(!ctx.registration_path("hyderabad_user_crop_entry.csv").exists());
}

#[tokio::test]
async fn test_registration_log_failure_hides_server_path() {
    let ctx = TestContext::new();
    seed_production(&ctx);
    let blocked = ctx.dir.path().join("registrations");
    std::fs::write(&blocked, "not a directory").expect("blocking file");

    let mut fields = vec![("user", "ravi")];
    fields.extend_from_slice(&PADDY_IN_HYDERABAD);
    let page = post_form(ctx.router(), "/registration", &fields).await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<pre>Registration log unavailable</pre>"));
    assert!(!page.body.contains(&*blocked.to_string_lossy()));
}

#[tokio::test]
async fn test_registration_without_model_writes_nothing() {
    let ctx = TestContext::new();
    let mut fields = vec![("user", "ravi")];
    fields.extend_from_slice(&PADDY_IN_HYDERABAD);

    let page = post_form(ctx.router(), "/registration", &fields).await;

    assert!(page.body.contains("Production model not available"));
    assert!(!ctx.registration_path("hyderabad_user_crop_entry.csv").exists());
}

#[tokio::test]
async fn test_statistics_without_demand_model() {
    let ctx = TestContext::new();
    let page = post_form(ctx.router(), "/statistics", &[("crop", "1")]).await;
    assert!(page.body.contains("District model not available"));
}

#[tokio::test]
async fn test_statistics_meeting_demand() {
    let ctx = TestContext::new();
    seed_production(&ctx);
    ctx.seed(paddy(ModelFamily::DistrictDemand), StubModel::value(42.0, 1));

    let mut fields = vec![("user", "ravi")];
    fields.extend_from_slice(&PADDY_IN_HYDERABAD);
    post_form(ctx.router(), "/registration", &fields).await;

    let page = post_form(ctx.router(), "/statistics", &[("crop", "1")]).await;
    assert!(page.body.contains("Production Exceeds Demand"));
    assert!(page.body.contains("<td>0 Quintals</td>"));
}

#[tokio::test]
async fn test_recommend_form() {
    let ctx = TestContext::new();
    ctx.seed(ModelKey::crop_recommendation(), StubModel::label("rice", 7));

    let page = post_form(
        ctx.router(),
        "/recommend",
        &[
            ("n", "90"),
            ("p", "42"),
            ("k", "43"),
            ("temp", "21"),
            ("h", "82"),
            ("ph", "6.5"),
            ("rain", "203"),
        ],
    )
    .await;

    assert!(page.body.contains("Recommended Crop: rice"));
}

#[tokio::test]
async fn test_fertilizers_form() {
    let ctx = TestContext::new();
    ctx.seed(
        ModelKey::fertilizer(),
        StubModel::label("Urea", 7).expecting(&[26.0, 52.0, 38.0, 1.0, 37.0, 0.0, 0.0]),
    );

    let page = post_form(
        ctx.router(),
        "/fertilizers",
        &[
            ("temp", "26"),
            ("h", "52"),
            ("mc", "38"),
            ("crop", "1"),
            ("n", "37"),
            ("p", "0"),
            ("k", "0"),
        ],
    )
    .await;

    assert!(page.body.contains("Recommended Fertilizer: Urea"));
}

#[tokio::test]
async fn test_fertilizers_form_rejects_unknown_crop() {
    let ctx = TestContext::new();
    let page = post_form(
        ctx.router(),
        "/fertilizers",
        &[
            ("temp", "26"),
            ("h", "52"),
            ("mc", "38"),
            ("crop", "99"),
            ("n", "37"),
            ("p", "0"),
            ("k", "0"),
        ],
    )
    .await;
    assert!(page.body.contains("<pre>Invalid crop</pre>"));
}
