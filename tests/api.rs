use actix_web::{
    http::{header, StatusCode},
    test, web, App,
};
use serde_json::{json, Value};

use house_price_api::{
    features::{feature_names, FEATURE_COUNT, NUMERIC_FIELDS},
    price::format_price,
    routes, Pipeline,
};
use model::{
    specs::{RegressorSpec, ScalerSpec},
    Artifacts,
};

const MAX_BODY_BYTES: usize = 4096;

macro_rules! app {
    ($pipeline:expr) => {
        test::init_service(
            App::new()
                .wrap(routes::cors())
                .app_data(web::Data::new($pipeline))
                .configure(routes::configure(MAX_BODY_BYTES)),
        )
        .await
    };
}

/// Identity scaler and a linear model that only looks at `median_income` and two of the
/// one-hot slots, so prices are easy to predict by hand.
fn hand_pipeline() -> Pipeline {
    let mut coefficients = vec![0.0; FEATURE_COUNT];
    coefficients[7] = 50_000.0; // median_income
    coefficients[9] = -5_000.0; // INLAND
    coefficients[11] = 1_000.0; // NEAR BAY

    let artifacts = Artifacts::from_specs(
        RegressorSpec::Linear {
            coefficients,
            intercept: 0.0,
        },
        ScalerSpec::Identity { dim: FEATURE_COUNT },
    )
    .unwrap();
    Pipeline::from_artifacts(artifacts).unwrap()
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn fixture_pipeline(model: &str) -> Pipeline {
    let artifacts = Artifacts::load(fixture(model), fixture("scaler.json")).unwrap();
    Pipeline::from_artifacts(artifacts).unwrap()
}

fn sample() -> Value {
    json!({
        "longitude": -122.23,
        "latitude": 37.88,
        "housing_median_age": 41,
        "total_rooms": 880,
        "total_bedrooms": 129,
        "population": 322,
        "households": 126,
        "median_income": 8.3252,
        "ocean_proximity": "NEAR BAY"
    })
}

fn one_hot(body: &Value) -> Vec<i64> {
    ["<1H OCEAN", "INLAND", "ISLAND", "NEAR BAY", "NEAR OCEAN"]
        .iter()
        .map(|c| {
            body["input_features"][format!("ocean_proximity_{c}")]
                .as_i64()
                .unwrap()
        })
        .collect()
}

#[actix_rt::test]
async fn index_describes_the_service() {
    let app = app!(hand_pipeline());

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["message"], "House Price Prediction API");
    assert_eq!(body["endpoints"]["/predict"], "POST - Predict house price");
    assert_eq!(body["endpoints"]["/features"], "GET - Get feature information");
}

#[actix_rt::test]
async fn features_lists_nine_fields() {
    let app = app!(hand_pipeline());

    let req = test::TestRequest::get().uri("/features").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let features = body["features"].as_object().unwrap();

    assert_eq!(features.len(), 9);

    let selects: Vec<&Value> = features
        .values()
        .filter(|f| f["type"] == "select")
        .collect();
    assert_eq!(selects.len(), 1);
    assert_eq!(selects[0]["options"].as_array().unwrap().len(), 5);

    for field in &NUMERIC_FIELDS {
        assert_eq!(features[field.name]["type"], "number");
        assert!(features[field.name]["example"].is_number());
        assert!(!features[field.name]["description"].as_str().unwrap().is_empty());
    }
}

#[actix_rt::test]
async fn predicts_the_reference_example() {
    let app = app!(hand_pipeline());

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(sample())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["predicted_price"], json!(417260.0));
    assert_eq!(body["formatted_price"], "$417,260.00");
    assert_eq!(one_hot(&body), [0, 0, 0, 1, 0]);
    assert_eq!(body["input_features"]["median_income"], json!(8.3252));
    assert_eq!(body["input_features"]["housing_median_age"], json!(41.0));
}

#[actix_rt::test]
async fn echoes_thirteen_features_in_training_order() {
    let app = app!(hand_pipeline());

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(sample())
        .to_request();
    let raw = test::call_and_read_body(&app, req).await;
    let raw = std::str::from_utf8(&raw).unwrap();

    let body: Value = serde_json::from_str(raw).unwrap();
    assert_eq!(body["input_features"].as_object().unwrap().len(), 13);

    let input_features = &raw[raw.find("\"input_features\"").unwrap()..];
    let positions: Vec<usize> = feature_names()
        .map(|name| input_features.find(&format!("\"{name}\"")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
}

#[actix_rt::test]
async fn non_numeric_strings_are_rejected() {
    let app = app!(hand_pipeline());

    for field in &NUMERIC_FIELDS {
        let mut request = sample();
        request[field.name] = json!("invalid");

        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(request)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", field.name);

        let body: Value = test::read_body_json(resp).await;
        let error = body["error"].as_str().unwrap();
        assert!(error.contains(field.name));
        assert!(error.contains("could not convert string to float"));
    }
}

#[actix_rt::test]
async fn unknown_category_encodes_as_all_zeros() {
    let app = app!(hand_pipeline());

    let mut request = sample();
    request["ocean_proximity"] = json!("UNDERWATER");
    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(request)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(one_hot(&body), [0, 0, 0, 0, 0]);
    assert_eq!(body["formatted_price"], "$416,260.00");
}

#[actix_rt::test]
async fn missing_category_defaults_to_inland() {
    let app = app!(hand_pipeline());

    let mut request = sample();
    request.as_object_mut().unwrap().remove("ocean_proximity");
    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(request)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(one_hot(&body), [0, 1, 0, 0, 0]);
    assert_eq!(body["predicted_price"], json!(411260.0));
}

#[actix_rt::test]
async fn missing_numbers_default_to_zero() {
    let app = app!(hand_pipeline());

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(json!({ "ocean_proximity": "ISLAND" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    for field in &NUMERIC_FIELDS {
        assert_eq!(body["input_features"][field.name], json!(0.0));
    }
    assert_eq!(body["predicted_price"], json!(0.0));
    assert_eq!(body["formatted_price"], "$0.00");
}

#[actix_rt::test]
async fn malformed_bodies_are_bad_requests() {
    let app = app!(hand_pipeline());

    let requests = [
        test::TestRequest::post()
            .uri("/predict")
            .insert_header(header::ContentType::json())
            .set_payload("{\"longitude\": ")
            .to_request(),
        test::TestRequest::post()
            .uri("/predict")
            .insert_header(header::ContentType::plaintext())
            .set_payload(sample().to_string())
            .to_request(),
        test::TestRequest::post()
            .uri("/predict")
            .set_json(json!([1, 2, 3]))
            .to_request(),
        test::TestRequest::post()
            .uri("/predict")
            .set_json(json!({ "payload": "x".repeat(MAX_BODY_BYTES) }))
            .to_request(),
    ];

    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert!(!body["error"].as_str().unwrap().is_empty());
    }
}

#[actix_rt::test]
async fn model_failures_are_bad_requests() {
    // Fit on 12 features: the scaler rejects the 13 feature vector.
    let artifacts = Artifacts::from_specs(
        RegressorSpec::Linear {
            coefficients: vec![1.0; 12],
            intercept: 0.0,
        },
        ScalerSpec::Identity { dim: 12 },
    )
    .unwrap();
    let app = app!(Pipeline::new(artifacts.scaler, artifacts.regressor));

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(sample())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "X has 13 features, but the scaler is expecting 12 features as input"
    );
}

#[actix_rt::test]
async fn serves_the_linear_fixture() {
    let app = app!(fixture_pipeline("model.json"));

    for category in ["<1H OCEAN", "INLAND", "ISLAND", "NEAR BAY", "NEAR OCEAN"] {
        let mut request = sample();
        request["ocean_proximity"] = json!(category);
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(request)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        let price = body["predicted_price"].as_f64().unwrap();
        assert!(price.is_finite());
        assert_eq!(body["formatted_price"], format_price(price));
    }
}

#[actix_rt::test]
async fn serves_the_forest_fixture() {
    let app = app!(fixture_pipeline("forest_model.json"));

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(sample())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    // high income leaf averaged with the not-inland leaf
    assert_eq!(body["predicted_price"], json!(327250.0));
    assert_eq!(body["formatted_price"], "$327,250.00");
}

#[actix_rt::test]
async fn non_finite_strings_are_rejected() {
    let app = app!(fixture_pipeline("forest_model.json"));

    for value in ["nan", "inf", "-infinity"] {
        let mut request = sample();
        request["median_income"] = json!(value);
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(request)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{value}");

        let body: Value = test::read_body_json(resp).await;
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("median_income"), "{error}");
        assert!(body.get("predicted_price").is_none());
    }
}

#[actix_rt::test]
async fn allows_any_origin() {
    let app = app!(hand_pipeline());

    let req = test::TestRequest::get()
        .uri("/features")
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[actix_rt::test]
async fn incompatible_fixtures_fail_to_load() {
    assert!(Artifacts::load(fixture("missing.json"), fixture("scaler.json")).is_err());
    // the scaler is not a valid model
    assert!(Artifacts::load(fixture("scaler.json"), fixture("scaler.json")).is_err());
}
