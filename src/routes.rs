use actix_cors::Cors;
use actix_web::{get, post, web, HttpResponse, Responder};
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::ApiError,
    features::{FeatureCatalog, FeatureVector},
    pipeline::{Pipeline, Prediction},
};

#[derive(Serialize)]
struct Endpoints {
    #[serde(rename = "/predict")]
    predict: &'static str,
    #[serde(rename = "/features")]
    features: &'static str,
}

#[derive(Serialize)]
struct Descriptor {
    message: &'static str,
    endpoints: Endpoints,
}

#[derive(Serialize)]
struct Features {
    features: FeatureCatalog,
}

/// Registers the three routes and routes JSON extraction failures into [`ApiError`].
///
/// # Arguments
/// * `max_body_bytes` - Largest accepted `/predict` body.
pub fn configure(max_body_bytes: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let json = web::JsonConfig::default()
            .limit(max_body_bytes)
            .error_handler(|err, _req| ApiError::from(err).into());

        cfg.app_data(json)
            .service(index)
            .service(feature_info)
            .service(predict);
    }
}

/// Cross-origin requests are accepted from anywhere.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().json(Descriptor {
        message: "House Price Prediction API",
        endpoints: Endpoints {
            predict: "POST - Predict house price",
            features: "GET - Get feature information",
        },
    })
}

#[get("/features")]
async fn feature_info() -> impl Responder {
    HttpResponse::Ok().json(Features {
        features: FeatureCatalog,
    })
}

#[post("/predict")]
async fn predict(
    pipeline: web::Data<Pipeline>,
    body: web::Json<Value>,
) -> Result<web::Json<Prediction>, ApiError> {
    let run = || -> Result<Prediction, ApiError> {
        let encoded = FeatureVector::encode(&body)?;
        let price = pipeline.predict(&encoded)?;
        Ok(Prediction::new(price, encoded))
    };

    match run() {
        Ok(prediction) => {
            debug!("predicted {}", prediction.formatted_price);
            Ok(web::Json(prediction))
        }
        Err(e) => {
            warn!("prediction failed: {e}");
            Err(e)
        }
    }
}
