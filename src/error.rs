use std::fmt;

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpResponse, ResponseError};
use model::ModelErr;
use serde_json::json;

use crate::features::EncodeErr;

/// Every failure a request can run into. All of them are reported to the client the same
/// way: `400 {"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    /// The body could not be read or decoded as JSON.
    Body(String),
    /// The body decoded but couldn't be turned into a feature vector.
    Encode(EncodeErr),
    /// Scaling or prediction failed.
    Model(ModelErr),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body(msg) => write!(f, "{msg}"),
            Self::Encode(e) => write!(f, "{e}"),
            Self::Model(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Body(_) => None,
            Self::Encode(e) => Some(e),
            Self::Model(e) => Some(e),
        }
    }
}

impl From<EncodeErr> for ApiError {
    fn from(e: EncodeErr) -> Self {
        Self::Encode(e)
    }
}

impl From<ModelErr> for ApiError {
    fn from(e: ModelErr) -> Self {
        Self::Model(e)
    }
}

impl From<JsonPayloadError> for ApiError {
    fn from(e: JsonPayloadError) -> Self {
        Self::Body(e.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    #[actix_rt::test]
    async fn every_error_is_a_bad_request_with_a_message() {
        let errors = [
            ApiError::Body("Content type error".into()),
            ApiError::from(EncodeErr::NotAnObject { kind: "an array" }),
            ApiError::from(ModelErr::NonFinite { what: "regressor" }),
        ];

        for err in errors {
            let expected = err.to_string();
            let resp = err.error_response();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

            let body = to_bytes(resp.into_body()).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body, json!({ "error": expected }));
            assert!(!expected.is_empty());
        }
    }
}
