//! HTTP service that serves a pre-trained house price regressor.
//!
//! A request's attributes are encoded into the fixed order feature vector the model was
//! trained on, scaled, fed to the regressor and the price is returned as JSON.

pub mod config;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod price;
pub mod routes;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use features::{FeatureVector, OceanProximity};
pub use pipeline::{Pipeline, Prediction};
