//! Inference side of the house price service: the fitted input scaler, the pre-trained
//! regressor and the JSON artifacts they are loaded from.

pub mod arch;
mod artifact;
pub mod error;
pub mod scaler;
pub mod specs;

pub use arch::Regressor;
pub use artifact::Artifacts;
pub use error::{ModelErr, Result};
pub use scaler::Scaler;
