//! Model layer: artifact loading, inference backends, and the prediction service.

mod centroid;
mod classifier;
mod error;
mod loader;
#[cfg(feature = "onnx")]
mod onnx;
mod service;

pub use centroid::CentroidModel;
pub use classifier::Classifier;
pub use error::{InferenceError, ModelLoadError, PredictError};
pub use loader::load_classifier;
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;
pub use service::PredictionService;
