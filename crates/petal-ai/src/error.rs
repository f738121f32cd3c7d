use std::path::PathBuf;

use thiserror::Error;

/// The model artifact could not be turned into a usable classifier.
///
/// Always fatal: the service must not start serving without a model.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("reading model artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported model artifact {} (expected .json or .onnx)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("{} is an ONNX artifact but petal-ai was built without the `onnx` feature", .0.display())]
    OnnxDisabled(PathBuf),

    #[error("malformed model artifact: {0}")]
    Malformed(String),

    #[error("model expects {model} input features, request schema has {expected}")]
    ArityMismatch { model: usize, expected: usize },

    #[error("model has {model} output classes, label table has {labels}")]
    LabelMismatch { model: usize, labels: usize },

    #[error("onnx runtime: {0}")]
    Onnx(String),
}

/// The model backend failed while running inference.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model produced no class index")]
    EmptyOutput,

    #[error("model state poisoned by an earlier panic")]
    Poisoned,

    #[cfg(feature = "onnx")]
    #[error("onnx runtime: {0}")]
    Onnx(#[from] ort::Error),
}

/// Why a single `predict` call did not yield a label.
#[derive(Debug, Error)]
pub enum PredictError {
    /// The model returned a class index with no entry in the label table.
    #[error("model returned class index {index}, label table has {labels} entries")]
    InconsistentModel { index: i64, labels: usize },

    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
}
