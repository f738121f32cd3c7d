//! ONNX Runtime backend for classifiers exported to `.onnx`.
//!
//! Expects the layout produced by scikit-learn exporters: a single float
//! input of shape `[N, 4]` and a label output (`i64`) as the first output.
//! Probability outputs, if present, are ignored. Features are narrowed to
//! `f32` at this boundary; values beyond `f32::MAX` become infinities, which
//! tree and linear exports still order consistently.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tracing::info;

use crate::classifier::Classifier;
use crate::error::{InferenceError, ModelLoadError};

/// Classifier backed by an ONNX Runtime session.
///
/// `Session::run` needs `&mut self`, so calls are serialised through a
/// mutex held for the duration of one inference.
pub struct OnnxModel {
    session: Mutex<Session>,
    input_name: String,
    n_features: Option<usize>,
}

impl OnnxModel {
    /// Load a classifier from an `.onnx` file.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        if !path.exists() {
            return Err(ModelLoadError::NotFound(path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e| ModelLoadError::Onnx(e.to_string()))?
            .commit_from_file(path)
            .map_err(|e| ModelLoadError::Onnx(e.to_string()))?;

        let input = session
            .inputs()
            .first()
            .ok_or_else(|| ModelLoadError::Malformed("model declares no inputs".into()))?;
        let input_name = input.name().to_string();
        let n_features = infer_width(input.dtype());

        if session.outputs().is_empty() {
            return Err(ModelLoadError::Malformed("model declares no outputs".into()));
        }

        info!(
            input = %input_name,
            features = ?n_features,
            model = %path.display(),
            "loaded onnx model"
        );
        Ok(Self {
            session: Mutex::new(session),
            input_name,
            n_features,
        })
    }
}

impl Classifier for OnnxModel {
    fn predict(&self, features: &[f64; 4]) -> Result<i64, InferenceError> {
        let input: Box<[f32]> = features.iter().map(|&v| v as f32).collect();
        let tensor = Tensor::from_array(([1i64, 4], input))?;

        let mut session = self.session.lock().map_err(|_| InferenceError::Poisoned)?;
        let outputs = session.run(ort::inputs![self.input_name.as_str() => tensor])?;

        let (_, labels) = outputs[0].try_extract_tensor::<i64>()?;
        labels.first().copied().ok_or(InferenceError::EmptyOutput)
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    // Exported label outputs carry no class count; the label table check
    // falls back to the out-of-range guard at predict time.
    fn n_classes(&self) -> Option<usize> {
        None
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}

/// Last dimension of a tensor input, when static.
fn infer_width(input_type: &ort::value::ValueType) -> Option<usize> {
    match input_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn model_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("models")
            .join("iris.onnx")
    }

    fn require_model() -> PathBuf {
        let path = model_path();
        if !path.exists() {
            panic!(
                "Model not found at {}. Export a fitted iris classifier with skl2onnx \
                 (float_input of shape [None, 4], integer class labels).",
                path.display()
            );
        }
        path
    }

    #[test]
    #[ignore = "requires models/iris.onnx"]
    fn load_reports_arity() {
        let model = OnnxModel::load(&require_model()).unwrap();
        assert_eq!(model.n_features(), Some(4));
        assert_eq!(model.kind(), "onnx");
    }

    #[test]
    #[ignore = "requires models/iris.onnx"]
    fn predicts_setosa() {
        let model = OnnxModel::load(&require_model()).unwrap();
        assert_eq!(model.predict(&[5.1, 3.5, 1.4, 0.2]).unwrap(), 0);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = OnnxModel::load(Path::new("/nonexistent/iris.onnx"))
            .err()
            .unwrap();
        assert!(matches!(err, ModelLoadError::NotFound(_)));
    }
}
