use std::path::Path;
use std::sync::Arc;

use crate::centroid::CentroidModel;
use crate::classifier::Classifier;
use crate::error::ModelLoadError;

/// Load a model artifact, picking the backend from the file extension.
///
/// - `.json` → [`CentroidModel`]
/// - `.onnx` → `OnnxModel` (requires the `onnx` feature)
pub fn load_classifier(path: &Path) -> Result<Arc<dyn Classifier>, ModelLoadError> {
    if !path.exists() {
        return Err(ModelLoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("json") => Ok(Arc::new(CentroidModel::load(path)?)),
        #[cfg(feature = "onnx")]
        Some("onnx") => Ok(Arc::new(crate::onnx::OnnxModel::load(path)?)),
        #[cfg(not(feature = "onnx"))]
        Some("onnx") => Err(ModelLoadError::OnnxDisabled(path.to_path_buf())),
        _ => Err(ModelLoadError::UnsupportedFormat(path.to_path_buf())),
    }
}
