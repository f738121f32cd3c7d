use crate::error::InferenceError;

/// A loaded, read-only classification model.
///
/// Implementations are shared across request handlers behind an `Arc` and
/// must tolerate concurrent `predict` calls. A backend whose runtime needs
/// exclusive access serialises calls internally.
pub trait Classifier: Send + Sync {
    /// Class index for one feature vector, in canonical feature order.
    fn predict(&self, features: &[f64; 4]) -> Result<i64, InferenceError>;

    /// Input width declared by the artifact, if it records one.
    fn n_features(&self) -> Option<usize>;

    /// Number of output classes declared by the artifact, if it records one.
    fn n_classes(&self) -> Option<usize>;

    /// Short backend name for logs and health output.
    fn kind(&self) -> &'static str;
}
