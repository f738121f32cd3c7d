pub mod features;
pub mod labels;
pub mod prediction;

pub use features::{FEATURE_NAMES, FeatureVector, FieldIssue, ValidationError};
pub use labels::{IRIS_LABELS, LabelTable, LabelTableError};
pub use prediction::Prediction;
