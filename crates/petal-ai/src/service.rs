//! The prediction operation: feature vector in, label out.

use std::path::Path;
use std::sync::Arc;

use petal_core::{FEATURE_NAMES, FeatureVector, LabelTable, Prediction};
use tracing::{debug, info};

use crate::classifier::Classifier;
use crate::error::{ModelLoadError, PredictError};
use crate::loader::load_classifier;

/// A loaded model paired with its label table.
///
/// Built once at startup; clones share the same model.
#[derive(Clone)]
pub struct PredictionService {
    model: Arc<dyn Classifier>,
    labels: LabelTable,
}

impl PredictionService {
    /// Pair a model with a label table, checking that they agree with each
    /// other and with the request schema.
    pub fn new(model: Arc<dyn Classifier>, labels: LabelTable) -> Result<Self, ModelLoadError> {
        if let Some(n) = model.n_features()
            && n != FEATURE_NAMES.len()
        {
            return Err(ModelLoadError::ArityMismatch {
                model: n,
                expected: FEATURE_NAMES.len(),
            });
        }
        if let Some(n) = model.n_classes()
            && n != labels.len()
        {
            return Err(ModelLoadError::LabelMismatch {
                model: n,
                labels: labels.len(),
            });
        }
        Ok(Self { model, labels })
    }

    /// Load the artifact at `path` and pair it with `labels`.
    pub fn load(path: &Path, labels: LabelTable) -> Result<Self, ModelLoadError> {
        let model = load_classifier(path)?;
        let service = Self::new(model, labels)?;
        info!(
            backend = service.model.kind(),
            labels = %service.labels,
            "prediction service ready"
        );
        Ok(service)
    }

    /// Classify one feature vector. Calls the model exactly once.
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, PredictError> {
        let index = self.model.predict(&features.as_array())?;
        let label = self
            .labels
            .label(index)
            .ok_or(PredictError::InconsistentModel {
                index,
                labels: self.labels.len(),
            })?;
        debug!(index, label, "predicted");
        Ok(Prediction::new(label))
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Backend name of the loaded model.
    pub fn backend(&self) -> &'static str {
        self.model.kind()
    }
}
