//! Nearest-centroid classifier stored as a JSON artifact.
//!
//! Holds one pre-computed centroid per class. A feature vector is assigned the
//! class whose centroid is closest in squared Euclidean distance.
//!
//! Artifact layout:
//!
//! ```json
//! {
//!   "format": "nearest-centroid",
//!   "version": 1,
//!   "feature_names": ["sepal_length", "sepal_width", "petal_length", "petal_width"],
//!   "centroids": [[5.006, 3.428, 1.462, 0.246], ...]
//! }
//! ```

use std::path::Path;

use petal_core::FEATURE_NAMES;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::Classifier;
use crate::error::{InferenceError, ModelLoadError};

pub const FORMAT: &str = "nearest-centroid";
pub const VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Artifact {
    format: String,
    version: u32,
    feature_names: Vec<String>,
    centroids: Vec<Vec<f64>>,
}

/// Nearest-centroid classifier. Read-only after load, so lock-free.
#[derive(Debug, Clone)]
pub struct CentroidModel {
    feature_names: Vec<String>,
    centroids: Vec<Vec<f64>>,
}

impl CentroidModel {
    /// Build a model from centroids in class-index order.
    ///
    /// `feature_names` must match the request schema column for column;
    /// centroid coordinates are interpreted in that order.
    pub fn new(
        feature_names: Vec<String>,
        centroids: Vec<Vec<f64>>,
    ) -> Result<Self, ModelLoadError> {
        if feature_names.len() != FEATURE_NAMES.len() {
            return Err(ModelLoadError::ArityMismatch {
                model: feature_names.len(),
                expected: FEATURE_NAMES.len(),
            });
        }
        if feature_names.iter().zip(FEATURE_NAMES).any(|(a, b)| a != b) {
            return Err(ModelLoadError::Malformed(format!(
                "feature columns {feature_names:?}, expected {FEATURE_NAMES:?}"
            )));
        }
        if centroids.is_empty() {
            return Err(ModelLoadError::Malformed("no centroids".into()));
        }
        let dim = feature_names.len();
        for (i, c) in centroids.iter().enumerate() {
            if c.len() != dim {
                return Err(ModelLoadError::Malformed(format!(
                    "centroid {i} has {} values, expected {dim}",
                    c.len()
                )));
            }
            if c.iter().any(|v| !v.is_finite()) {
                return Err(ModelLoadError::Malformed(format!(
                    "centroid {i} has a non-finite value"
                )));
            }
        }
        Ok(Self {
            feature_names,
            centroids,
        })
    }

    /// Load a model from a JSON artifact on disk.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_json(&text)?;
        info!(
            classes = model.centroids.len(),
            features = model.feature_names.len(),
            model = %path.display(),
            "loaded centroid model"
        );
        Ok(model)
    }

    /// Parse a model from artifact JSON.
    pub fn from_json(text: &str) -> Result<Self, ModelLoadError> {
        let artifact: Artifact =
            serde_json::from_str(text).map_err(|e| ModelLoadError::Malformed(e.to_string()))?;
        if artifact.format != FORMAT {
            return Err(ModelLoadError::Malformed(format!(
                "format {:?}, expected {FORMAT:?}",
                artifact.format
            )));
        }
        if artifact.version != VERSION {
            return Err(ModelLoadError::Malformed(format!(
                "unsupported version {}",
                artifact.version
            )));
        }
        Self::new(artifact.feature_names, artifact.centroids)
    }

    /// Serialise back to artifact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let artifact = Artifact {
            format: FORMAT.to_string(),
            version: VERSION,
            feature_names: self.feature_names.clone(),
            centroids: self.centroids.clone(),
        };
        serde_json::to_string_pretty(&artifact)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn centroids(&self) -> &[Vec<f64>] {
        &self.centroids
    }
}

impl Classifier for CentroidModel {
    fn predict(&self, features: &[f64; 4]) -> Result<i64, InferenceError> {
        nearest(&self.centroids, features)
            .map(|i| i as i64)
            .ok_or(InferenceError::EmptyOutput)
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.feature_names.len())
    }

    fn n_classes(&self) -> Option<usize> {
        Some(self.centroids.len())
    }

    fn kind(&self) -> &'static str {
        FORMAT
    }
}

/// Index of the closest centroid. `None` only for an empty model.
///
/// Ties go to the lower index, including when every distance overflows to
/// infinity for inputs near `f64::MAX`.
fn nearest(centroids: &[Vec<f64>], x: &[f64]) -> Option<usize> {
    let mut iter = centroids.iter().enumerate();
    let (_, first) = iter.next()?;
    let mut best = 0;
    let mut best_dist = squared_distance(x, first);

    for (i, centroid) in iter {
        let dist = squared_distance(x, centroid);
        if dist.total_cmp(&best_dist).is_lt() {
            best_dist = dist;
            best = i;
        }
    }

    Some(best)
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
