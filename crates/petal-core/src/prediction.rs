use serde::{Deserialize, Serialize};

/// Result of one `predict` call, as returned on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_class: String,
}

impl Prediction {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            predicted_class: label.into(),
        }
    }
}
