use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use petal_ai::PredictError;
use petal_core::ValidationError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Everything a request can fail with, mapped onto an HTTP response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Predict(#[from] PredictError),

    #[error("prediction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Predict(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(err) => json!(err),
            Self::Predict(err @ PredictError::InconsistentModel { .. }) => {
                error!(error = %err, "model and label table disagree");
                json!({ "error": "inconsistent_model", "detail": err.to_string() })
            }
            Self::Predict(err @ PredictError::Inference(_)) => {
                error!(error = %err, "inference failed");
                json!({ "error": "inference_failed", "detail": err.to_string() })
            }
            Self::Task(err) => {
                error!(error = %err, "prediction task failed");
                json!({ "error": "internal" })
            }
        };
        (status, Json(body)).into_response()
    }
}
