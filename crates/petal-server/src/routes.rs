//! API route handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use petal_core::{Prediction, features};
use serde::Serialize;

use crate::AppState;
use crate::error::ApiError;

/// `POST /predict/`
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Prediction>, ApiError> {
    let input = features::parse(&body)?;
    let service = state.service.clone();
    let prediction = tokio::task::spawn_blocking(move || service.predict(&input)).await??;
    Ok(Json(prediction))
}

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness probe - is the process serving?
pub async fn liveness() -> Json<Liveness> {
    Json(Liveness {
        status: "alive",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
pub struct Readiness {
    pub status: &'static str,
    pub model: &'static str,
    pub labels: Vec<String>,
}

/// Readiness probe - the listener only binds after the model loaded,
/// so any answer here means the model is in memory.
pub async fn readiness(State(state): State<AppState>) -> Json<Readiness> {
    Json(Readiness {
        status: "ready",
        model: state.service.backend(),
        labels: state.service.labels().iter().map(str::to_string).collect(),
    })
}
