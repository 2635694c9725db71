use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::{Router, routing::get};
use ikara::ModelSlot;
use serde::Serialize;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    /// At least one classifier can serve `/predict`
    pub model_loaded: bool,
    pub primary_loaded: bool,
    pub secondary_loaded: bool,
    /// Version of the model that serves the next request
    pub version: Option<String>,
    pub model: Option<ModelSlot>,
}

#[tracing::instrument(name = "GET /health", skip(state))]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let active = state.models.select().model();

    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: active.is_some(),
        primary_loaded: state.models.is_loaded(ModelSlot::Primary),
        secondary_loaded: state.models.is_loaded(ModelSlot::Secondary),
        version: active.map(|model| model.info.version.clone()),
        model: active.map(|model| model.slot),
    })
}
