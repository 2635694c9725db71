use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::{Router, routing::get};
use ikara::{INPUT_SIZE, ModelInfo, ModelSlot};
use serde::Serialize;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(info))
}

#[derive(Serialize, Debug)]
pub struct ModelStatus {
    pub slot: ModelSlot,
    pub loaded: bool,
    #[serde(flatten)]
    pub info: ModelInfo,
}

#[derive(Serialize, Debug)]
pub struct InfoResponse {
    /// Class names in model output order
    pub classes: Vec<String>,
    /// `[width, height]` every image is resized to
    pub input_size: [u32; 2],
    pub models: Vec<ModelStatus>,
}

#[tracing::instrument(name = "GET /info", skip(state))]
pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    let models = [ModelSlot::Primary, ModelSlot::Secondary]
        .into_iter()
        .map(|slot| {
            let entry = state.models.entry(slot);
            ModelStatus {
                slot,
                loaded: entry.is_loaded(),
                info: entry.info.clone(),
            }
        })
        .collect();

    Json(InfoResponse {
        classes: state.labels.labels().to_vec(),
        input_size: [INPUT_SIZE.0, INPUT_SIZE.1],
        models,
    })
}
