use axum::{Router, extract::DefaultBodyLimit};
use state::AppState;
use tower_http::cors::CorsLayer;

mod routes;

pub mod error;
pub mod state;

pub use axum;
pub use routes::{health::HealthResponse, info::InfoResponse, predict::PredictInput};

pub fn construct_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .nest("/predict", routes::predict::routes())
        .nest("/health", routes::health::routes())
        .nest("/info", routes::info::routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
}
