#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use axum::{Router, routing::get};
use ikara::{LabelRegistry, ModelRegistry};
use ikara_api::{construct_router, state::State};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod metrics;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting IKARA prediction service");

    let config = config::Config::from_env()?;
    metrics::init_metrics()?;

    let ep_info = ikara_model_provider::initialize_ort();
    tracing::info!("Execution providers: {:?}", ep_info.active_providers);

    let labels = LabelRegistry::default();
    let models = ModelRegistry::load(
        &config.primary_model_path,
        &config.secondary_model_path,
        labels.len(),
        ikara_model_provider::load_classifier,
    );

    if let Some(model) = models.select().model() {
        tracing::info!("Serving predictions with the {} model", model.slot);
    }

    let state = Arc::new(
        State::new(models, labels).with_max_upload_bytes(config.max_upload_bytes),
    );

    let app = Router::new()
        .merge(construct_router(state))
        .route("/metrics", get(metrics::handler));

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
