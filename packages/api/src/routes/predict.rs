use crate::{error::ApiError, internal, state::AppState};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    routing::post,
};
use ikara::{ImageRequest, Pipeline, PredictError, Prediction};
use metrics::{counter, histogram};
use serde_json::Value;
use std::time::Instant;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(predict))
}

/// Image sources of a `/predict` call: the multipart `image` field, or the
/// `imageBase64` / `image` keys of a JSON body.
#[derive(Debug)]
pub struct PredictInput(pub ImageRequest);

impl<S> FromRequest<S> for PredictInput
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if is_multipart {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;

            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?
            {
                if field.name() == Some("image") {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
                    return Ok(Self(ImageRequest::upload(data.to_vec())));
                }
            }
            return Ok(Self(ImageRequest::default()));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;

        // An unparseable body carries no image source, same as an empty one.
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|e| {
                tracing::debug!("Ignoring non-JSON /predict body: {}", e);
                Value::Null
            })
        };

        Ok(Self(ImageRequest::json(&value)))
    }
}

/// Model availability is checked before the body is read, so a request without a
/// servable model fails with `NO_MODEL_AVAILABLE` whatever its body looks like.
#[tracing::instrument(name = "POST /predict", skip(state, request))]
pub async fn predict(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<Prediction>, ApiError> {
    let started = Instant::now();

    if state.models.is_empty() {
        let err = PredictError::NoModelAvailable;
        counter!("ikara_prediction_errors_total", "code" => err.code()).increment(1);
        return Err(err.into());
    }

    let PredictInput(input) = PredictInput::from_request(request, &state).await?;

    let worker_state = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        Pipeline::new(&worker_state.models, &worker_state.labels).run(input)
    })
    .await
    .map_err(|e| internal!("Prediction task failed: {}", e))?;

    match result {
        Ok(prediction) => {
            counter!("ikara_predictions_total", "model" => prediction.model_used.to_string())
                .increment(1);
            histogram!("ikara_prediction_duration_seconds")
                .record(started.elapsed().as_secs_f64());
            tracing::info!(
                "Predicted {} ({:.3}) with {} model",
                prediction.predicted_label,
                prediction.confidence,
                prediction.model_used
            );
            Ok(Json(prediction))
        }
        Err(err) => {
            counter!("ikara_prediction_errors_total", "code" => err.code()).increment(1);
            Err(err.into())
        }
    }
}
