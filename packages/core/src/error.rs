//! Terminal failures of a prediction request.

/// Error type for the prediction pipeline
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("No image provided")]
    NoImageProvided,

    #[error("Invalid base64 image data: {0}")]
    DecodeError(#[from] base64::DecodeError),

    #[error("Unreadable image: {0}")]
    UnreadableImage(#[from] image::ImageError),

    #[error("Model not loaded")]
    NoModelAvailable,

    #[error("Inference failed: {0}")]
    InferenceError(String),
}

impl PredictError {
    /// Whether the caller sent bad or missing input (as opposed to a server-side fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PredictError::NoImageProvided
                | PredictError::DecodeError(_)
                | PredictError::UnreadableImage(_)
        )
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            PredictError::NoImageProvided => "NO_IMAGE_PROVIDED",
            PredictError::DecodeError(_) => "DECODE_ERROR",
            PredictError::UnreadableImage(_) => "UNREADABLE_IMAGE",
            PredictError::NoModelAvailable => "NO_MODEL_AVAILABLE",
            PredictError::InferenceError(_) => "INFERENCE_ERROR",
        }
    }
}
