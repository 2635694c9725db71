use crate::preprocess::ImageTensor;

/// Error type for classifier backends
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Failed to load model: {0}")]
    Load(String),

    #[error("Model produces {actual} scores, expected {expected}")]
    OutputMismatch { expected: usize, actual: usize },

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Opaque inference capability: one preprocessed image in, one score per class out.
///
/// Implementations are loaded once at startup and shared across requests, so `predict`
/// takes `&self`; backends that need exclusive access lock internally.
pub trait Classifier: Send + Sync {
    fn predict(&self, tensor: &ImageTensor) -> Result<Vec<f32>, ClassifierError>;

    /// Statically known output width, if the backend can tell before running.
    fn output_len(&self) -> Option<usize> {
        None
    }
}
