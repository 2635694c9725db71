use ikara::{LabelRegistry, ModelRegistry};
use std::sync::Arc;

pub type AppState = Arc<State>;

/// Largest accepted `/predict` body unless configured otherwise
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Everything a request handler may read. Built once before serving, never mutated.
#[derive(Debug)]
pub struct State {
    pub models: ModelRegistry,
    pub labels: LabelRegistry,
    pub max_upload_bytes: usize,
}

impl State {
    pub fn new(models: ModelRegistry, labels: LabelRegistry) -> Self {
        Self {
            models,
            labels,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
