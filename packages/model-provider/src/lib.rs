//! # IKARA Model Provider
//! Classifier backends for the prediction pipeline. ONNX Runtime is compiled in with the
//! `local-ml` feature; without it models cannot be loaded and the service runs degraded.
use ikara::{Classifier, ClassifierError};
use std::{path::Path, sync::Arc};

pub mod execution_providers;
#[cfg(feature = "local-ml")]
pub mod onnx;

pub use execution_providers::{ExecutionProviderInfo, initialize_ort};

/// Loads the classifier stored at `path`
#[cfg(feature = "local-ml")]
pub fn load_classifier(path: &Path) -> Result<Arc<dyn Classifier>, ClassifierError> {
    let classifier = onnx::OnnxClassifier::from_file(path)?;
    Ok(Arc::new(classifier))
}

/// Loads the classifier stored at `path`
#[cfg(not(feature = "local-ml"))]
pub fn load_classifier(path: &Path) -> Result<Arc<dyn Classifier>, ClassifierError> {
    Err(ClassifierError::Unsupported(format!(
        "cannot load {}: built without the `local-ml` feature",
        path.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_is_an_error() {
        let result = load_classifier(Path::new("/nonexistent/ikara/model.onnx"));
        assert!(result.is_err());
    }

    #[cfg(not(feature = "local-ml"))]
    #[test]
    fn loading_requires_local_ml() {
        let err = load_classifier(Path::new("model.onnx")).err().unwrap();
        assert!(matches!(err, ClassifierError::Unsupported(_)));
    }

    #[cfg(feature = "local-ml")]
    #[test]
    fn corrupt_model_is_a_load_error() {
        let path = std::env::temp_dir().join(format!("ikara-corrupt-{}.onnx", std::process::id()));
        std::fs::write(&path, b"not a protobuf").unwrap();
        let err = load_classifier(&path).err().unwrap();
        assert!(matches!(err, ClassifierError::Load(_)));
    }
}
