//! Process-wide ONNX Runtime initialization.
//!
//! Call [`initialize_ort`] once at startup, before loading any model. Sessions created
//! afterwards use the registered execution providers, in order of preference
//! CUDA > CoreML > DirectML, with CPU as the fallback that is always present.

use std::sync::OnceLock;

/// Execution providers that ended up active
#[derive(Debug, Clone, Default)]
pub struct ExecutionProviderInfo {
    pub active_providers: Vec<String>,
    pub accelerated: bool,
}

static EP_INFO: OnceLock<ExecutionProviderInfo> = OnceLock::new();

/// Idempotent; later calls return the info of the first one.
pub fn initialize_ort() -> ExecutionProviderInfo {
    EP_INFO.get_or_init(do_initialize_ort).clone()
}

#[cfg(feature = "local-ml")]
fn do_initialize_ort() -> ExecutionProviderInfo {
    #[allow(unused_mut)]
    let mut eps: Vec<ort::execution_providers::ExecutionProviderDispatch> = Vec::new();
    #[allow(unused_mut)]
    let mut active_providers: Vec<String> = Vec::new();

    #[cfg(feature = "cuda")]
    {
        use ort::execution_providers::ExecutionProvider;
        let cuda = ort::execution_providers::CUDAExecutionProvider::default();
        if cuda.is_available().unwrap_or(false) {
            eps.push(cuda.build());
            active_providers.push("CUDA".to_string());
        } else {
            tracing::warn!("CUDA feature enabled but runtime not available");
        }
    }

    #[cfg(feature = "coreml")]
    {
        use ort::execution_providers::ExecutionProvider;
        let coreml = ort::execution_providers::CoreMLExecutionProvider::default();
        if coreml.is_available().unwrap_or(false) {
            eps.push(coreml.build());
            active_providers.push("CoreML".to_string());
        } else {
            tracing::warn!("CoreML feature enabled but not on Apple platform");
        }
    }

    #[cfg(feature = "directml")]
    {
        use ort::execution_providers::ExecutionProvider;
        let directml = ort::execution_providers::DirectMLExecutionProvider::default();
        if directml.is_available().unwrap_or(false) {
            eps.push(directml.build());
            active_providers.push("DirectML".to_string());
        } else {
            tracing::warn!("DirectML feature enabled but not on Windows");
        }
    }

    let accelerated = !active_providers.is_empty();
    active_providers.push("CPU".to_string());

    if eps.is_empty() {
        tracing::info!("No GPU/NPU acceleration available, using CPU");
        ort::init().commit();
    } else {
        tracing::info!("Initializing ORT with execution providers: {:?}", active_providers);
        ort::init().with_execution_providers(eps).commit();
    }

    ExecutionProviderInfo {
        active_providers,
        accelerated,
    }
}

#[cfg(not(feature = "local-ml"))]
fn do_initialize_ort() -> ExecutionProviderInfo {
    ExecutionProviderInfo {
        active_providers: vec!["none (local-ml feature disabled)".to_string()],
        accelerated: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_is_idempotent() {
        let first = initialize_ort();
        let second = initialize_ort();
        assert_eq!(first.active_providers, second.active_providers);
        assert_eq!(first.accelerated, second.accelerated);
    }
}
