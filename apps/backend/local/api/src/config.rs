use ikara_api::state::DEFAULT_MAX_UPLOAD_BYTES;
use std::{env, path::PathBuf};

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub primary_model_path: PathBuf,
    pub secondary_model_path: PathBuf,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT={}", value)))?,
            None => 5000,
        };

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(value) => match value.parse::<usize>() {
                Ok(bytes) if bytes > 0 => bytes,
                _ => return Err(ConfigError::InvalidValue(format!("MAX_UPLOAD_BYTES={}", value))),
            },
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Config {
            port,
            primary_model_path: lookup("PRIMARY_MODEL_PATH")
                .unwrap_or_else(|| "ikara_vgg16_model.onnx".to_string())
                .into(),
            secondary_model_path: lookup("SECONDARY_MODEL_PATH")
                .unwrap_or_else(|| "ikara_mobilenet_model.onnx".to_string())
                .into(),
            max_upload_bytes,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
        }
    }
}

impl std::error::Error for ConfigError {}
