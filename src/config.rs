use serde::Deserialize;

use crate::error::AppError;

/// Optional settings file. Every field is optional; CLI flags win over the
/// file, the file wins over built-in defaults.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub(crate) struct FileConfig {
    pub(crate) server: Option<String>,
    pub(crate) dit_ms: Option<u64>,
    pub(crate) tone_hz: Option<f32>,
    pub(crate) stats_port: Option<u16>,
}

pub(crate) fn load(path: &str) -> Result<FileConfig, AppError> {
    let raw =
        std::fs::read_to_string(path).map_err(|e| AppError::Config(format!("{path}: {e}")))?;
    serde_yaml::from_str(&raw).map_err(|e| AppError::Config(format!("{path}: {e}")))
}
