//! JSON parameter presets.
//!
//! Missing fields fall back to [`GalaxyParameters::default`]; an explicit
//! `"gradient": null` produces an uncolored cloud.

use crate::error::GalaxyError;
use crate::params::GalaxyParameters;
use std::path::Path;

/// Errors from loading a parameter preset.
#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] GalaxyError),
}

impl GalaxyParameters {
    /// Parse and validate a preset.
    pub fn from_json(json: &str) -> Result<Self, PresetError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json_pretty(&self) -> Result<String, PresetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read a preset file.
pub fn load_preset(path: impl AsRef<Path>) -> Result<GalaxyParameters, PresetError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let params = GalaxyParameters::from_json(&json)?;
    tracing::info!(path = %path.display(), "loaded galaxy preset");
    Ok(params)
}
