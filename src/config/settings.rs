use std::path::Path;

use crate::{
    config::timing::TimingConfig,
    foundation::{
        core::Viewport,
        error::{ChoreoError, ChoreoResult},
    },
};

/// Top-level engine configuration. Every field has a product default, so `{}` is valid JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChoreoConfig {
    /// Viewport the clone geometry is computed against.
    pub viewport: Viewport,
    /// Seed for per-clone jitter.
    pub seed: u64,
    /// Animation frame length used by frame callbacks.
    pub frame_interval_ms: u64,
    /// Stage, settle and overlay timings.
    pub timing: TimingConfig,
}

impl Default for ChoreoConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            seed: 0x5EED_CAFE,
            frame_interval_ms: 16,
            timing: TimingConfig::default(),
        }
    }
}

impl ChoreoConfig {
    /// Validate viewport and timings.
    pub fn validate(&self) -> ChoreoResult<()> {
        self.viewport
            .validate()
            .map_err(|e| ChoreoError::config(e.to_string()))?;
        if self.frame_interval_ms == 0 {
            return Err(ChoreoError::config("frame_interval_ms must be > 0"));
        }
        self.timing.validate()
    }

    /// Parse and validate JSON configuration.
    pub fn from_json_str(s: &str) -> ChoreoResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| ChoreoError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> ChoreoResult<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| {
            ChoreoError::Other(
                anyhow::Error::new(e).context(format!("read config '{}'", path.display())),
            )
        })?;
        Self::from_json_str(&s)
    }
}
