//! Analyzer configuration.
//!
//! Loaded from TOML; every field has a default so a partial file (or none at
//! all) is valid:
//!
//! ```toml
//! lookback = 15
//! range_window = 10
//! atr_period = 20
//! risk_reward_ratio = 2.0
//! confidence_model = "additive"
//! risk_reward_report = "configured"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// How signal confidence is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceModel {
    /// 50 base, +25 for a structural break, +15 for a fair value gap, capped at 95.
    #[default]
    Additive,
    /// 85 for a continuation (BOS), 75 for a reversal (CHoCH).
    StructureTagged,
}

/// What the signal reports as its risk-reward ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRewardReport {
    /// The configured ratio.
    #[default]
    Configured,
    /// Recomputed from the emitted entry, stop and first target.
    Realized,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Pivot confirmation radius in candles.
    pub lookback: usize,
    /// Candles before the latest used as the break threshold while a side has no swing.
    pub range_window: usize,
    /// True ranges averaged for the ATR.
    pub atr_period: usize,
    /// Reward multiple of the first target.
    pub risk_reward_ratio: f64,
    pub confidence_model: ConfidenceModel,
    pub risk_reward_report: RiskRewardReport,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            lookback: 15,
            range_window: 10,
            atr_period: 20,
            risk_reward_ratio: 2.0,
            confidence_model: ConfidenceModel::default(),
            risk_reward_report: RiskRewardReport::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback == 0 {
            return Err(ConfigError::Invalid("lookback must be >= 1".into()));
        }
        if self.range_window == 0 {
            return Err(ConfigError::Invalid("range_window must be >= 1".into()));
        }
        if self.atr_period == 0 {
            return Err(ConfigError::Invalid("atr_period must be >= 1".into()));
        }
        if !self.risk_reward_ratio.is_finite() || self.risk_reward_ratio <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "risk_reward_ratio must be a positive number, got {}",
                self.risk_reward_ratio
            )));
        }
        Ok(())
    }

    /// BLAKE3 hex digest of the canonical JSON form.
    ///
    /// Two analyses with the same candles and the same hash are identical.
    pub fn config_hash(&self) -> String {
        let json = serde_json::to_string(self).expect("AnalyzerConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
