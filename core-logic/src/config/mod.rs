use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::warn;

/// Inclusive window of whole seconds, as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayWindow {
    pub min: u64,
    pub max: u64,
}

impl DelayWindow {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                reason: format!("min ({}) is greater than max ({})", self.min, self.max),
            });
        }
        Ok(())
    }
}

/// Top-level run configuration, read once from `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintConfig {
    pub contract_address: String,
    pub provider_url: String,
    pub private_key_file_path: String,
    pub contract_abi_path: String,
    /// Pause between wallets.
    pub pause: DelayWindow,
    /// 1-based key file line numbers, in processing order.
    pub order: Vec<i64>,
    #[serde(default)]
    pub gas: GasSettings,
    #[serde(default)]
    pub mint: MintSettings,
}

/// Optional gas section. Every field falls back to the stock values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GasSettings {
    pub ceiling_gwei: f64,
    pub poll_min_secs: u64,
    pub poll_max_secs: u64,
    pub max_fee_multiplier: f64,
    pub priority_min_gwei: f64,
    pub priority_max_gwei: f64,
    /// Upper bound on gas price checks per attempt. Absent means unbounded.
    pub max_polls: Option<u32>,
}

impl Default for GasSettings {
    fn default() -> Self {
        Self {
            ceiling_gwei: 270.0,
            poll_min_secs: 5,
            poll_max_secs: 6,
            max_fee_multiplier: 1.2,
            priority_min_gwei: 30.0,
            priority_max_gwei: 40.0,
            max_polls: None,
        }
    }
}

/// Optional mint section describing the contract call and its cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MintSettings {
    pub method: String,
    pub quantity: u64,
    pub min_repetitions: u64,
    pub max_repetitions: u64,
    pub attempt_pause_min_secs: u64,
    pub attempt_pause_max_secs: u64,
}

impl Default for MintSettings {
    fn default() -> Self {
        Self {
            method: "purchase".to_string(),
            quantity: 1,
            min_repetitions: 5,
            max_repetitions: 20,
            attempt_pause_min_secs: 10,
            attempt_pause_max_secs: 30,
        }
    }
}

impl MintSettings {
    pub fn repetitions(&self) -> DelayWindow {
        DelayWindow::new(self.min_repetitions, self.max_repetitions)
    }

    pub fn attempt_pause(&self) -> DelayWindow {
        DelayWindow::new(self.attempt_pause_min_secs, self.attempt_pause_max_secs)
    }
}

impl MintConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::from_io(path, &e))?;
        Self::from_json(&content, path)
    }

    /// Parses and validates a JSON document. `origin` is only used in errors.
    pub fn from_json(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: MintConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
                path: origin.to_string(),
                msg: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pause.validate("pause")?;
        self.mint.repetitions().validate("mint.repetitions")?;
        self.mint.attempt_pause().validate("mint.attemptPause")?;
        DelayWindow::new(self.gas.poll_min_secs, self.gas.poll_max_secs).validate("gas.poll")?;

        if self.mint.method.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "mint.method".into(),
                reason: "method name must not be empty".into(),
            });
        }
        if !(self.gas.ceiling_gwei > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "gas.ceilingGwei".into(),
                reason: format!("must be positive, got {}", self.gas.ceiling_gwei),
            });
        }
        if !(self.gas.max_fee_multiplier > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "gas.maxFeeMultiplier".into(),
                reason: format!("must be positive, got {}", self.gas.max_fee_multiplier),
            });
        }
        if !(self.gas.priority_min_gwei >= 0.0)
            || self.gas.priority_min_gwei > self.gas.priority_max_gwei
        {
            return Err(ConfigError::InvalidValue {
                field: "gas.priorityGwei".into(),
                reason: format!(
                    "expected 0 <= min <= max, got [{}, {}]",
                    self.gas.priority_min_gwei, self.gas.priority_max_gwei
                ),
            });
        }
        if self.gas.max_polls == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "gas.maxPolls".into(),
                reason: "must allow at least one poll".into(),
            });
        }
        if self.order.is_empty() {
            warn!("Config 'order' is empty; no wallet will be processed");
        }

        Ok(())
    }
}
