//! # Core Logic - Gas Gate
//!
//! Holds submissions back while the network gas price is above a ceiling and
//! turns a cleared reading into EIP-1559 fee caps. Chain crates supply the
//! price feed through [`GasPriceSource`].

use crate::config::{DelayWindow, GasSettings};
use crate::error::MintError;
use crate::traits::{GasPriceSource, MintLog, Randomness};
use crate::utils::pacing::{PacingScheduler, PauseReason};
use std::sync::Arc;

/// Configuration for gas gating and fee quoting
#[derive(Debug, Clone, PartialEq)]
pub struct GasConfig {
    pub ceiling_gwei: f64,
    pub poll_window: DelayWindow,
    pub max_fee_multiplier: f64,
    pub priority_min_gwei: f64,
    pub priority_max_gwei: f64,
    pub max_polls: Option<u32>,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            ceiling_gwei: 270.0,
            poll_window: DelayWindow::new(5, 6),
            max_fee_multiplier: 1.2,
            priority_min_gwei: 30.0,
            priority_max_gwei: 40.0,
            max_polls: None,
        }
    }
}

impl GasConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_polls(mut self, max_polls: Option<u32>) -> Self {
        self.max_polls = max_polls;
        self
    }

    pub fn ceiling_wei(&self) -> u128 {
        gwei_to_wei(self.ceiling_gwei)
    }
}

impl From<&GasSettings> for GasConfig {
    fn from(settings: &GasSettings) -> Self {
        Self {
            ceiling_gwei: settings.ceiling_gwei,
            poll_window: DelayWindow::new(settings.poll_min_secs, settings.poll_max_secs),
            max_fee_multiplier: settings.max_fee_multiplier,
            priority_min_gwei: settings.priority_min_gwei,
            priority_max_gwei: settings.priority_max_gwei,
            max_polls: settings.max_polls,
        }
    }
}

/// One gas price observation. Never cached past the check that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasReading {
    pub wei: u128,
}

impl GasReading {
    pub fn from_wei(wei: u128) -> Self {
        Self { wei }
    }

    pub fn gwei(&self) -> f64 {
        self.wei as f64 / 1e9
    }
}

/// Fee caps for one transaction, in wei, with the gwei figures they came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeQuote {
    pub max_priority_fee_per_gas: u128,
    pub max_fee_per_gas: u128,
    pub priority_gwei: f64,
    pub max_fee_gwei: f64,
}

pub struct GasGate {
    config: GasConfig,
    log: Arc<dyn MintLog>,
}

impl GasGate {
    pub fn new(config: GasConfig, log: Arc<dyn MintLog>) -> Self {
        Self { config, log }
    }

    /// Polls `source` until the price is at or below the ceiling.
    ///
    /// Failed queries are retried after the same poll window. Without a
    /// `max_polls` cap this only ends on a cleared price or cancellation.
    pub async fn adjusted_gas_price<S>(
        &self,
        source: &S,
        pacer: &mut PacingScheduler,
    ) -> Result<GasReading, MintError>
    where
        S: GasPriceSource + ?Sized,
    {
        let ceiling_wei = self.config.ceiling_wei();
        let mut polls: u32 = 0;
        let mut last_gwei = 0.0;

        loop {
            polls = polls.saturating_add(1);

            match source.gas_price_wei().await {
                Ok(wei) => {
                    let reading = GasReading::from_wei(wei);
                    if reading.wei <= ceiling_wei {
                        return Ok(reading);
                    }
                    last_gwei = reading.gwei();
                    self.log.info(&format!(
                        "Gas price {:.2} gwei is above the {} gwei ceiling",
                        last_gwei, self.config.ceiling_gwei
                    ));
                }
                Err(e) => {
                    self.log
                        .warn(&format!("Gas price query failed, retrying: {}", e));
                }
            }

            if let Some(max_polls) = self.config.max_polls {
                if polls >= max_polls {
                    return Err(MintError::GasWaitExhausted {
                        polls,
                        ceiling_gwei: self.config.ceiling_gwei,
                        last_gwei,
                    });
                }
            }

            pacer
                .wait(PauseReason::GasCeiling, self.config.poll_window)
                .await?;
        }
    }

    /// Priority fee drawn from the configured range, max fee scaled from the
    /// reading. Both are rounded to 7 decimals of gwei and sent as drawn; a
    /// node that rejects a priority fee above the max fee fails the attempt.
    pub fn quote_fees(&self, reading: GasReading, rng: &mut dyn Randomness) -> FeeQuote {
        let max_fee_gwei = round_gwei(reading.gwei() * self.config.max_fee_multiplier);
        let priority_gwei = round_gwei(
            rng.uniform_f64(self.config.priority_min_gwei, self.config.priority_max_gwei),
        );

        if priority_gwei > max_fee_gwei {
            self.log.warn(&format!(
                "Priority fee {} gwei is above the max fee {} gwei",
                priority_gwei, max_fee_gwei
            ));
        }

        FeeQuote {
            max_priority_fee_per_gas: gwei_to_wei(priority_gwei),
            max_fee_per_gas: gwei_to_wei(max_fee_gwei),
            priority_gwei,
            max_fee_gwei,
        }
    }
}

/// Convert gwei to wei, rounding to the nearest wei
pub fn gwei_to_wei(gwei: f64) -> u128 {
    (gwei * 1e9).round() as u128
}

/// Round a gwei amount to 7 decimal places
pub fn round_gwei(gwei: f64) -> f64 {
    (gwei * 1e7).round() / 1e7
}
