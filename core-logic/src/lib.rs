//! # Core Logic - Shared Utilities for the Minting Bots
//!
//! This crate provides the chain-agnostic pieces used by every minter binary:
//! configuration, key handling, gas gating, pacing and logging.
//!
//! ## Modules
//!
//! - [`config`] - JSON configuration for a mint run
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - Chain client, logging and randomness seams
//! - [`utils`] - Utility modules (key store, gas gate, pacing, logger, runner)

// Module declarations - internal modules marked pub(crate)
pub mod config;
pub mod error;
pub mod traits;
pub(crate) mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Selective exports - only public API types
pub use config::{DelayWindow, GasSettings, MintConfig, MintSettings};
pub use error::{
    classify_submission_error, ConfigError, CoreError, MintError, NetworkError, WalletError,
    GAS_ESTIMATION_FAILED,
};
pub use traits::{
    ChainClient, Confirmation, GasPriceSource, MintLog, MintStats, Randomness, TxSubmission,
};

// Utils are pub(crate) - only export specific public utilities
pub use utils::{
    setup_logger, FeeQuote, GasConfig, GasGate, GasReading, KeyStore, PacingScheduler,
    PauseReason, PrivateKey, ThreadRandomness, TracingLog, WalletSlot, WorkerRunner,
    MINTER_TARGET, SUCCESS_TARGET,
};
pub use utils::{gwei_to_wei, reorder_by_index, round_gwei};
