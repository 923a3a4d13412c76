//! # Utilities Module
//!
//! Internal utility modules for the core-logic crate.
//! These modules are marked as `pub(crate)` to enforce API boundaries.

// Internal modules - not part of public API
pub(crate) mod gas;
pub(crate) mod key_store;
pub(crate) mod logger;
pub(crate) mod pacing;
pub(crate) mod random;
pub(crate) mod runner;

// Selective exports - only public utilities
pub use gas::{gwei_to_wei, round_gwei, FeeQuote, GasConfig, GasGate, GasReading};
pub use key_store::{reorder_by_index, KeyStore, PrivateKey, WalletSlot};
pub use logger::{setup_logger, TracingLog, MINTER_TARGET, SUCCESS_TARGET};
pub use pacing::{PacingScheduler, PauseReason};
pub use random::ThreadRandomness;
pub use runner::WorkerRunner;
