use crate::error::{MintError, NetworkError, WalletError};
use crate::utils::{FeeQuote, PrivateKey};
use async_trait::async_trait;

/// Per-run counters, logged once by the runner when the orchestrator returns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MintStats {
    pub wallets: u64,
    pub confirmed: u64,
    pub failed: u64,
    /// Wallets whose remaining attempts were dropped for lack of funds.
    pub abandoned_wallets: u64,
    /// Wallets whose key could not be turned into a signer.
    pub skipped_wallets: u64,
}

impl MintStats {
    pub fn attempts(&self) -> u64 {
        self.confirmed + self.failed
    }
}

/// Handle returned once a transaction has been accepted by the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxSubmission {
    /// 0x-prefixed transaction hash.
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_hash: String,
    pub block_number: u64,
    pub success: bool,
}

/// Anything that can report the current network gas price.
#[async_trait]
pub trait GasPriceSource: Send + Sync {
    /// Current gas price in wei.
    async fn gas_price_wei(&self) -> Result<u128, NetworkError>;
}

/// Chain access needed by the mint loop. One connection is reused for the whole run.
#[async_trait]
pub trait ChainClient: GasPriceSource {
    /// Signing identity bound to one wallet.
    type Signer: Send + Sync;

    /// Derives the signing identity for a key read from `line` of the key file.
    fn signer(&self, key: &PrivateKey, line: usize) -> Result<Self::Signer, WalletError>;

    /// Sends one purchase call for `quantity` items with the given fee caps.
    async fn submit_purchase(
        &self,
        signer: &Self::Signer,
        quantity: u64,
        fees: &FeeQuote,
    ) -> Result<TxSubmission, MintError>;

    /// Waits until the submission is mined.
    async fn await_confirmation(&self, submission: &TxSubmission)
        -> Result<Confirmation, MintError>;
}

/// Leveled log sink handed to the orchestrator.
pub trait MintLog: Send + Sync {
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn success(&self, message: &str);
}

/// Source of the random draws used for fees, repetitions and pacing.
pub trait Randomness: Send {
    /// Uniform integer in `[min, max]`.
    fn uniform_u64(&mut self, min: u64, max: u64) -> u64;

    /// Uniform float in `[low, high)`.
    fn uniform_f64(&mut self, low: f64, high: f64) -> f64;
}
