//! # Core Error Types
//!
//! Centralized error definitions for the core-logic crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use thiserror::Error;

/// Unified error type for core-logic operations.
///
/// This enum wraps all specific error types and provides a unified
/// error interface for the application layer.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Config(ConfigError),

    #[error(transparent)]
    Wallet(WalletError),

    #[error(transparent)]
    Network(NetworkError),

    #[error(transparent)]
    Mint(MintError),
}

impl From<ConfigError> for CoreError {
    fn from(e: ConfigError) -> Self {
        CoreError::Config(e)
    }
}

impl From<WalletError> for CoreError {
    fn from(e: WalletError) -> Self {
        CoreError::Wallet(e)
    }
}

impl From<NetworkError> for CoreError {
    fn from(e: NetworkError) -> Self {
        CoreError::Network(e)
    }
}

impl From<MintError> for CoreError {
    fn from(e: MintError) -> Self {
        CoreError::Mint(e)
    }
}

/// Configuration-related errors
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Invalid RPC URL format: '{url}'")]
    InvalidRpcUrl { url: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Parse error in {path}: {msg}")]
    ParseError { path: String, msg: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error reading {path}: {msg}")]
    IoError { path: String, msg: String },
}

impl ConfigError {
    /// Maps a file read failure onto `FileNotFound` or `IoError`.
    pub fn from_io(path: &str, err: &std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound {
                path: path.to_string(),
            }
        } else {
            ConfigError::IoError {
                path: path.to_string(),
                msg: err.to_string(),
            }
        }
    }
}

/// Wallet and key handling errors
#[derive(Error, Debug, Clone)]
pub enum WalletError {
    #[error("Order entry #{position} references wallet {index}, but the key file has {total} lines")]
    IndexOutOfRange {
        position: usize,
        index: i64,
        total: usize,
    },

    #[error("Invalid private key on line {line}: {reason}")]
    InvalidKeyFormat { line: usize, reason: String },
}

/// Network and RPC-related errors
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Connection refused to {endpoint}: {reason}")]
    ConnectionRefused { endpoint: String, reason: String },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    #[error("RPC call to {endpoint} failed: {reason}")]
    Rpc { endpoint: String, reason: String },
}

/// Failures of a single mint attempt, and the signals that stop a run.
#[derive(Error, Debug, Clone)]
pub enum MintError {
    #[error("Not enough native balance for the transaction: {reason}")]
    InsufficientFunds { reason: String },

    #[error("Submission failed: {reason}")]
    Submission { reason: String },

    #[error("Gas price still above {ceiling_gwei} gwei after {polls} polls (last: {last_gwei} gwei)")]
    GasWaitExhausted {
        polls: u32,
        ceiling_gwei: f64,
        last_gwei: f64,
    },

    #[error("Run cancelled")]
    Cancelled,
}

/// Prefix chain clients put on errors from the gas estimate that precedes a send.
pub const GAS_ESTIMATION_FAILED: &str = "gas estimation failed";

/// Classifies a raw chain-client error message.
///
/// Node and middleware messages that mean "this wallet cannot pay for gas"
/// become `InsufficientFunds`; everything else is a generic `Submission`.
/// A failed gas estimate counts as the former, since an unfunded wallet
/// usually surfaces there as a bare `execution reverted`.
pub fn classify_submission_error(message: &str) -> MintError {
    let lowered = message.to_lowercase();

    let funds_patterns = [
        "insufficient funds",
        "insufficient balance",
        "gas required exceeds allowance",
        GAS_ESTIMATION_FAILED,
    ];

    if funds_patterns
        .iter()
        .any(|pattern| lowered.contains(pattern))
    {
        MintError::InsufficientFunds {
            reason: message.to_string(),
        }
    } else {
        MintError::Submission {
            reason: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_insufficient_funds() {
        let err = classify_submission_error(
            "(code: -32000, message: insufficient funds for gas * price + value, data: None)",
        );
        assert!(matches!(err, MintError::InsufficientFunds { .. }));

        let err = classify_submission_error("Gas required exceeds allowance (30000000)");
        assert!(matches!(err, MintError::InsufficientFunds { .. }));
    }

    #[test]
    fn test_classify_failed_gas_estimate() {
        let err = classify_submission_error(&format!(
            "{}: (code: 3, message: execution reverted, data: Some(String(\"0x\")))",
            GAS_ESTIMATION_FAILED
        ));
        assert!(matches!(err, MintError::InsufficientFunds { .. }));

        // The same revert from a mined receipt or a send is not a funds signal
        let err = classify_submission_error("(code: 3, message: execution reverted)");
        assert!(matches!(err, MintError::Submission { .. }));
    }

    #[test]
    fn test_classify_generic_submission() {
        let err = classify_submission_error("nonce too low");
        match err {
            MintError::Submission { reason } => assert_eq!(reason, "nonce too low"),
            other => panic!("Expected Submission, got {:?}", other),
        }
    }

    #[test]
    fn test_config_error_from_io() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            ConfigError::from_io("keys.txt", &missing),
            ConfigError::FileNotFound { .. }
        ));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(
            ConfigError::from_io("keys.txt", &denied),
            ConfigError::IoError { .. }
        ));
    }

    #[test]
    fn test_index_error_message() {
        let err = WalletError::IndexOutOfRange {
            position: 2,
            index: 7,
            total: 3,
        };
        assert_eq!(
            err.to_string(),
            "Order entry #2 references wallet 7, but the key file has 3 lines"
        );
    }
}
