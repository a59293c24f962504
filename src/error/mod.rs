//! Error types and handling module.
//!
//! Defines all application-specific error types and conversions.

use std::time::Duration;

use alloy::primitives::TxHash;
use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors (missing network, missing chain, bad file).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The endpoint is serving a different chain than the network expects.
    #[error("Chain ID mismatch for network {network}: expected {expected}, got {actual}")]
    ConfigMismatch { network: String, expected: u64, actual: u64 },

    /// The RPC endpoint is unreachable or the connection dropped.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The node answered, but with an error payload or unexpected data.
    #[error("Ethereum RPC error: {0}")]
    Rpc(String),

    /// Malformed private key or missing signer.
    #[error("Key error: {0}")]
    Key(String),

    /// Transaction rejected on submission, or mined with a failure status.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// No receipt was observed before the deadline.
    #[error("Timed out after {}s waiting for transaction {tx_hash}", timeout.as_secs())]
    Timeout { tx_hash: TxHash, timeout: Duration },

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl AppError {
    /// Prefix the error message with the action that failed, keeping its kind.
    pub fn context(self, action: &str) -> Self {
        match self {
            AppError::Config(msg) => AppError::Config(format!("{action}: {msg}")),
            AppError::Connection(msg) => AppError::Connection(format!("{action}: {msg}")),
            AppError::Rpc(msg) => AppError::Rpc(format!("{action}: {msg}")),
            AppError::Key(msg) => AppError::Key(format!("{action}: {msg}")),
            AppError::Transaction(msg) => AppError::Transaction(format!("{action}: {msg}")),
            AppError::Parse(msg) => AppError::Parse(format!("{action}: {msg}")),
            other => other,
        }
    }
}

impl From<alloy::transports::TransportError> for AppError {
    fn from(err: alloy::transports::TransportError) -> Self {
        if err.as_error_resp().is_some() {
            AppError::Rpc(err.to_string())
        } else {
            AppError::Connection(err.to_string())
        }
    }
}

impl From<alloy::contract::Error> for AppError {
    fn from(err: alloy::contract::Error) -> Self {
        match err {
            alloy::contract::Error::TransportError(e) => e.into(),
            other => AppError::Rpc(other.to_string()),
        }
    }
}

impl From<alloy::providers::PendingTransactionError> for AppError {
    fn from(err: alloy::providers::PendingTransactionError) -> Self {
        AppError::Connection(err.to_string())
    }
}

impl From<alloy::signers::local::LocalSignerError> for AppError {
    fn from(err: alloy::signers::local::LocalSignerError) -> Self {
        AppError::Key(err.to_string())
    }
}

impl From<alloy::signers::Error> for AppError {
    fn from(err: alloy::signers::Error) -> Self {
        AppError::Key(err.to_string())
    }
}

impl From<alloy::hex::FromHexError> for AppError {
    fn from(err: alloy::hex::FromHexError) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
