//! Error types for the swap pipeline
//!
//! Every failure class a consumer needs to tell apart gets its own variant;
//! no variant ever carries key material.

use alloy::primitives::TxHash;
use thiserror::Error;

/// Main error type for the SDK
#[derive(Error, Debug)]
pub enum SwapError {
    /// Missing or malformed startup configuration. Raised before any network
    /// call is attempted.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request cannot be turned into valid calldata. No network call is
    /// made for such a request.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The node's simulation rejected the call, typically an on-chain revert
    /// (expired deadline, insufficient output, bad path). Caught before
    /// anything is signed.
    #[error("gas estimation failed: {0}")]
    Estimation(String),

    /// A builder-stage check failed: stale gas quote, budget exceeded, or a
    /// gas price above the configured ceiling.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Bad key material or digest computation failure, before any network
    /// write.
    #[error("signing error: {0}")]
    Signing(String),

    /// The endpoint could not be reached or the transport failed. Safe for
    /// the caller to retry with backoff; the SDK never retries a broadcast
    /// on its own.
    #[error("network error: {0}")]
    Network(String),

    /// The node accepted the connection but refused the raw bytes (bad
    /// nonce, underpriced, insufficient funds).
    #[error("transaction rejected by node: {0}")]
    Rejected(String),

    /// Mined but execution reverted. Terminal; resubmitting the same
    /// parameters will burn gas again.
    #[error("transaction {tx_hash} reverted in block {block_number}")]
    Reverted { tx_hash: TxHash, block_number: u64 },

    /// The confirmation bound elapsed without a receipt. Ambiguous: the
    /// transaction may still mine, so query the node again before acting.
    #[error("timed out waiting for {operation} after {waited_secs}s")]
    Timeout { operation: String, waited_secs: u64 },
}

impl SwapError {
    /// Whether the caller may retry the operation that produced this error
    /// without risking a double submission.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SwapError::Network(_) | SwapError::Timeout { .. })
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SwapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(SwapError::Network("connection refused".into()).is_retryable());
        assert!(SwapError::Timeout {
            operation: "transaction confirmation".into(),
            waited_secs: 120,
        }
        .is_retryable());

        assert!(!SwapError::Rejected("nonce too low".into()).is_retryable());
        assert!(!SwapError::Estimation("execution reverted".into()).is_retryable());
        assert!(!SwapError::Reverted {
            tx_hash: TxHash::ZERO,
            block_number: 1,
        }
        .is_retryable());
    }
}
