//! Transaction submission and confirmation tracking
//!
//! The broadcaster is the only stage with on-chain side effects. It never
//! retries on its own: a second submission of bytes whose first attempt may
//! have landed is how double-spends happen. `SwapError::is_retryable` tells
//! callers which failures are safe to retry themselves.

use crate::error::{Result, SwapError};
use crate::signer::SignedSwap;
use alloy::network::Ethereum;
use alloy::primitives::TxHash;
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::types::TransactionReceipt;
use alloy::transports::{RpcError, TransportError};
use futures::Stream;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::constants::{DEFAULT_CONFIRM_TIMEOUT, RECEIPT_POLL_INTERVAL};

/// Summary of a mined swap transaction
#[derive(Debug, Clone, Serialize)]
pub struct SwapReceipt {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block the transaction was included in
    pub block_number: u64,
    /// Gas actually consumed
    pub gas_used: u64,
    /// Price paid per gas unit in wei
    pub effective_gas_price: u128,
    /// Whether execution succeeded
    pub success: bool,
}

/// Lifecycle of one submission attempt
///
/// `Pending` is entered once the node accepts the raw bytes and is the only
/// non-terminal state; a watch yields it at most once, followed by exactly
/// one terminal event.
#[derive(Debug)]
pub enum SwapStatus {
    /// Accepted by the node, not yet mined
    Pending(TxHash),
    /// Mined and executed successfully
    Confirmed(SwapReceipt),
    /// Rejected, reverted, or not confirmed within the bound
    Failed(SwapError),
}

impl SwapStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SwapStatus::Pending(_))
    }
}

/// Submits raw transactions and tracks them to a terminal state
pub struct Broadcaster {
    provider: Arc<RootProvider<Ethereum>>,
    poll_interval: Duration,
    confirm_timeout: Duration,
}

impl Broadcaster {
    /// Create a broadcaster with the default polling cadence and bound
    pub fn new(provider: Arc<RootProvider<Ethereum>>) -> Self {
        Self {
            provider,
            poll_interval: RECEIPT_POLL_INTERVAL,
            confirm_timeout: DEFAULT_CONFIRM_TIMEOUT,
        }
    }

    /// Override the receipt polling cadence
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Override the confirmation bound used by `submit_and_watch`
    pub fn with_confirm_timeout(mut self, confirm_timeout: Duration) -> Self {
        self.confirm_timeout = confirm_timeout;
        self
    }

    /// Submit the serialized bytes to the node.
    ///
    /// On success the transaction is pending under the returned hash. A
    /// `Network` failure means nothing reached the mempool and no hash ever
    /// existed; a `Rejected` failure means the node looked at the bytes and
    /// refused them.
    pub async fn submit(&self, signed: &SignedSwap) -> Result<TxHash> {
        let pending = self
            .provider
            .send_raw_transaction(signed.raw().as_ref())
            .await
            .map_err(submission_error)?;

        let hash = *pending.tx_hash();
        info!(%hash, nonce = signed.nonce(), "transaction accepted by node");
        Ok(hash)
    }

    /// Poll for the receipt until `timeout`.
    ///
    /// `Timeout` does not mean the transaction will not mine; it may still
    /// be sitting underpriced in the mempool. Call this again (or inspect
    /// the node directly) before treating the transaction as gone.
    pub async fn wait_for_receipt(&self, hash: TxHash, timeout: Duration) -> Result<SwapReceipt> {
        let started = Instant::now();

        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(hash)
                .await
                .map_err(|e| SwapError::Network(e.to_string()))?;

            // a receipt without a block number is not mined yet
            if let Some(summary) = receipt.as_ref().and_then(summarize) {
                if !summary.success {
                    return Err(SwapError::Reverted {
                        tx_hash: hash,
                        block_number: summary.block_number,
                    });
                }
                info!(%hash, block = summary.block_number, "transaction confirmed");
                return Ok(summary);
            }

            if started.elapsed() >= timeout {
                return Err(SwapError::Timeout {
                    operation: "transaction confirmation".into(),
                    waited_secs: started.elapsed().as_secs(),
                });
            }

            debug!(%hash, "no receipt yet");
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Subscription-style lifecycle: `Pending(hash)` once the node accepts
    /// the bytes, then exactly one terminal event. If submission itself
    /// fails, the stream yields only `Failed` and no hash is ever produced.
    pub fn submit_and_watch(&self, signed: SignedSwap) -> impl Stream<Item = SwapStatus> + '_ {
        enum Watch {
            Submit(Box<SignedSwap>),
            Await(TxHash),
            Done,
        }

        futures::stream::unfold(Watch::Submit(Box::new(signed)), move |state| async move {
            match state {
                Watch::Submit(signed) => match self.submit(&signed).await {
                    Ok(hash) => Some((SwapStatus::Pending(hash), Watch::Await(hash))),
                    Err(err) => Some((SwapStatus::Failed(err), Watch::Done)),
                },
                Watch::Await(hash) => {
                    let status = match self.wait_for_receipt(hash, self.confirm_timeout).await {
                        Ok(receipt) => SwapStatus::Confirmed(receipt),
                        Err(err) => SwapStatus::Failed(err),
                    };
                    Some((status, Watch::Done))
                }
                Watch::Done => None,
            }
        })
    }
}

/// Split "the node refused the bytes" from "the node was never reached"
fn submission_error(err: TransportError) -> SwapError {
    match err {
        RpcError::ErrorResp(payload) => SwapError::Rejected(format!(
            "{} (code {})",
            payload.message, payload.code
        )),
        other => SwapError::Network(other.to_string()),
    }
}

fn summarize(receipt: &TransactionReceipt) -> Option<SwapReceipt> {
    let block_number = receipt.block_number?;
    Some(SwapReceipt {
        tx_hash: receipt.transaction_hash,
        block_number,
        gas_used: receipt.gas_used,
        effective_gas_price: receipt.effective_gas_price,
        success: receipt.status(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::rpc::json_rpc::ErrorPayload;
    use alloy::transports::TransportErrorKind;

    #[test]
    fn test_terminal_states() {
        assert!(!SwapStatus::Pending(TxHash::ZERO).is_terminal());
        assert!(SwapStatus::Failed(SwapError::Rejected("nonce too low".into())).is_terminal());
        assert!(SwapStatus::Confirmed(SwapReceipt {
            tx_hash: TxHash::ZERO,
            block_number: 1,
            gas_used: 21_000,
            effective_gas_price: 20_000_000_000,
            success: true,
        })
        .is_terminal());
    }

    #[test]
    fn test_node_refusal_classifies_as_rejected() {
        let err = RpcError::ErrorResp(ErrorPayload {
            code: -32000,
            message: "nonce too low".into(),
            data: None,
        });
        match submission_error(err) {
            SwapError::Rejected(reason) => assert!(reason.contains("nonce too low")),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_unreachable_endpoint_classifies_as_network() {
        let err: TransportError = TransportErrorKind::custom_str("connection refused");
        let classified = submission_error(err);
        assert!(matches!(classified, SwapError::Network(_)));
        assert!(classified.is_retryable());
    }

    #[test]
    fn test_receipt_summary_serializes() {
        let summary = SwapReceipt {
            tx_hash: TxHash::ZERO,
            block_number: 19_000_000,
            gas_used: 134_211,
            effective_gas_price: 22_000_000_000,
            success: true,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["block_number"], 19_000_000);
        assert_eq!(json["success"], true);
    }
}
