//! Gas estimation for pending swap calls
//!
//! Simulation happens here, against current chain state and without
//! consuming a nonce. A revert reported by the node kills the request before
//! anything reaches the signer.

use crate::constants::{GAS_LIMIT_BUFFER_PERCENT, GAS_PRICE_BUFFER_PERCENT};
use crate::encoder::EncodedCall;
use crate::error::{Result, SwapError};
use alloy::network::{Ethereum, TransactionBuilder as _};
use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::{RpcError, TransportError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Point-in-time gas quote
///
/// Not enforced by the chain, but stale quotes underprice transactions, so
/// the builder checks `is_stale` before using one.
#[derive(Debug, Clone)]
pub struct GasQuote {
    /// Limit reported by the node's simulation
    pub estimated_limit: u64,
    /// Buffered limit the transaction will carry; never below the estimate
    pub gas_limit: u64,
    /// Buffered legacy gas price in wei
    pub gas_price_wei: u128,
    fetched_at: Instant,
}

impl GasQuote {
    pub(crate) fn new(estimated_limit: u64, gas_limit: u64, gas_price_wei: u128) -> Self {
        Self {
            estimated_limit,
            gas_limit,
            gas_price_wei,
            fetched_at: Instant::now(),
        }
    }

    /// Time elapsed since the quote was fetched
    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    /// Whether the quote is too old to price a transaction
    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.age() > max_age
    }

    /// Worst-case wei the sender must hold: value plus gas_limit x gas_price
    pub fn max_cost(&self, value: U256) -> U256 {
        value + U256::from(self.gas_limit) * U256::from(self.gas_price_wei)
    }
}

/// Gas estimator with a buffer policy over the node's numbers
#[derive(Debug, Clone)]
pub struct GasEstimator {
    /// Buffer percentage for the gas limit (e.g. 20 = 20% headroom)
    gas_limit_buffer_percent: u64,
    /// Buffer percentage for the gas price
    gas_price_buffer_percent: u64,
}

impl GasEstimator {
    /// Create an estimator with the default buffers
    pub fn new() -> Self {
        Self {
            gas_limit_buffer_percent: GAS_LIMIT_BUFFER_PERCENT,
            gas_price_buffer_percent: GAS_PRICE_BUFFER_PERCENT,
        }
    }

    /// Override the buffer percentages
    pub fn with_buffers(limit_percent: u64, price_percent: u64) -> Self {
        Self {
            gas_limit_buffer_percent: limit_percent,
            gas_price_buffer_percent: price_percent,
        }
    }

    /// Simulate the call and fetch a fresh gas price.
    ///
    /// The gas price is read on every call, never cached across requests.
    /// A simulation revert maps to `Estimation` and short-circuits the
    /// pipeline; only transport failures map to `Network`.
    pub async fn estimate(
        &self,
        provider: &RootProvider<Ethereum>,
        call: &EncodedCall,
        from: Address,
        to: Address,
    ) -> Result<GasQuote> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_value(call.value)
            .with_input(call.calldata.clone());

        let estimated_limit = provider.estimate_gas(tx).await.map_err(estimation_error)?;
        let gas_price = provider.get_gas_price().await.map_err(network_error)?;

        let quote = GasQuote::new(
            estimated_limit,
            buffered_limit(estimated_limit, self.gas_limit_buffer_percent),
            buffered_price(gas_price, self.gas_price_buffer_percent),
        );
        debug!(
            estimated = quote.estimated_limit,
            gas_limit = quote.gas_limit,
            gas_price_wei = quote.gas_price_wei,
            "gas quote"
        );
        Ok(quote)
    }
}

impl Default for GasEstimator {
    fn default() -> Self {
        Self::new()
    }
}

fn buffered_limit(limit: u64, percent: u64) -> u64 {
    limit + limit / 100 * percent
}

fn buffered_price(price: u128, percent: u64) -> u128 {
    price + price / 100 * percent as u128
}

/// A JSON-RPC error payload from eth_estimateGas is the node rejecting the
/// simulated execution; anything else never reached a verdict.
pub(crate) fn estimation_error(err: TransportError) -> SwapError {
    match err {
        RpcError::ErrorResp(payload) => SwapError::Estimation(format!(
            "simulation rejected: {} (code {})",
            payload.message, payload.code
        )),
        other => SwapError::Network(other.to_string()),
    }
}

pub(crate) fn network_error(err: TransportError) -> SwapError {
    SwapError::Network(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::rpc::json_rpc::ErrorPayload;

    fn quote(fetched_at: Instant) -> GasQuote {
        GasQuote {
            estimated_limit: 100_000,
            gas_limit: 120_000,
            gas_price_wei: 22_000_000_000,
            fetched_at,
        }
    }

    #[test]
    fn test_buffered_limit_never_below_estimate() {
        assert_eq!(buffered_limit(100_000, 20), 120_000);
        assert_eq!(buffered_limit(100_000, 0), 100_000);
        for estimate in [21_000u64, 100_000, 1_234_567] {
            assert!(buffered_limit(estimate, GAS_LIMIT_BUFFER_PERCENT) >= estimate);
        }
    }

    #[test]
    fn test_buffered_price() {
        assert_eq!(buffered_price(20_000_000_000, 10), 22_000_000_000);
    }

    #[test]
    fn test_staleness() {
        let fresh = quote(Instant::now());
        assert!(!fresh.is_stale(Duration::from_secs(30)));

        let old = quote(Instant::now() - Duration::from_secs(60));
        assert!(old.is_stale(Duration::from_secs(30)));
    }

    #[test]
    fn test_max_cost() {
        let q = quote(Instant::now());
        let value = U256::from(1_000u64);
        let expected = value + U256::from(120_000u64) * U256::from(22_000_000_000u128);
        assert_eq!(q.max_cost(value), expected);
    }

    #[test]
    fn test_revert_classifies_as_estimation_error() {
        let err = RpcError::ErrorResp(ErrorPayload {
            code: 3,
            message: "execution reverted: UniswapV2Router: EXPIRED".into(),
            data: None,
        });
        match estimation_error(err) {
            SwapError::Estimation(message) => assert!(message.contains("EXPIRED")),
            other => panic!("expected Estimation, got {other:?}"),
        }
    }

    #[test]
    fn test_transport_failure_classifies_as_network_error() {
        let err: TransportError = alloy::transports::TransportErrorKind::custom_str(
            "connection refused",
        );
        assert!(matches!(estimation_error(err), SwapError::Network(_)));
    }
}
