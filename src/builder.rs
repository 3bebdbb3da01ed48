//! Unsigned transaction assembly
//!
//! Pulls the sender's pending nonce and balance immediately before the
//! signer runs, keeping the window for a concurrent transaction from the
//! same key as small as possible.

use crate::constants::DEFAULT_QUOTE_MAX_AGE;
use crate::encoder::EncodedCall;
use crate::error::{Result, SwapError};
use crate::gas::{network_error, GasQuote};
use alloy::consensus::TxLegacy;
use alloy::network::Ethereum;
use alloy::primitives::{Address, TxKind, U256};
use alloy::providers::{Provider, RootProvider};
use alloy::transports::{RpcError, TransportError};
use std::time::Duration;
use tracing::debug;

/// Assembles EIP-155 legacy transactions from a quote and an encoded call
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    chain_id: u64,
    quote_max_age: Duration,
}

impl TransactionBuilder {
    /// Create a builder for the given chain
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            quote_max_age: DEFAULT_QUOTE_MAX_AGE,
        }
    }

    /// Override how old a gas quote may be before it must be re-fetched
    pub fn with_quote_max_age(mut self, max_age: Duration) -> Self {
        self.quote_max_age = max_age;
        self
    }

    /// Fetch the sender's pending nonce and balance, then assemble.
    ///
    /// Callers coordinating several in-flight transactions from one key pass
    /// their reserved `nonce`; everyone else leaves it to the pending-tagged
    /// on-chain count read here.
    pub async fn build(
        &self,
        provider: &RootProvider<Ethereum>,
        call: &EncodedCall,
        quote: &GasQuote,
        from: Address,
        to: Address,
        nonce: Option<u64>,
    ) -> Result<TxLegacy> {
        if quote.is_stale(self.quote_max_age) {
            return Err(SwapError::InvalidParameter(format!(
                "gas quote is {}s old; re-estimate before building",
                quote.age().as_secs()
            )));
        }

        let nonce = match nonce {
            Some(n) => n,
            None => provider
                .get_transaction_count(from)
                .pending()
                .await
                .map_err(nonce_error)?,
        };
        let balance = provider.get_balance(from).await.map_err(network_error)?;
        debug!(nonce, %balance, "assembling transaction");

        self.assemble(call, quote, nonce, to, balance)
    }

    /// Budget check and field mapping. The chain re-checks the balance
    /// authoritatively at broadcast; this catches obvious shortfalls first.
    fn assemble(
        &self,
        call: &EncodedCall,
        quote: &GasQuote,
        nonce: u64,
        to: Address,
        balance: U256,
    ) -> Result<TxLegacy> {
        let required = quote.max_cost(call.value);
        if balance < required {
            return Err(SwapError::InvalidParameter(format!(
                "sender balance {balance} wei is below the {required} wei needed for value plus gas"
            )));
        }

        Ok(TxLegacy {
            chain_id: Some(self.chain_id),
            nonce,
            gas_price: quote.gas_price_wei,
            gas_limit: quote.gas_limit,
            to: TxKind::Call(to),
            value: call.value,
            input: call.calldata.clone(),
        })
    }
}

fn nonce_error(err: TransportError) -> SwapError {
    match err {
        RpcError::ErrorResp(payload) => {
            SwapError::Network(format!("nonce query rejected: {}", payload.message))
        }
        other => SwapError::Network(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode_swap;
    use crate::types::SwapRequest;

    fn sample_call() -> EncodedCall {
        let request = SwapRequest::eth_for_tokens(
            U256::from(1_000_000_000_000_000u64),
            vec![Address::repeat_byte(0xaa), Address::repeat_byte(0xbb)],
            Address::repeat_byte(0xcc),
        )
        .with_deadline(1_900_000_000);
        encode_swap(&request).unwrap()
    }

    fn sample_quote() -> GasQuote {
        GasQuote::new(100_000, 120_000, 20_000_000_000)
    }

    #[test]
    fn test_assemble_maps_fields() {
        let builder = TransactionBuilder::new(5);
        let call = sample_call();
        let quote = sample_quote();
        let router = Address::repeat_byte(0x77);

        let tx = builder
            .assemble(&call, &quote, 42, router, U256::MAX)
            .unwrap();

        assert_eq!(tx.chain_id, Some(5));
        assert_eq!(tx.nonce, 42);
        assert_eq!(tx.gas_limit, quote.gas_limit);
        assert!(tx.gas_limit >= quote.estimated_limit);
        assert_eq!(tx.gas_price, quote.gas_price_wei);
        assert_eq!(tx.to, TxKind::Call(router));
        assert_eq!(tx.value, call.value);
        assert_eq!(tx.input, call.calldata);
    }

    #[test]
    fn test_assemble_rejects_insufficient_balance() {
        let builder = TransactionBuilder::new(5);
        let call = sample_call();
        let quote = sample_quote();

        // one wei short of value + gas_limit * gas_price
        let balance = quote.max_cost(call.value) - U256::from(1u64);
        let result = builder.assemble(&call, &quote, 0, Address::repeat_byte(0x77), balance);
        assert!(matches!(result, Err(SwapError::InvalidParameter(_))));
    }

    #[test]
    fn test_assemble_accepts_exact_budget() {
        let builder = TransactionBuilder::new(5);
        let call = sample_call();
        let quote = sample_quote();

        let balance = quote.max_cost(call.value);
        assert!(builder
            .assemble(&call, &quote, 0, Address::repeat_byte(0x77), balance)
            .is_ok());
    }
}
