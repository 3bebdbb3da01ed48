//! Network configuration
//!
//! Chain identity, endpoint, and router addresses arrive from the caller or
//! the environment; nothing here is baked in. A missing or malformed value
//! is a `Config` error raised before any network traffic.

use crate::constants::{DEFAULT_CONFIRM_TIMEOUT, RECEIPT_POLL_INTERVAL};
use crate::error::{Result, SwapError};
use alloy::primitives::Address;
use alloy::transports::http::reqwest::Url;
use std::time::Duration;

/// Network configuration for the swap pipeline
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// EIP-155 chain id signed into every transaction
    pub chain_id: u64,
    /// JSON-RPC endpoint URL
    pub rpc_url: String,
    /// AMM router contract address
    pub router: Address,
    /// Wrapped native token; when set, ETH-in paths are checked against it
    pub weth: Option<Address>,
    /// Abort before signing when the fresh gas price exceeds this
    pub max_gas_price_wei: Option<u128>,
    /// Receipt polling cadence
    pub receipt_poll_interval: Duration,
    /// How long `swap` waits for a confirmation
    pub confirm_timeout: Duration,
}

impl NetworkConfig {
    /// Create a configuration from explicit values
    pub fn new(chain_id: u64, rpc_url: impl Into<String>, router: Address) -> Self {
        Self {
            chain_id,
            rpc_url: rpc_url.into(),
            router,
            weth: None,
            max_gas_price_wei: None,
            receipt_poll_interval: RECEIPT_POLL_INTERVAL,
            confirm_timeout: DEFAULT_CONFIRM_TIMEOUT,
        }
    }

    /// Load configuration from the environment.
    ///
    /// `PROVIDER_URL`, `CHAIN_ID` and `ROUTER_ADDRESS` are required;
    /// `WETH_ADDRESS` and `MAX_GAS_PRICE_WEI` are optional.
    pub fn from_env() -> Result<Self> {
        let rpc_url = require_env("PROVIDER_URL")?;
        rpc_url
            .parse::<Url>()
            .map_err(|_| SwapError::Config("PROVIDER_URL is not a valid URL".into()))?;

        let chain_id: u64 = require_env("CHAIN_ID")?
            .parse()
            .map_err(|_| SwapError::Config("CHAIN_ID is not a decimal chain id".into()))?;
        if chain_id == 0 {
            return Err(SwapError::Config("CHAIN_ID must be non-zero".into()));
        }

        let router = parse_address(&require_env("ROUTER_ADDRESS")?, "ROUTER_ADDRESS")?;

        let weth = match std::env::var("WETH_ADDRESS") {
            Ok(value) => Some(parse_address(&value, "WETH_ADDRESS")?),
            Err(_) => None,
        };
        let max_gas_price_wei = match std::env::var("MAX_GAS_PRICE_WEI") {
            Ok(value) => Some(value.parse().map_err(|_| {
                SwapError::Config("MAX_GAS_PRICE_WEI is not a decimal wei amount".into())
            })?),
            Err(_) => None,
        };

        let mut config = Self::new(chain_id, rpc_url, router);
        config.weth = weth;
        config.max_gas_price_wei = max_gas_price_wei;
        Ok(config)
    }

    /// Set the wrapped native token address
    pub fn with_weth(mut self, weth: Address) -> Self {
        self.weth = Some(weth);
        self
    }

    /// Set a gas price ceiling in wei
    pub fn with_max_gas_price_wei(mut self, ceiling: u128) -> Self {
        self.max_gas_price_wei = Some(ceiling);
        self
    }

    /// Set the confirmation bound used by `swap`
    pub fn with_confirm_timeout(mut self, timeout: Duration) -> Self {
        self.confirm_timeout = timeout;
        self
    }

    /// Set the receipt polling cadence
    pub fn with_receipt_poll_interval(mut self, interval: Duration) -> Self {
        self.receipt_poll_interval = interval;
        self
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| SwapError::Config(format!("{name} must be set")))
}

fn parse_address(value: &str, name: &str) -> Result<Address> {
    value
        .parse()
        .map_err(|_| SwapError::Config(format!("{name} is not a valid address")))
}

#[cfg(test)]
mod tests {
    use super::*;

    // one test so the fixed variable names are never touched concurrently
    #[test]
    fn test_from_env() {
        std::env::remove_var("PROVIDER_URL");
        std::env::remove_var("CHAIN_ID");
        std::env::remove_var("ROUTER_ADDRESS");
        std::env::remove_var("WETH_ADDRESS");
        std::env::remove_var("MAX_GAS_PRICE_WEI");

        // missing endpoint fails before anything else
        match NetworkConfig::from_env() {
            Err(SwapError::Config(message)) => assert!(message.contains("PROVIDER_URL")),
            other => panic!("expected Config error, got {other:?}"),
        }

        std::env::set_var("PROVIDER_URL", "http://localhost:8545");
        std::env::set_var("CHAIN_ID", "5");
        std::env::set_var(
            "ROUTER_ADDRESS",
            "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D",
        );

        let config = NetworkConfig::from_env().unwrap();
        assert_eq!(config.chain_id, 5);
        assert_eq!(config.weth, None);
        assert_eq!(config.confirm_timeout, DEFAULT_CONFIRM_TIMEOUT);

        std::env::set_var("CHAIN_ID", "goerli");
        assert!(matches!(
            NetworkConfig::from_env(),
            Err(SwapError::Config(_))
        ));

        std::env::remove_var("PROVIDER_URL");
        std::env::remove_var("CHAIN_ID");
        std::env::remove_var("ROUTER_ADDRESS");
    }

    #[test]
    fn test_builder_setters() {
        let config = NetworkConfig::new(
            1,
            "http://localhost:8545",
            Address::repeat_byte(0x77),
        )
        .with_weth(Address::repeat_byte(0x88))
        .with_max_gas_price_wei(50_000_000_000)
        .with_confirm_timeout(Duration::from_secs(30));

        assert_eq!(config.weth, Some(Address::repeat_byte(0x88)));
        assert_eq!(config.max_gas_price_wei, Some(50_000_000_000));
        assert_eq!(config.confirm_timeout, Duration::from_secs(30));
    }
}
