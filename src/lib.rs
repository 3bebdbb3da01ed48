//! AMM swap SDK for Rust
//!
//! Submits exact-input swaps to UniswapV2-style routers on EVM-compatible
//! chains through an explicit pipeline: encode the router call, estimate gas
//! against current chain state, assemble an EIP-155 legacy transaction, sign
//! it locally, broadcast the raw bytes and track them to a receipt.
//!
//! Stages run strictly in order and any failure aborts the whole request:
//! a revert caught during estimation never reaches the signer, and a signed
//! transaction is never silently rebuilt under a fresh nonce.
//!
//! # Example
//!
//! ```rust,ignore
//! use ammswap_sdk::{constants, LocalSigner, NetworkConfig, SwapClient, SwapRequest};
//!
//! #[tokio::main]
//! async fn main() -> eyre::Result<()> {
//!     // PROVIDER_URL, PRIVATE_KEY, CHAIN_ID, ROUTER_ADDRESS from the environment
//!     let config = NetworkConfig::from_env()?;
//!     let signer = LocalSigner::from_env()?;
//!     let client = SwapClient::new(signer, config)?;
//!
//!     let weth = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse()?;
//!     let token = "0x6B175474E89094C44Da98b954EedeAC495271d0F".parse()?;
//!
//!     let request = SwapRequest::eth_for_tokens(
//!         constants::scale_eth(0.05),
//!         vec![weth, token],
//!         client.address(),
//!     );
//!     let receipt = client.swap(request).await?;
//!     println!("mined in block {}", receipt.block_number);
//!     Ok(())
//! }
//! ```

pub mod broadcast;
pub mod builder;
pub mod client;
pub mod config;
pub mod constants;
pub mod contracts;
pub mod encoder;
pub mod error;
pub mod gas;
pub mod signer;
pub mod types;

// Re-export main types for convenience
pub use broadcast::{Broadcaster, SwapReceipt, SwapStatus};
pub use builder::TransactionBuilder;
pub use client::SwapClient;
pub use config::NetworkConfig;
pub use encoder::{encode_swap, EncodedCall};
pub use error::{Result, SwapError};
pub use gas::{GasEstimator, GasQuote};
pub use signer::{LocalSigner, SignedSwap, TransactionSigner};
pub use types::{SwapKind, SwapRequest};
