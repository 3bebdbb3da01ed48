//! SwapClient - main entry point for the SDK

use crate::broadcast::{Broadcaster, SwapReceipt, SwapStatus};
use crate::builder::TransactionBuilder;
use crate::config::NetworkConfig;
use crate::contracts::IERC20;
use crate::encoder::{encode_swap, EncodedCall};
use crate::error::{Result, SwapError};
use crate::gas::{network_error, GasEstimator};
use crate::signer::{SignedSwap, TransactionSigner};
use crate::types::{SwapKind, SwapRequest};
use alloy::network::{Ethereum, TransactionBuilder as _};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::sol_types::SolCall;
use alloy::transports::http::reqwest::Url;
use futures::Stream;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Type alias for the read-only provider
type ReadProvider = Arc<RootProvider<Ethereum>>;

/// Main client for submitting swaps
///
/// A request-scoped context: the RPC client, the signer handle, and the
/// router configuration are injected here once and passed explicitly through
/// every pipeline stage. Stages run strictly in order per request; each
/// depends on the previous stage's output.
pub struct SwapClient<S: TransactionSigner> {
    signer: S,
    config: NetworkConfig,
    provider: ReadProvider,
    estimator: GasEstimator,
    builder: TransactionBuilder,
    broadcaster: Broadcaster,
}

impl<S: TransactionSigner> SwapClient<S> {
    /// Create a new SwapClient
    pub fn new(signer: S, config: NetworkConfig) -> Result<Self> {
        let url: Url = config
            .rpc_url
            .parse()
            .map_err(|_| SwapError::Config("rpc url is not a valid URL".into()))?;

        // No fillers: nonce, gas and signing are explicit pipeline stages
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .network::<Ethereum>()
            .connect_http(url);
        let provider: ReadProvider = Arc::new(provider);

        let broadcaster = Broadcaster::new(provider.clone())
            .with_poll_interval(config.receipt_poll_interval)
            .with_confirm_timeout(config.confirm_timeout);

        Ok(Self {
            signer,
            builder: TransactionBuilder::new(config.chain_id),
            estimator: GasEstimator::new(),
            broadcaster,
            provider,
            config,
        })
    }

    /// Get the signer's address
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the network configuration
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    // ========== Swap pipeline ==========

    /// Run the full pipeline and wait for the receipt: encode, estimate,
    /// build, sign, broadcast, confirm.
    ///
    /// Returns the mined receipt summary, or the first error on the way
    /// there; a revert during estimation aborts before anything is signed.
    pub async fn swap(&self, request: SwapRequest) -> Result<SwapReceipt> {
        let signed = self.prepare_swap(&request).await?;
        let hash = self.broadcaster.submit(&signed).await?;
        self.wait(hash, self.config.confirm_timeout).await
    }

    /// Run the pipeline through signing, then return a lifecycle stream:
    /// `Pending(hash)` once the node accepts the bytes, then exactly one
    /// terminal `Confirmed` or `Failed` event.
    pub async fn swap_with_events(
        &self,
        request: SwapRequest,
    ) -> Result<impl Stream<Item = SwapStatus> + '_> {
        let signed = self.prepare_swap(&request).await?;
        Ok(self.broadcaster.submit_and_watch(signed))
    }

    /// Encode, estimate, build and sign without broadcasting.
    ///
    /// Everything up to here can be abandoned with no on-chain effect. Once
    /// signed, the transaction must not be rebuilt under a fresh nonce and
    /// resubmitted unless the first broadcast is known to have gone nowhere.
    pub async fn prepare_swap(&self, request: &SwapRequest) -> Result<SignedSwap> {
        self.prepare_swap_with_nonce(request, None).await
    }

    /// Like [`Self::prepare_swap`], but with a caller-reserved nonce for
    /// setups where several transactions from one key are in flight and a
    /// single authority hands out nonces.
    pub async fn prepare_swap_with_nonce(
        &self,
        request: &SwapRequest,
        nonce: Option<u64>,
    ) -> Result<SignedSwap> {
        self.check_weth_path(request)?;

        if let Some(token) = request.input_token() {
            self.ensure_router_allowance(token, request.amount_in_wei)
                .await?;
        }

        let call = encode_swap(request)?;
        debug!(
            selector = %Bytes::from(call.selector.to_vec()),
            calldata_len = call.calldata.len(),
            "encoded swap call"
        );

        self.prepare_call(self.config.router, call, nonce).await
    }

    /// Broadcast a previously signed transaction
    pub async fn submit(&self, signed: &SignedSwap) -> Result<TxHash> {
        self.broadcaster.submit(signed).await
    }

    /// Wait for a receipt within `timeout`.
    ///
    /// A `Timeout` is ambiguous, the transaction may still mine. Call this
    /// again before concluding it was dropped.
    pub async fn wait(&self, hash: TxHash, timeout: Duration) -> Result<SwapReceipt> {
        self.broadcaster.wait_for_receipt(hash, timeout).await
    }

    /// Shared tail of the pipeline: estimate, build, sign.
    async fn prepare_call(
        &self,
        to: Address,
        call: EncodedCall,
        nonce: Option<u64>,
    ) -> Result<SignedSwap> {
        let quote = self
            .estimator
            .estimate(&self.provider, &call, self.address(), to)
            .await?;

        if let Some(ceiling) = self.config.max_gas_price_wei {
            if quote.gas_price_wei > ceiling {
                return Err(SwapError::InvalidParameter(format!(
                    "gas price {} wei exceeds the configured ceiling of {} wei",
                    quote.gas_price_wei, ceiling
                )));
            }
        }

        let tx = self
            .builder
            .build(&self.provider, &call, &quote, self.address(), to, nonce)
            .await?;

        self.signer.sign(tx).await
    }

    /// An ETH-in path that does not start at the wrapped native token would
    /// revert on-chain; reject it locally when the WETH address is known.
    fn check_weth_path(&self, request: &SwapRequest) -> Result<()> {
        if request.kind == SwapKind::EthForTokens {
            if let (Some(weth), Some(first)) = (self.config.weth, request.path.first()) {
                if *first != weth {
                    return Err(SwapError::Encoding(format!(
                        "ETH-in path must start at the wrapped native token {weth}"
                    )));
                }
            }
        }
        Ok(())
    }

    // ========== Token operations ==========

    /// ERC20 balance of the signer, or of `owner` when given
    pub async fn token_balance(&self, token: Address, owner: Option<Address>) -> Result<U256> {
        let owner = owner.unwrap_or_else(|| self.address());
        let call = IERC20::balanceOfCall { account: owner };
        let data = self.read_call(token, call.abi_encode()).await?;
        IERC20::balanceOfCall::abi_decode_returns(&data)
            .map_err(|e| SwapError::Encoding(format!("bad balanceOf return data: {e}")))
    }

    /// Router allowance the signer has granted for `token`
    pub async fn allowance(&self, token: Address) -> Result<U256> {
        let call = IERC20::allowanceCall {
            owner: self.address(),
            spender: self.config.router,
        };
        let data = self.read_call(token, call.abi_encode()).await?;
        IERC20::allowanceCall::abi_decode_returns(&data)
            .map_err(|e| SwapError::Encoding(format!("bad allowance return data: {e}")))
    }

    /// Approve the router for `amount` of `token`, driving the approval
    /// through the same estimate/build/sign/broadcast pipeline as a swap.
    pub async fn approve_router(&self, token: Address, amount: U256) -> Result<SwapReceipt> {
        let call = IERC20::approveCall {
            spender: self.config.router,
            amount,
        };
        let call = EncodedCall::from_parts(call.abi_encode(), U256::ZERO)?;

        let signed = self.prepare_call(token, call, None).await?;
        let hash = self.broadcaster.submit(&signed).await?;
        self.wait(hash, self.config.confirm_timeout).await
    }

    /// Native token balance of the signer
    pub async fn native_balance(&self) -> Result<U256> {
        self.provider
            .get_balance(self.address())
            .await
            .map_err(network_error)
    }

    /// Token-in swaps revert unless the router can pull `path[0]`; approve
    /// it up front when the current allowance falls short.
    async fn ensure_router_allowance(&self, token: Address, amount: U256) -> Result<()> {
        let current = self.allowance(token).await?;
        if current < amount {
            info!(%token, "router allowance too low, approving");
            // unlimited approval so follow-up swaps skip this round trip
            self.approve_router(token, U256::MAX).await?;
        }
        Ok(())
    }

    async fn read_call(&self, to: Address, data: Vec<u8>) -> Result<Bytes> {
        self.provider
            .call(
                alloy::rpc::types::TransactionRequest::default()
                    .with_to(to)
                    .with_input(data),
            )
            .await
            .map_err(network_error)
    }
}
