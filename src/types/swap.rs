//! Swap request types for the user-facing API

use crate::constants::DEFAULT_DEADLINE_SECS;
use crate::error::{Result, SwapError};
use alloy::primitives::{Address, U256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Which router entry point a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapKind {
    /// swapExactTokensForTokens
    TokensForTokens,
    /// swapExactETHForTokens; the input amount rides as call value
    EthForTokens,
    /// swapExactTokensForETH
    TokensForEth,
}

impl SwapKind {
    /// Whether the router pulls the input token from the sender, which
    /// requires an ERC20 allowance before the swap can succeed.
    pub fn pulls_input_token(&self) -> bool {
        !matches!(self, SwapKind::EthForTokens)
    }
}

/// Parameters for an exact-input swap
///
/// All amounts are raw wei of the asset in question; use
/// [`crate::constants::scale_eth`] for explicit ether conversion. Nothing in
/// the pipeline rescales an amount on its own.
#[derive(Debug, Clone)]
pub struct SwapRequest {
    /// Router entry point to use
    pub kind: SwapKind,
    /// Exact input amount in wei of the input asset
    pub amount_in_wei: U256,
    /// Minimum acceptable output in wei of the output asset
    pub amount_out_min_wei: U256,
    /// Token path, input asset first
    pub path: Vec<Address>,
    /// Receiver of the output asset
    pub recipient: Address,
    /// Unix deadline in seconds; the router reverts once it has passed
    pub deadline: u64,
}

impl SwapRequest {
    fn new(kind: SwapKind, amount_in_wei: U256, path: Vec<Address>, recipient: Address) -> Self {
        Self {
            kind,
            amount_in_wei,
            amount_out_min_wei: U256::ZERO,
            path,
            recipient,
            deadline: unix_now() + DEFAULT_DEADLINE_SECS,
        }
    }

    /// Exact token-in, token-out swap
    pub fn tokens_for_tokens(amount_in_wei: U256, path: Vec<Address>, recipient: Address) -> Self {
        Self::new(SwapKind::TokensForTokens, amount_in_wei, path, recipient)
    }

    /// Exact native-in swap; `amount_in_wei` becomes the call value and the
    /// path must start at the wrapped native token
    pub fn eth_for_tokens(amount_in_wei: U256, path: Vec<Address>, recipient: Address) -> Self {
        Self::new(SwapKind::EthForTokens, amount_in_wei, path, recipient)
    }

    /// Exact token-in, native-out swap
    pub fn tokens_for_eth(amount_in_wei: U256, path: Vec<Address>, recipient: Address) -> Self {
        Self::new(SwapKind::TokensForEth, amount_in_wei, path, recipient)
    }

    /// Set the minimum acceptable output
    pub fn with_amount_out_min(mut self, amount_out_min_wei: U256) -> Self {
        self.amount_out_min_wei = amount_out_min_wei;
        self
    }

    /// Set an absolute unix deadline in seconds
    pub fn with_deadline(mut self, deadline: u64) -> Self {
        self.deadline = deadline;
        self
    }

    /// Set the deadline relative to now
    pub fn with_deadline_in(self, secs: u64) -> Self {
        let deadline = unix_now() + secs;
        self.with_deadline(deadline)
    }

    /// The ERC20 the router will pull from the sender, if any
    pub fn input_token(&self) -> Option<Address> {
        if self.kind.pulls_input_token() {
            self.path.first().copied()
        } else {
            None
        }
    }

    /// Structural validation. An expired deadline is not checked here; the
    /// node's simulation rejects it during gas estimation, before signing.
    pub fn validate(&self) -> Result<()> {
        if self.path.len() < 2 {
            return Err(SwapError::Encoding(
                "swap path must contain at least two addresses".into(),
            ));
        }
        if self.amount_in_wei.is_zero() {
            return Err(SwapError::Encoding("input amount must be positive".into()));
        }
        if self.recipient == Address::ZERO {
            return Err(SwapError::Encoding(
                "recipient must not be the zero address".into(),
            ));
        }
        Ok(())
    }
}

/// Current unix time in seconds
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
