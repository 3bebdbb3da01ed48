//! Calldata encoding for router swap calls
//!
//! Pure stage: a request either becomes a fixed `EncodedCall` or an
//! `Encoding` error, with no side effects and no network traffic.

use crate::contracts::IUniswapV2Router02;
use crate::error::{Result, SwapError};
use crate::types::{SwapKind, SwapRequest};
use alloy::primitives::{Bytes, U256};
use alloy::sol_types::SolCall;

/// An encoded router invocation
///
/// Fixed once produced: the selector always equals the first four calldata
/// bytes, and `value` is the native amount the transaction must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCall {
    /// 4-byte method identifier
    pub selector: [u8; 4],
    /// Full ABI-encoded calldata, selector included
    pub calldata: Bytes,
    /// Native token amount sent with the call
    pub value: U256,
}

impl EncodedCall {
    pub(crate) fn from_parts(calldata: Vec<u8>, value: U256) -> Result<Self> {
        let selector: [u8; 4] = calldata
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| SwapError::Encoding("calldata shorter than a selector".into()))?;
        Ok(Self {
            selector,
            calldata: Bytes::from(calldata),
            value,
        })
    }
}

/// Encode a swap request into router calldata.
///
/// Pure function of the request: identical inputs always produce identical
/// bytes. Argument types are fixed by the ABI bindings at compile time;
/// structural problems surface as `Encoding` errors before any bytes exist.
pub fn encode_swap(request: &SwapRequest) -> Result<EncodedCall> {
    request.validate()?;

    let deadline = U256::from(request.deadline);
    let (calldata, value) = match request.kind {
        SwapKind::TokensForTokens => (
            IUniswapV2Router02::swapExactTokensForTokensCall {
                amountIn: request.amount_in_wei,
                amountOutMin: request.amount_out_min_wei,
                path: request.path.clone(),
                to: request.recipient,
                deadline,
            }
            .abi_encode(),
            U256::ZERO,
        ),
        SwapKind::EthForTokens => (
            IUniswapV2Router02::swapExactETHForTokensCall {
                amountOutMin: request.amount_out_min_wei,
                path: request.path.clone(),
                to: request.recipient,
                deadline,
            }
            .abi_encode(),
            request.amount_in_wei,
        ),
        SwapKind::TokensForEth => (
            IUniswapV2Router02::swapExactTokensForETHCall {
                amountIn: request.amount_in_wei,
                amountOutMin: request.amount_out_min_wei,
                path: request.path.clone(),
                to: request.recipient,
                deadline,
            }
            .abi_encode(),
            U256::ZERO,
        ),
    };

    EncodedCall::from_parts(calldata, value)
}
