//! Transaction signer abstraction
//!
//! This module provides a trait-based seam between transaction assembly and
//! broadcast, so the pipeline can sign with a local private key today and a
//! remote or MPC signer later without touching the surrounding stages.

mod local;

pub use local::LocalSigner;

use crate::error::{Result, SwapError};
use alloy::consensus::{SignableTransaction, Signed, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, Bytes, TxHash};

/// A signed swap transaction together with its broadcastable bytes
///
/// Immutable once produced. Signing is deterministic, so a given unsigned
/// transaction maps to exactly one of these; resubmitting the same
/// `SignedSwap` can never race itself onto two nonces.
#[derive(Debug, Clone)]
pub struct SignedSwap {
    inner: Signed<TxLegacy>,
    raw: Bytes,
}

impl SignedSwap {
    pub fn new(inner: Signed<TxLegacy>) -> Self {
        let envelope: TxEnvelope = inner.clone().into();
        let raw = Bytes::from(envelope.encoded_2718());
        Self { inner, raw }
    }

    /// Transaction hash as the network will report it
    pub fn hash(&self) -> TxHash {
        *self.inner.hash()
    }

    /// Nonce the transaction was signed with
    pub fn nonce(&self) -> u64 {
        self.inner.tx().nonce
    }

    /// Serialized bytes for eth_sendRawTransaction
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Recover the sender address from the signature
    pub fn recover_sender(&self) -> Result<Address> {
        let digest = self.inner.tx().signature_hash();
        self.inner
            .signature()
            .recover_address_from_prehash(&digest)
            .map_err(|e| SwapError::Signing(e.to_string()))
    }
}

/// Trait for signing assembled swap transactions
pub trait TransactionSigner: Send + Sync {
    /// Returns the signer's EVM address
    fn address(&self) -> Address;

    /// Signs an assembled transaction, producing the broadcastable form
    fn sign(&self, tx: TxLegacy) -> impl std::future::Future<Output = Result<SignedSwap>> + Send;
}
