//! Local private key signer implementation

use super::{SignedSwap, TransactionSigner};
use crate::error::{Result, SwapError};
use alloy::consensus::{SignableTransaction, TxLegacy};
use alloy::network::TxSignerSync;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

/// Signs with a secp256k1 key held in memory.
///
/// The key string handed to the constructors is parsed and released; it is
/// never stored, logged, or formatted into an error. The parsed key zeroizes
/// itself on drop.
#[derive(Debug)]
pub struct LocalSigner {
    inner: PrivateKeySigner,
}

impl LocalSigner {
    /// Create a signer from a hex private key (with or without 0x prefix)
    pub fn from_private_key(private_key: impl AsRef<str>) -> Result<Self> {
        let key = private_key.as_ref();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let inner: PrivateKeySigner = key
            .parse()
            .map_err(|_| SwapError::Signing("private key is not a valid secp256k1 key".into()))?;

        Ok(Self { inner })
    }

    /// Create a signer from the PRIVATE_KEY environment variable.
    ///
    /// Absence or a malformed value is a startup condition, reported as a
    /// `Config` error before any network call.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var("PRIVATE_KEY")
            .map_err(|_| SwapError::Config("PRIVATE_KEY must be set".into()))?;
        Self::from_private_key(key)
            .map_err(|_| SwapError::Config("PRIVATE_KEY is not a valid secp256k1 key".into()))
    }
}

impl TransactionSigner for LocalSigner {
    fn address(&self) -> Address {
        self.inner.address()
    }

    async fn sign(&self, mut tx: TxLegacy) -> Result<SignedSwap> {
        // EIP-155: the digest commits to the chain id carried by the
        // transaction, so the signature cannot be replayed cross-chain
        let signature = self
            .inner
            .sign_transaction_sync(&mut tx)
            .map_err(|e| SwapError::Signing(e.to_string()))?;

        Ok(SignedSwap::new(tx.into_signed(signature)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, Bytes, TxKind, U256};

    // well-known anvil/hardhat development key, account 0
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    fn sample_tx() -> TxLegacy {
        TxLegacy {
            chain_id: Some(1),
            nonce: 7,
            gas_price: 20_000_000_000,
            gas_limit: 150_000,
            to: TxKind::Call(Address::repeat_byte(0x77)),
            value: U256::from(1_000u64),
            input: Bytes::from(vec![0x38, 0xed, 0x17, 0x39]),
        }
    }

    #[test]
    fn test_address_derivation() {
        let signer = LocalSigner::from_private_key(DEV_KEY).unwrap();
        assert_eq!(signer.address(), DEV_ADDRESS);
    }

    #[test]
    fn test_prefix_is_optional() {
        let with = LocalSigner::from_private_key(DEV_KEY).unwrap();
        let without = LocalSigner::from_private_key(&DEV_KEY[2..]).unwrap();
        assert_eq!(with.address(), without.address());
    }

    #[test]
    fn test_rejects_malformed_key_without_echoing_it() {
        let err = LocalSigner::from_private_key("deadbeef").unwrap_err();
        assert!(matches!(err, SwapError::Signing(_)));
        assert!(!err.to_string().contains("deadbeef"));
    }

    #[tokio::test]
    async fn test_signing_is_deterministic() {
        let signer = LocalSigner::from_private_key(DEV_KEY).unwrap();

        let first = signer.sign(sample_tx()).await.unwrap();
        let second = signer.sign(sample_tx()).await.unwrap();

        assert_eq!(first.raw(), second.raw());
        assert_eq!(first.hash(), second.hash());
        assert_eq!(first.nonce(), 7);
    }

    #[tokio::test]
    async fn test_recovered_sender_matches_signer() {
        let signer = LocalSigner::from_private_key(DEV_KEY).unwrap();
        let signed = signer.sign(sample_tx()).await.unwrap();
        assert_eq!(signed.recover_sender().unwrap(), DEV_ADDRESS);
    }

    #[tokio::test]
    async fn test_chain_id_changes_the_signature() {
        let signer = LocalSigner::from_private_key(DEV_KEY).unwrap();

        let mainnet = signer.sign(sample_tx()).await.unwrap();
        let mut other = sample_tx();
        other.chain_id = Some(5);
        let testnet = signer.sign(other).await.unwrap();

        // cross-chain replay would require identical bytes
        assert_ne!(mainnet.raw(), testnet.raw());
    }
}
