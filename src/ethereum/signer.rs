//! Operator key management.

use alloy::{
    network::EthereumWallet,
    primitives::{Address, Bytes, ChainId, B256},
    signers::{local::PrivateKeySigner, Signer, SignerSync},
};

use crate::error::{AppError, Result};

/// Length of an `r || s || v` signature.
pub const SIGNATURE_LEN: usize = 65;

/// The operator's secp256k1 key.
///
/// One secret, two capabilities: [`OperatorSigner::wallet`] authorizes
/// outgoing transactions, [`OperatorSigner::sign_digest`] signs raw
/// 32-byte digests such as the registration consent hash.
#[derive(Clone)]
pub struct OperatorSigner {
    /// The local signer.
    signer: PrivateKeySigner,
    /// Operator address.
    address: Address,
}

impl OperatorSigner {
    /// Create a signer from a private key string.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        // Remove 0x prefix if present
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let signer: PrivateKeySigner = key
            .parse()
            .map_err(|e: alloy::signers::local::LocalSignerError| AppError::Key(e.to_string()))?;

        let address = signer.address();

        tracing::info!(address = %address, "Operator signer initialized");

        Ok(Self { signer, address })
    }

    /// Bind transaction signatures to `chain_id` (EIP-155).
    pub fn with_chain_id(mut self, chain_id: ChainId) -> Self {
        self.signer.set_chain_id(Some(chain_id));
        self
    }

    /// The chain transactions are bound to, if any.
    pub fn chain_id(&self) -> Option<ChainId> {
        self.signer.chain_id()
    }

    /// Get the operator address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Wallet used by the provider to sign outgoing transactions.
    pub fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }

    /// Sign a 32-byte digest directly, without any message prefix.
    ///
    /// Returns the 65-byte `r || s || v` encoding with `v` in {27, 28}.
    pub fn sign_digest(&self, digest: &B256) -> Result<Bytes> {
        let signature = self.signer.sign_hash_sync(digest)?;

        let mut raw = [0u8; SIGNATURE_LEN];
        raw[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
        raw[32..64].copy_from_slice(&signature.s().to_be_bytes::<32>());
        raw[64] = u8::from(signature.v());
        normalize_recovery_id(&mut raw);

        Ok(Bytes::copy_from_slice(&raw))
    }
}

/// Move a raw recovery id (0 or 1) into the Ethereum {27, 28} range.
pub fn normalize_recovery_id(signature: &mut [u8; SIGNATURE_LEN]) {
    if signature[64] < 27 {
        signature[64] += 27;
    }
}

impl std::fmt::Debug for OperatorSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorSigner").field("address", &self.address).finish()
    }
}
