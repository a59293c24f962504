//! Operator-related types.

use std::str::FromStr;

use alloy::primitives::{Bytes, B256, U256};

use crate::error::{AppError, Result};

/// Uncompressed BLS G1 public key as submitted to the service contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlsPublicKey {
    /// X coordinate.
    pub x: U256,
    /// Y coordinate.
    pub y: U256,
}

impl BlsPublicKey {
    /// Length of the `x || y` big-endian encoding.
    pub const ENCODED_LEN: usize = 64;

    pub fn new(x: U256, y: U256) -> Self {
        Self { x, y }
    }

    /// Parse a 64-byte `x || y` big-endian encoding.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::ENCODED_LEN {
            return Err(AppError::Parse(format!(
                "BLS public key must be {} bytes, got {}",
                Self::ENCODED_LEN,
                bytes.len()
            )));
        }
        let (x, y) = bytes.split_at(32);
        Ok(Self { x: U256::from_be_slice(x), y: U256::from_be_slice(y) })
    }

    /// Parse a hex encoding, with or without `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = alloy::hex::decode(s.trim())?;
        Self::from_slice(&bytes)
    }

    /// The `uint256[2]` form used in contract calls.
    pub fn to_words(&self) -> [U256; 2] {
        [self.x, self.y]
    }
}

impl FromStr for BlsPublicKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// Operator consent signature passed to `register`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorSignature {
    /// 65-byte `r || s || v` signature, `v` in {27, 28}.
    pub signature: Bytes,
    /// Registration salt.
    pub salt: B256,
    /// Unix timestamp after which the signature is rejected.
    pub expiry: U256,
}
