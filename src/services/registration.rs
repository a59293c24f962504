//! Operator registration parameters.

use alloy::primitives::{B256, U256};

use crate::ethereum::constants::{REGISTRATION_EXPIRY_SECS, REGISTRATION_SALT_DOMAIN};

/// Fixed registration salt: the domain string at the start of a zeroed
/// 32-byte word. Must match what the directory contract expects bit-for-bit.
pub fn registration_salt() -> B256 {
    salt_from_domain(REGISTRATION_SALT_DOMAIN)
}

fn salt_from_domain(domain: &[u8]) -> B256 {
    let mut salt = B256::ZERO;
    let len = domain.len().min(salt.len());
    salt[..len].copy_from_slice(&domain[..len]);
    salt
}

/// Signature expiry relative to the latest block time.
pub fn registration_expiry(block_timestamp: u64) -> U256 {
    U256::from(block_timestamp) + U256::from(REGISTRATION_EXPIRY_SECS)
}
