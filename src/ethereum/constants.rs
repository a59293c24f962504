//! Ethereum network constants.
//!
//! Contains chain IDs and the fixed parameters of operator registration.

// ============================================================================
// Chain IDs
// ============================================================================

/// Ethereum Mainnet chain ID.
pub const ETHEREUM_MAINNET_CHAIN_ID: u32 = 1;

/// Holesky testnet chain ID.
pub const HOLESKY_CHAIN_ID: u32 = 17000;

/// Sepolia testnet chain ID.
pub const SEPOLIA_CHAIN_ID: u32 = 11155111;

/// Optimism chain ID.
pub const OPTIMISM_CHAIN_ID: u32 = 10;

/// Base chain ID.
pub const BASE_CHAIN_ID: u32 = 8453;

/// Arbitrum One chain ID.
pub const ARBITRUM_CHAIN_ID: u32 = 42161;

// ============================================================================
// Operator Registration
// ============================================================================

/// Domain string copied into the registration salt.
pub const REGISTRATION_SALT_DOMAIN: &[u8] = b"lagrange-avs";

/// Seconds between the latest block time and the registration signature expiry.
pub const REGISTRATION_EXPIRY_SECS: u64 = 300;
