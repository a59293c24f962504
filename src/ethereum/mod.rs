//! Ethereum interaction module.
//!
//! Contains the Ethereum client, the operator signer, and contract bindings.

pub mod api;
pub mod client;
pub mod constants;
pub mod contracts;
pub mod signer;

pub use api::{ChainApi, RegistrationDigestRequest};
pub use client::EthereumClient;
pub use signer::OperatorSigner;
