//! Chain access used by the operator services.

use alloy::primitives::{Address, TxHash, B256, U256};
use async_trait::async_trait;

use crate::{
    error::Result,
    ethereum::{contracts::ServiceCall, OperatorSigner},
    types::MinedTransaction,
};

/// Inputs to the directory contract's registration digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationDigestRequest {
    /// Operator registering (the transaction sender).
    pub operator: Address,
    /// Service contract the operator registers with.
    pub avs: Address,
    pub salt: B256,
    pub expiry: U256,
}

/// Chain operations needed by [`crate::services::ChainOps`].
///
/// Implemented over JSON-RPC by [`crate::ethereum::EthereumClient`]; tests
/// substitute an in-memory chain.
#[async_trait]
pub trait ChainApi: Send + Sync {
    /// Chain ID reported by the endpoint.
    async fn chain_id(&self) -> Result<u64>;

    /// Timestamp of the latest block header.
    async fn latest_block_timestamp(&self) -> Result<u64>;

    /// Directory contract configured on the service contract.
    async fn avs_directory(&self, service: Address) -> Result<Address>;

    /// Digest the operator signs to consent to registration.
    async fn registration_digest(
        &self,
        directory: Address,
        request: &RegistrationDigestRequest,
    ) -> Result<B256>;

    /// Sign and broadcast `call` to `service`; returns the transaction hash.
    async fn submit(&self, service: Address, call: &ServiceCall) -> Result<TxHash>;

    /// Wait until `tx_hash` is included in a block.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<MinedTransaction>;

    /// Attach the signer used by [`ChainApi::submit`].
    fn with_signer(self, signer: &OperatorSigner) -> Self
    where
        Self: Sized;
}
