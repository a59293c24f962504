//! Ethereum RPC client.

use alloy::{
    eips::BlockNumberOrTag,
    primitives::{Address, TxHash, B256},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::{client::BuiltInConnectionString, types::TransactionRequest},
};
use async_trait::async_trait;

use crate::{
    error::{AppError, Result},
    ethereum::{
        api::{ChainApi, RegistrationDigestRequest},
        contracts::{IAVSDirectory, ILagrangeService, ServiceCall},
        OperatorSigner,
    },
    types::MinedTransaction,
};

/// Provider that fills nonce, gas and chain ID and signs with the operator wallet.
#[derive(Clone, Debug)]
struct Sender {
    provider: DynProvider,
    address: Address,
}

/// Ethereum RPC client wrapper.
#[derive(Clone, Debug)]
pub struct EthereumClient {
    /// Read-only provider.
    provider: DynProvider,
    /// Signing provider layered over `provider`, once a signer is attached.
    sender: Option<Sender>,
    /// RPC URL for logging.
    rpc_url: String,
}

impl EthereumClient {
    /// Connect to an RPC endpoint (http, ws or ipc).
    ///
    /// A string that is neither an http/ws URL nor an existing IPC path is a
    /// [`AppError::Config`] error; failing to dial a valid one is
    /// [`AppError::Connection`].
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        let rpc_url = rpc_url.trim();
        if rpc_url.is_empty() {
            return Err(AppError::Config("RPC URL cannot be empty".into()));
        }
        rpc_url
            .parse::<BuiltInConnectionString>()
            .map_err(|e| AppError::Config(format!("Invalid RPC URL {rpc_url}: {e}")))?;

        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect(rpc_url)
            .await
            .map_err(|e| AppError::Connection(format!("failed to connect to {rpc_url}: {e}")))?
            .erased();

        tracing::info!(rpc_url = %rpc_url, "Ethereum client created");

        Ok(Self { provider, sender: None, rpc_url: rpc_url.to_string() })
    }

    /// Get the underlying read-only provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// RPC URL the client was created with.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    fn sender(&self) -> Result<&Sender> {
        self.sender
            .as_ref()
            .ok_or_else(|| AppError::Key("no transaction signer attached to client".into()))
    }
}

#[async_trait]
impl ChainApi for EthereumClient {
    async fn chain_id(&self) -> Result<u64> {
        let chain_id = self.provider.get_chain_id().await?;
        tracing::info!(chain_id = chain_id, rpc_url = %self.rpc_url, "Connected to Ethereum node");
        Ok(chain_id)
    }

    async fn latest_block_timestamp(&self) -> Result<u64> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await?
            .ok_or_else(|| AppError::Rpc("Failed to get latest block".into()))?;
        Ok(block.header.timestamp)
    }

    async fn avs_directory(&self, service: Address) -> Result<Address> {
        let contract = ILagrangeService::new(service, self.provider.clone());
        let directory = contract.avsDirectory().call().await?;
        Ok(directory)
    }

    async fn registration_digest(
        &self,
        directory: Address,
        request: &RegistrationDigestRequest,
    ) -> Result<B256> {
        let contract = IAVSDirectory::new(directory, self.provider.clone());
        let digest = contract
            .calculateOperatorAVSRegistrationDigestHash(
                request.operator,
                request.avs,
                request.salt,
                request.expiry,
            )
            .call()
            .await?;
        Ok(digest)
    }

    async fn submit(&self, service: Address, call: &ServiceCall) -> Result<TxHash> {
        let sender = self.sender()?;
        let tx = TransactionRequest::default()
            .from(sender.address)
            .to(service)
            .input(call.calldata().into());

        let pending = sender
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| AppError::Transaction(format!("{} rejected: {e}", call.name())))?;

        let tx_hash = *pending.tx_hash();
        tracing::debug!(
            tx_hash = %tx_hash,
            call = call.name(),
            to = %service,
            "Transaction submitted"
        );
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<MinedTransaction> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await?;
        Ok(MinedTransaction::from(&receipt))
    }

    fn with_signer(mut self, signer: &OperatorSigner) -> Self {
        let provider = ProviderBuilder::new()
            .wallet(signer.wallet())
            .connect_provider(self.provider.clone())
            .erased();
        self.sender = Some(Sender { provider, address: signer.address() });
        self
    }
}
