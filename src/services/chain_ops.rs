//! Operator lifecycle actions against the Lagrange service contract.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, TxHash};

use crate::{
    config::{Config, NetworkTables},
    error::{AppError, Result},
    ethereum::{
        contracts::ServiceCall, ChainApi, EthereumClient, OperatorSigner, RegistrationDigestRequest,
    },
    services::registration::{registration_expiry, registration_salt},
    types::{BlsPublicKey, MinedTransaction, OperatorSignature},
};

/// Client for registering, subscribing and deregistering an operator.
///
/// Each action submits one transaction and returns only once it is mined.
pub struct ChainOps<A: ChainApi = EthereumClient> {
    api: A,
    signer: OperatorSigner,
    tables: Arc<NetworkTables>,
    network: String,
    chain_id: u64,
    receipt_timeout: Option<Duration>,
}

impl ChainOps<EthereumClient> {
    /// Connect to `rpc_url` and check it serves `network`.
    pub async fn connect(
        network: &str,
        rpc_url: &str,
        private_key: &str,
        tables: Arc<NetworkTables>,
    ) -> Result<Self> {
        let client = EthereumClient::connect(rpc_url).await?;
        Self::from_api(network, client, private_key, tables).await
    }

    /// Connect using environment-derived configuration.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let tables = Arc::new(config.load_tables()?);
        let ops =
            Self::connect(&config.network, &config.rpc_url, &config.private_key, tables).await?;
        Ok(match config.receipt_timeout {
            Some(timeout) => ops.with_receipt_timeout(timeout),
            None => ops,
        })
    }
}

impl<A: ChainApi> ChainOps<A> {
    /// Build a client over an existing chain connection.
    ///
    /// Fails with [`AppError::ConfigMismatch`] when the live chain ID differs
    /// from the one configured for `network`; nothing else is queried then.
    pub async fn from_api(
        network: &str,
        api: A,
        private_key: &str,
        tables: Arc<NetworkTables>,
    ) -> Result<Self> {
        let chain_id = api.chain_id().await.map_err(|e| match e {
            AppError::Rpc(msg) => AppError::Connection(format!("failed to query chain ID: {msg}")),
            other => other.context("failed to query chain ID"),
        })?;

        let expected = u64::from(tables.chain(network)?.chain_id);
        if expected != chain_id {
            return Err(AppError::ConfigMismatch {
                network: network.to_string(),
                expected,
                actual: chain_id,
            });
        }

        let signer = OperatorSigner::from_private_key(private_key)?.with_chain_id(chain_id);
        let api = api.with_signer(&signer);

        Ok(Self {
            api,
            signer,
            tables,
            network: network.to_string(),
            chain_id,
            receipt_timeout: None,
        })
    }

    /// Bound every receipt wait by `timeout`.
    pub fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = Some(timeout);
        self
    }

    /// Operator address (the transaction sender).
    pub fn operator_address(&self) -> Address {
        self.signer.address()
    }

    /// Chain ID verified at construction.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Network the client was built for.
    pub fn network(&self) -> &str {
        &self.network
    }

    /// Network and chain tables the client resolves names against.
    pub fn tables(&self) -> &NetworkTables {
        &self.tables
    }

    /// Register as an operator of the service deployed on `network`.
    ///
    /// The operator consents by signing the directory contract's
    /// registration digest; the signature expires five minutes after the
    /// latest block.
    pub async fn register(
        &self,
        network: &str,
        sign_address: Address,
        bls_pub_keys: &[BlsPublicKey],
    ) -> Result<MinedTransaction> {
        let service = self.tables.network(network)?.service_contract_address;

        let directory = self
            .api
            .avs_directory(service)
            .await
            .map_err(|e| e.context("failed to read AVS directory"))?;

        let block_timestamp = self
            .api
            .latest_block_timestamp()
            .await
            .map_err(|e| e.context("failed to fetch latest block"))?;

        let request = RegistrationDigestRequest {
            operator: self.signer.address(),
            avs: service,
            salt: registration_salt(),
            expiry: registration_expiry(block_timestamp),
        };

        let digest = self
            .api
            .registration_digest(directory, &request)
            .await
            .map_err(|e| e.context("failed to compute registration digest"))?;

        let signature = self.signer.sign_digest(&digest)?;

        tracing::info!(
            operator = %request.operator,
            sign_address = %sign_address,
            keys = bls_pub_keys.len(),
            expiry = %request.expiry,
            "Registering operator"
        );

        let call = ServiceCall::Register {
            sign_address,
            bls_pub_keys: bls_pub_keys.to_vec(),
            operator_signature: OperatorSignature {
                signature,
                salt: request.salt,
                expiry: request.expiry,
            },
        };
        self.execute(service, call, "failed to register").await
    }

    /// Add BLS public keys to the operator record at `service`.
    pub async fn add_bls_pub_keys(
        &self,
        service: Address,
        bls_pub_keys: &[BlsPublicKey],
    ) -> Result<MinedTransaction> {
        tracing::info!(
            operator = %self.signer.address(),
            keys = bls_pub_keys.len(),
            "Adding BLS public keys"
        );

        let call = ServiceCall::AddBlsPubKeys { bls_pub_keys: bls_pub_keys.to_vec() };
        self.execute(service, call, "failed to add BLS keys").await
    }

    /// Subscribe to `chain` on the service deployed on `network`.
    pub async fn subscribe(&self, network: &str, chain: &str) -> Result<MinedTransaction> {
        let (service, chain_id) = self.resolve_subscription(network, chain)?;

        tracing::info!(
            chain_id = chain_id,
            operator = %self.signer.address(),
            "Subscribing to chain"
        );

        self.execute(service, ServiceCall::Subscribe { chain_id }, "failed to subscribe").await
    }

    /// Unsubscribe from `chain` on the service deployed on `network`.
    pub async fn unsubscribe(&self, network: &str, chain: &str) -> Result<MinedTransaction> {
        let (service, chain_id) = self.resolve_subscription(network, chain)?;

        tracing::info!(
            chain_id = chain_id,
            operator = %self.signer.address(),
            "Unsubscribing from chain"
        );

        self.execute(service, ServiceCall::Unsubscribe { chain_id }, "failed to unsubscribe").await
    }

    /// Remove the operator registration at `service`.
    pub async fn deregister(&self, service: Address) -> Result<MinedTransaction> {
        tracing::info!(operator = %self.signer.address(), "Deregistering operator");

        self.execute(service, ServiceCall::Deregister, "failed to deregister").await
    }

    /// Wait until `tx_hash` is mined, bounded by the configured receipt timeout.
    pub async fn wait_for_mined(&self, tx_hash: TxHash) -> Result<MinedTransaction> {
        match self.receipt_timeout {
            Some(timeout) => self.wait_for_mined_within(tx_hash, timeout).await,
            None => self.await_receipt(tx_hash).await,
        }
    }

    /// Wait until `tx_hash` is mined or `timeout` elapses.
    pub async fn wait_for_mined_within(
        &self,
        tx_hash: TxHash,
        timeout: Duration,
    ) -> Result<MinedTransaction> {
        tokio::time::timeout(timeout, self.await_receipt(tx_hash))
            .await
            .map_err(|_| AppError::Timeout { tx_hash, timeout })?
    }

    async fn await_receipt(&self, tx_hash: TxHash) -> Result<MinedTransaction> {
        tracing::info!(tx_hash = %tx_hash, "Waiting for transaction to be mined");

        let mined = self
            .api
            .wait_for_receipt(tx_hash)
            .await
            .map_err(|e| e.context("failed to wait for transaction to be mined"))?;

        if !mined.succeeded() {
            tracing::warn!(tx_hash = %tx_hash, status = mined.status, "Transaction failed");
            return Err(AppError::Transaction(format!("transaction failed: {mined}")));
        }

        tracing::info!(tx_hash = %tx_hash, block = ?mined.block_number, "Transaction mined");
        Ok(mined)
    }

    fn resolve_subscription(&self, network: &str, chain: &str) -> Result<(Address, u32)> {
        let service = self.tables.network(network)?.service_contract_address;
        let chain_id = self.tables.chain(chain)?.chain_id;
        Ok((service, chain_id))
    }

    async fn execute(
        &self,
        service: Address,
        call: ServiceCall,
        action: &str,
    ) -> Result<MinedTransaction> {
        let tx_hash = self.api.submit(service, &call).await.map_err(|e| e.context(action))?;
        self.wait_for_mined(tx_hash).await.map_err(|e| e.context(action))
    }
}

impl<A: ChainApi> std::fmt::Debug for ChainOps<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainOps")
            .field("network", &self.network)
            .field("chain_id", &self.chain_id)
            .field("operator", &self.signer.address())
            .field("receipt_timeout", &self.receipt_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, keccak256, Signature, B256, U256};
    use alloy::sol_types::SolValue;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use tokio_test::{assert_err, assert_ok};

    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const SERVICE: Address = address!("18a74e66cc90f0b1744da27e72df338cea0a542b");
    const DIRECTORY: Address = address!("055733000064333caddbc92763c58bf0192ffebf");
    const BLOCK_TIME: u64 = 1_700_000_000;

    /// In-memory chain: records submissions and mines them instantly.
    #[derive(Default)]
    struct FakeChain {
        chain_id: u64,
        fail_digest: bool,
        reject_chain_id: bool,
        revert_all: bool,
        never_mine: bool,
        state: Arc<Mutex<FakeState>>,
    }

    #[derive(Default)]
    struct FakeState {
        calls: Vec<&'static str>,
        submitted: Vec<ServiceCall>,
        digest_requests: Vec<RegistrationDigestRequest>,
        subscriptions: HashSet<u32>,
        receipts: Vec<MinedTransaction>,
        signer: Option<Address>,
    }

    impl FakeChain {
        fn new(chain_id: u64) -> (Self, Arc<Mutex<FakeState>>) {
            let chain = Self { chain_id, ..Default::default() };
            let state = chain.state.clone();
            (chain, state)
        }

        fn digest_for(request: &RegistrationDigestRequest) -> B256 {
            keccak256((request.operator, request.avs, request.salt, request.expiry).abi_encode())
        }
    }

    #[async_trait]
    impl ChainApi for FakeChain {
        async fn chain_id(&self) -> Result<u64> {
            self.state.lock().unwrap().calls.push("chain_id");
            if self.reject_chain_id {
                return Err(AppError::Rpc("method not found".into()));
            }
            Ok(self.chain_id)
        }

        async fn latest_block_timestamp(&self) -> Result<u64> {
            self.state.lock().unwrap().calls.push("latest_block_timestamp");
            Ok(BLOCK_TIME)
        }

        async fn avs_directory(&self, _service: Address) -> Result<Address> {
            self.state.lock().unwrap().calls.push("avs_directory");
            Ok(DIRECTORY)
        }

        async fn registration_digest(
            &self,
            directory: Address,
            request: &RegistrationDigestRequest,
        ) -> Result<B256> {
            let mut state = self.state.lock().unwrap();
            state.calls.push("registration_digest");
            assert_eq!(directory, DIRECTORY);
            if self.fail_digest {
                return Err(AppError::Connection("connection reset by peer".into()));
            }
            state.digest_requests.push(*request);
            Ok(Self::digest_for(request))
        }

        async fn submit(&self, _service: Address, call: &ServiceCall) -> Result<TxHash> {
            let mut state = self.state.lock().unwrap();
            state.calls.push("submit");
            if state.signer.is_none() {
                return Err(AppError::Key("no signer".into()));
            }

            let accepted = !self.revert_all
                && match call {
                    ServiceCall::Subscribe { chain_id } => state.subscriptions.insert(*chain_id),
                    ServiceCall::Unsubscribe { chain_id } => state.subscriptions.remove(chain_id),
                    _ => true,
                };

            let tx_hash = keccak256((state.submitted.len() as u64).to_be_bytes());
            state.submitted.push(call.clone());
            let block_number = Some(100 + state.submitted.len() as u64);
            state.receipts.push(MinedTransaction {
                tx_hash,
                block_number,
                gas_used: 50_000,
                status: u64::from(accepted),
            });
            Ok(tx_hash)
        }

        async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<MinedTransaction> {
            if self.never_mine {
                std::future::pending::<()>().await;
            }
            let state = self.state.lock().unwrap();
            state
                .receipts
                .iter()
                .find(|r| r.tx_hash == tx_hash)
                .cloned()
                .ok_or_else(|| AppError::Connection(format!("unknown transaction {tx_hash}")))
        }

        fn with_signer(self, signer: &OperatorSigner) -> Self {
            self.state.lock().unwrap().signer = Some(signer.address());
            self
        }
    }

    fn tables() -> Arc<NetworkTables> {
        Arc::new(NetworkTables::builtin().with_network("mainnet", SERVICE))
    }

    async fn ops(chain: FakeChain) -> ChainOps<FakeChain> {
        ChainOps::from_api("mainnet", chain, TEST_PRIVATE_KEY, tables()).await.unwrap()
    }

    fn bls_keys() -> Vec<BlsPublicKey> {
        vec![BlsPublicKey::new(U256::from(1), U256::from(2))]
    }

    #[tokio::test]
    async fn test_from_api_chain_id_mismatch() {
        let (chain, state) = FakeChain::new(5);
        let result = ChainOps::from_api("mainnet", chain, TEST_PRIVATE_KEY, tables()).await;

        match result {
            Err(err @ AppError::ConfigMismatch { expected: 1, actual: 5, .. }) => {
                let msg = err.to_string();
                assert!(msg.contains("expected 1"));
                assert!(msg.contains("got 5"));
            }
            other => panic!("Expected ConfigMismatch, got {other:?}"),
        }

        let state = state.lock().unwrap();
        assert_eq!(state.calls, vec!["chain_id"]);
        assert!(state.signer.is_none());
    }

    #[tokio::test]
    async fn test_from_api_chain_id_query_error_is_connection_error() {
        let (mut chain, state) = FakeChain::new(1);
        chain.reject_chain_id = true;
        let result = ChainOps::from_api("mainnet", chain, TEST_PRIVATE_KEY, tables()).await;

        match result {
            Err(AppError::Connection(msg)) => {
                assert_eq!(msg, "failed to query chain ID: method not found")
            }
            other => panic!("Expected Connection error, got {other:?}"),
        }
        assert!(state.lock().unwrap().signer.is_none());
    }

    #[tokio::test]
    async fn test_from_api_unknown_network() {
        let (chain, _) = FakeChain::new(1);
        let result = ChainOps::from_api("devnet", chain, TEST_PRIVATE_KEY, tables()).await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_from_api_malformed_key() {
        let (chain, _) = FakeChain::new(1);
        let result = ChainOps::from_api("mainnet", chain, "0xdeadbeef", tables()).await;
        assert!(matches!(result, Err(AppError::Key(_))));
    }

    #[tokio::test]
    async fn test_from_api_binds_signer() {
        let (chain, state) = FakeChain::new(1);
        let ops = ops(chain).await;
        assert_eq!(ops.chain_id(), 1);
        assert_eq!(ops.network(), "mainnet");
        assert_eq!(state.lock().unwrap().signer, Some(ops.operator_address()));
    }

    #[tokio::test]
    async fn test_register_signs_directory_digest() {
        let (chain, state) = FakeChain::new(1);
        let ops = ops(chain).await;
        let sign_address = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");

        let mined = assert_ok!(ops.register("mainnet", sign_address, &bls_keys()).await);
        assert!(mined.succeeded());

        let state = state.lock().unwrap();
        let request = state.digest_requests[0];
        assert_eq!(request.operator, ops.operator_address());
        assert_eq!(request.avs, SERVICE);
        assert_eq!(request.salt, registration_salt());
        assert_eq!(request.expiry, U256::from(BLOCK_TIME + 300));

        match &state.submitted[..] {
            [ServiceCall::Register { sign_address: addr, bls_pub_keys, operator_signature }] => {
                assert_eq!(*addr, sign_address);
                assert_eq!(bls_pub_keys, &bls_keys());
                assert_eq!(operator_signature.salt, request.salt);
                assert_eq!(operator_signature.expiry, request.expiry);
                assert!(matches!(operator_signature.signature[64], 27 | 28));

                let digest = FakeChain::digest_for(&request);
                let signature = Signature::from_raw(&operator_signature.signature).unwrap();
                let recovered = signature.recover_address_from_prehash(&digest).unwrap();
                assert_eq!(recovered, ops.operator_address());
            }
            other => panic!("Expected one register call, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_digest_failure_submits_nothing() {
        let (mut chain, state) = FakeChain::new(1);
        chain.fail_digest = true;
        let ops = ops(chain).await;

        let result = ops.register("mainnet", Address::ZERO, &bls_keys()).await;
        match result {
            Err(AppError::Connection(msg)) => {
                assert!(msg.starts_with("failed to compute registration digest"))
            }
            other => panic!("Expected Connection error, got {other:?}"),
        }
        assert!(state.lock().unwrap().submitted.is_empty());
    }

    #[tokio::test]
    async fn test_register_unknown_network() {
        let (chain, state) = FakeChain::new(1);
        let ops = ops(chain).await;

        let result = ops.register("holesky", Address::ZERO, &bls_keys()).await;
        assert!(matches!(result, Err(AppError::Config(_))));
        assert_eq!(state.lock().unwrap().calls, vec!["chain_id"]);
    }

    #[tokio::test]
    async fn test_subscribe_then_unsubscribe() {
        let (chain, state) = FakeChain::new(1);
        let ops = ops(chain).await;

        assert_ok!(ops.subscribe("mainnet", "optimism").await);
        assert_ok!(ops.unsubscribe("mainnet", "optimism").await);

        let state = state.lock().unwrap();
        assert_eq!(
            state.submitted,
            vec![ServiceCall::Subscribe { chain_id: 10 }, ServiceCall::Unsubscribe { chain_id: 10 }]
        );
    }

    #[tokio::test]
    async fn test_duplicate_subscribe_is_transaction_error() {
        let (chain, _) = FakeChain::new(1);
        let ops = ops(chain).await;

        assert_ok!(ops.subscribe("mainnet", "base").await);
        let result = ops.subscribe("mainnet", "base").await;
        match result {
            Err(AppError::Transaction(msg)) => {
                assert!(msg.starts_with("failed to subscribe"));
                assert!(msg.contains("status 0"));
            }
            other => panic!("Expected Transaction error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_subscribe_unknown_chain() {
        let (chain, state) = FakeChain::new(1);
        let ops = ops(chain).await;

        assert_err!(ops.subscribe("mainnet", "zksync").await);
        assert!(state.lock().unwrap().submitted.is_empty());
    }

    #[tokio::test]
    async fn test_add_bls_pub_keys_and_deregister() {
        let (chain, state) = FakeChain::new(1);
        let ops = ops(chain).await;

        let added = assert_ok!(ops.add_bls_pub_keys(SERVICE, &bls_keys()).await);
        let removed = assert_ok!(ops.deregister(SERVICE).await);
        assert_eq!(added.block_number, Some(101));
        assert_eq!(removed.block_number, Some(102));

        let state = state.lock().unwrap();
        assert_eq!(
            state.submitted,
            vec![ServiceCall::AddBlsPubKeys { bls_pub_keys: bls_keys() }, ServiceCall::Deregister]
        );
    }

    #[tokio::test]
    async fn test_failed_receipt_is_transaction_error() {
        let (mut chain, _) = FakeChain::new(1);
        chain.revert_all = true;
        let ops = ops(chain).await;

        let result = ops.deregister(SERVICE).await;
        assert!(matches!(
            result,
            Err(AppError::Transaction(ref m)) if m.starts_with("failed to deregister")
        ));

        let result = ops.add_bls_pub_keys(SERVICE, &bls_keys()).await;
        assert!(matches!(result, Err(AppError::Transaction(_))));
    }

    #[tokio::test]
    async fn test_wait_for_mined_unknown_hash_is_connection_error() {
        let (chain, _) = FakeChain::new(1);
        let ops = ops(chain).await;

        let result = ops.wait_for_mined(B256::repeat_byte(9)).await;
        assert!(matches!(result, Err(AppError::Connection(_))));
    }

    #[tokio::test]
    async fn test_wait_for_mined_timeout() {
        let (mut chain, _) = FakeChain::new(1);
        chain.never_mine = true;
        let ops = ops(chain).await.with_receipt_timeout(Duration::from_millis(20));

        match ops.deregister(SERVICE).await {
            Err(AppError::Timeout { timeout, .. }) => {
                assert_eq!(timeout, Duration::from_millis(20))
            }
            other => panic!("Expected Timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_debug_hides_key() {
        let (chain, _) = FakeChain::new(1);
        let ops = ops(chain).await;
        let debug_str = format!("{ops:?}");
        assert!(debug_str.contains("ChainOps"));
        assert!(
            !debug_str.contains("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
        );
    }
}
