//! Lagrange service contract bindings.

use alloy::{
    primitives::{Address, Bytes},
    sol,
    sol_types::SolCall,
};

use crate::types::{BlsPublicKey, OperatorSignature};

// Lagrange service (AVS service manager) interface
sol! {
    #[sol(rpc)]
    interface ILagrangeService {
        struct SignatureWithSaltAndExpiry {
            bytes signature;
            bytes32 salt;
            uint256 expiry;
        }

        function register(
            address signAddress,
            uint256[2][] memory blsPubKeys,
            SignatureWithSaltAndExpiry memory operatorSignature
        ) external;

        function addBlsPubKeys(uint256[2][] memory additionalBlsPubKeys) external;

        function subscribe(uint32 chainID) external;

        function unsubscribe(uint32 chainID) external;

        function deregister() external;

        function avsDirectory() external view returns (address);
    }
}

/// A state-changing call on the service contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    Register {
        sign_address: Address,
        bls_pub_keys: Vec<BlsPublicKey>,
        operator_signature: OperatorSignature,
    },
    AddBlsPubKeys {
        bls_pub_keys: Vec<BlsPublicKey>,
    },
    Subscribe {
        chain_id: u32,
    },
    Unsubscribe {
        chain_id: u32,
    },
    Deregister,
}

impl ServiceCall {
    /// Solidity function name, for logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ServiceCall::Register { .. } => "register",
            ServiceCall::AddBlsPubKeys { .. } => "addBlsPubKeys",
            ServiceCall::Subscribe { .. } => "subscribe",
            ServiceCall::Unsubscribe { .. } => "unsubscribe",
            ServiceCall::Deregister => "deregister",
        }
    }

    /// ABI-encoded calldata.
    pub fn calldata(&self) -> Bytes {
        let encoded = match self {
            ServiceCall::Register { sign_address, bls_pub_keys, operator_signature } => {
                ILagrangeService::registerCall {
                    signAddress: *sign_address,
                    blsPubKeys: key_words(bls_pub_keys),
                    operatorSignature: ILagrangeService::SignatureWithSaltAndExpiry {
                        signature: operator_signature.signature.clone(),
                        salt: operator_signature.salt,
                        expiry: operator_signature.expiry,
                    },
                }
                .abi_encode()
            }
            ServiceCall::AddBlsPubKeys { bls_pub_keys } => ILagrangeService::addBlsPubKeysCall {
                additionalBlsPubKeys: key_words(bls_pub_keys),
            }
            .abi_encode(),
            ServiceCall::Subscribe { chain_id } => {
                ILagrangeService::subscribeCall { chainID: *chain_id }.abi_encode()
            }
            ServiceCall::Unsubscribe { chain_id } => {
                ILagrangeService::unsubscribeCall { chainID: *chain_id }.abi_encode()
            }
            ServiceCall::Deregister => ILagrangeService::deregisterCall {}.abi_encode(),
        };
        encoded.into()
    }
}

fn key_words(keys: &[BlsPublicKey]) -> Vec<[alloy::primitives::U256; 2]> {
    keys.iter().map(BlsPublicKey::to_words).collect()
}
