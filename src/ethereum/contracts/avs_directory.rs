//! AVS directory contract bindings.

use alloy::sol;

// Directory contract that checks operator consent signatures
sol! {
    #[sol(rpc)]
    interface IAVSDirectory {
        function calculateOperatorAVSRegistrationDigestHash(
            address operator,
            address avs,
            bytes32 salt,
            uint256 expiry
        ) external view returns (bytes32);
    }
}
