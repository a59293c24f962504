//! Transaction receipt summary.

use std::fmt;

use alloy::{primitives::TxHash, rpc::types::TransactionReceipt};
use serde::Serialize;

/// Receipt status code of a successful transaction.
pub const RECEIPT_STATUS_SUCCESS: u64 = 1;

/// Terminal outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinedTransaction {
    /// Transaction hash.
    pub tx_hash: TxHash,
    /// Block the transaction was included in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Gas consumed.
    pub gas_used: u64,
    /// Receipt status: 1 = success, 0 = failure.
    pub status: u64,
}

impl MinedTransaction {
    pub fn succeeded(&self) -> bool {
        self.status == RECEIPT_STATUS_SUCCESS
    }
}

impl From<&TransactionReceipt> for MinedTransaction {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            status: u64::from(receipt.status()),
        }
    }
}

impl fmt::Display for MinedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx {} status {}", self.tx_hash, self.status)?;
        if let Some(block) = self.block_number {
            write!(f, " block {block}")?;
        }
        write!(f, " gas used {}", self.gas_used)
    }
}
