//! Transaction input types: the shape the engine consumes from the bus.

use serde::{Deserialize, Serialize};

/// Kind of an internal call within a transaction's call tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallType {
    /// Regular message call
    Call,
    /// Delegatecall, preserving caller context
    Delegatecall,
    /// Staticcall, read-only
    Staticcall,
    /// Contract creation
    Create,
}

/// One invocation in a transaction's internal call tree (§3 `CallFrame`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallFrame {
    /// Call kind
    #[serde(rename = "type")]
    pub kind: CallType,
    /// Caller address
    pub from: String,
    /// Callee address
    pub to: String,
    /// Value transferred, decimal-string encoded
    pub value: String,
    /// Gas forwarded to this call
    pub gas: u64,
    /// Gas actually consumed
    pub gas_used: u64,
    /// Calldata, hex-encoded
    #[serde(default)]
    pub input: String,
    /// Return data, hex-encoded
    #[serde(default)]
    pub output: String,
    /// Revert reason, if any
    #[serde(default)]
    pub error: Option<String>,
    /// Nesting depth; root call is 0
    pub depth: u32,
}

impl CallFrame {
    /// First 10 hex characters of `input` (`0x` + 4-byte selector), if present.
    #[must_use]
    pub fn function(&self) -> Option<&str> {
        if self.input.len() >= 10 {
            Some(&self.input[..10])
        } else {
            None
        }
    }
}

/// One emitted event log (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    /// Address that emitted the event
    pub address: String,
    /// Indexed topics, hex-encoded
    #[serde(default)]
    pub topics: Vec<String>,
    /// Non-indexed data, hex-encoded
    #[serde(default)]
    pub data: String,
}

/// A confirmed transaction with its reconstructed call stack and event log.
///
/// This is the message payload the engine consumes from the transaction bus
/// (§6): one JSON object per message, keyed by `tx_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionData {
    /// Transaction hash, also the bus message key
    pub tx_hash: String,
    /// Block the transaction was included in
    pub block_number: u64,
    /// Sender address
    pub from_address: String,
    /// Recipient address (absent for contract creation, kept as empty string)
    pub to_address: String,
    /// Value transferred, decimal-string encoded big integer
    pub value: String,
    /// Gas price paid, decimal-string encoded
    pub gas_price: String,
    /// Gas actually consumed
    pub gas_used: u64,
    /// Gas limit offered
    pub gas_limit: u64,
    /// Execution status (1 success, 0 revert), as in a transaction receipt
    pub status: u8,
    /// Block/inclusion timestamp, epoch seconds
    pub timestamp: i64,
    /// First 4 bytes of `input_data`, hex-encoded, if any
    #[serde(default)]
    pub function_selector: Option<String>,
    /// Raw calldata, hex-encoded
    #[serde(default)]
    pub input_data: String,
    /// Flattened, depth-annotated internal call stack
    #[serde(default)]
    pub call_stack: Vec<CallFrame>,
    /// Event logs emitted during execution
    #[serde(default)]
    pub events: Vec<EventLog>,
}

/// Block metadata, optionally attached to an [`crate::context::EvaluationContext`].
///
/// The engine never constructs this itself; it is supplied by the node
/// adapter collaborator (§6) and only read through the evaluator's
/// `block_number` built-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Block height
    pub block_number: u64,
    /// Block hash
    pub block_hash: String,
    /// Parent block hash
    pub parent_hash: String,
    /// Block timestamp, epoch seconds
    pub timestamp: i64,
    /// Block proposer/miner address
    pub miner: String,
    /// Total gas used by all transactions in the block
    pub gas_used: u64,
    /// Block gas limit
    pub gas_limit: u64,
    /// Number of transactions in the block
    pub transaction_count: u64,
}
