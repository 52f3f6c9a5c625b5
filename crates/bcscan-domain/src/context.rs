//! Per-transaction evaluation scratch space.

use std::collections::HashMap;

use crate::transaction::{Block, TransactionData};
use crate::value::Value;

/// Mutable per-transaction state, built once by the context builder and
/// read by every hook and rule that evaluates against this transaction.
///
/// Created when a transaction arrives, discarded after all hooks fire and
/// actions run (§3 lifecycles). Never shared across transactions and never
/// held across an `.await` by a caller evaluating a single transaction.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    /// The transaction this context was built for
    pub transaction: TransactionData,
    /// Block the transaction was included in, if known
    pub block: Option<Block>,
    /// Maximum `depth` over `transaction.call_stack`; 0 if empty
    pub call_depth: u32,
    /// Number of frames in `transaction.call_stack`
    pub call_count: usize,
    /// Flattened sequence of each frame's `to` address, in stack order
    pub call_trace: Vec<String>,
    /// Gas consumed by the transaction itself (not the sum of call frames)
    pub gas_used: u64,
    /// Gas limit offered to the transaction
    pub gas_limit: u64,
    /// Runtime-populated flags and rule-extracted fields, keyed by name
    pub extracted_data: HashMap<String, Value>,
}

impl EvaluationContext {
    /// Build a context from a transaction, running the call-stack analytics
    /// (§4.4) and seeding `extracted_data` with their output.
    #[must_use]
    pub fn build(transaction: TransactionData, block: Option<Block>) -> Self {
        let call_depth = crate::call_stack::max_call_depth(&transaction.call_stack);
        let call_count = transaction.call_stack.len();
        let call_trace = transaction
            .call_stack
            .iter()
            .map(|frame| frame.to.clone())
            .collect();
        let reentrancy_detected = crate::call_stack::reentrancy_detected(&transaction.call_stack);
        let gas_used = transaction.gas_used;
        let gas_limit = transaction.gas_limit;

        let mut extracted_data = HashMap::new();
        extracted_data.insert(
            "reentrancy_detected".to_owned(),
            Value::Bool(reentrancy_detected),
        );

        Self {
            transaction,
            block,
            call_depth,
            call_count,
            call_trace,
            gas_used,
            gas_limit,
            extracted_data,
        }
    }

    /// Resolve an identifier against `extracted_data` first, then the fixed
    /// built-in set (§4.2 name resolution order). Returns `None` for an
    /// identifier unknown to both.
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> Option<Value> {
        if let Some(value) = self.extracted_data.get(identifier) {
            return Some(value.clone());
        }
        match identifier {
            "call_depth" => Some(Value::Int(i64::from(self.call_depth))),
            "call_count" => Some(Value::Int(self.call_count as i64)),
            "gas_used" => Some(Value::Int(self.gas_used as i64)),
            "gas_limit" => Some(Value::Int(self.gas_limit as i64)),
            "reentrancy_detected" => Some(Value::Bool(crate::call_stack::reentrancy_detected(
                &self.transaction.call_stack,
            ))),
            "status" => Some(Value::Int(i64::from(self.transaction.status))),
            "value" => parse_decimal(&self.transaction.value),
            "gas_price" => parse_decimal(&self.transaction.gas_price),
            "block_number" => self
                .block
                .as_ref()
                .map(|b| Value::Int(b.block_number as i64))
                .or(Some(Value::Int(self.transaction.block_number as i64))),
            _ => None,
        }
    }
}

/// Parse a decimal-string-encoded big integer as `value`/`gas_price` are
/// stored (§3). Falls back to float, then to the raw string, mirroring the
/// evaluator's own literal-parsing fallbacks (§4.2).
fn parse_decimal(raw: &str) -> Option<Value> {
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Value::Int(i));
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Some(Value::Float(f));
    }
    Some(Value::Str(raw.to_owned()))
}
