//! The record produced when a rule matches a transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rule::Severity;
use crate::value::Value;

/// A scored detection, created by a hook on match (§3 lifecycle),
/// re-scored by the scorer, run through the executor, then handed to the
/// persistence collaborator (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskEvent {
    /// The rule that produced this event (`event_type` at the persistence boundary)
    pub rule_id: String,
    /// Severity copied from the matched rule
    pub severity: Severity,
    /// Contract address the transaction targeted
    pub contract_address: String,
    /// Transaction hash
    pub tx_hash: String,
    /// Human-readable description, defaulting to the rule's `metadata.description`
    pub description: String,
    /// Final score after §4.3 scoring, in `[0, 100]`
    pub score: i64,
    /// Snapshot of `extracted_data` at match time
    pub metadata: HashMap<String, Value>,
    /// When this event was detected
    pub detected_at: DateTime<Utc>,
}
