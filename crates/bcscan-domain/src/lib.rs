//! Domain layer: the rule model, transaction types, evaluation context,
//! call-stack analytics, risk events, and the port traits the rest of the
//! workspace builds against.
//!
//! Nothing in this crate depends on a concrete transport, cache, or
//! database. Logging uses the `tracing` facade only; a concrete subscriber
//! is wired once, in the binary crate.

pub mod call_stack;
pub mod context;
pub mod error;
pub mod ports;
pub mod risk_event;
pub mod rule;
pub mod rule_set;
pub mod transaction;
pub mod value;

pub use context::EvaluationContext;
pub use error::{Error, Result};
pub use risk_event::RiskEvent;
pub use rule::{Rule, RuleAction, RuleCondition, RuleTriggers, Severity};
pub use rule_set::RuleSet;
pub use transaction::{Block, CallFrame, EventLog, TransactionData};
pub use value::Value;
