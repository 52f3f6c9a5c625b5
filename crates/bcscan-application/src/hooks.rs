//! Hook registry & dispatcher (§4.5).
//!
//! A hook is a capability record: a stable name, a `matches` predicate
//! deciding whether it applies to a transaction, and an `execute` that
//! evaluates every applicable rule and emits one `RiskEvent` per match.
//! The registry is populated at startup and never unregisters a hook at
//! runtime (§9 "Hook polymorphism").

use std::collections::HashMap;
use std::sync::Arc;

use bcscan_domain::error::Error;
use bcscan_domain::rule::{Rule, TriggerOperator};
use bcscan_domain::{EvaluationContext, RiskEvent, RuleSet, TransactionData};

use crate::evaluator::evaluate;
use crate::extract::with_extraction;

/// A named, registrable detection hook.
pub trait Hook: Send + Sync {
    /// Stable identity, matched against a rule's `config.hooks`.
    fn name(&self) -> &str;

    /// Whether this hook applies to the given transaction at all.
    fn matches(&self, transaction: &TransactionData) -> bool;

    /// Evaluate every rule that subscribes to this hook and is enabled,
    /// returning one `RiskEvent` per match. Each event's `score` is the
    /// rule's `base_score`; the caller re-scores with the scorer (§4.3)
    /// before handing matches to the executor.
    fn execute(&self, context: &EvaluationContext, rules: &RuleSet) -> Vec<RiskEvent>;
}

/// Compose a rule's trigger conditions into the evaluator's mini-grammar
/// (§4.5 step 2): one `"{field} {operator} {value}"` comparison per
/// condition, joined by `" AND "` or `" OR "` per `triggers.operator`.
fn compose_trigger_expression(rule: &Rule) -> String {
    let joiner = match rule.triggers.operator {
        TriggerOperator::And => " AND ",
        TriggerOperator::Or => " OR ",
    };
    rule.triggers
        .conditions
        .iter()
        .map(render_condition)
        .collect::<Vec<_>>()
        .join(joiner)
}

fn render_condition(condition: &bcscan_domain::rule::RuleCondition) -> String {
    format!(
        "{} {} {}",
        condition.field,
        condition.operator.as_str(),
        render_literal(&condition.value)
    )
}

/// Render a YAML scalar the way the evaluator's literal grammar expects:
/// strings quoted, everything else left bare.
fn render_literal(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => format!("'{s}'"),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => format!("'{}'", yaml_scalar_to_string(other)),
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> String {
    serde_yaml::to_string(value)
        .unwrap_or_default()
        .trim()
        .to_owned()
}

/// The built-in hook matching any transaction with a non-empty
/// `function_selector` (§4.5).
#[derive(Debug, Default)]
pub struct ContractFunctionCallHook;

/// Stable name of [`ContractFunctionCallHook`], as referenced from rule
/// files' `config.hooks`.
pub const CONTRACT_FUNCTION_CALL: &str = "contract_function_call";

impl Hook for ContractFunctionCallHook {
    fn name(&self) -> &str {
        CONTRACT_FUNCTION_CALL
    }

    fn matches(&self, transaction: &TransactionData) -> bool {
        transaction
            .function_selector
            .as_ref()
            .is_some_and(|selector| !selector.is_empty())
    }

    fn execute(&self, context: &EvaluationContext, rules: &RuleSet) -> Vec<RiskEvent> {
        let mut events = Vec::new();
        for rule in rules.enabled() {
            if !rule.config.hooks.iter().any(|h| h == self.name()) {
                continue;
            }
            let extended = with_extraction(rule, context);
            let expression = compose_trigger_expression(rule);
            match evaluate(&expression, &extended) {
                Ok(true) => events.push(RiskEvent {
                    rule_id: rule.metadata.name.clone(),
                    severity: rule.config.severity,
                    contract_address: context.transaction.to_address.clone(),
                    tx_hash: context.transaction.tx_hash.clone(),
                    description: rule.metadata.description.clone(),
                    score: rule.scoring.base_score,
                    metadata: extended.extracted_data.clone(),
                    detected_at: chrono::Utc::now(),
                }),
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(
                        rule = %rule.metadata.name,
                        error = %err,
                        "rule evaluation error, skipping rule"
                    );
                }
            }
        }
        events
    }
}

/// Name-indexed collection of registered hooks, populated at startup.
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<String, Arc<dyn Hook>>,
}

impl HookRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in hooks (currently just
    /// [`ContractFunctionCallHook`]).
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ContractFunctionCallHook));
        registry
    }

    /// Register a hook. Hooks are never unregistered at runtime.
    pub fn register(&mut self, hook: Arc<dyn Hook>) {
        self.hooks.insert(hook.name().to_owned(), hook);
    }

    /// Look up a hook by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Hook>> {
        self.hooks.get(name)
    }

    /// Hooks whose `matches` predicate accepts this transaction.
    pub fn matching(&self, transaction: &TransactionData) -> impl Iterator<Item = &Arc<dyn Hook>> {
        self.hooks.values().filter(|hook| hook.matches(transaction))
    }

    /// Dispatch by name: look up the hook, then run `execute`. Missing
    /// lookup is an error (§4.5 "Missing-hook lookup is an error").
    pub fn dispatch(
        &self,
        name: &str,
        context: &EvaluationContext,
        rules: &RuleSet,
    ) -> Result<Vec<RiskEvent>, Error> {
        let hook = self
            .get(name)
            .ok_or_else(|| Error::UnknownHook(name.to_owned()))?;
        Ok(hook.execute(context, rules))
    }
}
