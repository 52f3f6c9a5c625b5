//! Apply a matched rule's actions in declared order (§4.7).

use std::sync::Arc;

use bcscan_domain::ports::RiskEventSink;
use bcscan_domain::rule::{Rule, RuleAction, Severity};
use bcscan_domain::{EvaluationContext, RiskEvent};

/// Runs a rule's `actions` against one match. Holds the persistence
/// collaborator (§6); alerts are advisory and need no collaborator.
pub struct Executor {
    sink: Arc<dyn RiskEventSink>,
}

impl Executor {
    /// Build an executor over the given persistence collaborator.
    #[must_use]
    pub fn new(sink: Arc<dyn RiskEventSink>) -> Self {
        Self { sink }
    }

    /// Run every action in `rule.actions`, in order. A persistence failure
    /// is logged; subsequent actions in the same rule still run (§4.7,
    /// §5 "Backpressure"). Never returns an error: action failures are
    /// terminal only for that one action.
    pub async fn execute(&self, rule: &Rule, context: &EvaluationContext, score: i64) {
        for action in &rule.actions {
            match action {
                RuleAction::Alert { title, message } => {
                    self.emit_alert(rule, context, title, message);
                }
                RuleAction::LogRiskEvent { title, message } => {
                    if !title.is_empty() || !message.is_empty() {
                        self.emit_alert(rule, context, title, message);
                    }
                    self.persist_risk_event(rule, context, score).await;
                }
                RuleAction::Unknown => {
                    tracing::warn!(rule = %rule.metadata.name, "unknown action type, skipping");
                }
            }
        }
    }

    fn emit_alert(&self, rule: &Rule, context: &EvaluationContext, title: &str, message: &str) {
        let title = apply_template(title, context);
        let message = apply_template(message, context);
        match rule.config.severity {
            Severity::Critical | Severity::High => {
                tracing::error!(rule = %rule.metadata.name, %title, %message, "alert");
            }
            Severity::Medium => {
                tracing::warn!(rule = %rule.metadata.name, %title, %message, "alert");
            }
            Severity::Low | Severity::Info => {
                tracing::info!(rule = %rule.metadata.name, %title, %message, "alert");
            }
        }
    }

    async fn persist_risk_event(&self, rule: &Rule, context: &EvaluationContext, score: i64) {
        let event = RiskEvent {
            rule_id: rule.metadata.name.clone(),
            severity: rule.config.severity,
            contract_address: context.transaction.to_address.clone(),
            tx_hash: context.transaction.tx_hash.clone(),
            description: rule.metadata.description.clone(),
            score,
            metadata: context.extracted_data.clone(),
            detected_at: chrono::Utc::now(),
        };
        if let Err(err) = self.sink.create(&event).await {
            tracing::error!(
                rule = %rule.metadata.name,
                tx_hash = %context.transaction.tx_hash,
                error = %err,
                "failed to persist risk event"
            );
        }
    }
}

/// Replace every `{{key}}` in `template` with the stringified value of an
/// `extracted_data` entry or a well-known context field. Unmatched
/// placeholders are left literal (§4.7 templating).
fn apply_template(template: &str, context: &EvaluationContext) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            result.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let key = after_open[..end].trim();
        match resolve_template_key(key, context) {
            Some(value) => result.push_str(&value),
            None => {
                result.push_str("{{");
                result.push_str(&after_open[..end]);
                result.push_str("}}");
            }
        }
        rest = &after_open[end + 2..];
    }
    result.push_str(rest);
    result
}

fn resolve_template_key(key: &str, context: &EvaluationContext) -> Option<String> {
    if let Some(value) = context.extracted_data.get(key) {
        return Some(value.as_display_string());
    }
    match key {
        "tx_hash" => Some(context.transaction.tx_hash.clone()),
        "from_address" => Some(context.transaction.from_address.clone()),
        "to_address" => Some(context.transaction.to_address.clone()),
        "call_depth" => Some(context.call_depth.to_string()),
        "call_count" => Some(context.call_count.to_string()),
        _ => None,
    }
}
