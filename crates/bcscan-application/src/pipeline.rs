//! Ties the per-transaction state machine together (§4.5):
//!
//! ```text
//! Received → ContextBuilt → HooksDispatched → [ Matched → Scored → Executed ]* → Done
//!                                          └── NoMatch ──────────────────────┘
//! ```
//!
//! All transitions are synchronous within one worker's per-message task
//! (§4.5); the caller supplies a single rule-set snapshot obtained once for
//! the whole transaction, so a reload mid-dispatch never produces a
//! half-swapped view (§4.6 "Atomic swap").

use bcscan_domain::{EvaluationContext, RuleSet, TransactionData};

use crate::executor::Executor;
use crate::hooks::HookRegistry;
use crate::scorer::calculate_score;

/// One rule match, after re-scoring, for the caller's bookkeeping/tests.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// The matched rule's identity
    pub rule_id: String,
    /// Final score after §4.3 re-scoring
    pub score: i64,
}

/// Drives one transaction through context build, hook dispatch, scoring,
/// and action execution.
pub struct Pipeline<'a> {
    registry: &'a HookRegistry,
    executor: &'a Executor,
}

impl<'a> Pipeline<'a> {
    /// Build a pipeline over a hook registry and executor, both borrowed
    /// for the lifetime of processing a batch of transactions.
    #[must_use]
    pub fn new(registry: &'a HookRegistry, executor: &'a Executor) -> Self {
        Self { registry, executor }
    }

    /// Process one transaction against one rule-set snapshot, returning
    /// every match that was scored and executed.
    pub async fn process(&self, transaction: TransactionData, rules: &RuleSet) -> Vec<MatchOutcome> {
        let context = EvaluationContext::build(transaction, None);
        let mut outcomes = Vec::new();

        for hook in self.registry.matching(&context.transaction) {
            let events = hook.execute(&context, rules);
            for event in events {
                let Some(rule) = rules.get(&event.rule_id) else {
                    tracing::warn!(rule = %event.rule_id, "matched rule vanished before scoring, skipping");
                    continue;
                };
                let extended = crate::extract::with_extraction(rule, &context);
                let score = match calculate_score(rule, &extended) {
                    Ok(score) => score,
                    Err(err) => {
                        tracing::warn!(rule = %rule.metadata.name, error = %err, "scoring error, skipping rule");
                        continue;
                    }
                };
                self.executor.execute(rule, &extended, score).await;
                outcomes.push(MatchOutcome {
                    rule_id: rule.metadata.name.clone(),
                    score,
                });
            }
        }

        outcomes
    }
}
