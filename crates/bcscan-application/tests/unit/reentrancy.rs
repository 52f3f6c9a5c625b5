//! Scenarios 3, 4, and 6 (§8) end to end through the dispatch pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use bcscan_application::hooks::CONTRACT_FUNCTION_CALL;
use bcscan_application::{Executor, HookRegistry, Pipeline};
use bcscan_domain::error::Result as DomainResult;
use bcscan_domain::ports::RiskEventSink;
use bcscan_domain::rule::{
    CompareOp, Rule, RuleCondition, RuleConfig, RuleExtract, RuleFilters, RuleMetadata,
    RuleScoring, RuleTriggers, Severity, TriggerOperator,
};
use bcscan_domain::transaction::{CallFrame, CallType};
use bcscan_domain::{RiskEvent, RuleSet, TransactionData};
use rstest::rstest;

struct NullSink;

#[async_trait]
impl RiskEventSink for NullSink {
    async fn create(&self, _event: &RiskEvent) -> DomainResult<()> {
        Ok(())
    }
}

fn frame(to: &str) -> CallFrame {
    CallFrame {
        kind: CallType::Call,
        from: "0xfrom".to_owned(),
        to: to.to_owned(),
        value: "0".to_owned(),
        gas: 0,
        gas_used: 0,
        input: String::new(),
        output: String::new(),
        error: None,
        depth: 1,
    }
}

fn tx_with_trace(trace: Vec<&str>) -> TransactionData {
    TransactionData {
        tx_hash: "0xabc".to_owned(),
        block_number: 1,
        from_address: "0xfrom".to_owned(),
        to_address: "0xto".to_owned(),
        value: "0".to_owned(),
        gas_price: "0".to_owned(),
        gas_used: 0,
        gas_limit: 0,
        status: 1,
        timestamp: 0,
        function_selector: Some("0xdeadbeef".to_owned()),
        input_data: String::new(),
        call_stack: trace.into_iter().map(frame).collect(),
        events: vec![],
    }
}

fn reentrancy_rule() -> Rule {
    Rule {
        metadata: RuleMetadata {
            name: "reentrancy_rule".to_owned(),
            version: "1.0.0".to_owned(),
            description: "reentrancy detected".to_owned(),
            tags: vec![],
            enabled: true,
        },
        config: RuleConfig {
            severity: Severity::Critical,
            priority: 0,
            hooks: vec![CONTRACT_FUNCTION_CALL.to_owned()],
            throttle: None,
        },
        triggers: RuleTriggers {
            operator: TriggerOperator::And,
            conditions: vec![RuleCondition {
                field: "reentrancy_detected".to_owned(),
                operator: CompareOp::Eq,
                value: serde_yaml::Value::Bool(true),
                description: None,
            }],
        },
        extract: RuleExtract::default(),
        scoring: RuleScoring {
            base_score: 50,
            factors: vec![],
        },
        actions: vec![],
        filters: RuleFilters::default(),
    }
}

#[rstest]
#[case(vec!["A", "B", "A"], true)] // scenario 3: non-adjacent repeat is reentrancy
#[case(vec!["A", "A", "B"], false)] // scenario 4: adjacent repeat is not reentrancy
#[case(vec!["A", "B", "C"], false)] // no repeated callee at all
#[case(vec!["A", "B", "A", "B", "A"], true)] // alternating, still non-adjacent
#[case(vec!["A"], false)] // single frame, nothing to repeat
#[case(vec![], false)] // empty call stack
#[tokio::test]
async fn scenario_reentrancy_detection(#[case] trace: Vec<&str>, #[case] expected_match: bool) {
    let registry = HookRegistry::with_builtins();
    let executor = Executor::new(Arc::new(NullSink));
    let pipeline = Pipeline::new(&registry, &executor);
    let rules = RuleSet::from_rules([reentrancy_rule()]);

    let outcomes = pipeline.process(tx_with_trace(trace), &rules).await;
    assert_eq!(!outcomes.is_empty(), expected_match);
    if expected_match {
        assert_eq!(outcomes[0].rule_id, "reentrancy_rule");
    }
}
