//! Compute a bounded integer score for a matched rule (§4.3).

use bcscan_domain::error::Error;
use bcscan_domain::rule::Rule;
use bcscan_domain::EvaluationContext;

use crate::evaluator::evaluate;

/// Lower bound of a final score, inclusive.
const MIN_SCORE: i64 = 0;
/// Upper bound of a final score, inclusive.
const MAX_SCORE: i64 = 100;

/// Compute `rule.scoring.base_score` plus every factor whose condition
/// evaluates true, clamped to `[0, 100]`.
///
/// Factors are applied in declared order; an evaluation error in any
/// factor aborts scoring for this rule (§4.3, §7 "scoring errors").
pub fn calculate_score(rule: &Rule, ctx: &EvaluationContext) -> Result<i64, Error> {
    let mut score = rule.scoring.base_score;
    for factor in &rule.scoring.factors {
        if evaluate(&factor.condition, ctx)? {
            score += factor.score;
        }
    }
    Ok(score.clamp(MIN_SCORE, MAX_SCORE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcscan_domain::rule::{ScoreFactor, RuleScoring};
    use bcscan_domain::transaction::TransactionData;
    use bcscan_domain::Value;

    fn ctx_with(call_depth: i64) -> EvaluationContext {
        let tx = TransactionData {
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
            function_selector: None,
            input_data: String::new(),
            call_stack: vec![],
            events: vec![],
        };
        let mut ctx = EvaluationContext::build(tx, None);
        ctx.extracted_data
            .insert("call_depth".to_owned(), Value::Int(call_depth));
        ctx
    }

    fn rule_with_scoring(base_score: i64, factors: Vec<ScoreFactor>) -> Rule {
        use bcscan_domain::rule::{
            RuleConfig, RuleExtract, RuleFilters, RuleMetadata, RuleTriggers, Severity,
        };
        Rule {
            metadata: RuleMetadata {
                name: "deep_calls".to_owned(),
                version: "1.0.0".to_owned(),
                description: String::new(),
                tags: vec![],
                enabled: true,
            },
            config: RuleConfig {
                severity: Severity::High,
                priority: 0,
                hooks: vec!["contract_function_call".to_owned()],
                throttle: None,
            },
            triggers: RuleTriggers::default(),
            extract: RuleExtract::default(),
            scoring: RuleScoring {
                base_score,
                factors,
            },
            actions: vec![],
            filters: RuleFilters::default(),
        }
    }

    #[test]
    fn scenario_excessive_call_depth_scores_seventy() {
        let rule = rule_with_scoring(
            40,
            vec![ScoreFactor {
                condition: "call_depth > 10".to_owned(),
                score: 30,
                description: None,
            }],
        );
        let ctx = ctx_with(12);
        assert_eq!(calculate_score(&rule, &ctx).expect("no error"), 70);
    }

    #[test]
    fn score_clamps_to_upper_bound() {
        let rule = rule_with_scoring(
            90,
            vec![ScoreFactor {
                condition: "".to_owned(),
                score: 50,
                description: None,
            }],
        );
        let ctx = ctx_with(0);
        assert_eq!(calculate_score(&rule, &ctx).expect("no error"), 100);
    }

    #[test]
    fn score_clamps_to_lower_bound() {
        let rule = rule_with_scoring(5, vec![]);
        let mut rule = rule;
        rule.scoring.base_score = -20;
        let ctx = ctx_with(0);
        assert_eq!(calculate_score(&rule, &ctx).expect("no error"), 0);
    }

    #[test]
    fn factor_error_aborts_scoring() {
        let rule = rule_with_scoring(
            10,
            vec![ScoreFactor {
                condition: "unknown_thing > 1".to_owned(),
                score: 10,
                description: None,
            }],
        );
        let ctx = ctx_with(0);
        assert!(calculate_score(&rule, &ctx).is_err());
    }

    #[test]
    fn factors_apply_in_declared_order() {
        let rule = rule_with_scoring(
            0,
            vec![
                ScoreFactor {
                    condition: "call_depth > 0".to_owned(),
                    score: 10,
                    description: None,
                },
                ScoreFactor {
                    condition: "call_depth > 0".to_owned(),
                    score: 20,
                    description: None,
                },
            ],
        );
        let ctx = ctx_with(5);
        assert_eq!(calculate_score(&rule, &ctx).expect("no error"), 30);
    }
}
