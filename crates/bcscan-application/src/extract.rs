//! Rule-declared data extraction into `extracted_data` (SPEC_FULL §3, §9).
//!
//! A pure function from `(rule, transaction)` to a list of named values,
//! so it composes with the evaluator's existing `extracted_data` lookup
//! (§4.2 name resolution) without the dispatcher special-casing it.
//! Unresolvable fields are skipped — extraction is best-effort, unlike
//! trigger evaluation.

use bcscan_domain::rule::{ExtractField, Rule};
use bcscan_domain::transaction::{CallFrame, EventLog};
use bcscan_domain::{TransactionData, Value};

/// Run every extraction declared on `rule` against `transaction`, returning
/// `(as_key, value)` pairs ready to merge into `extracted_data`.
#[must_use]
pub fn extract(rule: &Rule, transaction: &TransactionData) -> Vec<(String, Value)> {
    let mut out = Vec::new();

    for field in &rule.extract.transaction {
        if let Some(value) = resolve_transaction_field(transaction, &field.field) {
            out.push((field.as_key.clone(), value));
        }
    }

    if let Some(first_frame) = transaction.call_stack.first() {
        for field in &rule.extract.call_stack {
            if let Some(value) = resolve_call_frame_field(first_frame, &field.field) {
                out.push((field.as_key.clone(), value));
            }
        }
    }

    for event_spec in &rule.extract.events {
        let Some(matching) = transaction
            .events
            .iter()
            .find(|event| event_matches(event, &event_spec.event))
        else {
            continue;
        };
        for field in &event_spec.fields {
            if let Some(value) = resolve_event_field(matching, &field.field) {
                out.push((format!("{}.{}", event_spec.as_key, field.as_key), value));
            }
        }
    }

    for fields in rule.extract.custom.values() {
        for field in fields {
            if let Some(value) = resolve_transaction_field(transaction, &field.field) {
                out.push((field.as_key.clone(), value));
            }
        }
    }

    out
}

fn resolve_transaction_field(tx: &TransactionData, field: &str) -> Option<Value> {
    match field {
        "tx_hash" => Some(Value::Str(tx.tx_hash.clone())),
        "from_address" => Some(Value::Str(tx.from_address.clone())),
        "to_address" => Some(Value::Str(tx.to_address.clone())),
        "value" => Some(parse_decimal(&tx.value)),
        "gas_price" => Some(parse_decimal(&tx.gas_price)),
        "gas_used" => Some(Value::Int(tx.gas_used as i64)),
        "gas_limit" => Some(Value::Int(tx.gas_limit as i64)),
        "status" => Some(Value::Int(i64::from(tx.status))),
        "block_number" => Some(Value::Int(tx.block_number as i64)),
        "function_selector" => tx.function_selector.clone().map(Value::Str),
        "input_data" => Some(Value::Str(tx.input_data.clone())),
        _ => None,
    }
}

fn resolve_call_frame_field(frame: &CallFrame, field: &str) -> Option<Value> {
    match field {
        "from" => Some(Value::Str(frame.from.clone())),
        "to" => Some(Value::Str(frame.to.clone())),
        "value" => Some(parse_decimal(&frame.value)),
        "gas" => Some(Value::Int(frame.gas as i64)),
        "gas_used" => Some(Value::Int(frame.gas_used as i64)),
        "input" => Some(Value::Str(frame.input.clone())),
        "output" => Some(Value::Str(frame.output.clone())),
        "depth" => Some(Value::Int(i64::from(frame.depth))),
        "function" => frame.function().map(|s| Value::Str(s.to_owned())),
        _ => None,
    }
}

fn resolve_event_field(event: &EventLog, field: &str) -> Option<Value> {
    match field {
        "address" => Some(Value::Str(event.address.clone())),
        "data" => Some(Value::Str(event.data.clone())),
        _ => field
            .strip_prefix("topic")
            .and_then(|idx| idx.parse::<usize>().ok())
            .and_then(|idx| event.topics.get(idx))
            .map(|topic| Value::Str(topic.clone())),
    }
}

/// An event "matches" a spec's `event` name if that name equals the
/// event's first topic (the conventional event-signature slot) or the
/// event's address, case-insensitively.
fn event_matches(event: &EventLog, spec: &str) -> bool {
    event
        .topics
        .first()
        .is_some_and(|topic| topic.eq_ignore_ascii_case(spec))
        || event.address.eq_ignore_ascii_case(spec)
}

fn parse_decimal(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::Float(f);
    }
    Value::Str(raw.to_owned())
}

/// Merge a rule's extraction output into a context's `extracted_data`,
/// returning an owned copy the caller evaluates against. Keeps the
/// shared [`bcscan_domain::EvaluationContext`] read-only across rules in
/// the same hook invocation (§4.5 step 2 runs once per rule).
#[must_use]
pub fn with_extraction(
    rule: &Rule,
    context: &bcscan_domain::EvaluationContext,
) -> bcscan_domain::EvaluationContext {
    let mut extended = context.clone();
    for (key, value) in extract(rule, &context.transaction) {
        extended.extracted_data.insert(key, value);
    }
    extended
}
