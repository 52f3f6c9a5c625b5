//! Boolean expression evaluator over the fixed mini-grammar (§4.2).
//!
//! ```text
//! Expr   := AndExpr
//! AndExpr:= Cmp (" AND " Cmp)*
//! OrExpr := Cmp (" OR "  Cmp)*        -- mutually exclusive with AND in one Expr
//! Cmp    := Ident Op Literal | Ident Op Ident
//! Op     := ">=" | "<=" | "==" | "!=" | ">" | "<"
//! Literal:= integer | float | bool | "'…'" | "\"…\""
//! ```
//!
//! Mixing `AND` and `OR` in the same expression is unsupported; if both
//! tokens are present, `AND` wins as the outer split (§9 Open Question a,
//! preserved and tested as-is).

use bcscan_domain::error::Error;
use bcscan_domain::{EvaluationContext, Value};

/// Operators, checked in longest-match-first order so `>=` is recognized
/// before `>` (§4.2).
const OPERATORS: &[&str] = &[">=", "<=", "==", "!=", ">", "<"];

/// Evaluate a boolean expression against a context.
///
/// An empty or whitespace-only expression is always true (§4.2, §8). A
/// well-formed expression over known identifiers and compatible types
/// never panics; malformed input, unknown identifiers, or incompatible
/// operator/type combinations return an error (§4.2 "Errors").
pub fn evaluate(expr: &str, ctx: &EvaluationContext) -> Result<bool, Error> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Ok(true);
    }

    if expr.contains(" AND ") {
        for part in expr.split(" AND ") {
            if !evaluate_cmp(part.trim(), ctx)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }

    if expr.contains(" OR ") {
        for part in expr.split(" OR ") {
            if evaluate_cmp(part.trim(), ctx)? {
                return Ok(true);
            }
        }
        return Ok(false);
    }

    evaluate_cmp(expr, ctx)
}

fn evaluate_cmp(cmp: &str, ctx: &EvaluationContext) -> Result<bool, Error> {
    let (op_str, op_idx) = OPERATORS
        .iter()
        .find_map(|op| cmp.find(op).map(|idx| (*op, idx)))
        .ok_or_else(|| Error::MalformedExpression(cmp.to_owned()))?;

    let left_raw = cmp[..op_idx].trim();
    let right_raw = cmp[op_idx + op_str.len()..].trim();

    if left_raw.is_empty() || right_raw.is_empty() {
        return Err(Error::MalformedExpression(cmp.to_owned()));
    }

    let left = ctx
        .resolve(left_raw)
        .ok_or_else(|| Error::UnknownIdentifier(left_raw.to_owned()))?;
    let right = resolve_operand(right_raw, ctx)?;

    compare(&left, &right, op_str)
}

/// Resolve the right-hand operand: a literal if it parses as one, else an
/// identifier looked up the same way the left-hand side is (§4.2
/// `Cmp := Ident Op Literal | Ident Op Ident`).
fn resolve_operand(raw: &str, ctx: &EvaluationContext) -> Result<Value, Error> {
    if let Some(s) = parse_quoted_string(raw) {
        return Ok(Value::Str(s));
    }
    if raw == "true" {
        return Ok(Value::Bool(true));
    }
    if raw == "false" {
        return Ok(Value::Bool(false));
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Value::Int(i));
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Ok(Value::Float(f));
    }
    ctx.resolve(raw)
        .ok_or_else(|| Error::UnknownIdentifier(raw.to_owned()))
}

fn parse_quoted_string(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    if raw.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'\'' || first == b'"') && first == last {
            return Some(raw[1..raw.len() - 1].to_owned());
        }
    }
    None
}

fn compare(left: &Value, right: &Value, op: &str) -> Result<bool, Error> {
    if let (Some(l), Some(r)) = (left.as_i64(), right.as_i64()) {
        return Ok(apply_ord(l, r, op));
    }
    if let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) {
        return Ok(apply_ord_f64(l, r, op));
    }

    let (l, r) = (left.as_display_string(), right.as_display_string());
    match op {
        "==" => Ok(l == r),
        "!=" => Ok(l != r),
        _ => Err(Error::UnsupportedOperator {
            operator: op.to_owned(),
            operand_kind: "string".to_owned(),
        }),
    }
}

fn apply_ord<T: PartialOrd>(l: T, r: T, op: &str) -> bool {
    match op {
        ">" => l > r,
        "<" => l < r,
        ">=" => l >= r,
        "<=" => l <= r,
        "==" => l == r,
        _ => l != r,
    }
}

fn apply_ord_f64(l: f64, r: f64, op: &str) -> bool {
    apply_ord(l, r, op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcscan_domain::transaction::TransactionData;
    use rstest::rstest;

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

    #[test]
    fn empty_expression_is_true() {
        assert!(evaluate("", &ctx_with(0)).expect("no error"));
        assert!(evaluate("   ", &ctx_with(0)).expect("no error"));
    }

    #[test]
    fn simple_gt_comparison() {
        assert!(evaluate("call_depth > 3", &ctx_with(5)).expect("no error"));
        assert!(!evaluate("call_depth > 3", &ctx_with(2)).expect("no error"));
    }

    #[test]
    fn longest_match_operator_recognition() {
        assert!(evaluate("call_depth >= 3", &ctx_with(3)).expect("no error"));
        assert!(!evaluate("call_depth >= 3", &ctx_with(2)).expect("no error"));
    }

    #[test]
    fn and_short_circuits_before_unknown_identifier() {
        // scenario 6: call_depth > 3 AND unknown_var > 1 with call_depth = 2
        let result = evaluate("call_depth > 3 AND unknown_var > 1", &ctx_with(2));
        assert_eq!(result.expect("no error, short-circuited"), false);
    }

    #[test]
    fn and_propagates_error_when_first_operand_true() {
        let result = evaluate("call_depth > 1 AND unknown_var > 1", &ctx_with(2));
        assert!(result.is_err());
    }

    #[test]
    fn or_short_circuits_on_first_true() {
        let result = evaluate("call_depth > 1 OR unknown_var > 1", &ctx_with(2));
        assert_eq!(result.expect("no error, short-circuited"), true);
    }

    #[test]
    fn and_takes_precedence_when_both_present() {
        // AND is the outer split when both tokens appear (§9 open question a)
        let ctx = ctx_with(5);
        let result = evaluate("call_depth > 1 AND call_depth > 0 OR call_depth > 100", &ctx);
        assert!(result.is_err());
    }

    #[test]
    fn string_equality_comparison() {
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
            .insert("chain".to_owned(), Value::Str("ethereum".to_owned()));
        assert!(evaluate("chain == 'ethereum'", &ctx).expect("no error"));
        assert!(evaluate(r#"chain != "polygon""#, &ctx).expect("no error"));
    }

    #[test]
    fn string_ordering_operator_errors() {
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
            .insert("chain".to_owned(), Value::Str("ethereum".to_owned()));
        assert!(evaluate("chain > 'ethereum'", &ctx).is_err());
    }

    #[test]
    fn reentrancy_flag_compares_as_bool() {
        let mut ctx = ctx_with(0);
        ctx.extracted_data
            .insert("reentrancy_detected".to_owned(), Value::Bool(true));
        assert!(evaluate("reentrancy_detected == true", &ctx).expect("no error"));
    }

    #[test]
    fn unparseable_identifier_errors() {
        assert!(evaluate("totally_unknown_field > 1", &ctx_with(0)).is_err());
    }

    #[rstest]
    #[case(5, ">", 3, true)]
    #[case(5, ">", 5, false)]
    #[case(3, "<", 5, true)]
    #[case(5, "<", 3, false)]
    #[case(5, ">=", 5, true)]
    #[case(4, ">=", 5, false)]
    #[case(5, "<=", 5, true)]
    #[case(6, "<=", 5, false)]
    #[case(5, "==", 5, true)]
    #[case(5, "==", 6, false)]
    #[case(5, "!=", 6, true)]
    #[case(5, "!=", 5, false)]
    fn comparison_operator_matrix(
        #[case] depth: i64,
        #[case] op: &str,
        #[case] threshold: i64,
        #[case] expected: bool,
    ) {
        let expr = format!("call_depth {op} {threshold}");
        assert_eq!(evaluate(&expr, &ctx_with(depth)).expect("no error"), expected);
    }
}
