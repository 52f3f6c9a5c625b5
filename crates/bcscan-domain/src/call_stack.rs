//! Pure, deterministic functions over a flattened call-frame sequence (§4.4).
//!
//! Invoked once per transaction during [`crate::context::EvaluationContext::build`],
//! never re-derived mid-evaluation.

use crate::transaction::CallFrame;
use std::collections::HashMap;

/// Maximum `depth` over all frames; 0 if `frames` is empty.
#[must_use]
pub fn max_call_depth(frames: &[CallFrame]) -> u32 {
    frames.iter().map(|f| f.depth).max().unwrap_or(0)
}

/// Flags a reentrancy pattern: the same `to` address appearing at two
/// indices `i < j` with `j > i + 1` — a re-entry after at least one
/// intervening call to a different target. Self-adjacent repeats
/// (`j == i + 1`) do not count.
#[must_use]
pub fn reentrancy_detected(frames: &[CallFrame]) -> bool {
    let mut by_target: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, frame) in frames.iter().enumerate() {
        by_target.entry(frame.to.as_str()).or_default().push(idx);
    }
    by_target
        .values()
        .any(|indices| indices.windows(2).any(|w| w[1] > w[0] + 1))
}

/// Whether any frame's `input` starts with the given hex selector prefix.
#[must_use]
pub fn contains_function_call(frames: &[CallFrame], selector: &str) -> bool {
    frames.iter().any(|f| f.input.starts_with(selector))
}
