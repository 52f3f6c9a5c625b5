//! A rule set: the manager's authoritative, name-indexed collection.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::rule::Rule;

/// A mapping from `metadata.name` to `Rule`, with `name` globally unique
/// within the set (§3 invariant 2). Reload replaces the whole set
/// atomically; a `RuleSet` value itself is never mutated in place once
/// published.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    rules: HashMap<String, Rule>,
}

impl RuleSet {
    /// An empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from rules, indexed by `metadata.name`. Later entries
    /// with a duplicate name overwrite earlier ones; callers that care about
    /// duplicate detection should check before calling this.
    #[must_use]
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|rule| (rule.metadata.name.clone(), rule))
                .collect(),
        }
    }

    /// Look up a rule by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// All rules, enabled or not.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// The derived "enabled rules" view used for evaluation (§3, §4.1).
    pub fn enabled(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values().filter(|r| r.metadata.enabled)
    }

    /// Number of rules in the set, enabled or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
