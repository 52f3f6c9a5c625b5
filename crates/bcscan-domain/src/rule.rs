//! The rule model: a declarative, YAML-authored unit of detection.
//!
//! A `Rule` is immutable once loaded. It is never mutated in place; a
//! reload produces an entirely new [`crate::rule_set::RuleSet`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Qualitative severity label. Orthogonal to the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, no action expected
    Info,
    /// Low risk
    Low,
    /// Medium risk
    Medium,
    /// High risk
    High,
    /// Critical risk, immediate attention expected
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// Boolean combinator for a rule's top-level trigger conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TriggerOperator {
    /// All conditions must hold
    #[default]
    And,
    /// Any condition must hold
    Or,
}

/// Supported comparison operators within a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    /// `>`
    #[serde(rename = ">")]
    Gt,
    /// `<`
    #[serde(rename = "<")]
    Lt,
    /// `>=`
    #[serde(rename = ">=")]
    Ge,
    /// `<=`
    #[serde(rename = "<=")]
    Le,
    /// `==`
    #[serde(rename = "==")]
    Eq,
    /// `!=`
    #[serde(rename = "!=")]
    Ne,
}

impl CompareOp {
    /// Render the operator the way the expression grammar (§4.2) spells it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }
}

/// A single trigger condition: `field operator value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleCondition {
    /// Field name (resolved like an expression identifier at evaluation time)
    #[serde(rename = "type")]
    pub field: String,
    /// Comparison operator
    pub operator: CompareOp,
    /// Literal value, rendered into the composed comparison expression
    pub value: serde_yaml::Value,
    /// Optional human-readable note, not evaluated
    #[serde(default)]
    pub description: Option<String>,
}

/// Top-level trigger: a boolean operator over a list of conditions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleTriggers {
    /// AND (default) or OR; mixing both within one rule is not supported
    #[serde(default)]
    pub operator: TriggerOperator,
    /// The conditions combined by `operator`
    #[serde(default)]
    pub conditions: Vec<RuleCondition>,
}

/// A single `(field, as)` extraction mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractField {
    /// Source field name
    pub field: String,
    /// Key under which the extracted value is stored in `extracted_data`
    #[serde(rename = "as")]
    pub as_key: String,
}

/// Extraction of fields from a matching event log into `extracted_data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractEventField {
    /// Event name/signature to match
    pub event: String,
    /// Fields to extract from that event
    #[serde(default)]
    pub fields: Vec<ExtractField>,
    /// Key prefix under which extracted fields are stored
    #[serde(rename = "as")]
    pub as_key: String,
}

/// Declared data-extraction section of a rule (§3 `RuleExtract`).
///
/// Populates `extracted_data` before the rule's trigger is evaluated.
/// Unresolvable fields are skipped, not an error — extraction is
/// best-effort, unlike trigger evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleExtract {
    /// Fields pulled from the transaction itself
    #[serde(default)]
    pub transaction: Vec<ExtractField>,
    /// Fields pulled from the flattened call stack (first matching frame)
    #[serde(default)]
    pub call_stack: Vec<ExtractField>,
    /// Fields pulled from event logs
    #[serde(default)]
    pub events: Vec<ExtractEventField>,
    /// Arbitrary named groups of additional extractions
    #[serde(default)]
    pub custom: HashMap<String, Vec<ExtractField>>,
}

/// One scoring factor: a condition and the score delta applied when it holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreFactor {
    /// Boolean expression in the §4.2 grammar
    pub condition: String,
    /// Score delta applied if `condition` evaluates true
    pub score: i64,
    /// Optional human-readable note, not evaluated
    #[serde(default)]
    pub description: Option<String>,
}

/// Scoring section: base score plus ordered conditional factors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleScoring {
    /// Starting score before factors are applied
    pub base_score: i64,
    /// Factors applied in declared order; order is the sole tie-break
    #[serde(default)]
    pub factors: Vec<ScoreFactor>,
}

/// One action to run when a rule matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleAction {
    /// Emit an advisory alert log line; no retry, no persistence
    Alert {
        /// Title template (`{{key}}` placeholders)
        title: String,
        /// Message template (`{{key}}` placeholders)
        message: String,
    },
    /// Persist a `RiskEvent` via the persistence collaborator
    LogRiskEvent {
        /// Title template, used only for the advisory log line alongside persistence
        #[serde(default)]
        title: String,
        /// Message template, used only for the advisory log line alongside persistence
        #[serde(default)]
        message: String,
    },
    /// An action kind this build doesn't recognize; logged and skipped
    #[serde(other)]
    Unknown,
}

/// Address-list filter, applied to either contracts or senders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterList {
    /// Contract addresses
    #[serde(default)]
    pub contracts: Vec<String>,
    /// Sender addresses
    #[serde(default)]
    pub addresses: Vec<String>,
}

/// Whitelist/blacklist filters over contract and sender addresses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleFilters {
    /// Addresses that, if present, exempt a transaction from this rule
    #[serde(default)]
    pub whitelist: FilterList,
    /// Addresses a rule is restricted to, if non-empty
    #[serde(default)]
    pub blacklist: FilterList,
}

/// Rate-limit shape (§9 Open Question b: data only, not enforced).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Whether throttling is declared active for this rule
    #[serde(default)]
    pub enabled: bool,
    /// Maximum alerts per window
    #[serde(default)]
    pub max_alerts: u32,
    /// Window duration, e.g. `"5m"`
    #[serde(default)]
    pub time_window: String,
}

/// `metadata` section: identity and lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleMetadata {
    /// Unique identity key within a rule set
    pub name: String,
    /// Free-form version string
    #[serde(default)]
    pub version: String,
    /// Human-readable description, used as the default risk-event description
    #[serde(default)]
    pub description: String,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether this rule is evaluated at all
    #[serde(default)]
    pub enabled: bool,
}

/// `config` section: severity, priority, hook subscriptions, throttle shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Qualitative severity
    pub severity: Severity,
    /// Relative priority; not an evaluation tie-break (rule order is unspecified)
    #[serde(default)]
    pub priority: i64,
    /// Hook names this rule subscribes to
    #[serde(default)]
    pub hooks: Vec<String>,
    /// Declared throttle shape (unenforced, see [`ThrottleConfig`])
    #[serde(default)]
    pub throttle: Option<ThrottleConfig>,
}

/// A complete, immutable rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Identity, versioning, enablement
    pub metadata: RuleMetadata,
    /// Severity, priority, hook subscriptions, throttle
    pub config: RuleConfig,
    /// Boolean trigger conditions
    #[serde(default)]
    pub triggers: RuleTriggers,
    /// Data extraction into `extracted_data`
    #[serde(default)]
    pub extract: RuleExtract,
    /// Scoring section
    pub scoring: RuleScoring,
    /// Ordered actions to run on match
    #[serde(default)]
    pub actions: Vec<RuleAction>,
    /// Address filters
    #[serde(default)]
    pub filters: RuleFilters,
}

impl Rule {
    /// Validate shape invariants from §4.1. Does not check hook resolution
    /// against a registry — that is the loader's job, since only it knows
    /// the set of registered hooks.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::InvalidRule`] if `name` is empty, if
    /// an enabled rule has no hooks, or if `triggers.operator` mixes with a
    /// condition referencing an unsupported comparison operator (the latter
    /// cannot actually occur given `CompareOp` is closed, but is checked for
    /// defense against future additions).
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.metadata.name.trim().is_empty() {
            return Err(crate::error::Error::InvalidRule {
                name: String::new(),
                reason: "metadata.name must be non-empty".to_owned(),
            });
        }
        if self.metadata.enabled && self.config.hooks.is_empty() {
            return Err(crate::error::Error::InvalidRule {
                name: self.metadata.name.clone(),
                reason: "enabled rule must declare at least one hook in config.hooks".to_owned(),
            });
        }
        Ok(())
    }
}
