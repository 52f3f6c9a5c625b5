//! Port traits: the seams the application layer drives and the
//! infrastructure/providers layers implement (§6 external interfaces).
//!
//! The domain never depends on a concrete transport; every collaborator
//! named in §6 is expressed here as a trait object boundary.

use async_trait::async_trait;

use crate::error::Result;
use crate::risk_event::RiskEvent;
use crate::rule_set::RuleSet;

/// The shared rule cache: key `rules:all` holds the JSON-serialized
/// enabled rule set (§6).
#[async_trait]
pub trait RuleCache: Send + Sync {
    /// Read the currently cached rule set, if any key is present.
    async fn get(&self) -> Result<Option<RuleSet>>;

    /// Write the rule set to the cache with no expiry (§4.6 `load`).
    async fn put(&self, rules: &RuleSet) -> Result<()>;
}

/// A reload notification (§6): `{"timestamp": <epoch seconds>, "action": "reload"}`.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ReloadNotice {
    /// Epoch-second timestamp of the write that triggered this notice
    pub timestamp: i64,
    /// Always `"reload"` today; kept as a string for forward compatibility
    pub action: ReloadAction,
}

/// The notification's `action` discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadAction {
    /// Rule set was reloaded and cached
    Reload,
}

/// The rule-update pub/sub channel (`rules:update`, §6).
#[async_trait]
pub trait UpdateChannel: Send + Sync {
    /// Publish a reload notice.
    async fn publish(&self, notice: ReloadNotice) -> Result<()>;

    /// Block until the next notice arrives, or the subscription ends.
    /// Returns `None` when the channel has been closed (e.g. on shutdown).
    async fn recv(&self) -> Result<Option<ReloadNotice>>;
}

/// The inbound transaction bus (§6): one message per confirmed transaction,
/// keyed by `tx_hash`, JSON-encoded as `TransactionData`.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Block until the next raw message payload arrives, or the source is
    /// closed. Deserialization is the caller's responsibility so that a
    /// malformed payload can be logged and skipped without tearing down the
    /// subscription (§6 "Malformed JSON is logged and skipped").
    async fn next_message(&self) -> Result<Option<Vec<u8>>>;
}

/// The outbound risk-event sink (§6): `create(event) -> result`, an
/// asynchronous best-effort collaborator.
#[async_trait]
pub trait RiskEventSink: Send + Sync {
    /// Persist one risk event.
    async fn create(&self, event: &RiskEvent) -> Result<()>;
}
