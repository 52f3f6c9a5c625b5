//! Redis-backed rule cache and update channel (SPEC_FULL §6), grounded on
//! `original_source/backend/internal/cache/redis.go`'s `Set`/`Get`/`Publish`/
//! `Subscribe` methods, reimplemented against the `redis` crate's async API.

use std::pin::Pin;

use async_trait::async_trait;
use bcscan_domain::ports::{ReloadNotice, RuleCache, UpdateChannel};
use bcscan_domain::rule_set::RuleSet;
use futures::{Stream, StreamExt};
use redis::AsyncCommands;
use tokio::sync::Mutex;

use crate::error::Result;

/// Cache key for the currently active, JSON-serialized rule set (§6).
const RULES_KEY: &str = "rules:all";

/// Pub/sub channel carrying [`ReloadNotice`] payloads (§6).
const UPDATE_CHANNEL: &str = "rules:update";

type NoticeStream = Pin<Box<dyn Stream<Item = redis::Msg> + Send>>;

/// A Redis connection manager shared by the cache and update-channel ports.
///
/// `ConnectionManager` transparently reconnects and is cheap to clone, so
/// one is kept for cache reads/writes and publishes. The pub/sub
/// subscription owns a dedicated connection, opened once at construction,
/// since a subscribed connection cannot issue other commands.
pub struct RedisRuleCache {
    manager: redis::aio::ConnectionManager,
    subscription: Mutex<NoticeStream>,
}

impl RedisRuleCache {
    /// Connect to the Redis instance at `redis_url` and subscribe to the
    /// update channel.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the initial connection fails.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let manager = client.get_connection_manager().await?;

        let mut pubsub = client.get_async_pubsub().await?;
        pubsub.subscribe(UPDATE_CHANNEL).await?;
        let subscription: NoticeStream = Box::pin(pubsub.into_on_message());

        Ok(Self {
            manager,
            subscription: Mutex::new(subscription),
        })
    }
}

#[async_trait]
impl RuleCache for RedisRuleCache {
    async fn get(&self) -> bcscan_domain::Result<Option<RuleSet>> {
        let mut conn = self.manager.clone();
        let raw: Option<String> = conn.get(RULES_KEY).await.map_err(crate::Error::from)?;
        match raw {
            Some(json) => {
                let rules = serde_json::from_str(&json).map_err(crate::Error::from)?;
                Ok(Some(rules))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, rules: &RuleSet) -> bcscan_domain::Result<()> {
        let json = serde_json::to_string(rules).map_err(crate::Error::from)?;
        let mut conn = self.manager.clone();
        let (): () = conn.set(RULES_KEY, json).await.map_err(crate::Error::from)?;
        Ok(())
    }
}

#[async_trait]
impl UpdateChannel for RedisRuleCache {
    async fn publish(&self, notice: ReloadNotice) -> bcscan_domain::Result<()> {
        let payload = serde_json::to_string(&notice).map_err(crate::Error::from)?;
        let mut conn = self.manager.clone();
        let (): () = conn
            .publish(UPDATE_CHANNEL, payload)
            .await
            .map_err(crate::Error::from)?;
        Ok(())
    }

    async fn recv(&self) -> bcscan_domain::Result<Option<ReloadNotice>> {
        let mut subscription = self.subscription.lock().await;
        let Some(message) = subscription.next().await else {
            return Ok(None);
        };
        let payload: String = message.get_payload().map_err(crate::Error::from)?;
        let notice = serde_json::from_str(&payload).map_err(crate::Error::from)?;
        Ok(Some(notice))
    }
}
