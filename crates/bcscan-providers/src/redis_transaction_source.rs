//! Redis pub/sub transaction source, standing in for the external message
//! bus (SPEC_FULL §6). Reads one raw JSON payload per message; deserializing
//! into `TransactionData` is the caller's responsibility (§6, "malformed
//! JSON is logged and skipped"), matching the shape of
//! `original_source/backend/internal/kafka/consumer.go`'s `ReadMessage` +
//! `Unmarshal` split.

use std::pin::Pin;

use async_trait::async_trait;
use bcscan_domain::ports::TransactionSource;
use futures::{Stream, StreamExt};
use tokio::sync::Mutex;

use crate::error::Result;

type MessageStream = Pin<Box<dyn Stream<Item = redis::Msg> + Send>>;

/// Subscribes once, at construction, to `topic` and hands back raw message
/// bodies on demand.
pub struct RedisTransactionSource {
    subscription: Mutex<MessageStream>,
}

impl RedisTransactionSource {
    /// Connect to `redis_url` and subscribe to `topic`.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the subscription fails.
    pub async fn connect(redis_url: &str, topic: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let mut pubsub = client.get_async_pubsub().await?;
        pubsub.subscribe(topic).await?;
        let subscription: MessageStream = Box::pin(pubsub.into_on_message());
        Ok(Self {
            subscription: Mutex::new(subscription),
        })
    }
}

#[async_trait]
impl TransactionSource for RedisTransactionSource {
    async fn next_message(&self) -> bcscan_domain::Result<Option<Vec<u8>>> {
        let mut subscription = self.subscription.lock().await;
        let Some(message) = subscription.next().await else {
            return Ok(None);
        };
        let payload: Vec<u8> = message.get_payload_bytes().to_vec();
        Ok(Some(payload))
    }
}
