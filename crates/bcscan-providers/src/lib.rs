//! Concrete adapters for the domain-layer ports (SPEC_FULL §4.2, §6):
//! Redis-backed rule cache/update channel, a Redis pub/sub transaction
//! source standing in for the real bus, and a Postgres risk-event sink.

pub mod error;
pub mod redis_cache;
pub mod redis_transaction_source;
pub mod risk_event_sink;

pub use error::{Error, Result};
pub use redis_cache::RedisRuleCache;
pub use redis_transaction_source::RedisTransactionSource;
pub use risk_event_sink::PostgresRiskEventSink;
