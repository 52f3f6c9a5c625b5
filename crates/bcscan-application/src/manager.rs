//! Rule manager (§4.6): the authoritative in-memory rule set and the
//! hot-reload protocol built on a shared cache and a pub/sub channel.

use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use bcscan_domain::ports::{ReloadAction, ReloadNotice, RuleCache, UpdateChannel};
use bcscan_domain::RuleSet;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::loader;

/// Owns the active rule set and coordinates reload across workers.
///
/// The active set is held behind an [`ArcSwap`] so readers obtain a
/// snapshot with one atomic load and never observe a half-swapped set
/// (§4.6 "Atomic swap", §5 "Shared state").
pub struct RuleManager {
    rules_dir: PathBuf,
    cache: Arc<dyn RuleCache>,
    channel: Arc<dyn UpdateChannel>,
    active: ArcSwap<RuleSet>,
}

impl RuleManager {
    /// Build a manager over the given rule directory and collaborators.
    /// The active set starts empty until [`RuleManager::load`] is called.
    #[must_use]
    pub fn new(rules_dir: PathBuf, cache: Arc<dyn RuleCache>, channel: Arc<dyn UpdateChannel>) -> Self {
        Self {
            rules_dir,
            cache,
            channel,
            active: ArcSwap::from_pointee(RuleSet::new()),
        }
    }

    /// Read the shared cache under `rules:all`; if populated, adopt it.
    /// Otherwise read from disk via the loader, write the result to the
    /// cache with no expiry, and adopt it (§4.6 `load`).
    pub async fn load(&self) -> Result<()> {
        if let Some(cached) = self.cache.get().await.map_err(Error::Domain)? {
            self.active.store(Arc::new(cached));
            return Ok(());
        }

        let loaded = loader::load_from_dir(&self.rules_dir)?;
        self.cache.put(&loaded).await.map_err(Error::Domain)?;
        self.active.store(Arc::new(loaded));
        Ok(())
    }

    /// A stable reference to the current rule set. Callers must not mutate
    /// the returned snapshot; a reload publishes an entirely new one.
    #[must_use]
    pub fn get(&self) -> Arc<RuleSet> {
        self.active.load_full()
    }

    /// Force a reload from disk, write it to the cache, and adopt it,
    /// then publish a reload notice on the update channel (§4.6
    /// `publish_update`). Writers write the cache before publishing, so a
    /// reader that re-reads on notification always sees this set or a
    /// later one.
    pub async fn publish_update(&self) -> Result<()> {
        let loaded = loader::load_from_dir(&self.rules_dir)?;
        self.cache.put(&loaded).await.map_err(Error::Domain)?;
        self.active.store(Arc::new(loaded));

        let notice = ReloadNotice {
            timestamp: chrono::Utc::now().timestamp(),
            action: ReloadAction::Reload,
        };
        self.channel.publish(notice).await.map_err(Error::Domain)?;
        Ok(())
    }

    /// Long-running task: subscribe to `rules:update` and re-run `load()`
    /// on every notice, forcing a re-read of the (now-authoritative)
    /// cache. Continues across transient errors; exits cleanly when
    /// `cancellation` fires (§4.6, §5 "Cancellation & timeouts").
    pub async fn subscribe_updates(&self, cancellation: CancellationToken) {
        loop {
            tokio::select! {
                () = cancellation.cancelled() => {
                    tracing::info!("rule update subscription cancelled, exiting");
                    return;
                }
                notice = self.channel.recv() => {
                    match notice {
                        Ok(Some(_notice)) => {
                            if let Err(err) = self.load().await {
                                tracing::warn!(error = %err, "failed to reload rules after update notice");
                            }
                        }
                        Ok(None) => {
                            tracing::info!("update channel closed, exiting subscription");
                            return;
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "transient error receiving update notice");
                        }
                    }
                }
            }
        }
    }
}
