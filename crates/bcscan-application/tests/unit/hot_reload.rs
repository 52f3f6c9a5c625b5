//! Scenario 5 (§8): hot-reload coherence through the manager.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bcscan_application::RuleManager;
use bcscan_domain::error::Result as DomainResult;
use bcscan_domain::ports::{ReloadAction, ReloadNotice, RuleCache, UpdateChannel};
use bcscan_domain::RuleSet;

#[derive(Default)]
struct FakeCache {
    stored: Mutex<Option<RuleSet>>,
}

#[async_trait]
impl RuleCache for FakeCache {
    async fn get(&self) -> DomainResult<Option<RuleSet>> {
        Ok(self.stored.lock().expect("lock").clone())
    }

    async fn put(&self, rules: &RuleSet) -> DomainResult<()> {
        *self.stored.lock().expect("lock") = Some(rules.clone());
        Ok(())
    }
}

#[derive(Default)]
struct FakeChannel {
    published: Mutex<Vec<ReloadNotice>>,
}

#[async_trait]
impl UpdateChannel for FakeChannel {
    async fn publish(&self, notice: ReloadNotice) -> DomainResult<()> {
        self.published.lock().expect("lock").push(notice);
        Ok(())
    }

    async fn recv(&self) -> DomainResult<Option<ReloadNotice>> {
        Ok(None)
    }
}

fn rule_file(name: &str) -> String {
    format!(
        "metadata:\n  name: {name}\n  enabled: true\nconfig:\n  severity: low\n  hooks: [h]\nscoring:\n  base_score: 1\n"
    )
}

#[tokio::test]
async fn reload_published_to_cache_is_observed_after_notice() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("r1.yaml"), rule_file("r1")).expect("write r1");

    let cache = Arc::new(FakeCache::default());
    let channel = Arc::new(FakeChannel::default());
    let manager = RuleManager::new(dir.path().to_path_buf(), cache.clone(), channel.clone());

    // S1 = {r1}
    manager.load().await.expect("initial load");
    assert_eq!(manager.get().len(), 1);
    let before = manager.get();

    // A transaction whose evaluation completed before the notice keeps using S1.
    assert_eq!(before.len(), 1);

    // Admin adds r2 on disk and triggers reload: write cache, then publish.
    std::fs::write(dir.path().join("r2.yaml"), rule_file("r2")).expect("write r2");
    manager.publish_update().await.expect("publish update");

    assert_eq!(channel.published.lock().expect("lock").len(), 1);
    assert!(cache
        .get()
        .await
        .expect("cache read")
        .expect("cache populated")
        .get("r2")
        .is_some());

    // A transaction arriving after the notice is observed re-reads and sees S2.
    manager.load().await.expect("reload after notice");
    assert_eq!(manager.get().len(), 2);

    // The snapshot captured before the reload is untouched (atomic swap).
    assert_eq!(before.len(), 1);
}

#[tokio::test]
async fn reload_notice_action_is_always_reload() {
    let notice = ReloadNotice {
        timestamp: 0,
        action: ReloadAction::Reload,
    };
    assert_eq!(notice.action, ReloadAction::Reload);
}
