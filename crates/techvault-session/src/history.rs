//! Version history and restore flow for versioned entities.
//!
//! Works with any [`VersionSource`]: documentation, password entries and
//! configurations share it. The server owns the append-only semantics;
//! this type only lists, toggles detail views, and sequences
//! restore-then-reload.

use std::collections::BTreeSet;

use techvault_client::services::VersionSource;
use techvault_core::EntityId;
use techvault_core::error::{VaultError, VaultResult};
use techvault_core::models::version::EntityVersion;
use tracing::{info, warn};

/// Called after a successful restore with `(entity_id, version_number)`
/// so the owner can reload the live entity.
pub type RestoreListener = Box<dyn Fn(EntityId, u32) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The confirmation was declined; nothing was sent.
    Cancelled,
    Restored { version_number: u32 },
    /// The server restored the version but the list could not be
    /// reloaded; [`VersionHistory::versions`] is out of date.
    RestoredStale {
        version_number: u32,
        reload_error: String,
    },
}

impl RestoreOutcome {
    /// The restored version number, unless the restore was cancelled.
    pub fn restored_version(&self) -> Option<u32> {
        match self {
            RestoreOutcome::Cancelled => None,
            RestoreOutcome::Restored { version_number }
            | RestoreOutcome::RestoredStale { version_number, .. } => Some(*version_number),
        }
    }
}

pub struct VersionHistory<V: VersionSource> {
    source: V,
    entity_id: EntityId,
    versions: Vec<EntityVersion>,
    expanded: BTreeSet<u32>,
    on_restored: Option<RestoreListener>,
}

impl<V: VersionSource> VersionHistory<V> {
    pub fn new(source: V, entity_id: EntityId) -> Self {
        Self {
            source,
            entity_id,
            versions: Vec::new(),
            expanded: BTreeSet::new(),
            on_restored: None,
        }
    }

    pub fn with_listener(mut self, listener: impl Fn(EntityId, u32) + Send + Sync + 'static) -> Self {
        self.on_restored = Some(Box::new(listener));
        self
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Fetch the versions. Server order is kept as is.
    pub async fn load(&mut self) -> VaultResult<&[EntityVersion]> {
        self.versions = self.source.list_versions(self.entity_id).await?;
        let present: BTreeSet<u32> = self.versions.iter().map(|v| v.version_number).collect();
        self.expanded.retain(|n| present.contains(n));
        Ok(&self.versions)
    }

    pub fn versions(&self) -> &[EntityVersion] {
        &self.versions
    }

    pub fn version(&self, version_number: u32) -> Option<&EntityVersion> {
        self.versions
            .iter()
            .find(|v| v.version_number == version_number)
    }

    /// Flip the inline detail view of one version. Returns the new state.
    pub fn toggle(&mut self, version_number: u32) -> bool {
        if self.expanded.remove(&version_number) {
            false
        } else {
            self.expanded.insert(version_number);
            true
        }
    }

    pub fn is_expanded(&self, version_number: u32) -> bool {
        self.expanded.contains(&version_number)
    }

    /// Restore `version_number` once `confirm` approves it, then reload
    /// the list and notify the listener.
    ///
    /// Versions not in the loaded list are rejected without a server call.
    pub async fn restore<F>(&mut self, version_number: u32, confirm: F) -> VaultResult<RestoreOutcome>
    where
        F: FnOnce(&EntityVersion) -> bool,
    {
        let version = self
            .version(version_number)
            .ok_or_else(|| VaultError::NotFound {
                entity: "version".into(),
                id: version_number.to_string(),
            })?;
        if !confirm(version) {
            return Ok(RestoreOutcome::Cancelled);
        }

        self.source
            .restore_version(self.entity_id, version_number)
            .await?;
        info!(entity_id = self.entity_id, version_number, "Restored version");

        // The new version exists from here on; a failed reload only leaves
        // the local list stale.
        let reload_error = match self.load().await {
            Ok(_) => None,
            Err(e) => {
                warn!(entity_id = self.entity_id, error = %e, "Reloading versions after restore failed");
                Some(e.to_string())
            }
        };
        if let Some(listener) = &self.on_restored {
            listener(self.entity_id, version_number);
        }
        Ok(match reload_error {
            None => RestoreOutcome::Restored { version_number },
            Some(reload_error) => RestoreOutcome::RestoredStale {
                version_number,
                reload_error,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    fn version(n: u32, content: &str) -> EntityVersion {
        serde_json::from_value(json!({
            "version_number": n,
            "snapshot": {"content": content},
            "created_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    /// In-memory source that appends a copy on restore, like the server.
    #[derive(Default)]
    struct FakeSource {
        versions: Mutex<Vec<EntityVersion>>,
        restored: Mutex<Vec<(EntityId, u32)>>,
        /// Fail every listing once a restore has happened.
        fail_after_restore: bool,
    }

    impl VersionSource for FakeSource {
        async fn list_versions(&self, _id: EntityId) -> VaultResult<Vec<EntityVersion>> {
            if self.fail_after_restore && !self.restored.lock().unwrap().is_empty() {
                return Err(VaultError::Transport("timeout".into()));
            }
            Ok(self.versions.lock().unwrap().clone())
        }

        async fn restore_version(&self, id: EntityId, version_number: u32) -> VaultResult<()> {
            self.restored.lock().unwrap().push((id, version_number));
            let mut versions = self.versions.lock().unwrap();
            let source = versions
                .iter()
                .find(|v| v.version_number == version_number)
                .cloned()
                .unwrap();
            let next = versions.iter().map(|v| v.version_number).max().unwrap_or(0) + 1;
            versions.insert(0, version(next, source.snapshot["content"].as_str().unwrap()));
            Ok(())
        }
    }

    fn source() -> FakeSource {
        let source = FakeSource::default();
        *source.versions.lock().unwrap() = vec![version(2, "b"), version(1, "a")];
        source
    }

    #[tokio::test]
    async fn toggle_flips_detail_view() {
        let src = source();
        let mut history = VersionHistory::new(&src, 5);
        history.load().await.unwrap();

        assert!(history.toggle(1));
        assert!(history.is_expanded(1));
        assert!(!history.toggle(1));
        assert!(!history.is_expanded(1));
    }

    #[tokio::test]
    async fn declined_confirmation_sends_nothing() {
        let src = source();
        let mut history = VersionHistory::new(&src, 5);
        history.load().await.unwrap();

        let outcome = history.restore(1, |_| false).await.unwrap();

        assert_eq!(outcome, RestoreOutcome::Cancelled);
        assert!(src.restored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn restore_appends_and_reloads() {
        let src = source();
        let mut history = VersionHistory::new(&src, 5);
        history.load().await.unwrap();

        let outcome = history.restore(1, |v| v.version_number == 1).await.unwrap();

        assert_eq!(outcome, RestoreOutcome::Restored { version_number: 1 });
        assert_eq!(*src.restored.lock().unwrap(), vec![(5, 1)]);
        let numbers: Vec<_> = history.versions().iter().map(|v| v.version_number).collect();
        assert_eq!(numbers, vec![3, 2, 1]);
        assert_eq!(history.versions()[0].snapshot["content"], "a");
    }

    #[tokio::test]
    async fn unknown_version_is_rejected_locally() {
        let src = source();
        let mut history = VersionHistory::new(&src, 5);
        history.load().await.unwrap();

        let err = history.restore(9, |_| true).await.unwrap_err();
        assert!(matches!(err, VaultError::NotFound { .. }));
        assert!(src.restored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_reload_still_reports_the_restore() {
        let mut src = source();
        src.fail_after_restore = true;
        let calls = std::sync::Arc::new(Mutex::new(Vec::new()));
        let seen = std::sync::Arc::clone(&calls);
        let mut history =
            VersionHistory::new(&src, 5).with_listener(move |id, n| seen.lock().unwrap().push((id, n)));
        history.load().await.unwrap();

        let outcome = history.restore(1, |_| true).await.unwrap();

        assert_eq!(outcome.restored_version(), Some(1));
        assert!(matches!(
            outcome,
            RestoreOutcome::RestoredStale { ref reload_error, .. } if reload_error.contains("timeout")
        ));
        assert_eq!(*calls.lock().unwrap(), vec![(5, 1)]);
        assert_eq!(*src.restored.lock().unwrap(), vec![(5, 1)]);
        // The stale list is kept rather than emptied.
        assert_eq!(history.versions().len(), 2);
    }
}
