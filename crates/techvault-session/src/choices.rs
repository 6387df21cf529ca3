//! Choices cache: the server's dropdown enumerations, fetched once.

use std::sync::Arc;

use serde_json::Value;
use techvault_client::{ApiClient, paths};
use techvault_core::error::VaultResult;
use techvault_core::http::Transport;
use techvault_core::models::choices::{ChoiceCategory, ChoiceOption, ChoiceSet};
use techvault_core::storage::KeyValueStore;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Default)]
struct CacheState {
    choices: Option<Arc<ChoiceSet>>,
    last_error: Option<String>,
}

/// Lazily fetches `/api/meta/choices/` and answers label/option lookups.
///
/// Lookups never fail: if the fetch fails the cache serves
/// [`ChoiceSet::fallback`] and keeps the error for display.
pub struct ChoicesCache<T: Transport, S: KeyValueStore> {
    client: ApiClient<T, S>,
    state: Mutex<CacheState>,
}

impl<T: Transport, S: KeyValueStore> ChoicesCache<T, S> {
    pub fn new(client: ApiClient<T, S>) -> Self {
        Self {
            client,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// The cached set, fetching it on first use.
    pub async fn choices(&self) -> Arc<ChoiceSet> {
        // Held across the fetch so concurrent first callers share one request.
        let mut state = self.state.lock().await;
        if let Some(choices) = &state.choices {
            return Arc::clone(choices);
        }
        let choices = match self.fetch().await {
            Ok(set) => {
                state.last_error = None;
                Arc::new(set)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load choices, using fallback values");
                state.last_error = Some(e.to_string());
                Arc::new(ChoiceSet::fallback())
            }
        };
        state.choices = Some(Arc::clone(&choices));
        choices
    }

    /// Re-fetch unconditionally. On failure the previously cached set
    /// (or the fallback) stays in place and the error is returned.
    pub async fn refresh(&self) -> VaultResult<Arc<ChoiceSet>> {
        let mut state = self.state.lock().await;
        match self.fetch().await {
            Ok(set) => {
                let choices = Arc::new(set);
                state.choices = Some(Arc::clone(&choices));
                state.last_error = None;
                Ok(choices)
            }
            Err(e) => {
                warn!(error = %e, "Failed to refresh choices");
                state.last_error = Some(e.to_string());
                if state.choices.is_none() {
                    state.choices = Some(Arc::new(ChoiceSet::fallback()));
                }
                Err(e)
            }
        }
    }

    pub async fn label(&self, category: ChoiceCategory, value: &str) -> String {
        self.choices().await.label(category, value)
    }

    /// Label lookup by category name; unknown names echo `value`.
    pub async fn label_by_name(&self, category: &str, value: &str) -> String {
        self.choices().await.label_by_name(category, value)
    }

    pub async fn options(&self, category: ChoiceCategory) -> Vec<ChoiceOption> {
        self.choices().await.options(category)
    }

    /// Message from the most recent failed fetch, if the last attempt failed.
    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.last_error.clone()
    }

    /// Forget the cached set so the next lookup fetches again.
    pub async fn invalidate(&self) {
        *self.state.lock().await = CacheState::default();
    }

    async fn fetch(&self) -> VaultResult<ChoiceSet> {
        let doc: Value = self.client.get(paths::CHOICES).await?;
        let (set, skipped) = ChoiceSet::from_document(&doc);
        if !skipped.is_empty() {
            debug!(?skipped, "Ignored unknown choice categories");
        }
        Ok(set)
    }
}
