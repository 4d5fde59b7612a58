use crate::catalog_source::CatalogSource;
use crate::error::{ConfigError, ConfigResult, ErrorKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Group label for model ids typed by the operator that the catalog does not know.
pub const FREEHAND_GROUP: &str = "custom/free-entry";

/// Catalog row as returned by the model listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawModel {
    pub id: String,
    pub owned_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ModelEntry {
    pub id: String,
    pub group: String,
}

impl ModelEntry {
    pub fn new(id: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            group: group.into(),
        }
    }

    pub fn freehand(id: impl Into<String>) -> Self {
        Self::new(id, FREEHAND_GROUP)
    }

    pub fn is_freehand(&self) -> bool {
        self.group == FREEHAND_GROUP
    }
}

/// Known model ids, sorted by `(group, id)` with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelCatalog {
    entries: Vec<ModelEntry>,
}

impl ModelCatalog {
    pub fn new(raw: Vec<RawModel>) -> Self {
        let mut entries: Vec<ModelEntry> = raw
            .into_iter()
            .filter(|model| !model.id.trim().is_empty())
            .map(|model| ModelEntry::new(model.id.trim(), model.owned_by))
            .collect();
        entries.sort_by(|a, b| a.group.cmp(&b.group).then_with(|| a.id.cmp(&b.id)));
        let mut seen = HashSet::new();
        entries.retain(|entry| seen.insert(entry.id.clone()));
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[ModelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn filter_by_group(&self, group: &str) -> Vec<ModelEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.group == group)
            .cloned()
            .collect()
    }

    pub fn lookup(&self, id: &str) -> Option<&ModelEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn lookup_or_freehand(&self, id: &str) -> ModelEntry {
        self.lookup(id)
            .cloned()
            .unwrap_or_else(|| ModelEntry::freehand(id))
    }

    /// Resolves candidate ids to entries in first-seen order, dropping
    /// repeats and blank tokens.
    pub fn dedupe<I, S>(&self, candidate_ids: I) -> Vec<ModelEntry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for candidate in candidate_ids {
            let id = candidate.as_ref().trim();
            if id.is_empty() || !seen.insert(id.to_string()) {
                continue;
            }
            out.push(self.lookup_or_freehand(id));
        }
        out
    }

    /// Ids listed by the provider itself; all are tagged freehand.
    pub fn provider_models<I, S>(candidate_ids: I) -> Vec<ModelEntry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ModelCatalog::empty().dedupe(candidate_ids)
    }
}

struct Snapshot {
    catalog: Arc<ModelCatalog>,
    ticket: u64,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Shared holder of the newest catalog snapshot.
///
/// Every refresh takes a ticket before fetching; a fetch that completes after
/// a newer one has been installed is discarded.
#[derive(Clone)]
pub struct ModelCatalogStore {
    inner: Arc<RwLock<Snapshot>>,
    tickets: Arc<AtomicU64>,
}

impl Default for ModelCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelCatalogStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Snapshot {
                catalog: Arc::new(ModelCatalog::empty()),
                ticket: 0,
                refreshed_at: None,
            })),
            tickets: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn snapshot(&self) -> Arc<ModelCatalog> {
        self.inner.read().await.catalog.clone()
    }

    pub async fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.refreshed_at
    }

    pub fn issue_ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Installs `catalog` unless a newer ticket already has. Returns whether
    /// the snapshot changed.
    pub async fn install(&self, ticket: u64, catalog: ModelCatalog) -> bool {
        let mut guard = self.inner.write().await;
        if ticket < guard.ticket {
            tracing::debug!(
                ticket,
                current = guard.ticket,
                "discarding stale model catalog"
            );
            return false;
        }
        guard.catalog = Arc::new(catalog);
        guard.ticket = ticket;
        guard.refreshed_at = Some(Utc::now());
        true
    }

    pub async fn replace(&self, catalog: ModelCatalog) {
        let ticket = self.issue_ticket();
        self.install(ticket, catalog).await;
    }

    /// Fetches from `source` and installs the result. On failure the current
    /// snapshot stays in place, so editing continues with freehand entries.
    pub async fn refresh(&self, source: &dyn CatalogSource) -> ConfigResult<usize> {
        let ticket = self.issue_ticket();
        match source.fetch_models().await {
            Ok(raw) => {
                let catalog = ModelCatalog::new(raw);
                let count = catalog.len();
                if self.install(ticket, catalog).await {
                    tracing::info!(models = count, "model catalog refreshed");
                }
                Ok(count)
            }
            Err(err) => {
                tracing::warn!("model catalog unavailable: {err}");
                Err(ConfigError::new(
                    ErrorKind::CatalogUnavailable,
                    "catalog_unavailable",
                    err.to_string(),
                ))
            }
        }
    }
}
