//! Result sets: the publications of one search, kept for the analytic views.
//!
//! - In-memory only, keyed by UUID
//! - Re-running a search with a known id replaces that set's publications
//! - Background cleanup of sets idle for longer than the timeout

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::error::{ViewError, ViewResult};
use crate::models::Publication;

/// Idle time after which result sets are removed.
pub const RESULT_TIMEOUT: Duration = Duration::from_secs(3600); // 1 hour

/// Cleanup interval for stale result sets.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Publications from one search.
pub struct ResultSet {
    /// Unique identifier.
    pub id: String,
    /// Human-readable description of the search that produced it.
    query: RwLock<String>,
    /// Publications in API order.
    publications: RwLock<Vec<Publication>>,
    /// When the set was created.
    pub created_at: Instant,
    /// Last read or write.
    last_active: RwLock<Instant>,
}

impl ResultSet {
    fn new(id: String, query: String, publications: Vec<Publication>) -> Self {
        Self {
            id,
            query: RwLock::new(query),
            publications: RwLock::new(publications),
            created_at: Instant::now(),
            last_active: RwLock::new(Instant::now()),
        }
    }

    /// A copy of the publications.
    pub async fn publications(&self) -> Vec<Publication> {
        self.touch().await;
        self.publications.read().await.clone()
    }

    /// Number of publications.
    pub async fn len(&self) -> usize {
        self.publications.read().await.len()
    }

    /// Whether the set holds no publications.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Description of the producing search.
    pub async fn query(&self) -> String {
        self.query.read().await.clone()
    }

    /// Replace the contents with a new search's results.
    pub async fn replace(&self, query: String, publications: Vec<Publication>) {
        *self.query.write().await = query;
        *self.publications.write().await = publications;
        self.touch().await;
    }

    /// Apply `f` to the publications in place (used by enrichment).
    pub async fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Vec<Publication>) -> R,
    {
        let result = f(&mut *self.publications.write().await);
        self.touch().await;
        result
    }

    async fn is_stale(&self, timeout: Duration) -> bool {
        self.last_active.read().await.elapsed() > timeout
    }

    async fn touch(&self) {
        *self.last_active.write().await = Instant::now();
    }
}

impl std::fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultSet")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// All live result sets.
#[derive(Clone)]
pub struct ResultStore {
    sets: Arc<RwLock<HashMap<String, Arc<ResultSet>>>>,
    timeout: Duration,
}

impl ResultStore {
    /// Create an empty store with the default idle timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(RESULT_TIMEOUT)
    }

    /// Create an empty store with a custom idle timeout.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { sets: Arc::new(RwLock::new(HashMap::new())), timeout }
    }

    /// Store a new result set and return it.
    pub async fn create(&self, query: impl Into<String>, publications: Vec<Publication>) -> Arc<ResultSet> {
        let id = uuid::Uuid::new_v4().to_string();
        let set = Arc::new(ResultSet::new(id.clone(), query.into(), publications));

        self.sets.write().await.insert(id, set.clone());

        tracing::info!(result_id = %set.id, "Created result set");
        set
    }

    /// Replace the set `id` if it still exists, otherwise create a new one.
    pub async fn store(
        &self,
        id: Option<&str>,
        query: impl Into<String>,
        publications: Vec<Publication>,
    ) -> Arc<ResultSet> {
        let query = query.into();
        if let Some(id) = id {
            if let Some(set) = self.get(id).await {
                set.replace(query, publications).await;
                tracing::info!(result_id = %id, "Replaced result set");
                return set;
            }
        }
        self.create(query, publications).await
    }

    /// Look up a set by id.
    pub async fn get(&self, id: &str) -> Option<Arc<ResultSet>> {
        self.sets.read().await.get(id).cloned()
    }

    /// Look up a set, failing with `NotFound` when it is unknown or expired.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::NotFound` if no set has this id.
    pub async fn require(&self, id: &str) -> ViewResult<Arc<ResultSet>> {
        self.get(id)
            .await
            .ok_or_else(|| ViewError::not_found(format!("result set '{id}' (run a search first)")))
    }

    /// Remove a set.
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.sets.write().await.remove(id).is_some();
        if removed {
            tracing::info!(result_id = %id, "Removed result set");
        }
        removed
    }

    /// Drop sets idle for longer than the timeout.
    pub async fn cleanup_stale(&self) -> usize {
        let mut to_remove = Vec::new();

        {
            let sets = self.sets.read().await;
            for (id, set) in sets.iter() {
                if set.is_stale(self.timeout).await {
                    to_remove.push(id.clone());
                }
            }
        }

        let count = to_remove.len();
        if count > 0 {
            let mut sets = self.sets.write().await;
            for id in to_remove {
                sets.remove(&id);
                tracing::info!(result_id = %id, "Cleaned up stale result set");
            }
        }

        count
    }

    /// Number of live sets.
    pub async fn count(&self) -> usize {
        self.sets.read().await.len()
    }

    /// Start the background cleanup task.
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                let cleaned = self.cleanup_stale().await;
                if cleaned > 0 {
                    tracing::debug!(count = cleaned, "Result set cleanup completed");
                }
            }
        });
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultStore").field("timeout", &self.timeout).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn papers(n: usize) -> Vec<Publication> {
        (0..n).map(|i| Publication { id: format!("W{i}"), ..Default::default() }).collect()
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = ResultStore::new();
        let set = store.create("graphs", papers(3)).await;

        assert!(!set.id.is_empty());
        assert_eq!(store.count().await, 1);
        assert_eq!(store.get(&set.id).await.unwrap().len().await, 3);
        assert!(store.get("nonexistent").await.is_none());
        assert!(matches!(store.require("nonexistent").await, Err(ViewError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_replaces_existing() {
        let store = ResultStore::new();
        let first = store.create("graphs", papers(3)).await;

        let second = store.store(Some(&first.id), "trees", papers(1)).await;
        assert_eq!(second.id, first.id);
        assert_eq!(store.count().await, 1);
        assert_eq!(first.query().await, "trees");
        assert_eq!(first.len().await, 1);

        let third = store.store(Some("expired"), "forests", papers(2)).await;
        assert_ne!(third.id, first.id);
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn test_update_in_place() {
        let store = ResultStore::new();
        let set = store.create("q", papers(2)).await;
        let changed = set
            .update(|pubs| {
                pubs[0].abstract_text = Some("filled".into());
                1
            })
            .await;
        assert_eq!(changed, 1);
        assert!(set.publications().await[0].has_abstract());
    }

    #[tokio::test]
    async fn test_cleanup_stale() {
        let store = ResultStore::with_timeout(Duration::ZERO);
        let set = store.create("q", papers(1)).await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(store.cleanup_stale().await, 1);
        assert!(store.get(&set.id).await.is_none());
        assert!(!store.remove(&set.id).await);
    }
}
