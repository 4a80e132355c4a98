use crate::core::{ComparisonPair, PairwiseComparison};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// In-process memo of pairwise comparisons, keyed by canonical pair
///
/// Results are pure functions of the immutable catalog, so a hit is always
/// identical to a recomputation. The TTL only bounds memory.
#[derive(Clone)]
pub struct VerdictCache {
    inner: moka::future::Cache<ComparisonPair, Arc<PairwiseComparison>>,
}

impl VerdictCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let inner = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self { inner }
    }

    /// Return the cached comparison or compute and store it
    pub async fn get_or_compute<F>(
        &self,
        pair: &ComparisonPair,
        compute: F,
    ) -> Arc<PairwiseComparison>
    where
        F: FnOnce() -> PairwiseComparison,
    {
        if let Some(hit) = self.inner.get(pair).await {
            tracing::trace!("Verdict cache hit: {}", pair.route());
            return hit;
        }

        tracing::trace!("Verdict cache miss: {}", pair.route());
        let value = Arc::new(compute());
        self.inner.insert(pair.clone(), value.clone()).await;
        value
    }

    pub async fn invalidate_all(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.inner.entry_count(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
}
