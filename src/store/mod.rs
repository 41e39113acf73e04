// src/store/mod.rs
//! Topic storage: the hosted PostgREST backend and the embedded sample set.

pub mod sample;
pub mod supabase;

use crate::models::RawTopic;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};

pub use sample::SampleStore;
pub use supabase::SupabaseStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Transport-level failure (DNS, TLS, timeout, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON shape
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One page of topics, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size: page_size.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.page as usize * self.page_size as usize
    }

    pub fn limit(&self) -> usize {
        self.page_size as usize
    }
}

#[async_trait::async_trait]
pub trait TopicStore: Send + Sync {
    async fn fetch_topics(&self, page: PageRequest) -> Result<Vec<RawTopic>, StoreError>;
    async fn fetch_topic(&self, id: &str) -> Result<Option<RawTopic>, StoreError>;
    fn name(&self) -> &'static str;
}

/// Fetch a page, timing it; errors are logged and counted, then returned.
pub async fn fetch_topics_timed(
    store: &dyn TopicStore,
    page: PageRequest,
) -> Result<Vec<RawTopic>, StoreError> {
    crate::metrics::ensure_metrics_described();
    let t0 = std::time::Instant::now();
    let res = store.fetch_topics(page).await;
    histogram!("store_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

    if let Err(e) = &res {
        tracing::warn!(error = %e, store = store.name(), page = page.page, "store fetch failed");
        counter!("store_fetch_errors_total").increment(1);
    }
    res
}

/// Storage boundary that never fails: any error becomes an empty page.
pub async fn fetch_topics_or_empty(store: &dyn TopicStore, page: PageRequest) -> Vec<RawTopic> {
    fetch_topics_timed(store, page).await.unwrap_or_default()
}
