// src/store/sample.rs
//! Fixed sample dataset shown when the hosted store is unreachable or not
//! configured. Embedded at compile time.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::models::RawTopic;
use crate::store::supabase::decode_rows;
use crate::store::{PageRequest, StoreError, TopicStore};

static SAMPLE_TOPICS: Lazy<Vec<RawTopic>> = Lazy::new(|| {
    let raw = include_str!("../../data/sample_topics.json");
    match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(rows) => decode_rows(&rows),
        Err(e) => {
            tracing::error!(error = %e, "embedded sample dataset is not valid JSON");
            Vec::new()
        }
    }
});

#[derive(Debug, Clone)]
pub struct SampleStore {
    topics: Vec<RawTopic>,
}

impl SampleStore {
    /// The embedded dataset.
    pub fn embedded() -> Self {
        Self {
            topics: SAMPLE_TOPICS.clone(),
        }
    }

    /// Custom rows (tests, local tooling).
    pub fn with_topics(topics: Vec<RawTopic>) -> Self {
        Self { topics }
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn page(&self, page: PageRequest) -> Vec<RawTopic> {
        self.topics
            .iter()
            .skip(page.offset())
            .take(page.limit())
            .cloned()
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<RawTopic> {
        self.topics
            .iter()
            .find(|t| t.usable_id() == Some(id))
            .cloned()
    }
}

impl Default for SampleStore {
    fn default() -> Self {
        Self::embedded()
    }
}

#[async_trait]
impl TopicStore for SampleStore {
    async fn fetch_topics(&self, page: PageRequest) -> Result<Vec<RawTopic>, StoreError> {
        Ok(self.page(page))
    }

    async fn fetch_topic(&self, id: &str) -> Result<Option<RawTopic>, StoreError> {
        Ok(self.find(id))
    }

    fn name(&self) -> &'static str {
        "sample"
    }
}
