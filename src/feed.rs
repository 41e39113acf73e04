//! # Feed service
//! Fetches one page (or one topic) from the hosted store and projects it
//! into display topics. When the store is missing or fails, the embedded
//! sample dataset is served instead and the result says so, so the UI can
//! show its "using sample data" notice. No retries.
//!
//! Each call builds a fresh list; nothing is cached or merged.

use metrics::counter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::RawTopic;
use crate::store::{self, PageRequest, SampleStore, SupabaseStore, TopicStore};
use crate::topic::{transform_batch, DisplayTopic};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub topics: Vec<DisplayTopic>,
    pub page: u32,
    pub page_size: u32,
    pub has_more: bool,
    pub using_sample_data: bool,
}

#[derive(Clone)]
pub struct FeedService {
    primary: Option<Arc<dyn TopicStore>>,
    sample: SampleStore,
    page_size: u32,
}

impl FeedService {
    pub fn new(primary: Option<Arc<dyn TopicStore>>, sample: SampleStore, page_size: u32) -> Self {
        Self {
            primary,
            sample,
            page_size: page_size.max(1),
        }
    }

    /// Live Supabase store when configured, sample data otherwise.
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let primary = SupabaseStore::from_config(&cfg.store)?
            .map(|s| Arc::new(s) as Arc<dyn TopicStore>);
        match &primary {
            Some(p) => tracing::info!(store = p.name(), "feed backed by hosted store"),
            None => tracing::warn!("no store configured; serving sample data"),
        }
        Ok(Self::new(primary, SampleStore::embedded(), cfg.feed.page_size))
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub async fn load_page(&self, page: u32) -> FeedPage {
        let req = PageRequest::new(page, self.page_size);

        let (rows, using_sample_data) = match &self.primary {
            Some(store) => match store::fetch_topics_timed(store.as_ref(), req).await {
                Ok(rows) => (rows, false),
                Err(_) => (self.sample_page(req), true),
            },
            None => (self.sample_page(req), true),
        };

        let has_more = rows.len() >= req.limit();
        let topics = transform_batch(&rows);
        tracing::debug!(page, topics = topics.len(), using_sample_data, "feed page built");

        FeedPage {
            topics,
            page,
            page_size: self.page_size,
            has_more,
            using_sample_data,
        }
    }

    /// One topic by id, plus whether it came from sample data.
    pub async fn load_topic(&self, id: &str) -> Option<(DisplayTopic, bool)> {
        let (raw, using_sample_data) = match &self.primary {
            Some(store) => match store.fetch_topic(id).await {
                Ok(found) => (found, false),
                Err(e) => {
                    tracing::warn!(error = %e, store = store.name(), %id, "topic lookup failed");
                    counter!("store_fetch_errors_total").increment(1);
                    (self.sample_topic(id), true)
                }
            },
            None => (self.sample_topic(id), true),
        };
        raw.as_ref()
            .and_then(DisplayTopic::from_raw)
            .map(|t| (t, using_sample_data))
    }

    fn sample_page(&self, req: PageRequest) -> Vec<RawTopic> {
        counter!("feed_sample_fallback_total").increment(1);
        self.sample.page(req)
    }

    fn sample_topic(&self, id: &str) -> Option<RawTopic> {
        counter!("feed_sample_fallback_total").increment(1);
        self.sample.find(id)
    }
}
