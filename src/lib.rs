// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod display;
pub mod feed;
pub mod metrics;
pub mod models;
pub mod sentiment;
pub mod sources;
pub mod store;
pub mod text;
pub mod timestamps;
pub mod topic;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::feed::{FeedPage, FeedService};
pub use crate::models::{RawArticle, RawTopic, SignalBalance};
pub use crate::sentiment::{
    count, dominant, normalize, DominantSentiment, SentimentCounts, SentimentFilter,
    SentimentLabel, SentimentTriple,
};
pub use crate::sources::{filter_by_sentiment, group, SourceGroup};
pub use crate::topic::{transform, transform_batch, transform_value, DisplayTopic};

use tracing::info;

/// Build the full HTTP app from config (without `/metrics`, which needs the
/// process-wide recorder installed by the binary).
pub fn app(cfg: &config::AppConfig) -> anyhow::Result<axum::Router> {
    let feed = FeedService::from_config(cfg)?;
    info!(page_size = feed.page_size(), "feed ready");
    Ok(router(AppState::new(feed)))
}
