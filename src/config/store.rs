// src/config/store.rs
use serde::{Deserialize, Serialize};

fn default_topics_table() -> String {
    "topics".to_string()
}
fn default_articles_table() -> String {
    "articles".to_string()
}
fn default_id_column() -> String {
    "topic_id".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_page_size() -> u32 {
    20
}

pub const MAX_PAGE_SIZE: u32 = 100;

/// Hosted store connection. Both `supabase_url` and `anon_key` must be set
/// for the live store to be used; otherwise the feed serves sample data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub supabase_url: Option<String>,
    /// "ENV" means: read from SUPABASE_ANON_KEY
    #[serde(default)]
    pub anon_key: Option<String>,
    #[serde(default = "default_topics_table")]
    pub topics_table: String,
    #[serde(default = "default_articles_table")]
    pub articles_table: String,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            supabase_url: None,
            anon_key: None,
            topics_table: default_topics_table(),
            articles_table: default_articles_table(),
            id_column: default_id_column(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    pub fn is_configured(&self) -> bool {
        self.supabase_url.is_some() && self.anon_key.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}
