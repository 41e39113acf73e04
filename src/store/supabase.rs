// src/store/supabase.rs
//! PostgREST reader for the hosted topics/articles tables.
//!
//! One request per page: topics ordered by `created_at desc`, with the
//! related article rows embedded under `top_articles`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::StoreConfig;
use crate::models::RawTopic;
use crate::store::{PageRequest, StoreError, TopicStore};

pub struct SupabaseStore {
    client: reqwest::Client,
    rest_url: String,
    anon_key: String,
    topics_table: String,
    articles_table: String,
    id_column: String,
}

impl SupabaseStore {
    /// Build from config; `Ok(None)` when URL or key is not configured.
    pub fn from_config(cfg: &StoreConfig) -> Result<Option<Self>, StoreError> {
        let (Some(url), Some(key)) = (cfg.supabase_url.as_deref(), cfg.anon_key.as_deref()) else {
            return Ok(None);
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Some(Self {
            client,
            rest_url: format!("{}/rest/v1", url.trim_end_matches('/')),
            anon_key: key.to_string(),
            topics_table: cfg.topics_table.clone(),
            articles_table: cfg.articles_table.clone(),
            id_column: cfg.id_column.clone(),
        }))
    }

    fn select_clause(&self) -> String {
        format!("*,top_articles:{}(*)", self.articles_table)
    }

    async fn get_rows(&self, query: &[(&str, String)]) -> Result<Vec<RawTopic>, StoreError> {
        let url = format!("{}/{}", self.rest_url, self.topics_table);
        let resp = self
            .client
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("accept", "application/json")
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body: truncate(&body, 300),
            });
        }

        let rows: Vec<Value> = serde_json::from_str(&body)?;
        Ok(decode_rows(&rows))
    }
}

/// Decode rows one by one so a single bad row does not sink the page.
pub(crate) fn decode_rows(rows: &[Value]) -> Vec<RawTopic> {
    rows.iter()
        .filter_map(|row| match RawTopic::deserialize(row) {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!(target: "store", error = %e, "skipping undecodable topic row");
                None
            }
        })
        .collect()
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[async_trait]
impl TopicStore for SupabaseStore {
    async fn fetch_topics(&self, page: PageRequest) -> Result<Vec<RawTopic>, StoreError> {
        let query = [
            ("select", self.select_clause()),
            ("order", "created_at.desc".to_string()),
            ("offset", page.offset().to_string()),
            ("limit", page.limit().to_string()),
        ];
        let rows = self.get_rows(&query).await?;
        tracing::debug!(target: "store", page = page.page, rows = rows.len(), "fetched topics");
        Ok(rows)
    }

    async fn fetch_topic(&self, id: &str) -> Result<Option<RawTopic>, StoreError> {
        let query = [
            ("select", self.select_clause()),
            (self.id_column.as_str(), format!("eq.{id}")),
            ("limit", "1".to_string()),
        ];
        Ok(self.get_rows(&query).await?.into_iter().next())
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}
