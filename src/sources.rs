//! # Source Grouper
//! Groups a topic's flat article list by outlet for the per-source view.
//!
//! - Key is the raw outlet name (no case folding); blank names go to
//!   `"Unknown"`.
//! - Articles inside a group are newest-first; missing timestamps sort as
//!   the Unix epoch, i.e. oldest.
//! - Groups are ordered by their latest article, newest outlet first.
//!   Ties keep first-encounter order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::RawArticle;
use crate::sentiment::{self, SentimentFilter, SentimentTriple};
use crate::timestamps::epoch_key;

pub const UNKNOWN_OUTLET: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceGroup {
    pub outlet_name: String,
    pub articles: Vec<RawArticle>,
    pub latest_timestamp: Option<DateTime<Utc>>,
}

impl SourceGroup {
    fn new(outlet_name: String) -> Self {
        Self {
            outlet_name,
            articles: Vec::new(),
            latest_timestamp: None,
        }
    }

    /// Sort articles newest-first and refresh `latest_timestamp`.
    fn settle(&mut self) {
        self.articles
            .sort_by_key(|a| std::cmp::Reverse(epoch_key(a.published_at)));
        self.latest_timestamp = self.articles.iter().filter_map(|a| a.published_at).max();
    }

    /// Per-outlet breakdown (count, then the usual normalization).
    pub fn sentiment(&self) -> SentimentTriple {
        sentiment::normalize(&sentiment::count(&self.articles).into())
    }
}

/// Grouping key for one article.
pub fn outlet_key(article: &RawArticle) -> &str {
    match article.source_name.as_deref() {
        Some(name) if !name.trim().is_empty() => name,
        _ => UNKNOWN_OUTLET,
    }
}

/// Group `articles` by outlet.
pub fn group(articles: &[RawArticle]) -> Vec<SourceGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<SourceGroup> = Vec::new();

    for a in articles {
        let key = outlet_key(a);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(SourceGroup::new(key.to_string()));
            groups.len() - 1
        });
        groups[slot].articles.push(a.clone());
    }

    for g in groups.iter_mut() {
        g.settle();
    }
    sort_groups(&mut groups);
    groups
}

/// Keep only articles matching `filter`; drop groups left empty and
/// re-sort, since recency can change once members are removed.
pub fn filter_by_sentiment(filter: SentimentFilter, groups: &[SourceGroup]) -> Vec<SourceGroup> {
    let mut out: Vec<SourceGroup> = groups
        .iter()
        .filter_map(|g| {
            let articles: Vec<RawArticle> = g
                .articles
                .iter()
                .filter(|a| filter.matches(sentiment::classify(a)))
                .cloned()
                .collect();
            if articles.is_empty() {
                return None;
            }
            let mut kept = SourceGroup {
                outlet_name: g.outlet_name.clone(),
                articles,
                latest_timestamp: None,
            };
            kept.settle();
            Some(kept)
        })
        .collect();

    sort_groups(&mut out);
    out
}

fn sort_groups(groups: &mut [SourceGroup]) {
    // stable: ties keep encounter order
    groups.sort_by_key(|g| std::cmp::Reverse(epoch_key(g.latest_timestamp)));
}
