//! # Topic Transformer
//! Projects one storage topic row into the object every view renders.
//!
//! Sentiment source of truth, in order:
//! 1. `signal_balance` when present with a nonzero total,
//! 2. labels counted from `top_articles`,
//! 3. all zeros.
//!
//! Timestamps: `published_at`, else `created_at`, else `updated_at`. With
//! none of them the topic is still returned, with `published_at: None`,
//! and views show it as "time unknown".
//!
//! Pure and deterministic; a record that cannot be used yields `None` and
//! batch callers skip it.

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::metrics::ensure_metrics_described;
use crate::models::{RawArticle, RawTopic};
use crate::sentiment::{self, DominantSentiment, SentimentTriple};
use crate::sources::{self, SourceGroup};
use crate::text::clean_text;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTopic {
    pub id: String,
    pub title: String,
    pub category: Option<String>,
    pub summary: String,
    pub detailed_summary: Option<String>,
    pub image_url: Option<String>,
    pub sentiment: SentimentTriple,
    pub sources: Vec<RawArticle>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Where a topic's sentiment came from (for diagnostics).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentOrigin {
    SignalBalance,
    Articles,
    Empty,
}

impl DisplayTopic {
    /// Build from a raw row; `None` without a usable id.
    pub fn from_raw(raw: &RawTopic) -> Option<Self> {
        let id = raw.usable_id()?.to_string();
        let (sentiment, origin) = topic_sentiment(raw);
        tracing::trace!(target: "topic", %id, ?origin, ?sentiment, "sentiment resolved");

        Some(Self {
            id,
            title: raw.headline.as_deref().map(clean_text).unwrap_or_default(),
            category: non_blank(raw.category_tag.as_deref()).map(str::to_string),
            summary: raw.summary.as_deref().map(clean_text).unwrap_or_default(),
            detailed_summary: raw
                .detailed_summary
                .as_deref()
                .map(clean_text)
                .filter(|s| !s.is_empty()),
            image_url: non_blank(raw.image_url.as_deref()).map(str::to_string),
            sentiment,
            sources: raw.top_articles.clone(),
            published_at: raw.published_at.or(raw.created_at).or(raw.updated_at),
            updated_at: raw.updated_at,
        })
    }

    pub fn dominant(&self) -> DominantSentiment {
        sentiment::dominant(&self.sentiment)
    }

    pub fn source_groups(&self) -> Vec<SourceGroup> {
        sources::group(&self.sources)
    }
}

/// Resolve the sentiment triple and report which rule supplied it.
pub fn topic_sentiment(raw: &RawTopic) -> (SentimentTriple, SentimentOrigin) {
    if let Some(balance) = raw.signal_balance.filter(|b| b.total() > 0.0) {
        return (sentiment::normalize(&balance), SentimentOrigin::SignalBalance);
    }
    if !raw.top_articles.is_empty() {
        let counts = sentiment::count(&raw.top_articles);
        return (sentiment::normalize(&counts.into()), SentimentOrigin::Articles);
    }
    (SentimentTriple::ZERO, SentimentOrigin::Empty)
}

/// Transform an optional record; missing or id-less input is `None`.
pub fn transform(raw: Option<&RawTopic>) -> Option<DisplayTopic> {
    raw.and_then(DisplayTopic::from_raw)
}

/// Transform an undecoded storage row. `null`, non-objects and rows that
/// fail to decode are `None`.
pub fn transform_value(row: &Value) -> Option<DisplayTopic> {
    if row.is_null() {
        return None;
    }
    match RawTopic::deserialize(row) {
        Ok(raw) => DisplayTopic::from_raw(&raw),
        Err(e) => {
            tracing::debug!(target: "topic", error = %e, "undecodable topic row");
            None
        }
    }
}

/// Transform many rows, dropping the ones that cannot be used.
pub fn transform_batch(rows: &[RawTopic]) -> Vec<DisplayTopic> {
    let out: Vec<DisplayTopic> = rows.iter().filter_map(DisplayTopic::from_raw).collect();
    record_batch(rows.len(), out.len());
    out
}

/// Same as [`transform_batch`] for undecoded JSON rows.
pub fn transform_values(rows: &[Value]) -> Vec<DisplayTopic> {
    let out: Vec<DisplayTopic> = rows.iter().filter_map(transform_value).collect();
    record_batch(rows.len(), out.len());
    out
}

fn record_batch(seen: usize, kept: usize) {
    ensure_metrics_described();
    let dropped = seen - kept;
    counter!("topics_transformed_total").increment(kept as u64);
    if dropped > 0 {
        counter!("topics_dropped_total").increment(dropped as u64);
        tracing::debug!(target: "topic", seen, kept, dropped, "dropped unusable topic rows");
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignalBalance;
    use crate::sentiment::SentimentLabel;
    use chrono::TimeZone;
    use serde_json::json;

    fn art(label: Option<&str>) -> RawArticle {
        RawArticle {
            sentiment_label: label.map(str::to_string),
            ..Default::default()
        }
    }

    fn topic(id: &str) -> RawTopic {
        RawTopic {
            topic_id: Some(id.into()),
            ..Default::default()
        }
    }

    #[test]
    fn none_and_empty_are_skipped() {
        assert!(transform(None).is_none());
        assert!(transform(Some(&RawTopic::default())).is_none());
        assert!(transform_value(&json!(null)).is_none());
        assert!(transform_value(&json!({})).is_none());
        assert!(transform_value(&json!("nope")).is_none());
    }

    #[test]
    fn render_safe_defaults() {
        let t = DisplayTopic::from_raw(&topic("t1")).unwrap();
        assert_eq!(t.title, "");
        assert_eq!(t.summary, "");
        assert_eq!(t.category, None);
        assert_eq!(t.detailed_summary, None);
        assert_eq!(t.sentiment, SentimentTriple::ZERO);
        assert!(t.published_at.is_none());
    }

    #[test]
    fn blank_category_is_none() {
        let mut raw = topic("t1");
        raw.category_tag = Some("  ".into());
        assert_eq!(DisplayTopic::from_raw(&raw).unwrap().category, None);
        raw.category_tag = Some(" politics ".into());
        assert_eq!(
            DisplayTopic::from_raw(&raw).unwrap().category.as_deref(),
            Some("politics")
        );
    }

    #[test]
    fn detailed_summary_is_cleaned() {
        let mut raw = topic("t1");
        raw.detailed_summary = Some("<p>Rates &amp; jobs</p>\n\n<p>held</p>".into());
        assert_eq!(
            DisplayTopic::from_raw(&raw).unwrap().detailed_summary.as_deref(),
            Some("Rates & jobs held")
        );
        raw.detailed_summary = Some("<br/> &nbsp; ".into());
        assert_eq!(DisplayTopic::from_raw(&raw).unwrap().detailed_summary, None);
    }

    #[test]
    fn signal_balance_wins_over_articles() {
        let mut raw = topic("t1");
        raw.signal_balance = Some(SignalBalance::new(10.0, 10.0, 80.0));
        raw.top_articles = vec![art(Some("positive")), art(Some("positive"))];
        let (s, origin) = topic_sentiment(&raw);
        assert_eq!(s, SentimentTriple::new(10, 10, 80));
        assert_eq!(origin, SentimentOrigin::SignalBalance);
    }

    #[test]
    fn zero_balance_falls_back_to_articles() {
        let mut raw = topic("t1");
        raw.signal_balance = Some(SignalBalance::default());
        raw.top_articles = vec![art(Some("negative"))];
        let (s, origin) = topic_sentiment(&raw);
        assert_eq!(s, SentimentTriple::new(0, 0, 1));
        assert_eq!(origin, SentimentOrigin::Articles);
    }

    #[test]
    fn timestamp_fallback_chain() {
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let t3 = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();

        let mut raw = topic("t1");
        raw.updated_at = Some(t3);
        assert_eq!(DisplayTopic::from_raw(&raw).unwrap().published_at, Some(t3));
        raw.created_at = Some(t2);
        assert_eq!(DisplayTopic::from_raw(&raw).unwrap().published_at, Some(t2));
        raw.published_at = Some(t1);
        let t = DisplayTopic::from_raw(&raw).unwrap();
        assert_eq!(t.published_at, Some(t1));
        assert_eq!(t.updated_at, Some(t3));
    }

    #[test]
    fn dominant_from_counted_articles() {
        let mut raw = topic("t1");
        raw.top_articles = vec![
            art(Some("positive")),
            art(Some("positive")),
            art(Some("positive")),
            art(Some("Negative")),
            art(None),
        ];
        let t = DisplayTopic::from_raw(&raw).unwrap();
        assert_eq!(t.sentiment, SentimentTriple::new(3, 1, 1));
        assert_eq!(t.dominant().label, SentimentLabel::Positive);
        assert_eq!(t.dominant().percentage, 3);
    }

    #[test]
    fn batch_drops_bad_rows_only() {
        let rows = vec![topic("a"), RawTopic::default(), topic("b")];
        let out = transform_batch(&rows);
        let ids: Vec<_> = out.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn serializes_camel_case() {
        let v = serde_json::to_value(DisplayTopic::from_raw(&topic("t1")).unwrap()).unwrap();
        assert!(v.get("detailedSummary").is_some());
        assert!(v.get("publishedAt").is_some());
        assert_eq!(v["category"], json!(null));
    }
}
