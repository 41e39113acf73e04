//! # Storage records
//!
//! Row shapes as they come back from the hosted store. Both the snake_case
//! column names and the camelCase names used by the older front-end are
//! accepted; output is always camelCase.
//!
//! Decoding is forgiving: ids may be strings or integers, unparseable
//! timestamps become `None`, a `null` article list is empty, and a malformed
//! signal balance is dropped rather than failing the row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::timestamps::parse_timestamp;

/// One article as stored, read-only to the core.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub id: String,
    pub source_name: Option<String>,
    pub headline: String,
    pub url: String,
    /// "positive" | "negative" | "neutral", any case; anything else is neutral.
    pub sentiment_label: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

impl<'de> Deserialize<'de> for RawArticle {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let mut row = Row::deserialize(d)?;
        Ok(Self {
            id: id_from_value(row.take(&["id"])).unwrap_or_default(),
            source_name: text(row.take(&["sourceName", "source_name"])),
            headline: text(row.take(&["headline", "title"])).unwrap_or_default(),
            url: text(row.take(&["url"])).unwrap_or_default(),
            sentiment_label: text(row.take(&["sentimentLabel", "sentiment_label"])),
            published_at: timestamp(row.take(&["publishedAt", "published_at"])),
            excerpt: text(row.take(&["excerpt"])),
            favicon: text(row.take(&["favicon"])),
        })
    }
}

/// Precomputed per-topic sentiment, either counts or percentages.
/// Missing, `null` or non-numeric components read as 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalBalance {
    #[serde(default, deserialize_with = "de_component")]
    pub positive: f64,
    #[serde(default, deserialize_with = "de_component")]
    pub neutral: f64,
    #[serde(default, deserialize_with = "de_component")]
    pub negative: f64,
}

impl SignalBalance {
    pub fn new(positive: f64, neutral: f64, negative: f64) -> Self {
        Self {
            positive,
            neutral,
            negative,
        }
    }

    /// Copy with negative and non-finite components replaced by 0.
    pub fn sanitized(self) -> Self {
        fn clean(x: f64) -> f64 {
            if x.is_finite() && x > 0.0 {
                x
            } else {
                0.0
            }
        }
        Self::new(clean(self.positive), clean(self.neutral), clean(self.negative))
    }

    pub fn total(&self) -> f64 {
        let s = self.sanitized();
        s.positive + s.neutral + s.negative
    }
}

/// One topic cluster row with its nested articles.
///
/// Several storage columns may feed one field (`topic_id` next to a table's
/// own `id`, `headline` next to `title`); the first non-null column in the
/// listed order wins.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTopic {
    pub topic_id: Option<String>,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub detailed_summary: Option<String>,
    pub category_tag: Option<String>,
    pub image_url: Option<String>,
    pub signal_balance: Option<SignalBalance>,
    pub top_articles: Vec<RawArticle>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<'de> Deserialize<'de> for RawTopic {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let mut row = Row::deserialize(d)?;
        Ok(Self {
            topic_id: id_from_value(row.take(&["topicId", "topic_id", "id"])),
            headline: text(row.take(&["headline", "title"])),
            summary: text(row.take(&["summary"])),
            detailed_summary: text(row.take(&["detailedSummary", "detailed_summary"])),
            category_tag: text(row.take(&["categoryTag", "category_tag"])),
            image_url: text(row.take(&["imageUrl", "image_url"])),
            signal_balance: balance(row.take(&["signalBalance", "signal_balance"])),
            top_articles: articles(row.take(&["topArticles", "top_articles"])),
            published_at: timestamp(row.take(&["publishedAt", "published_at"])),
            created_at: timestamp(row.take(&["createdAt", "created_at"])),
            updated_at: timestamp(row.take(&["updatedAt", "updated_at"])),
        })
    }
}

impl RawTopic {
    /// Trimmed, non-blank identifier.
    pub fn usable_id(&self) -> Option<&str> {
        self.topic_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A JSON object row; anything else fails to decode.
#[derive(Deserialize)]
#[serde(transparent)]
struct Row(Map<String, Value>);

impl Row {
    /// First non-null value among `keys`.
    fn take(&mut self, keys: &[&str]) -> Option<Value> {
        keys.iter()
            .find_map(|k| self.0.remove(*k).filter(|v| !v.is_null()))
    }
}

fn id_from_value(v: Option<Value>) -> Option<String> {
    match v {
        Some(Value::String(s)) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn text(v: Option<Value>) -> Option<String> {
    match v {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

fn timestamp(v: Option<Value>) -> Option<DateTime<Utc>> {
    match v {
        Some(Value::String(s)) => parse_timestamp(&s),
        _ => None,
    }
}

fn balance(v: Option<Value>) -> Option<SignalBalance> {
    let v = v?;
    match SignalBalance::deserialize(v) {
        Ok(b) => Some(b),
        Err(e) => {
            tracing::debug!(target: "models", error = %e, "ignoring malformed signal balance");
            None
        }
    }
}

/// Article list; `null` is empty and undecodable entries are skipped.
fn articles(v: Option<Value>) -> Vec<RawArticle> {
    let Some(Value::Array(items)) = v else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| RawArticle::deserialize(item).ok())
        .collect()
}

fn de_component<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snake_case_row_decodes() {
        let row = json!({
            "topic_id": 42,
            "headline": "Rates on hold",
            "category_tag": "economy",
            "signal_balance": {"positive": 10, "neutral": 10, "negative": 80},
            "top_articles": [
                {"id": "a1", "source_name": "Reuters", "sentiment_label": "Negative",
                 "published_at": "2024-05-01T12:00:00Z"}
            ],
            "created_at": "2024-05-01 11:00:00+00"
        });
        let t: RawTopic = serde_json::from_value(row).unwrap();
        assert_eq!(t.usable_id(), Some("42"));
        assert_eq!(t.top_articles.len(), 1);
        assert_eq!(t.top_articles[0].source_name.as_deref(), Some("Reuters"));
        assert!(t.top_articles[0].published_at.is_some());
        assert!(t.created_at.is_some());
        assert_eq!(t.signal_balance.unwrap().negative, 80.0);
    }

    #[test]
    fn camel_case_row_decodes() {
        let row = json!({
            "topicId": "abc",
            "topArticles": [{"id": 7, "sourceName": "AP", "sentimentLabel": null}],
            "updatedAt": "not a date"
        });
        let t: RawTopic = serde_json::from_value(row).unwrap();
        assert_eq!(t.usable_id(), Some("abc"));
        assert_eq!(t.top_articles[0].id, "7");
        assert!(t.updated_at.is_none());
    }

    #[test]
    fn null_articles_and_blank_id() {
        let t: RawTopic =
            serde_json::from_value(json!({"id": "   ", "top_articles": null})).unwrap();
        assert!(t.usable_id().is_none());
        assert!(t.top_articles.is_empty());
    }

    #[test]
    fn table_id_next_to_topic_id_and_title_next_to_headline() {
        let row = json!({
            "id": "9b1c7e4a-0000-4000-8000-000000000001",
            "topic_id": "t-77",
            "headline": "Strike ends",
            "title": "strike-ends",
            "detailed_summary": null,
            "detailedSummary": "Both sides signed."
        });
        let t: RawTopic = serde_json::from_value(row).unwrap();
        assert_eq!(t.usable_id(), Some("t-77"));
        assert_eq!(t.headline.as_deref(), Some("Strike ends"));
        assert_eq!(t.detailed_summary.as_deref(), Some("Both sides signed."));

        let only_table_id: RawTopic = serde_json::from_value(json!({"id": 5, "title": "T"})).unwrap();
        assert_eq!(only_table_id.usable_id(), Some("5"));
        assert_eq!(only_table_id.headline.as_deref(), Some("T"));
    }

    #[test]
    fn null_balance_components_read_as_zero() {
        let row = json!({
            "topic_id": "t",
            "signal_balance": {"positive": 5, "neutral": null, "negative": 2}
        });
        let t: RawTopic = serde_json::from_value(row).unwrap();
        assert_eq!(t.signal_balance, Some(SignalBalance::new(5.0, 0.0, 2.0)));
    }

    #[test]
    fn malformed_balance_and_articles_do_not_sink_the_row() {
        let row = json!({
            "topic_id": "t",
            "signal_balance": "n/a",
            "top_articles": [{"id": "a1", "sentiment_label": "positive"}, 42, null]
        });
        let t: RawTopic = serde_json::from_value(row).unwrap();
        assert!(t.signal_balance.is_none());
        assert_eq!(t.top_articles.len(), 1);
        assert_eq!(t.top_articles[0].id, "a1");
    }

    #[test]
    fn non_object_rows_fail() {
        assert!(serde_json::from_value::<RawTopic>(json!("nope")).is_err());
        assert!(serde_json::from_value::<RawTopic>(json!([1, 2])).is_err());
    }

    #[test]
    fn serialized_topic_decodes_back() {
        let row = json!({"topic_id": "t", "top_articles": [{"id": "a", "source_name": "AP"}]});
        let t: RawTopic = serde_json::from_value(row).unwrap();
        let again: RawTopic = serde_json::from_value(serde_json::to_value(&t).unwrap()).unwrap();
        assert_eq!(again, t);
    }

    #[test]
    fn balance_total_ignores_junk_components() {
        let b = SignalBalance::new(5.0, -3.0, f64::NAN);
        assert_eq!(b.total(), 5.0);
    }
}
