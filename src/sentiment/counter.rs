// src/sentiment/counter.rs
use serde::{Deserialize, Serialize};

use crate::models::{RawArticle, SignalBalance};
use crate::sentiment::SentimentLabel;

/// Raw label counts (not percentages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl SentimentCounts {
    pub fn total(&self) -> u32 {
        self.positive + self.neutral + self.negative
    }

    fn bump(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }
}

impl From<SentimentCounts> for SignalBalance {
    fn from(c: SentimentCounts) -> Self {
        SignalBalance::new(c.positive as f64, c.neutral as f64, c.negative as f64)
    }
}

/// Bucket one article. Missing or unrecognized labels are neutral.
pub fn classify(article: &RawArticle) -> SentimentLabel {
    article
        .sentiment_label
        .as_deref()
        .and_then(SentimentLabel::parse)
        .unwrap_or(SentimentLabel::Neutral)
}

/// Tabulate labels across `articles`.
pub fn count<'a, I>(articles: I) -> SentimentCounts
where
    I: IntoIterator<Item = &'a RawArticle>,
{
    let mut out = SentimentCounts::default();
    for a in articles {
        out.bump(classify(a));
    }
    out
}
