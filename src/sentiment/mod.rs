// src/sentiment/mod.rs
//! Sentiment aggregation: label classification, counting, percentage
//! normalization and the dominant-label rule.
//!
//! Everything here is pure and shared by every view; there is exactly one
//! implementation of each rule.

pub mod counter;
pub mod dominant;
pub mod normalize;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use counter::{classify, count, SentimentCounts};
pub use dominant::{dominant, DominantSentiment};
pub use normalize::normalize;

/// Closed set of sentiment labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    /// Strict parse of a stored label (trimmed, any case).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "neutral" => Some(Self::Neutral),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized breakdown, each component an integer in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SentimentTriple {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl SentimentTriple {
    pub const ZERO: SentimentTriple = SentimentTriple {
        positive: 0,
        neutral: 0,
        negative: 0,
    };

    pub fn new(positive: u32, neutral: u32, negative: u32) -> Self {
        Self {
            positive,
            neutral,
            negative,
        }
    }

    pub fn get(&self, label: SentimentLabel) -> u32 {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    pub fn sum(&self) -> u32 {
        self.positive + self.neutral + self.negative
    }

    pub fn is_zero(&self) -> bool {
        self.sum() == 0
    }

    /// Largest-remainder projection that sums to exactly 100 (bar widths).
    ///
    /// The normalizer output keeps independent rounding; this is only for
    /// layout. Zero stays zero. Remainder ties go to positive, then
    /// neutral, then negative.
    pub fn exact_hundred(&self) -> SentimentTriple {
        let total = self.sum();
        if total == 0 {
            return Self::ZERO;
        }
        let parts = SentimentLabel::ALL.map(|l| self.get(l));
        let mut floors = [0u32; 3];
        let mut rems = [(0u32, 0usize); 3];
        for (i, p) in parts.iter().enumerate() {
            let scaled = p * 100;
            floors[i] = scaled / total;
            rems[i] = (scaled % total, i);
        }
        let mut short = 100 - floors.iter().sum::<u32>();
        // stable sort keeps positive → neutral → negative on ties
        rems.sort_by(|a, b| b.0.cmp(&a.0));
        for (_, i) in rems {
            if short == 0 {
                break;
            }
            floors[i] += 1;
            short -= 1;
        }
        Self::new(floors[0], floors[1], floors[2])
    }
}

/// Filter applied to per-outlet article lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentimentFilter {
    #[default]
    All,
    Only(SentimentLabel),
}

impl SentimentFilter {
    pub fn matches(self, label: SentimentLabel) -> bool {
        match self {
            Self::All => true,
            Self::Only(want) => want == label,
        }
    }
}

impl FromStr for SentimentFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        SentimentLabel::parse(s)
            .map(Self::Only)
            .ok_or_else(|| anyhow::anyhow!("unknown sentiment filter '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_parse_is_case_insensitive() {
        assert_eq!(SentimentLabel::parse("Negative"), Some(SentimentLabel::Negative));
        assert_eq!(SentimentLabel::parse(" POSITIVE "), Some(SentimentLabel::Positive));
        assert_eq!(SentimentLabel::parse("mixed"), None);
    }

    #[test]
    fn label_serializes_uppercase() {
        let v = serde_json::to_value(SentimentLabel::Neutral).unwrap();
        assert_eq!(v, serde_json::json!("NEUTRAL"));
    }

    #[test]
    fn exact_hundred_fixes_rounding_drift() {
        // 33 + 33 + 33 = 99 after independent rounding
        let t = SentimentTriple::new(33, 33, 33).exact_hundred();
        assert_eq!(t.sum(), 100);
        assert_eq!(t, SentimentTriple::new(34, 33, 33));

        let small = SentimentTriple::new(3, 2, 1).exact_hundred();
        assert_eq!(small, SentimentTriple::new(50, 33, 17));

        assert_eq!(SentimentTriple::ZERO.exact_hundred(), SentimentTriple::ZERO);
    }

    #[test]
    fn filter_parse() {
        assert_eq!("all".parse::<SentimentFilter>().unwrap(), SentimentFilter::All);
        assert_eq!(
            "Neutral".parse::<SentimentFilter>().unwrap(),
            SentimentFilter::Only(SentimentLabel::Neutral)
        );
        assert!("angry".parse::<SentimentFilter>().is_err());
    }
}
