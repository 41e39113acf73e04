// src/sentiment/dominant.rs
use serde::{Deserialize, Serialize};

use crate::sentiment::{SentimentLabel, SentimentTriple};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominantSentiment {
    pub label: SentimentLabel,
    pub percentage: u32,
}

/// Pick the dominant label.
///
/// Starts at NEUTRAL. POSITIVE needs a strict lead over both others, then
/// NEGATIVE is checked the same way. A positive/negative tie therefore
/// stays NEUTRAL at the neutral share, even when neutral is the smallest.
pub fn dominant(t: &SentimentTriple) -> DominantSentiment {
    let mut out = DominantSentiment {
        label: SentimentLabel::Neutral,
        percentage: t.neutral,
    };
    if t.positive > t.neutral && t.positive > t.negative {
        out = DominantSentiment {
            label: SentimentLabel::Positive,
            percentage: t.positive,
        };
    }
    if t.negative > t.positive && t.negative > t.neutral {
        out = DominantSentiment {
            label: SentimentLabel::Negative,
            percentage: t.negative,
        };
    }
    out
}

impl SentimentTriple {
    pub fn dominant(&self) -> DominantSentiment {
        dominant(self)
    }
}
