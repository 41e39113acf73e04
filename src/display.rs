//! Display lookups shared by the presentation layers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::sentiment::SentimentLabel;

/// Visual variant for a sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tone {
    pub css_class: &'static str,
    pub color: &'static str,
    pub text: &'static str,
}

// Indexed by `tone_index`.
const TONES: [Tone; 3] = [
    Tone {
        css_class: "sentiment-positive",
        color: "#16a34a",
        text: "Positive",
    },
    Tone {
        css_class: "sentiment-neutral",
        color: "#6b7280",
        text: "Neutral",
    },
    Tone {
        css_class: "sentiment-negative",
        color: "#dc2626",
        text: "Negative",
    },
];

const fn tone_index(label: SentimentLabel) -> usize {
    match label {
        SentimentLabel::Positive => 0,
        SentimentLabel::Neutral => 1,
        SentimentLabel::Negative => 2,
    }
}

impl SentimentLabel {
    pub fn tone(self) -> &'static Tone {
        &TONES[tone_index(self)]
    }
}

pub const TIME_UNKNOWN: &str = "time unknown";

/// Relative age for list views. A missing timestamp is never guessed.
pub fn time_ago(ts: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(ts) = ts else {
        return TIME_UNKNOWN.to_string();
    };
    let secs = (now - ts).num_seconds();
    match secs {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s => format!("{}d ago", s / 86_400),
    }
}
