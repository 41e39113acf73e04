// src/sentiment/normalize.rs
//! Counts-or-percentages → integer percentage triple.
//!
//! Dual mode, kept exactly as the views have always rendered it:
//! - total == 0        → all zeros
//! - 0 < total <= 100  → input is taken as percentages already; each
//!   component is rounded, nothing is rescaled
//! - total > 100       → input is raw counts; rescaled to percentages
//!
//! A small raw-count input such as (3, 2, 1) therefore comes back as
//! (3, 2, 1) rather than (50, 33, 17). Components are rounded
//! independently and may not sum to exactly 100; see
//! `SentimentTriple::exact_hundred` for bar widths.

use crate::models::SignalBalance;
use crate::sentiment::SentimentTriple;

/// Normalize a balance of counts or percentages.
pub fn normalize(balance: &SignalBalance) -> SentimentTriple {
    let b = balance.sanitized();
    let total = b.positive + b.neutral + b.negative;

    if total <= 0.0 {
        return SentimentTriple::ZERO;
    }

    if total <= 100.0 {
        return SentimentTriple::new(
            round_pct(b.positive),
            round_pct(b.neutral),
            round_pct(b.negative),
        );
    }

    SentimentTriple::new(
        round_pct(b.positive / total * 100.0),
        round_pct(b.neutral / total * 100.0),
        round_pct(b.negative / total * 100.0),
    )
}

/// Round half up into `0..=100`.
fn round_pct(x: f64) -> u32 {
    (x + 0.5).floor().clamp(0.0, 100.0) as u32
}
