//! Weighted lead scoring with a human-readable breakdown.

use leadgen_core::{Record, ScoringWeights};

use crate::keywords::INDUSTRY_FIT_KEYWORDS;

/// Fraction of the size weight earned by each headcount tier, highest first.
const SIZE_TIERS: &[(u32, f64)] = &[(1000, 1.0), (200, 0.7), (50, 0.4)];

/// Score one record.
///
/// Four additive terms, each contributing between zero and its full weight:
/// L&D signal, size tier, industry fit and contactability. The breakdown
/// lists the terms that contributed, in that order, joined by `"; "`, and is
/// empty when none did. The score is never negative and never exceeds
/// [`ScoringWeights::total`].
#[must_use]
pub fn score_record(record: &Record, weights: &ScoringWeights) -> (f64, String) {
    let mut score = 0.0;
    let mut parts: Vec<String> = Vec::new();
    let mut add = |label: &str, value: f64, points: fn(f64) -> String| {
        if value > 0.0 {
            score += value;
            parts.push(format!("{label} (+{})", points(value)));
        }
    };

    if record.has_ld_signals {
        add("L&D signals", weights.has_ld, weight_points);
    }

    add(
        "Size tier",
        weights.size * size_factor(record.employees_est),
        tier_points,
    );

    if record
        .industry
        .as_deref()
        .is_some_and(|industry| INDUSTRY_FIT_KEYWORDS.matches(industry))
    {
        add("Industry fit", weights.industry_fit, weight_points);
    }

    if record.is_contactable() {
        add("Contactable", weights.contactability, weight_points);
    }

    (score, parts.join("; "))
}

/// Unknown headcount counts as zero.
fn size_factor(employees_est: Option<u32>) -> f64 {
    let employees = employees_est.unwrap_or(0);
    SIZE_TIERS
        .iter()
        .find(|(min, _)| employees >= *min)
        .map_or(0.0, |(_, factor)| *factor)
}

/// A configured weight, shortest form that reads back exactly: `4.0`, `0.25`.
fn weight_points(value: f64) -> String {
    format!("{value:?}")
}

/// A scaled size weight, one decimal: `2.1`.
fn tier_points(value: f64) -> String {
    format!("{value:.1}")
}

/// Round to two decimals for storage.
#[must_use]
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
