//! Combining independent attacker win ratios across several encounters.
//!
//! A missing ratio is NaN and stays NaN through every combinator, so one unresolved
//! encounter makes the aggregate unresolved instead of being skipped.

use serde::Serialize;

use crate::model::Encounter;

/// Probability that every attack succeeds. Empty input gives 1.
pub fn combine_and(ratios: &[f64]) -> f64 {
    ratios.iter().product()
}

/// Probability that at least one attack succeeds. Empty input gives 0.
pub fn combine_or(ratios: &[f64]) -> f64 {
    1.0 - ratios.iter().map(|ratio| 1.0 - ratio).product::<f64>()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioCategory {
    Good,
    Medium,
    Bad,
    NoData,
}

impl RatioCategory {
    /// Above 0.7 is good, above 0.5 medium, anything else bad.
    pub fn of(ratio: f64) -> Self {
        if ratio.is_nan() {
            Self::NoData
        } else if ratio > 0.7 {
            Self::Good
        } else if ratio > 0.5 {
            Self::Medium
        } else {
            Self::Bad
        }
    }
}

/// Ratio as a percentage rounded to two decimals, without trailing zeros: 0.123456 -> "12.35".
pub fn format_percent(ratio: f64) -> String {
    if ratio.is_nan() {
        return "no data".to_string();
    }
    let rounded = (ratio * 100.0 * 100.0).round() / 100.0;
    format!("{rounded}")
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Summary {
    pub all_succeed: f64,
    pub any_succeeds: f64,
}

impl Summary {
    pub fn from_ratios(ratios: &[f64]) -> Self {
        Self {
            all_succeed: combine_and(ratios),
            any_succeeds: combine_or(ratios),
        }
    }

    pub fn of(encounters: &[Encounter]) -> Self {
        let ratios: Vec<f64> = encounters.iter().map(Encounter::attacker_win_ratio).collect();
        Self::from_ratios(&ratios)
    }
}
