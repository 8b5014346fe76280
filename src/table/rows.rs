//! Flattened view of the table: one row per (advantage, attacker hand, defender hand) leaf,
//! with the column filters the stats page offers and CSV export.

use std::io::Write;

use serde::Serialize;
use thiserror::Error;

use crate::codec::query::query_pairs;
use crate::model::{Card, ModelError};
use crate::table::{TableError, WinRatioTable, HAND_KEY_SEPARATOR};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub advantage: String,
    pub attacker_hand: Vec<String>,
    pub defender_hand: Vec<String>,
    pub win_ratio: f64,
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    advantage: &'a str,
    attacker_hand: String,
    defender_hand: String,
    win_ratio: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error(transparent)]
    Card(#[from] ModelError),
    #[error("invalid {name} '{value}': expected a number between 0 and 1")]
    InvalidBound { name: &'static str, value: String },
}

/// Row filter. Every listed card must be present in the matching hand; an empty
/// advantage list matches any advantage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFilter {
    pub advantages: Vec<String>,
    pub attacker_cards: Vec<Card>,
    pub defender_cards: Vec<Card>,
    pub min_ratio: Option<f64>,
    pub max_ratio: Option<f64>,
}

fn split_hand_key(key: &str) -> Vec<String> {
    if key.is_empty() {
        return Vec::new();
    }
    key.split(HAND_KEY_SEPARATOR).map(str::to_string).collect()
}

fn parse_cards(raw: &str) -> Result<Vec<Card>, ModelError> {
    raw.split(',')
        .map(str::trim)
        .filter(|card| !card.is_empty())
        .map(str::parse)
        .collect()
}

fn parse_bound(name: &'static str, raw: &str) -> Result<f64, FilterError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| (0.0..=1.0).contains(value))
        .ok_or_else(|| FilterError::InvalidBound {
            name,
            value: raw.to_string(),
        })
}

impl RowFilter {
    /// Reads `advantage` (repeatable), `attacker`/`defender` (comma-separated cards),
    /// `min` and `max` from a query string.
    pub fn from_query(query: &str) -> Result<Self, FilterError> {
        let mut filter = Self::default();
        for (key, value) in query_pairs(query) {
            match key.as_str() {
                "advantage" => filter.advantages.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|v| !v.is_empty())
                        .map(str::to_string),
                ),
                "attacker" => filter.attacker_cards.extend(parse_cards(&value)?),
                "defender" => filter.defender_cards.extend(parse_cards(&value)?),
                "min" => filter.min_ratio = Some(parse_bound("min", &value)?),
                "max" => filter.max_ratio = Some(parse_bound("max", &value)?),
                _ => {}
            }
        }
        Ok(filter)
    }

    pub fn matches(&self, row: &TableRow) -> bool {
        let holds_all = |hand: &[String], cards: &[Card]| {
            cards
                .iter()
                .all(|card| hand.iter().any(|held| held == card.as_str()))
        };
        (self.advantages.is_empty() || self.advantages.contains(&row.advantage))
            && holds_all(&row.attacker_hand, &self.attacker_cards)
            && holds_all(&row.defender_hand, &self.defender_cards)
            && self.min_ratio.map_or(true, |min| row.win_ratio >= min)
            && self.max_ratio.map_or(true, |max| row.win_ratio <= max)
    }
}

impl WinRatioTable {
    /// Every leaf as a row, ordered by advantage key, then attacker hand, then defender hand.
    pub fn rows(&self) -> Vec<TableRow> {
        self.entries()
            .map(|(advantage, attacker_hand, defender_hand, win_ratio)| TableRow {
                advantage: advantage.to_string(),
                attacker_hand: split_hand_key(attacker_hand),
                defender_hand: split_hand_key(defender_hand),
                win_ratio,
            })
            .collect()
    }

    pub fn filtered_rows(&self, filter: &RowFilter) -> Vec<TableRow> {
        self.rows()
            .into_iter()
            .filter(|row| filter.matches(row))
            .collect()
    }
}

pub fn write_rows_csv<W: Write>(rows: &[TableRow], writer: W) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(CsvRow {
            advantage: &row.advantage,
            attacker_hand: row.attacker_hand.join(HAND_KEY_SEPARATOR),
            defender_hand: row.defender_hand.join(HAND_KEY_SEPARATOR),
            win_ratio: row.win_ratio,
        })?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
