//! Precomputed attacker win ratios keyed by advantage, attacker hand, and defender hand.
//!
//! The table is produced elsewhere and loaded read-only from JSON shaped as
//! `{ "<advantage>": { "<attacker hand>": { "<defender hand>": ratio } } }`,
//! where a hand key is its card identifiers sorted and joined with `|`.

pub mod rows;
pub mod validate;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Hand, Ship, Side};

pub use rows::{write_rows_csv, FilterError, RowFilter, TableRow};
pub use validate::{validate_table, Severity, TableDiagnostic, TableReport};

pub const HAND_KEY_SEPARATOR: &str = "|";
pub const DEFAULT_TABLE_PATH: &str = "data/results.json";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("unable to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse win ratio table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unable to write csv: {0}")]
    Csv(#[from] csv::Error),
}

type DefenderHands = BTreeMap<String, f64>;
type AttackerHands = BTreeMap<String, DefenderHands>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WinRatioTable {
    entries: BTreeMap<String, AttackerHands>,
}

/// Which level of a lookup had no entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupMiss {
    Advantage { key: String },
    /// The advantage key is absent but a differently signed spelling of it is present.
    SignFormat { key: String, present: String },
    AttackerHand { advantage: String, hand: String },
    DefenderHand {
        advantage: String,
        attacker_hand: String,
        hand: String,
    },
}

/// Signed decimal difference `attacker - defender`, e.g. "-3", "0", "3".
pub fn advantage_key(attacker: Ship, defender: Ship) -> String {
    (i32::from(attacker.value()) - i32::from(defender.value())).to_string()
}

/// Cards sorted by identifier and joined with `|`; an empty hand is "".
pub fn hand_key(hand: &Hand) -> String {
    hand.join(HAND_KEY_SEPARATOR)
}

impl WinRatioTable {
    pub fn from_json_str(raw: &str) -> Result<Self, TableError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_json_str(&raw)?;
        log::info!(
            "loaded win ratio table from {} ({} entries)",
            path.display(),
            table.len()
        );
        Ok(table)
    }

    pub fn insert(
        &mut self,
        advantage: &str,
        attacker_hand: &str,
        defender_hand: &str,
        ratio: f64,
    ) {
        self.entries
            .entry(advantage.to_string())
            .or_default()
            .entry(attacker_hand.to_string())
            .or_default()
            .insert(defender_hand.to_string(), ratio);
    }

    pub fn lookup(&self, advantage: &str, attacker_hand: &str, defender_hand: &str) -> Option<f64> {
        self.entries
            .get(advantage)?
            .get(attacker_hand)?
            .get(defender_hand)
            .copied()
    }

    /// Attacker win ratio for the two sides, or NaN when any level of the lookup is missing.
    pub fn resolve(&self, attacker: &Side, defender: &Side) -> f64 {
        let advantage = advantage_key(attacker.ship, defender.ship);
        let attacker_hand = hand_key(&attacker.hand);
        let defender_hand = hand_key(&defender.hand);
        match self.lookup(&advantage, &attacker_hand, &defender_hand) {
            Some(ratio) => ratio,
            None => {
                match self.diagnose(&advantage, &attacker_hand, &defender_hand) {
                    Some(LookupMiss::SignFormat { key, present }) => log::warn!(
                        "no table entry for advantage '{key}' but '{present}' exists; check the table's sign formatting"
                    ),
                    Some(miss) => log::debug!("win ratio lookup missed: {miss:?}"),
                    None => {}
                }
                f64::NAN
            }
        }
    }

    /// Explains why a lookup fails. `None` means the entry exists.
    pub fn diagnose(
        &self,
        advantage: &str,
        attacker_hand: &str,
        defender_hand: &str,
    ) -> Option<LookupMiss> {
        let Some(by_attacker) = self.entries.get(advantage) else {
            if let Some(present) = sign_variants(advantage)
                .into_iter()
                .find(|variant| self.entries.contains_key(variant))
            {
                return Some(LookupMiss::SignFormat {
                    key: advantage.to_string(),
                    present,
                });
            }
            return Some(LookupMiss::Advantage {
                key: advantage.to_string(),
            });
        };
        let Some(by_defender) = by_attacker.get(attacker_hand) else {
            return Some(LookupMiss::AttackerHand {
                advantage: advantage.to_string(),
                hand: attacker_hand.to_string(),
            });
        };
        if by_defender.contains_key(defender_hand) {
            return None;
        }
        Some(LookupMiss::DefenderHand {
            advantage: advantage.to_string(),
            attacker_hand: attacker_hand.to_string(),
            hand: defender_hand.to_string(),
        })
    }

    pub fn advantage_keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of leaf ratios.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, &str, &str, f64)> {
        self.entries.iter().flat_map(|(advantage, by_attacker)| {
            by_attacker.iter().flat_map(move |(attacker_hand, by_defender)| {
                by_defender.iter().map(move |(defender_hand, ratio)| {
                    (
                        advantage.as_str(),
                        attacker_hand.as_str(),
                        defender_hand.as_str(),
                        *ratio,
                    )
                })
            })
        })
    }
}

/// Other spellings of the same integer: "+3" for "3", "-0"/"+0" for "0", "0" for "-0".
pub(crate) fn sign_variants(key: &str) -> Vec<String> {
    let Ok(value) = key.parse::<i32>() else {
        return Vec::new();
    };
    let mut variants = vec![value.to_string()];
    if value >= 0 {
        variants.push(format!("+{value}"));
    }
    if value == 0 {
        variants.push("-0".to_string());
    }
    variants.retain(|variant| variant != key);
    variants
}
