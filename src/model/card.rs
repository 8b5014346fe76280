//! Card catalog: the seven modifier cards a side may hold, with fixed display metadata.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Card {
    Ferocious,
    Relentless,
    Cruel,
    Scrappy,
    Strategic,
    Rational,
    Stubborn,
}

/// Fixed metadata for one card. `advantage` is the combat bonus the card applies, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardInfo {
    pub id: Card,
    pub label: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advantage: Option<i32>,
}

/// Every card in display order.
pub const ALL_CARDS: [Card; 7] = [
    Card::Ferocious,
    Card::Relentless,
    Card::Cruel,
    Card::Scrappy,
    Card::Strategic,
    Card::Rational,
    Card::Stubborn,
];

static CATALOG: [CardInfo; 7] = [
    CardInfo {
        id: Card::Ferocious,
        label: "Ferocious",
        description: "-1 combat bonus",
        advantage: Some(-1),
    },
    CardInfo {
        id: Card::Relentless,
        label: "Relentless",
        description: "Optionally re-roll your combat die once",
        advantage: None,
    },
    CardInfo {
        id: Card::Cruel,
        label: "Cruel",
        description: "Optionally re-roll your opponent's combat die once",
        advantage: None,
    },
    CardInfo {
        id: Card::Scrappy,
        label: "Scrappy",
        description: "On your turn, optionally re-roll your combat die once",
        advantage: None,
    },
    CardInfo {
        id: Card::Strategic,
        label: "Strategic",
        description: "-2 combat bonus if adjacent to another of your ships",
        advantage: Some(-2),
    },
    CardInfo {
        id: Card::Rational,
        label: "Rational",
        description: "Your combat die always rolls to 3",
        advantage: None,
    },
    CardInfo {
        id: Card::Stubborn,
        label: "Stubborn",
        description: "As defender, break ties (and destroy your attacker if they lose)",
        advantage: None,
    },
];

impl Card {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ferocious => "ferocious",
            Self::Relentless => "relentless",
            Self::Cruel => "cruel",
            Self::Scrappy => "scrappy",
            Self::Strategic => "strategic",
            Self::Rational => "rational",
            Self::Stubborn => "stubborn",
        }
    }

    pub fn info(&self) -> &'static CardInfo {
        // CATALOG is laid out in the same order as ALL_CARDS.
        &CATALOG[*self as usize]
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    pub fn advantage(&self) -> Option<i32> {
        self.info().advantage
    }
}

/// Full catalog in display order.
pub fn catalog() -> &'static [CardInfo] {
    &CATALOG
}

// Cards order by identifier so hands sort the same way the table keys do.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Card {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_CARDS
            .iter()
            .copied()
            .find(|card| card.as_str() == s)
            .ok_or_else(|| ModelError::UnknownCard(s.to_string()))
    }
}
