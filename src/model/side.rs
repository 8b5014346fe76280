//! Ship dice, hands, and the side (ship + hand) one combatant brings to an encounter.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Card, ModelError};

pub const MIN_SHIP: u8 = 1;
pub const MAX_SHIP: u8 = 6;
pub const MAX_HAND_SIZE: usize = 3;

const SHIP_LABELS: [&str; 6] = [
    "Battlestation",
    "Flagship",
    "Destroyer",
    "Frigate",
    "Interceptor",
    "Scout",
];

/// Ship die value, always within 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Ship(u8);

impl Ship {
    pub fn new(value: u8) -> Result<Self, ModelError> {
        if (MIN_SHIP..=MAX_SHIP).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ModelError::InvalidShip(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Ship class printed on the die face, e.g. "Battlestation" for 1.
    pub fn label(self) -> &'static str {
        SHIP_LABELS[usize::from(self.0 - MIN_SHIP)]
    }

    pub fn all() -> impl Iterator<Item = Ship> {
        (MIN_SHIP..=MAX_SHIP).map(Ship)
    }
}

impl Default for Ship {
    fn default() -> Self {
        Self(MIN_SHIP)
    }
}

impl TryFrom<u8> for Ship {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ship> for u8 {
    fn from(ship: Ship) -> Self {
        ship.0
    }
}

impl fmt::Display for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Up to three distinct cards, kept sorted by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Card>", into = "Vec<Card>")]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Result<Self, ModelError> {
        let mut hand = Self::default();
        for card in cards {
            hand.insert(card)?;
        }
        Ok(hand)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a card in sorted position. Refused when the card is already held or the hand is full.
    pub fn insert(&mut self, card: Card) -> Result<(), ModelError> {
        let position = match self.cards.binary_search(&card) {
            Ok(_) => return Err(ModelError::DuplicateCard(card)),
            Err(position) => position,
        };
        if self.cards.len() >= MAX_HAND_SIZE {
            return Err(ModelError::HandTooLarge(self.cards.len() + 1));
        }
        self.cards.insert(position, card);
        Ok(())
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.binary_search(&card).is_ok()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cards.len() >= MAX_HAND_SIZE
    }

    pub fn shares_card_with(&self, other: &Hand) -> Option<Card> {
        self.cards.iter().copied().find(|card| other.contains(*card))
    }

    /// Sum of the combat bonuses of the held cards.
    pub fn advantage(&self) -> i32 {
        self.cards.iter().filter_map(Card::advantage).sum()
    }

    /// Identifiers joined with `sep`, in canonical order.
    pub fn join(&self, sep: &str) -> String {
        self.cards
            .iter()
            .map(Card::as_str)
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl TryFrom<Vec<Card>> for Hand {
    type Error = ModelError;

    fn try_from(cards: Vec<Card>) -> Result<Self, Self::Error> {
        if cards.len() > MAX_HAND_SIZE {
            return Err(ModelError::HandTooLarge(cards.len()));
        }
        Self::new(cards)
    }
}

impl From<Hand> for Vec<Card> {
    fn from(hand: Hand) -> Self {
        hand.cards
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Attacker,
    Defender,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attacker => "attacker",
            Self::Defender => "defender",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Side {
    pub ship: Ship,
    pub hand: Hand,
}

impl Side {
    pub fn new(ship: Ship, hand: Hand) -> Self {
        Self { ship, hand }
    }

    /// Validates the raw ship value and card list before building a side.
    pub fn from_parts(ship: u8, cards: &[Card]) -> Result<Self, ModelError> {
        if cards.len() > MAX_HAND_SIZE {
            return Err(ModelError::HandTooLarge(cards.len()));
        }
        Ok(Self {
            ship: Ship::new(ship)?,
            hand: Hand::new(cards.iter().copied())?,
        })
    }

    /// Ship value plus card bonuses.
    pub fn effective_strength(&self) -> i32 {
        i32::from(self.ship.value()) + self.hand.advantage()
    }
}
