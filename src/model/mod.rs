pub mod availability;
pub mod card;
pub mod encounter;
pub mod side;

use thiserror::Error;

pub use availability::{available_cards, hand_is_full, selectable_cards};
pub use card::{catalog, Card, CardInfo, ALL_CARDS};
pub use encounter::{Encounter, EncounterList};
pub use side::{Hand, Role, Ship, Side, MAX_HAND_SIZE, MAX_SHIP, MIN_SHIP};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("ship must be between 1 and 6, got {0}")]
    InvalidShip(u8),
    #[error("a hand holds at most 3 cards, got {0}")]
    HandTooLarge(usize),
    #[error("card '{0}' appears twice in one hand")]
    DuplicateCard(Card),
    #[error("unknown card '{0}'")]
    UnknownCard(String),
    #[error("card '{0}' is held by both attacker and defender")]
    CardConflict(Card),
}
