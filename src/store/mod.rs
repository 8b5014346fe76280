//! List operations. Each takes the current list and returns a new one; the input is never
//! modified. Touched encounters are re-resolved before they are returned.

pub mod session;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Encounter, EncounterList, Hand, ModelError, Role, Ship};
use crate::table::WinRatioTable;

pub use session::{Action, Navigation, NavigationState, Session};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The caller addressed an encounter that does not exist.
    #[error("encounter index {index} is out of range for a list of {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// The part of one side an update replaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Ship(Ship),
    Hand(Hand),
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ship(_) => "ship",
            Self::Hand(_) => "hand",
        }
    }
}

fn checked(list: &EncounterList, index: usize) -> Result<&Encounter, StoreError> {
    list.get(index).ok_or(StoreError::IndexOutOfRange {
        index,
        len: list.len(),
    })
}

fn replaced(list: &EncounterList, index: usize, encounter: Encounter) -> EncounterList {
    let mut encounters = list.to_vec();
    encounters[index] = encounter;
    EncounterList::new(encounters)
}

/// Appends a copy of the last encounter, or the default encounter when the list is empty.
pub fn add_encounter(list: &EncounterList, table: &WinRatioTable) -> EncounterList {
    let mut encounters = list.to_vec();
    let next = match encounters.last() {
        Some(last) => last.clone(),
        None => Encounter::default_resolved(table),
    };
    encounters.push(next);
    EncounterList::new(encounters)
}

pub fn remove_encounter(list: &EncounterList, index: usize) -> Result<EncounterList, StoreError> {
    checked(list, index)?;
    let mut encounters = list.to_vec();
    encounters.remove(index);
    Ok(EncounterList::new(encounters))
}

/// Replaces the ship or hand of one side of the encounter at `index` and re-resolves it.
pub fn update_field(
    list: &EncounterList,
    index: usize,
    role: Role,
    field: Field,
    table: &WinRatioTable,
) -> Result<EncounterList, StoreError> {
    let current = checked(list, index)?;
    let mut side = current.side(role).clone();
    match field {
        Field::Ship(ship) => side.ship = ship,
        Field::Hand(hand) => side.hand = hand,
    }
    let updated = current.with_side(role, side, table)?;
    Ok(replaced(list, index, updated))
}

/// Exchanges attacker and defender of the encounter at `index`.
pub fn swap_sides(
    list: &EncounterList,
    index: usize,
    table: &WinRatioTable,
) -> Result<EncounterList, StoreError> {
    let swapped = checked(list, index)?.swapped(table);
    Ok(replaced(list, index, swapped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Card, Side};

    fn table() -> WinRatioTable {
        WinRatioTable::from_json_str(
            r#"{
                "0": {"": {"": 0.5}},
                "-1": {"": {"": 0.6}},
                "1": {"": {"": 0.4}, "cruel": {"": 0.45}}
            }"#,
        )
        .unwrap()
    }

    fn list(table: &WinRatioTable) -> EncounterList {
        let encounter = Encounter::new(
            Side::from_parts(2, &[]).unwrap(),
            Side::from_parts(1, &[]).unwrap(),
            table,
        )
        .unwrap();
        EncounterList::new(vec![Encounter::default_resolved(table), encounter])
    }

    #[test]
    fn add_clones_last_or_starts_default() {
        let table = table();
        let original = list(&table);
        let grown = add_encounter(&original, &table);
        assert_eq!(grown.len(), 3);
        assert_eq!(grown[2], original[1]);
        assert_eq!(original.len(), 2);

        let from_empty = add_encounter(&EncounterList::default(), &table);
        assert_eq!(from_empty, EncounterList::initial(&table));
    }

    #[test]
    fn remove_checks_bounds() {
        let table = table();
        let original = list(&table);
        assert_eq!(
            remove_encounter(&original, 2),
            Err(StoreError::IndexOutOfRange { index: 2, len: 2 })
        );
        let shorter = remove_encounter(&original, 0).unwrap();
        assert_eq!(shorter.len(), 1);
        assert_eq!(shorter[0], original[1]);
    }

    #[test]
    fn update_re_resolves_only_the_target() {
        let table = table();
        let original = list(&table);
        let hand = Hand::new([Card::Cruel]).unwrap();
        let updated =
            update_field(&original, 1, Role::Attacker, Field::Hand(hand), &table).unwrap();
        assert_eq!(updated[1].attacker_win_ratio(), 0.45);
        assert_eq!(updated[0], original[0]);
        assert_eq!(original[1].attacker_win_ratio(), 0.4);

        let ship = Ship::new(3).unwrap();
        let missing = update_field(&updated, 1, Role::Defender, Field::Ship(ship), &table).unwrap();
        assert!(missing[1].attacker_win_ratio().is_nan());
    }

    #[test]
    fn update_rejects_card_held_by_opponent() {
        let table = table();
        let original = list(&table);
        let cruel = Hand::new([Card::Cruel]).unwrap();
        let step = update_field(&original, 0, Role::Attacker, Field::Hand(cruel.clone()), &table)
            .unwrap();
        assert_eq!(
            update_field(&step, 0, Role::Defender, Field::Hand(cruel), &table),
            Err(StoreError::Model(ModelError::CardConflict(Card::Cruel)))
        );
        assert!(matches!(
            update_field(&step, 5, Role::Defender, Field::Hand(Hand::empty()), &table),
            Err(StoreError::IndexOutOfRange { index: 5, .. })
        ));
    }

    #[test]
    fn swap_twice_is_identity() {
        let table = table();
        let original = list(&table);
        let once = swap_sides(&original, 1, &table).unwrap();
        assert_eq!(once[1].attacker_win_ratio(), 0.6);
        assert_eq!(swap_sides(&once, 1, &table).unwrap(), original);
    }

    #[test]
    fn field_json_shape() {
        let field: Field = serde_json::from_str(r#"{"hand": ["scrappy", "cruel"]}"#).unwrap();
        assert_eq!(field.name(), "hand");
        let field: Field = serde_json::from_str(r#"{"ship": 4}"#).unwrap();
        assert_eq!(field, Field::Ship(Ship::new(4).unwrap()));
        assert!(serde_json::from_str::<Field>(r#"{"ship": 8}"#).is_err());
    }
}
