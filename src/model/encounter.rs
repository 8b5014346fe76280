//! One attacker-vs-defender configuration with its resolved win ratio, and the ordered list of them.

use std::ops::Deref;

use serde::Serialize;

use crate::combine::RatioCategory;
use crate::model::{ModelError, Role, Side};
use crate::table::WinRatioTable;

/// Attacker and defender sides plus the attacker's win ratio looked up for them.
/// The ratio is NaN when the table has no entry for the combination.
#[derive(Debug, Clone, Serialize)]
pub struct Encounter {
    attacker: Side,
    defender: Side,
    attacker_win_ratio: f64,
}

impl Encounter {
    pub fn new(attacker: Side, defender: Side, table: &WinRatioTable) -> Result<Self, ModelError> {
        let mut encounter = Self::unresolved(attacker, defender)?;
        encounter.resolve(table);
        Ok(encounter)
    }

    /// Builds an encounter without consulting a table; its ratio stays NaN until resolved.
    pub fn unresolved(attacker: Side, defender: Side) -> Result<Self, ModelError> {
        if let Some(card) = attacker.hand.shares_card_with(&defender.hand) {
            return Err(ModelError::CardConflict(card));
        }
        Ok(Self {
            attacker,
            defender,
            attacker_win_ratio: f64::NAN,
        })
    }

    /// Ship 1 against ship 1 with empty hands.
    pub fn default_resolved(table: &WinRatioTable) -> Self {
        let mut encounter = Self {
            attacker: Side::default(),
            defender: Side::default(),
            attacker_win_ratio: f64::NAN,
        };
        encounter.resolve(table);
        encounter
    }

    pub fn resolve(&mut self, table: &WinRatioTable) {
        self.attacker_win_ratio = table.resolve(&self.attacker, &self.defender);
    }

    pub fn attacker(&self) -> &Side {
        &self.attacker
    }

    pub fn defender(&self) -> &Side {
        &self.defender
    }

    pub fn side(&self, role: Role) -> &Side {
        match role {
            Role::Attacker => &self.attacker,
            Role::Defender => &self.defender,
        }
    }

    pub fn attacker_win_ratio(&self) -> f64 {
        self.attacker_win_ratio
    }

    pub fn has_data(&self) -> bool {
        !self.attacker_win_ratio.is_nan()
    }

    /// Replaces one side and re-resolves. Fails if the new side shares a card with the other one.
    pub fn with_side(
        &self,
        role: Role,
        side: Side,
        table: &WinRatioTable,
    ) -> Result<Self, ModelError> {
        let (attacker, defender) = match role {
            Role::Attacker => (side, self.defender.clone()),
            Role::Defender => (self.attacker.clone(), side),
        };
        Self::new(attacker, defender, table)
    }

    pub fn swapped(&self, table: &WinRatioTable) -> Self {
        let mut swapped = Self {
            attacker: self.defender.clone(),
            defender: self.attacker.clone(),
            attacker_win_ratio: f64::NAN,
        };
        swapped.resolve(table);
        swapped
    }

    /// Attacker ship minus defender ship; the table's first-level key.
    pub fn raw_advantage(&self) -> i32 {
        i32::from(self.attacker.ship.value()) - i32::from(self.defender.ship.value())
    }

    /// (attacker ship + card bonuses) - (defender ship + card bonuses). Lower favours the attacker.
    pub fn effective_advantage(&self) -> i32 {
        self.attacker.effective_strength() - self.defender.effective_strength()
    }

    pub fn category(&self) -> RatioCategory {
        RatioCategory::of(self.attacker_win_ratio)
    }

    /// Human-readable summary, e.g. "Attacker 2 (cruel, ferocious) vs. Defender 5".
    pub fn explanation(&self) -> String {
        fn hand_suffix(side: &Side) -> String {
            if side.hand.is_empty() {
                String::new()
            } else {
                format!(" ({})", side.hand.join(", "))
            }
        }
        format!(
            "Attacker {}{} vs. Defender {}{}",
            self.attacker.ship,
            hand_suffix(&self.attacker),
            self.defender.ship,
            hand_suffix(&self.defender)
        )
    }
}

// Two missing ratios compare equal so a rehydrated list matches the one it was encoded from.
impl PartialEq for Encounter {
    fn eq(&self, other: &Self) -> bool {
        self.attacker == other.attacker
            && self.defender == other.defender
            && (self.attacker_win_ratio == other.attacker_win_ratio
                || (self.attacker_win_ratio.is_nan() && other.attacker_win_ratio.is_nan()))
    }
}

/// Ordered encounters. Order is significant and preserved through the query codec.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EncounterList(Vec<Encounter>);

impl EncounterList {
    pub fn new(encounters: Vec<Encounter>) -> Self {
        Self(encounters)
    }

    /// The list a fresh session starts with: one default encounter.
    pub fn initial(table: &WinRatioTable) -> Self {
        Self(vec![Encounter::default_resolved(table)])
    }

    pub fn ratios(&self) -> Vec<f64> {
        self.0.iter().map(Encounter::attacker_win_ratio).collect()
    }

    /// Re-resolves every encounter against `table`.
    pub fn resolved(mut self, table: &WinRatioTable) -> Self {
        for encounter in &mut self.0 {
            encounter.resolve(table);
        }
        self
    }
}

impl Deref for EncounterList {
    type Target = [Encounter];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Encounter> for EncounterList {
    fn from_iter<I: IntoIterator<Item = Encounter>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for EncounterList {
    type Item = Encounter;
    type IntoIter = std::vec::IntoIter<Encounter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a EncounterList {
    type Item = &'a Encounter;
    type IntoIter = std::slice::Iter<'a, Encounter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
