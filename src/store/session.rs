//! The current page's encounter list and its address.
//!
//! The committed list is always the decoding of the committed query string: an action
//! computes a new list, encodes it, and the session then rehydrates from that encoding the
//! same way it does for an external location change.

use serde::{Deserialize, Serialize};

use crate::codec::{self, Rejected};
use crate::combine::Summary;
use crate::model::{EncounterList, Role};
use crate::store::{self, Field, StoreError};
use crate::table::WinRatioTable;

/// One user action on the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Add,
    Remove { index: usize },
    Update { index: usize, role: Role, set: Field },
    Swap { index: usize },
    Reset,
}

impl Action {
    fn navigation_state(&self) -> NavigationState {
        match self {
            Self::Update { index, role, set } => NavigationState {
                disable_scroll_update: true,
                refocus_id: Some(format!("encounter-{index}-{}_{}", role.as_str(), set.name())),
            },
            Self::Reset => NavigationState::default(),
            _ => NavigationState {
                disable_scroll_update: true,
                refocus_id: None,
            },
        }
    }
}

/// Presentation hints carried with a navigation. They never affect the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub disable_scroll_update: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refocus_id: Option<String>,
}

/// An address change the surrounding page should perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub url: String,
    pub query: String,
    pub state: NavigationState,
    /// Rewrite the current history entry instead of pushing a new one.
    pub replace: bool,
}

type Observer<'t> = Box<dyn FnMut(&EncounterList, &Summary) + 't>;

pub struct Session<'t> {
    table: &'t WinRatioTable,
    pathname: String,
    query: String,
    encounters: EncounterList,
    rejected: Vec<Rejected>,
    observers: Vec<Observer<'t>>,
}

fn url_for(pathname: &str, query: &str) -> String {
    if query.is_empty() {
        pathname.to_string()
    } else {
        format!("{pathname}?{query}")
    }
}

impl<'t> Session<'t> {
    /// Loads the page state from `query`. When the query names no encounter, the session starts
    /// from the default encounter and returns the rewrite that makes it explicit in the address.
    pub fn open(
        table: &'t WinRatioTable,
        pathname: impl Into<String>,
        query: &str,
    ) -> (Self, Option<Navigation>) {
        let mut session = Self {
            table,
            pathname: pathname.into(),
            query: String::new(),
            encounters: EncounterList::default(),
            rejected: Vec::new(),
            observers: Vec::new(),
        };
        let rewrite = session.on_location_change(query);
        (session, rewrite)
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&EncounterList, &Summary) + 't) {
        self.observers.push(Box::new(observer));
    }

    /// The address changed: decode, re-resolve every encounter, and notify observers.
    /// Returns a rewrite when the new address holds no usable encounter.
    pub fn on_location_change(&mut self, query: &str) -> Option<Navigation> {
        let decoded = codec::decode(codec::query::query_part(query));
        let rewrite = if !decoded.encounters.is_empty() {
            self.query = codec::encode(&decoded.encounters);
            self.encounters = decoded.encounters.resolved(self.table);
            None
        } else {
            self.encounters = EncounterList::initial(self.table);
            self.query = codec::encode(&self.encounters);
            if decoded.had_encounter_param {
                log::warn!(
                    "all {} encounter(s) in address rejected, rewriting to '{}'",
                    decoded.rejected.len(),
                    self.query
                );
            } else {
                log::debug!("no encounter in address, rewriting to '{}'", self.query);
            }
            Some(Navigation {
                url: url_for(&self.pathname, &self.query),
                query: self.query.clone(),
                state: NavigationState {
                    disable_scroll_update: true,
                    refocus_id: None,
                },
                replace: true,
            })
        };
        self.rejected = decoded.rejected;
        self.notify();
        rewrite
    }

    /// Applies `action`, commits the encoded result, and returns the navigation to perform.
    pub fn dispatch(&mut self, action: Action) -> Result<Navigation, StoreError> {
        let next = match &action {
            Action::Add => store::add_encounter(&self.encounters, self.table),
            Action::Remove { index } => store::remove_encounter(&self.encounters, *index)?,
            Action::Update { index, role, set } => {
                store::update_field(&self.encounters, *index, *role, set.clone(), self.table)?
            }
            Action::Swap { index } => store::swap_sides(&self.encounters, *index, self.table)?,
            Action::Reset => EncounterList::initial(self.table),
        };
        let query = codec::encode(&next);
        log::debug!("{action:?} -> '{query}'");

        // Removing the last encounter leaves no parameter; committing then yields the rewrite.
        if let Some(rewrite) = self.on_location_change(&query) {
            return Ok(rewrite);
        }
        Ok(Navigation {
            url: url_for(&self.pathname, &self.query),
            query: self.query.clone(),
            state: action.navigation_state(),
            replace: false,
        })
    }

    pub fn encounters(&self) -> &EncounterList {
        &self.encounters
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn url(&self) -> String {
        url_for(&self.pathname, &self.query)
    }

    /// Encounter values dropped from the current address because they did not parse.
    pub fn rejected(&self) -> &[Rejected] {
        &self.rejected
    }

    pub fn summary(&self) -> Summary {
        Summary::from_ratios(&self.encounters.ratios())
    }

    fn notify(&mut self) {
        let summary = self.summary();
        for observer in &mut self.observers {
            observer(&self.encounters, &summary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Hand, Ship};
    use std::cell::Cell;

    fn table() -> WinRatioTable {
        WinRatioTable::from_json_str(r#"{"0": {"": {"": 0.5}}, "2": {"": {"": 0.25}}}"#).unwrap()
    }

    #[test]
    fn empty_address_is_rewritten_to_default() {
        let table = table();
        let (session, rewrite) = Session::open(&table, "/calc", "");
        let rewrite = rewrite.expect("default should be made explicit");
        assert_eq!(rewrite.url, "/calc?encounter=1:1");
        assert!(rewrite.replace);
        assert_eq!(session.encounters().len(), 1);
        assert_eq!(session.summary().all_succeed, 0.5);
    }

    #[test]
    fn explicit_address_is_not_rewritten() {
        let table = table();
        let (session, rewrite) = Session::open(&table, "/calc", "?encounter=3:1");
        assert!(rewrite.is_none());
        assert_eq!(session.encounters()[0].attacker_win_ratio(), 0.25);
    }

    #[test]
    fn update_carries_refocus_hint() {
        let table = table();
        let (mut session, _) = Session::open(&table, "/calc", "encounter=1:1");
        let navigation = session
            .dispatch(Action::Update {
                index: 0,
                role: Role::Attacker,
                set: Field::Ship(Ship::new(3).unwrap()),
            })
            .unwrap();
        assert_eq!(navigation.query, "encounter=3:1");
        assert_eq!(navigation.state.refocus_id.as_deref(), Some("encounter-0-attacker_ship"));
        assert!(navigation.state.disable_scroll_update);
        assert_eq!(session.query(), "encounter=3:1");
    }

    #[test]
    fn removing_the_last_encounter_falls_back_to_default() {
        let table = table();
        let (mut session, _) = Session::open(&table, "/calc", "encounter=3:1");
        let navigation = session.dispatch(Action::Remove { index: 0 }).unwrap();
        assert!(navigation.replace);
        assert_eq!(navigation.query, "encounter=1:1");
        assert_eq!(session.encounters().len(), 1);
    }

    #[test]
    fn failed_action_leaves_state_untouched() {
        let table = table();
        let (mut session, _) = Session::open(&table, "/calc", "encounter=3[cruel]:1");
        let err = session
            .dispatch(Action::Update {
                index: 0,
                role: Role::Defender,
                set: Field::Hand(Hand::new([crate::model::Card::Cruel]).unwrap()),
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Model(_)));
        assert_eq!(session.query(), "encounter=3[cruel]:1");
    }

    #[test]
    fn observers_see_every_commit() {
        let table = table();
        let calls = Cell::new(0);
        let (mut session, _) = Session::open(&table, "/calc", "encounter=1:1");
        session.subscribe(|list, _| {
            calls.set(calls.get() + 1);
            assert!(!list.is_empty());
        });
        session.dispatch(Action::Add).unwrap();
        session.on_location_change("encounter=1:1");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn action_json_shape() {
        let action: Action = serde_json::from_str(
            r#"{"type": "update", "index": 1, "role": "defender", "set": {"hand": ["cruel"]}}"#,
        )
        .unwrap();
        assert!(matches!(action, Action::Update { index: 1, role: Role::Defender, .. }));
        let action: Action = serde_json::from_str(r#"{"type": "swap", "index": 0}"#).unwrap();
        assert_eq!(action, Action::Swap { index: 0 });
    }
}
