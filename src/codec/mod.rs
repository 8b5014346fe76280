//! Encounter list <-> URL query string.
//!
//! Each encounter is one `encounter=` parameter, written as
//! `<ship>[<card>,<card>]:<ship>[<card>]`. Brackets are left out for an empty hand, cards are
//! written in identifier order, and the brackets, commas, and colon stay unescaped so the
//! address stays readable. Parameter order is list order.

pub mod query;

use serde::Serialize;
use thiserror::Error;

use crate::model::{Card, Encounter, EncounterList, ModelError, Side};
use crate::table::WinRatioTable;

use self::query::query_pairs;

pub const ENCOUNTER_PARAM: &str = "encounter";
const SIDE_SEPARATOR: char = ':';
const CARD_SEPARATOR: char = ',';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("expected exactly one ':' between attacker and defender in '{0}'")]
    Separator(String),
    #[error("side '{0}' does not match <ship>[<card>,...]")]
    SidePattern(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// An `encounter` value that could not be decoded and was left out of the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejected {
    /// Position among the `encounter` parameters, counting rejected ones.
    pub position: usize,
    pub value: String,
    pub message: String,
}

/// Result of decoding a query: the encounters that parsed, in order, and the ones that did not.
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub encounters: EncounterList,
    pub rejected: Vec<Rejected>,
    /// Whether the query held any `encounter` parameter at all.
    pub had_encounter_param: bool,
}

pub fn encode_side(side: &Side) -> String {
    if side.hand.is_empty() {
        side.ship.to_string()
    } else {
        format!("{}[{}]", side.ship, side.hand.join(","))
    }
}

pub fn encode_encounter(encounter: &Encounter) -> String {
    format!(
        "{}{SIDE_SEPARATOR}{}",
        encode_side(encounter.attacker()),
        encode_side(encounter.defender())
    )
}

/// `encounter=...&encounter=...`, one parameter per encounter, in list order.
pub fn encode(encounters: &[Encounter]) -> String {
    encounters
        .iter()
        .map(|encounter| format!("{ENCOUNTER_PARAM}={}", encode_encounter(encounter)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn build_url(pathname: &str, encounters: &[Encounter]) -> String {
    format!("{pathname}?{}", encode(encounters))
}

/// Parses `<digit>` or `<digit>[card, card]`.
pub fn decode_side(raw: &str) -> Result<Side, CodecError> {
    let pattern_error = || CodecError::SidePattern(raw.to_string());
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    let ship = chars
        .next()
        .and_then(|c| c.to_digit(10))
        .ok_or_else(pattern_error)?;
    let rest = chars.as_str();

    let cards = if rest.is_empty() {
        Vec::new()
    } else {
        let inner = rest
            .strip_prefix('[')
            .and_then(|r| r.strip_suffix(']'))
            .filter(|inner| !inner.contains(['[', ']']))
            .ok_or_else(pattern_error)?;
        if inner.trim().is_empty() {
            Vec::new()
        } else {
            let mut cards = Vec::new();
            for card in inner.split(CARD_SEPARATOR).map(str::trim) {
                if card.is_empty() {
                    return Err(pattern_error());
                }
                cards.push(card.parse::<Card>()?);
            }
            cards
        }
    };

    // to_digit(10) is at most 9, so the cast cannot truncate.
    Ok(Side::from_parts(ship as u8, &cards)?)
}

/// Parses one `encounter` value into an encounter whose ratio is not yet resolved.
pub fn decode_encounter(raw: &str) -> Result<Encounter, CodecError> {
    let mut parts = raw.split(SIDE_SEPARATOR);
    let (Some(attacker), Some(defender), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CodecError::Separator(raw.to_string()));
    };
    let attacker = decode_side(attacker)?;
    let defender = decode_side(defender)?;
    Ok(Encounter::unresolved(attacker, defender)?)
}

/// Decodes every `encounter` parameter. A value that fails to parse is dropped and recorded in
/// `rejected`; the rest of the list is unaffected.
pub fn decode(query: &str) -> Decoded {
    let mut decoded = Decoded::default();
    let mut encounters = Vec::new();
    let values = query_pairs(query)
        .into_iter()
        .filter(|(key, _)| key == ENCOUNTER_PARAM)
        .map(|(_, value)| value);

    for (position, value) in values.enumerate() {
        decoded.had_encounter_param = true;
        match decode_encounter(&value) {
            Ok(encounter) => encounters.push(encounter),
            Err(err) => {
                log::warn!("dropping encounter #{position} '{value}': {err}");
                decoded.rejected.push(Rejected {
                    position,
                    value,
                    message: err.to_string(),
                });
            }
        }
    }

    decoded.encounters = EncounterList::new(encounters);
    decoded
}

/// Decodes and resolves every encounter against `table`.
pub fn decode_with_table(query: &str, table: &WinRatioTable) -> EncounterList {
    decode(query).encounters.resolved(table)
}
