use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::{self, Rejected};
use crate::combine::{format_percent, RatioCategory, Summary};
use crate::model::{
    available_cards, catalog, Card, CardInfo, Encounter, EncounterList, Role, Ship, Side,
};
use crate::store::{Action, Navigation, Session, StoreError};
use crate::table::{advantage_key, FilterError, RowFilter, WinRatioTable};

/// What the handlers need: the loaded table and the page path URLs are built against.
#[derive(Debug, Clone)]
pub struct ApiContext {
    pub table: WinRatioTable,
    pub pathname: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    Parse(serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("failed to serialize response: {0}")]
    Serialize(serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncounterActionRequest {
    #[serde(default)]
    pub query: String,
    pub action: Action,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShipListItem {
    pub value: u8,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SideView<'a> {
    pub ship: u8,
    pub ship_label: &'static str,
    pub hand: &'a [Card],
    pub hand_full: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EncounterView<'a> {
    pub index: usize,
    pub encoded: String,
    pub attacker: SideView<'a>,
    pub defender: SideView<'a>,
    pub advantage_key: String,
    pub raw_advantage: i32,
    pub effective_advantage: i32,
    /// `null` when the table has no entry.
    pub attacker_win_ratio: f64,
    pub percent: String,
    pub category: RatioCategory,
    pub explanation: String,
    pub available_cards: Vec<Card>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub all_succeed: f64,
    pub all_succeed_percent: String,
    pub all_succeed_category: RatioCategory,
    pub any_succeeds: f64,
    pub any_succeeds_percent: String,
    pub any_succeeds_category: RatioCategory,
}

#[derive(Debug, Clone, Serialize)]
pub struct EncountersResponse<'a> {
    pub status: &'static str,
    pub url: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<Navigation>,
    pub encounters: Vec<EncounterView<'a>>,
    pub summary: SummaryView,
    pub warnings: &'a [Rejected],
}

fn side_view(side: &Side) -> SideView<'_> {
    SideView {
        ship: side.ship.value(),
        ship_label: side.ship.label(),
        hand: side.hand.cards(),
        hand_full: side.hand.is_full(),
    }
}

fn encounter_view(index: usize, encounter: &Encounter) -> EncounterView<'_> {
    let attacker = encounter.side(Role::Attacker);
    let defender = encounter.side(Role::Defender);
    EncounterView {
        index,
        encoded: codec::encode_encounter(encounter),
        attacker: side_view(attacker),
        defender: side_view(defender),
        advantage_key: advantage_key(attacker.ship, defender.ship),
        raw_advantage: encounter.raw_advantage(),
        effective_advantage: encounter.effective_advantage(),
        attacker_win_ratio: encounter.attacker_win_ratio(),
        percent: format_percent(encounter.attacker_win_ratio()),
        category: encounter.category(),
        explanation: encounter.explanation(),
        available_cards: available_cards(&attacker.hand, &defender.hand),
    }
}

pub fn summary_view(summary: Summary) -> SummaryView {
    SummaryView {
        all_succeed: summary.all_succeed,
        all_succeed_percent: format_percent(summary.all_succeed),
        all_succeed_category: RatioCategory::of(summary.all_succeed),
        any_succeeds: summary.any_succeeds,
        any_succeeds_percent: format_percent(summary.any_succeeds),
        any_succeeds_category: RatioCategory::of(summary.any_succeeds),
    }
}

fn encounters_response<'a>(
    session: &'a Session<'_>,
    navigation: Option<Navigation>,
) -> EncountersResponse<'a> {
    let encounters: &'a EncounterList = session.encounters();
    EncountersResponse {
        status: "ok",
        url: session.url(),
        query: session.query().to_string(),
        navigation,
        encounters: encounters
            .iter()
            .enumerate()
            .map(|(index, encounter)| encounter_view(index, encounter))
            .collect(),
        summary: summary_view(session.summary()),
        warnings: session.rejected(),
    }
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "quantum-calc-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn cards_payload() -> Result<String, serde_json::Error> {
    let cards: &[CardInfo] = catalog();
    serde_json::to_string_pretty(&serde_json::json!({ "cards": cards }))
}

pub fn ships_payload() -> Result<String, serde_json::Error> {
    let ships: Vec<ShipListItem> = Ship::all()
        .map(|ship| ShipListItem {
            value: ship.value(),
            label: format!("{} ({})", ship.value(), ship.label()),
        })
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({ "ships": ships }))
}

/// Decodes the encounters in `query` and reports each with its ratio, plus the AND/OR summary.
pub fn encounters_get_payload(ctx: &ApiContext, query: &str) -> Result<String, ApiError> {
    let (session, rewrite) = Session::open(&ctx.table, ctx.pathname.as_str(), query);
    serde_json::to_string_pretty(&encounters_response(&session, rewrite))
        .map_err(ApiError::Serialize)
}

/// Applies one action to the encounters in the request's query.
pub fn encounters_post_payload(ctx: &ApiContext, body: &str) -> Result<String, ApiError> {
    let request: EncounterActionRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let (mut session, _) = Session::open(&ctx.table, ctx.pathname.as_str(), &request.query);
    let navigation = session.dispatch(request.action)?;
    serde_json::to_string_pretty(&encounters_response(&session, Some(navigation)))
        .map_err(ApiError::Serialize)
}

pub fn rows_payload(ctx: &ApiContext, query: &str) -> Result<String, ApiError> {
    let filter = RowFilter::from_query(query)?;
    let rows = ctx.table.filtered_rows(&filter);
    serde_json::to_string_pretty(&serde_json::json!({
        "count": rows.len(),
        "rows": rows,
    }))
    .map_err(ApiError::Serialize)
}
