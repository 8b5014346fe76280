use quantum_calc::server::api::ApiContext;
use quantum_calc::server::routes::route_request;
use quantum_calc::table::WinRatioTable;

fn ctx() -> ApiContext {
    ApiContext {
        table: WinRatioTable::from_json_str(
            r#"{
                "0": {"": {"": 0.5833, "stubborn": 0.4167}},
                "-3": {"ferocious": {"": 0.9722}},
                "+1": {"": {"": 0.4167}}
            }"#,
        )
        .expect("fixture table should parse"),
        pathname: "/calc".to_string(),
    }
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("response should be valid json")
}

#[test]
fn health_endpoint_returns_ok_json() {
    let response = route_request(&ctx(), "GET", "/api/health", "");
    assert_eq!(response.status_code, 200);
    assert_eq!(response.content_type, "application/json");
    assert!(response.body.contains("\"status\": \"ok\""));
}

#[test]
fn cards_endpoint_lists_catalog_in_order() {
    let response = route_request(&ctx(), "GET", "/api/cards", "");
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    let cards = payload["cards"].as_array().expect("cards should be an array");
    assert_eq!(cards.len(), 7);
    assert_eq!(cards[0]["id"], "ferocious");
    assert_eq!(cards[0]["advantage"], -1);
    assert_eq!(cards[6]["id"], "stubborn");
    assert!(cards[6].get("advantage").is_none());
}

#[test]
fn encounters_endpoint_reports_ratios_and_summary() {
    let response = route_request(
        &ctx(),
        "GET",
        "/api/encounters?encounter=1:1&encounter=2[ferocious]:5",
        "",
    );
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);

    assert_eq!(payload["url"], "/calc?encounter=1:1&encounter=2[ferocious]:5");
    assert!(payload.get("navigation").is_none());

    let encounters = payload["encounters"].as_array().expect("encounters array");
    assert_eq!(encounters.len(), 2);
    assert_eq!(encounters[0]["percent"], "58.33");
    assert_eq!(encounters[0]["category"], "medium");
    assert_eq!(encounters[1]["advantage_key"], "-3");
    assert_eq!(encounters[1]["attacker_win_ratio"], 0.9722);
    assert_eq!(encounters[1]["category"], "good");
    assert_eq!(encounters[1]["effective_advantage"], -4);
    assert_eq!(encounters[1]["available_cards"].as_array().map(Vec::len), Some(6));

    let all = payload["summary"]["all_succeed"].as_f64().unwrap();
    assert!((all - 0.5833 * 0.9722).abs() < 1e-9);
    assert_eq!(payload["summary"]["any_succeeds_category"], "good");
}

#[test]
fn empty_address_is_rewritten_to_default() {
    let response = route_request(&ctx(), "GET", "/api/encounters", "");
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    assert_eq!(payload["navigation"]["replace"], true);
    assert_eq!(payload["navigation"]["url"], "/calc?encounter=1:1");
    assert_eq!(payload["encounters"].as_array().map(Vec::len), Some(1));
}

#[test]
fn sign_mismatch_in_table_yields_no_data() {
    let response = route_request(&ctx(), "GET", "/api/encounters?encounter=2:1", "");
    let payload = json(&response.body);
    assert!(payload["encounters"][0]["attacker_win_ratio"].is_null());
    assert_eq!(payload["encounters"][0]["percent"], "no data");
}

#[test]
fn rejected_values_come_back_as_warnings() {
    let response = route_request(&ctx(), "GET", "/api/encounters?encounter=9:1&encounter=1:1", "");
    let payload = json(&response.body);
    assert_eq!(payload["encounters"].as_array().map(Vec::len), Some(1));
    assert_eq!(payload["warnings"][0]["position"], 0);
    assert_eq!(payload["warnings"][0]["value"], "9:1");
}

#[test]
fn update_action_returns_navigation() {
    let body = r#"{
        "query": "encounter=1:1",
        "action": {"type": "update", "index": 0, "role": "defender", "set": {"hand": ["stubborn"]}}
    }"#;
    let response = route_request(&ctx(), "POST", "/api/encounters", body);
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    assert_eq!(payload["query"], "encounter=1:1[stubborn]");
    assert_eq!(payload["navigation"]["replace"], false);
    assert_eq!(payload["navigation"]["state"]["disable_scroll_update"], true);
    assert_eq!(payload["navigation"]["state"]["refocus_id"], "encounter-0-defender_hand");
    assert_eq!(payload["encounters"][0]["attacker_win_ratio"], 0.4167);
}

#[test]
fn out_of_range_index_is_bad_request() {
    let body = r#"{"query": "encounter=1:1", "action": {"type": "swap", "index": 4}}"#;
    let response = route_request(&ctx(), "POST", "/api/encounters", body);
    assert_eq!(response.status_code, 400);
    assert_eq!(json(&response.body)["kind"], "index_out_of_range");
}

#[test]
fn conflicting_card_is_bad_request() {
    let body = r#"{
        "query": "encounter=1[cruel]:1",
        "action": {"type": "update", "index": 0, "role": "defender", "set": {"hand": ["cruel"]}}
    }"#;
    let response = route_request(&ctx(), "POST", "/api/encounters", body);
    assert_eq!(response.status_code, 400);
    assert_eq!(json(&response.body)["kind"], "invalid_selection");
}

#[test]
fn malformed_body_is_bad_request() {
    let response = route_request(&ctx(), "POST", "/api/encounters", "{not json");
    assert_eq!(response.status_code, 400);
    assert!(response.body.contains("Invalid request body"));
}

#[test]
fn rows_endpoint_filters_table() {
    let response = route_request(&ctx(), "GET", "/api/table/rows?advantage=0&min=0.5", "");
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    assert_eq!(payload["count"], 1);
    assert_eq!(payload["rows"][0]["win_ratio"], 0.5833);

    let bad = route_request(&ctx(), "GET", "/api/table/rows?min=2", "");
    assert_eq!(bad.status_code, 400);
}

#[test]
fn unknown_route_returns_not_found() {
    let response = route_request(&ctx(), "GET", "/api/optimize", "");
    assert_eq!(response.status_code, 404);
}
