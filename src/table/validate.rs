use std::fmt;

use serde::Serialize;

use crate::model::{Card, Hand, ModelError};
use crate::table::{sign_variants, WinRatioTable, HAND_KEY_SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDiagnostic {
    pub severity: Severity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for TableDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TableReport {
    pub entries: usize,
    pub diagnostics: Vec<TableDiagnostic>,
}

impl TableReport {
    fn push(&mut self, severity: Severity, context: impl Into<String>, message: impl Into<String>) {
        self.diagnostics.push(TableDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == Severity::Error)
    }
}

/// Parses a hand key back into a hand, requiring the canonical spelling.
fn check_hand_key(key: &str) -> Result<Hand, String> {
    if key.is_empty() {
        return Ok(Hand::empty());
    }
    let cards = key
        .split(HAND_KEY_SEPARATOR)
        .map(str::parse::<Card>)
        .collect::<Result<Vec<_>, ModelError>>()
        .map_err(|err| err.to_string())?;
    let hand = Hand::try_from(cards).map_err(|err| err.to_string())?;
    let canonical = hand.join(HAND_KEY_SEPARATOR);
    if canonical != key {
        return Err(format!("not in canonical order, expected '{canonical}'"));
    }
    Ok(hand)
}

/// Checks key spelling and ratio range. Does not check that ratios agree with each other.
pub fn validate_table(table: &WinRatioTable) -> TableReport {
    let mut report = TableReport {
        entries: table.len(),
        ..TableReport::default()
    };

    for advantage in table.advantage_keys() {
        let context = format!("advantage '{advantage}'");
        match advantage.parse::<i32>() {
            Ok(value) if value.to_string() != advantage => report.push(
                Severity::Warning,
                &context,
                format!(
                    "key is not in plain signed form (expected '{value}'); lookups use the plain form"
                ),
            ),
            Ok(value) if !(-5..=5).contains(&value) => report.push(
                Severity::Warning,
                &context,
                "outside the reachable range -5..=5",
            ),
            Ok(_) => {}
            Err(_) => report.push(Severity::Error, &context, "key is not an integer"),
        }
        for variant in sign_variants(advantage) {
            if variant != advantage && table.advantage_keys().any(|key| key == variant) {
                report.push(
                    Severity::Warning,
                    &context,
                    format!(
                        "'{variant}' is also present; the two spellings are looked up separately"
                    ),
                );
            }
        }
    }

    for (advantage, attacker_key, defender_key, ratio) in table.entries() {
        let context = format!("[{advantage}][{attacker_key}][{defender_key}]");
        let attacker = check_hand_key(attacker_key);
        let defender = check_hand_key(defender_key);
        if let Err(message) = &attacker {
            report.push(Severity::Error, &context, format!("attacker hand: {message}"));
        }
        if let Err(message) = &defender {
            report.push(Severity::Error, &context, format!("defender hand: {message}"));
        }
        if let (Ok(attacker), Ok(defender)) = (&attacker, &defender) {
            if let Some(card) = attacker.shares_card_with(defender) {
                report.push(
                    Severity::Warning,
                    &context,
                    format!("'{card}' is in both hands; that encounter cannot be selected"),
                );
            }
        }
        if !(0.0..=1.0).contains(&ratio) {
            report.push(
                Severity::Error,
                &context,
                format!("ratio {ratio} is outside [0, 1]"),
            );
        }
    }

    report
}
