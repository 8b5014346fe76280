//! Runtime settings read from the environment.

use std::env;

use log::LevelFilter;

use crate::table::DEFAULT_TABLE_PATH;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_PATHNAME: &str = "/calc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `QUANTUM_BIND`
    pub bind_addr: String,
    /// `QUANTUM_TABLE`: path to the win ratio table JSON.
    pub table_path: String,
    /// `QUANTUM_PATHNAME`: page path that generated URLs point at.
    pub pathname: String,
    /// `QUANTUM_LOG`: error, warn, info, debug, trace, or off.
    pub log_level: LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            table_path: DEFAULT_TABLE_PATH.to_string(),
            pathname: DEFAULT_PATHNAME.to_string(),
            log_level: LevelFilter::Warn,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let log_level = match lookup("QUANTUM_LOG") {
            Some(raw) => raw.trim().parse::<LevelFilter>().unwrap_or_else(|_| {
                eprintln!("invalid QUANTUM_LOG '{raw}', defaulting to {}", defaults.log_level);
                defaults.log_level
            }),
            None => defaults.log_level,
        };
        Self {
            bind_addr: lookup("QUANTUM_BIND").unwrap_or(defaults.bind_addr),
            table_path: lookup("QUANTUM_TABLE").unwrap_or(defaults.table_path),
            pathname: lookup("QUANTUM_PATHNAME").unwrap_or(defaults.pathname),
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        assert_eq!(AppConfig::from_lookup(|_| None), AppConfig::default());
    }

    #[test]
    fn overrides_are_read() {
        let config = AppConfig::from_lookup(|key| match key {
            "QUANTUM_BIND" => Some("0.0.0.0:8080".to_string()),
            "QUANTUM_LOG" => Some("debug".to_string()),
            _ => None,
        });
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.table_path, DEFAULT_TABLE_PATH);
    }

    #[test]
    fn bad_log_level_falls_back() {
        let config =
            AppConfig::from_lookup(|key| (key == "QUANTUM_LOG").then(|| "loud".to_string()));
        assert_eq!(config.log_level, LevelFilter::Warn);
    }
}
