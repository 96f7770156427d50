//! Application configuration types
//!
//! The configuration is loaded by the infrastructure layer (env vars first,
//! TOML file fallback); these types only describe its shape.

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub calendar: CalendarConfig,
}

/// SQLite store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the database file
    pub path: String,
    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// External calendar service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Base URL of the calendar REST API (overridable for tests)
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Target calendar identifier
    pub calendar_id: String,
    /// IANA time zone stamped on event start/end payloads
    pub time_zone: String,
    /// Account label used when a session is established
    #[serde(default = "default_account")]
    pub account: String,
}

fn default_pool_size() -> u32 {
    10
}

fn default_api_base() -> String {
    "https://www.googleapis.com/calendar/v3".to_string()
}

fn default_account() -> String {
    "default".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let toml = r#"
            [database]
            path = "/tmp/semester.db"

            [calendar]
            calendar_id = "primary"
            time_zone = "Europe/Belgrade"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database.pool_size, 10);
        assert_eq!(config.calendar.api_base, "https://www.googleapis.com/calendar/v3");
        assert_eq!(config.calendar.account, "default");
    }
}
