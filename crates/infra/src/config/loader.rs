//! Configuration loader
//!
//! Loads application configuration from environment variables or a TOML
//! file. A `.env` file is honored before the environment is read.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes `./semester.toml` and `./config.toml`
//!
//! ## Environment Variables
//! - `SEMESTER_DB_PATH`: Database file path
//! - `SEMESTER_DB_POOL_SIZE`: Connection pool size (optional, default 10)
//! - `SEMESTER_CALENDAR_ID`: Target calendar identifier
//! - `SEMESTER_TIME_ZONE`: IANA time zone for event payloads
//! - `SEMESTER_CALENDAR_API_BASE`: Calendar API base URL (optional)
//! - `SEMESTER_CALENDAR_ACCOUNT`: Account label (optional)

use std::path::{Path, PathBuf};

use semester_domain::{CalendarConfig, Config, DatabaseConfig, Result, SemesterError};

const CONFIG_FILES: &[&str] = &["semester.toml", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `SemesterError::Config` if configuration cannot be loaded from
/// either source.
pub fn load() -> Result<Config> {
    dotenvy::dotenv().ok();

    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "environment incomplete, trying config file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `SemesterError::Config` if required variables are missing or
/// have invalid values.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("SEMESTER_DB_PATH")?;
    let pool_size = match std::env::var("SEMESTER_DB_POOL_SIZE") {
        Ok(value) => value
            .parse::<u32>()
            .map_err(|e| SemesterError::Config(format!("invalid pool size: {e}")))?,
        Err(_) => 10,
    };

    let calendar_id = env_var("SEMESTER_CALENDAR_ID")?;
    let time_zone = env_var("SEMESTER_TIME_ZONE")?;
    let api_base = std::env::var("SEMESTER_CALENDAR_API_BASE")
        .unwrap_or_else(|_| "https://www.googleapis.com/calendar/v3".to_string());
    let account =
        std::env::var("SEMESTER_CALENDAR_ACCOUNT").unwrap_or_else(|_| "default".to_string());

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size },
        calendar: CalendarConfig { api_base, calendar_id, time_zone, account },
    })
}

/// Load configuration from a TOML file
///
/// Probes the default file names in the working directory when `path` is
/// `None`.
///
/// # Errors
/// Returns `SemesterError::Config` when no file exists or it fails to
/// parse.
pub fn load_from_file(path: Option<&Path>) -> Result<Config> {
    let path: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
            .ok_or_else(|| {
                SemesterError::Config(format!(
                    "no config file found (looked for {})",
                    CONFIG_FILES.join(", ")
                ))
            })?,
    };

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| SemesterError::Config(format!("failed to read {}: {e}", path.display())))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| SemesterError::Config(format!("failed to parse {}: {e}", path.display())))?;

    tracing::info!(path = %path.display(), "configuration loaded from file");
    Ok(config)
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| SemesterError::Config(format!("missing environment variable {name}")))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn file_load_round_trips() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [database]
            path = "/tmp/semester.db"
            pool_size = 4

            [calendar]
            calendar_id = "school-calendar"
            time_zone = "Europe/Belgrade"
            "#
        )
        .unwrap();

        let config = load_from_file(Some(file.path())).unwrap();
        assert_eq!(config.database.pool_size, 4);
        assert_eq!(config.calendar.calendar_id, "school-calendar");
        assert_eq!(config.calendar.api_base, "https://www.googleapis.com/calendar/v3");
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = load_from_file(Some(Path::new("/nonexistent/semester.toml"))).unwrap_err();
        assert!(matches!(err, SemesterError::Config(_)));
    }
}
