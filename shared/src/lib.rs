pub mod egen;

use crate::error::ConfigError;
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;

pub const ENV_VAR_PREFIX: &str = "ER_POLLER_";
pub const SETTINGS_FILE: &str = "Settings.toml";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub postgres: PostgresConfig,
}

#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    pub realtime_url: String,
    pub announcement_url: String,
    pub service_key: String,
}

#[derive(Debug, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

pub fn load_config() -> Result<Config, ConfigError> {
    Ok(Figment::new()
        .merge(Toml::file(SETTINGS_FILE))
        .merge(Env::prefixed(ENV_VAR_PREFIX).split("__"))
        .extract::<Config>()?)
}

/// All rows are stamped in Korean Standard Time (UTC+9), the zone the source
/// API reports in. Callers capture one instant per batch and pass it through,
/// so every row written by a batch carries the same stamp.
pub fn kst_timestamp(instant: DateTime<Utc>) -> NaiveDateTime {
    (instant + TimeDelta::hours(9)).naive_utc()
}

pub mod error {
    use thiserror::Error;
    use tracing::dispatcher::SetGlobalDefaultError;

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("failed to load configuration: {0}")]
        Figment(#[from] figment::Error),
    }

    #[derive(Debug, Error)]
    pub enum InitializationError {
        #[error(transparent)]
        Tracing(#[from] SetGlobalDefaultError),
        #[error(transparent)]
        Config(#[from] crate::ConfigError),
        #[error(transparent)]
        Migration(#[from] sqlx::migrate::MigrateError),
        #[error(transparent)]
        Db(#[from] sqlx::Error),
    }
}

#[cfg(test)]
mod tests {
    use super::kst_timestamp;
    use chrono::{DateTime, NaiveDate, Utc};

    #[test]
    fn kst_timestamp_is_utc_plus_nine() {
        let instant = "2025-03-01T20:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 3, 2)
            .unwrap()
            .and_hms_opt(5, 30, 0)
            .unwrap();
        assert_eq!(kst_timestamp(instant), expected);
    }
}
