use crate::storage::resolve_data_path;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::{env, path::PathBuf};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;

/// The practice keeps its calendar in Pacific time, daylight saving included.
pub const DEFAULT_TIME_ZONE: Tz = chrono_tz::America::Los_Angeles;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub time_zone: Tz,
}

impl Config {
    pub fn from_env() -> Result<Self, std::io::Error> {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let time_zone = match env::var("APP_TIME_ZONE") {
            Ok(value) => parse_time_zone(&value).unwrap_or_else(|| {
                warn!("ignoring unknown APP_TIME_ZONE={value}");
                DEFAULT_TIME_ZONE
            }),
            Err(_) => DEFAULT_TIME_ZONE,
        };

        Ok(Self {
            port,
            data_path: resolve_data_path()?,
            time_zone,
        })
    }

    /// Calendar date in the reference time zone; the anchor for requests
    /// that don't name one.
    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }

    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.time_zone).date_naive()
    }
}

/// IANA zone name, e.g. `America/Los_Angeles`.
pub fn parse_time_zone(value: &str) -> Option<Tz> {
    value.trim().parse::<Tz>().ok()
}
