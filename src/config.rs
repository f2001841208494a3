use std::path::PathBuf;
use std::time::Duration;
use url::Url;
use crate::error::ExportError;

pub const DEFAULT_ENDPOINT: &str = "https://sisstudent.fcps.edu/SVUE/Service/PXPCommunication.asmx";
pub const DEFAULT_OUTPUT: &str = "grades.csv";
pub const REPORTING_PERIODS: u8 = 4;
pub const PERIOD_PAUSE: Duration = Duration::from_millis(250);

// Runtime settings, read once from the environment after `.env` has been loaded.
#[derive(Debug, Clone)]
pub struct Config {
    pub username: Option<String>,
    pub password: Option<String>,
    pub endpoint: Url,
    pub output: PathBuf,
    pub periods: u8,
    pub pause: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ExportError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Builds the configuration from an arbitrary key lookup so tests don't touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup("STUDENTVUE_ENDPOINT")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(endpoint.trim()).map_err(|source| ExportError::Config {
            key: "STUDENTVUE_ENDPOINT",
            source,
        })?;

        let output = lookup("STUDENTVUE_OUTPUT")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        Ok(Self {
            username: lookup("STUDENTVUE_USERNAME"),
            password: lookup("STUDENTVUE_PASSWORD"),
            endpoint,
            output,
            periods: REPORTING_PERIODS,
            pause: PERIOD_PAUSE,
        })
    }
}
