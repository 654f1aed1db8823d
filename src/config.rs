use std::env;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_FEED_URL: &str = "http://localhost:8080/actions";
pub const DEFAULT_POLL_SECS: u64 = 3600;
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is a required environment variable")]
    Missing(&'static str),
    #[error("{0} must be a number")]
    Invalid(&'static str),
}

/// Settings for the API server. The Trello variables are required; an
/// empty value counts as missing.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub trello_key: String,
    pub trello_token: String,
    pub next_actions_list_id: String,
    pub projects_list_id: String,
    pub port: u16,
}

impl ApiConfig {
    pub fn from_environment() -> Result<Self, ConfigError> {
        Self::from_lookup(&|name| env::var(name).ok())
    }

    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            trello_key: required(lookup, "TRELLO_KEY")?,
            trello_token: required(lookup, "TRELLO_TOKEN")?,
            next_actions_list_id: required(lookup, "TRELLO_NEXT_ACTIONS_LIST_ID")?,
            projects_list_id: required(lookup, "TRELLO_PROJECTS_LIST_ID")?,
            port: parsed(lookup, "PORT", DEFAULT_PORT)?,
        })
    }
}

/// Settings for the watcher. Everything has a default.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub feed_url: String,
    pub poll_interval: Duration,
    pub debug_logging: bool,
}

impl WatchConfig {
    pub fn from_environment() -> Result<Self, ConfigError> {
        Self::from_lookup(&|name| env::var(name).ok())
    }

    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let feed_url = lookup("NEXT_ACTIONS_URL")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_FEED_URL.to_string());
        let poll_secs = parsed(lookup, "NEXT_ACTIONS_POLL_SECS", DEFAULT_POLL_SECS)?;
        let debug_logging = lookup("NEXT_ACTIONS_DEBUG")
            .is_some_and(|value| value == "1" || value.eq_ignore_ascii_case("true"));

        Ok(Self {
            feed_url,
            poll_interval: Duration::from_secs(poll_secs),
            debug_logging,
        })
    }
}

fn required(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    lookup(name)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parsed<T: std::str::FromStr>(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name).filter(|value| !value.is_empty()) {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid(name)),
        None => Ok(default),
    }
}
