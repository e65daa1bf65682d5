use crate::error::DeskError;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::net::{IpAddr, Ipv4Addr};
use url::Url;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// HTTP server listen address.
    /// Env: `LISTEN_ADDR`. Default: `0.0.0.0`.
    #[serde(default = "default_listen_ip")]
    pub listen_addr: IpAddr,

    /// HTTP server listen port.
    /// Env: `LISTEN_PORT`. Default: `8000`.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Database URL for SQLite. `sqlite::memory:` keeps everything in one
    /// in-process connection.
    /// Env: `DATABASE_URL`. Default: `sqlite://airdesk.db`.
    #[serde(default)]
    pub database_url: String,

    /// Log level for tracing subscriber initialization (e.g. "warn", "info", "debug").
    /// Env: `LOGLEVEL`. Default: `info`.
    #[serde(default)]
    pub loglevel: String,

    /// Optional outbound HTTP proxy used by the text generator client.
    /// Env: `PROXY`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// Key every tool call must present (required, non-empty).
    /// Env: `DESK_KEY`.
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_string_lax")]
    pub desk_key: String,

    /// Base URL of the Gemini-compatible text generation API.
    /// Env: `GENERATION_URL`. Default: `https://generativelanguage.googleapis.com/`.
    #[serde(default = "default_generation_url")]
    pub generation_url: Url,

    /// Model asked for todo titles.
    /// Env: `GENERATION_MODEL`. Default: `gemini-2.5-flash`.
    #[serde(default)]
    pub generation_model: String,

    /// API key for the text generation API. Unset disables generation.
    /// Env: `GENERATION_API_KEY`.
    #[serde(default)]
    pub generation_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_ip(),
            listen_port: default_listen_port(),
            database_url: "sqlite://airdesk.db".to_string(),
            loglevel: "info".to_string(),
            proxy: None,
            desk_key: String::new(),
            generation_url: default_generation_url(),
            generation_model: "gemini-2.5-flash".to_string(),
            generation_api_key: None,
        }
    }
}

impl Config {
    /// Builds a Figment that merges defaults and environment variables.
    /// Uses raw env mapping, so field names map to env vars in UPPER_SNAKE_CASE.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(&[
                "LISTEN_ADDR",
                "LISTEN_PORT",
                "DATABASE_URL",
                "LOGLEVEL",
                "PROXY",
                "DESK_KEY",
                "GENERATION_URL",
                "GENERATION_MODEL",
                "GENERATION_API_KEY",
            ]))
    }

    /// Loads configuration from the environment (with defaults) and validates required fields.
    pub fn from_env() -> Result<Self, DeskError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, DeskError> {
        let cfg: Self = figment
            .extract()
            .map_err(|e| DeskError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), DeskError> {
        if self.desk_key.trim().is_empty() {
            return Err(DeskError::Config(
                "DESK_KEY must be set and non-empty".to_string(),
            ));
        }
        if self.generation_model.trim().is_empty() {
            return Err(DeskError::Config(
                "GENERATION_MODEL must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn deserialize_string_lax<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(serde::de::Error::custom(
            "expected a string or a number for DESK_KEY",
        )),
    }
}

/// Default IP address for the HTTP server listen address.
pub fn default_listen_ip() -> IpAddr {
    Ipv4Addr::new(0, 0, 0, 0).into()
}

/// Default port for the HTTP server.
pub fn default_listen_port() -> u16 {
    8000
}

fn default_generation_url() -> Url {
    Url::parse("https://generativelanguage.googleapis.com/").expect("valid Gemini API base URL")
}
