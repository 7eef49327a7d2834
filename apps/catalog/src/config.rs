use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use anyhow::{bail, Context};
use tracing::warn;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://apis.ccbp.in";
const CONFIG_FILE: &str = "catalog.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub token: Option<String>,
    pub token_file: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub search_debounce_ms: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            token: None,
            token_file: None,
            request_timeout_secs: 10,
            search_debounce_ms: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn search_debounce(&self) -> Option<Duration> {
        self.search_debounce_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

pub fn load_settings() -> Settings {
    let file_contents = fs::read_to_string(CONFIG_FILE).ok();
    settings_from_sources(file_contents.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then `catalog.toml`, then environment. Later sources win.
pub fn settings_from_sources(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(file_cfg) => {
                let get = |key: &str| file_cfg.get(key).and_then(value_as_string);
                if let Some(v) = get("api_base_url") {
                    settings.api_base_url = v;
                }
                if let Some(v) = get("token") {
                    settings.token = Some(v);
                }
                if let Some(v) = get("token_file") {
                    settings.token_file = Some(PathBuf::from(v));
                }
                if let Some(v) = get("request_timeout_secs").and_then(|v| v.parse().ok()) {
                    settings.request_timeout_secs = v;
                }
                if let Some(v) = get("search_debounce_ms").and_then(|v| v.parse().ok()) {
                    settings.search_debounce_ms = Some(v);
                }
            }
            Err(err) => warn!(%err, file = CONFIG_FILE, "ignoring unparsable config file"),
        }
    }

    if let Some(v) = env("CATALOG_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("CATALOG_TOKEN") {
        settings.token = Some(v);
    }
    if let Some(v) = env("APP__TOKEN") {
        settings.token = Some(v);
    }

    if let Some(v) = env("CATALOG_TOKEN_FILE") {
        settings.token_file = Some(PathBuf::from(v));
    }
    if let Some(v) = env("APP__TOKEN_FILE") {
        settings.token_file = Some(PathBuf::from(v));
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    if let Some(v) = env("APP__SEARCH_DEBOUNCE_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.search_debounce_ms = Some(parsed);
        }
    }

    settings
}

fn value_as_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        _ => None,
    }
}

pub fn normalize_api_base_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_API_BASE_URL.to_string());
    }

    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    let url = Url::parse(&with_scheme)
        .with_context(|| format!("invalid product api base url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("product api base url must use http or https, got '{raw}'");
    }

    Ok(with_scheme.trim_end_matches('/').to_string())
}
