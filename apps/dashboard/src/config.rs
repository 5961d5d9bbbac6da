use std::{collections::HashMap, fs};

use serde::Deserialize;
use storage::normalize_storage_url;

pub const SETTINGS_FILE: &str = "dashboard.toml";
/// Used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub api_base: String,
    pub storage_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8080/api".into(),
            storage_url: "sqlite://./data/dashboard.db".into(),
        }
    }
}

/// Defaults, then `dashboard.toml` in the working directory, then the
/// environment.
pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    resolve_settings(file.as_deref(), |key| std::env::var(key).ok())
}

pub fn resolve_settings(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
            if let Some(v) = file_cfg.get("api_base") {
                settings.api_base = v.clone();
            }
            if let Some(v) = file_cfg.get("storage_url") {
                settings.storage_url = v.clone();
            }
        }
    }

    if let Some(v) = env("DASHBOARD_API_BASE") {
        settings.api_base = v;
    }
    if let Some(v) = env("APP__API_BASE") {
        settings.api_base = v;
    }

    if let Some(v) = env("DASHBOARD_STORAGE_URL") {
        settings.storage_url = v;
    }
    if let Some(v) = env("APP__STORAGE_URL") {
        settings.storage_url = v;
    }

    settings
}

impl Settings {
    pub fn with_overrides(mut self, api_base: Option<String>, storage_url: Option<String>) -> Self {
        if let Some(api_base) = api_base {
            self.api_base = api_base;
        }
        if let Some(storage_url) = storage_url {
            self.storage_url = storage_url;
        }
        self
    }

    pub fn normalized_storage_url(&self) -> String {
        if self.storage_url.trim().is_empty() {
            return Settings::default().storage_url;
        }
        normalize_storage_url(&self.storage_url)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
