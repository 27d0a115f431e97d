use std::{collections::HashMap, fs, io, path::Path, time::Duration};

use anyhow::Context;
use client_core::ListViewSettings;
use storage::StoreLatency;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub list_latency_ms: u64,
    pub lookup_latency_ms: u64,
    pub remove_latency_ms: u64,
    pub search_debounce_ms: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            list_latency_ms: 700,
            lookup_latency_ms: 600,
            remove_latency_ms: 600,
            search_debounce_ms: 500,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn store_latency(&self) -> StoreLatency {
        StoreLatency {
            list: Duration::from_millis(self.list_latency_ms),
            lookup: Duration::from_millis(self.lookup_latency_ms),
            remove: Duration::from_millis(self.remove_latency_ms),
        }
    }

    pub fn list_view(&self) -> ListViewSettings {
        ListViewSettings {
            search_debounce: Duration::from_millis(self.search_debounce_ms),
        }
    }
}

/// Defaults, then the optional TOML file at `path`, then `APP__*` environment variables.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()));
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

/// Flat `key = value` pairs. Values may be quoted or bare; unparseable ones are skipped.
fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file = toml::from_str::<HashMap<String, toml::Value>>(raw)?;
    let text = |key: &str| {
        file.get(key).map(|value| match value {
            toml::Value::String(v) => v.clone(),
            other => other.to_string(),
        })
    };
    apply_overrides(settings, text);
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    apply_overrides(settings, |key| lookup(&format!("APP__{}", key.to_ascii_uppercase())));
}

/// Unparseable numeric values are ignored.
fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let millis = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

    if let Some(v) = millis("list_latency_ms") {
        settings.list_latency_ms = v;
    }
    if let Some(v) = millis("lookup_latency_ms") {
        settings.lookup_latency_ms = v;
    }
    if let Some(v) = millis("remove_latency_ms") {
        settings.remove_latency_ms = v;
    }
    if let Some(v) = millis("search_debounce_ms") {
        settings.search_debounce_ms = v;
    }
    if let Some(v) = lookup("log_filter") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
