use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;

use crate::errors::{Result, SettingsError};
use crate::types::LumenSettings;

/// Default settings file: `~/.lumen/settings.json`.
pub fn settings_path() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
        .join(".lumen")
        .join("settings.json")
}

/// Load settings from the default path with env overrides applied.
pub fn load_settings() -> Result<LumenSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from `path`, deep-merged over defaults, then apply `LUMEN_*`
/// env overrides. A missing file is not an error.
pub fn load_settings_from_path(path: &Path) -> Result<LumenSettings> {
    let mut settings = read_file_layer(path)?;
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn read_file_layer(path: &Path) -> Result<LumenSettings> {
    if !path.exists() {
        tracing::debug!(?path, "no settings file, using defaults");
        return Ok(LumenSettings::default());
    }

    let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let user: Value = serde_json::from_str(&raw)?;
    let defaults = serde_json::to_value(LumenSettings::default())?;
    let merged = deep_merge(defaults, user);
    Ok(serde_json::from_value(merged)?)
}

/// Recursively merge `overlay` into `base`. Objects merge key by key; any
/// other value in `overlay` replaces the one in `base`.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                let _ = base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, overlay) => overlay,
    }
}

/// Apply `LUMEN_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(settings: &mut LumenSettings, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("LUMEN_HOST") {
        settings.server.host = host;
    }
    if let Some(port) = lookup("LUMEN_PORT") {
        settings.server.port = parse_env("LUMEN_PORT", &port)?;
    }
    if let Some(level) = lookup("LUMEN_LOG_LEVEL") {
        settings.logging.level = level;
    }
    if let Some(json) = lookup("LUMEN_LOG_JSON") {
        settings.logging.json = parse_env("LUMEN_LOG_JSON", &json)?;
    }
    if let Some(path) = lookup("LUMEN_CODES_PATH") {
        settings.codes.catalog_path = PathBuf::from(path);
    }
    if let Some(max) = lookup("LUMEN_MAX_SESSIONS") {
        settings.engine.max_active_sessions = parse_env("LUMEN_MAX_SESSIONS", &max)?;
    }
    Ok(())
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| SettingsError::InvalidEnv {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}
