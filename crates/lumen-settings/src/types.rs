use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LumenSettings {
    pub server: ServerSettings,
    pub engine: EngineSettings,
    pub codes: CodesSettings,
    pub logging: LoggingSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            request_timeout_secs: 30,
        }
    }
}

/// Session engine tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    /// How long a finished session stays queryable.
    pub grace_period_secs: u64,
    /// Tick interval used when a session has no operating frequency.
    pub min_tick_interval_ms: u64,
    pub max_active_sessions: usize,
    pub archive_capacity: usize,
    pub memory_capacity: usize,
    pub memory_window_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            grace_period_secs: 300,
            min_tick_interval_ms: 1,
            max_active_sessions: 1024,
            archive_capacity: 10_000,
            memory_capacity: 1_000,
            memory_window_secs: 2 * 60 * 60,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodesSettings {
    pub catalog_path: PathBuf,
    /// Minimum fuzzy score (0-100) for a keyword to count as a match.
    pub fuzzy_threshold: u8,
}

impl Default for CodesSettings {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/healing_codes.txt"),
            fuzzy_threshold: 92,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: true,
        }
    }
}
