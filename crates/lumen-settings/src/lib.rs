//! Layered settings for the lumen server.
//!
//! Compiled defaults come first. A JSON file (`~/.lumen/settings.json` unless
//! a path is given) is deep-merged over them, and `LUMEN_*` environment
//! variables win over both.

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{apply_env_overrides, deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;
