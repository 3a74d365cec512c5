//! Shared identifiers and the error taxonomy used across the lumen crates.

pub mod errors;
pub mod ids;

pub use errors::LumenError;
pub use ids::SessionId;
