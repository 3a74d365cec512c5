//! Session broadcast engine.
//!
//! [`SessionManager`] is the entry point: it validates a [`SessionRequest`],
//! creates a record in the [`SessionRegistry`] and spawns one worker task per
//! session. Workers tick until the session's duration elapses or a stop is
//! requested, then hand the record to the registry's grace-period reaper.

pub mod archive;
pub mod config;
pub mod manager;
pub mod memory;
pub mod plan;
pub mod registry;
pub mod session;
pub mod worker;

pub use archive::{ArchiveEntry, PatternSummary, SoulArchive};
pub use config::EngineConfig;
pub use manager::{SessionManager, SessionTicket};
pub use memory::FieldMemory;
pub use registry::SessionRegistry;
pub use session::{
    Fields, Progress, Schedule, SessionKind, SessionRecord, SessionRequest, SessionStatus,
};
