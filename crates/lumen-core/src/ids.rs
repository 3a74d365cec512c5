use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Width of a session id in hex characters.
pub const SESSION_ID_LEN: usize = 32;

static NONCE: AtomicU64 = AtomicU64::new(0);

/// Opaque session token.
///
/// Derived from the seed text and the creation instant, plus a process-wide
/// counter so two sessions created from the same seed in the same instant
/// still get distinct ids.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn derive(seed: &str, created_at: DateTime<Utc>) -> Self {
        let nonce = NONCE.fetch_add(1, Ordering::Relaxed);
        Self::derive_with_nonce(seed, created_at, nonce)
    }

    pub fn derive_with_nonce(seed: &str, created_at: DateTime<Utc>, nonce: u64) -> Self {
        let nanos = created_at
            .timestamp_nanos_opt()
            .unwrap_or_else(|| created_at.timestamp_micros());
        let mut hasher = Sha256::new();
        hasher.update(format!("{seed}:{nanos}:{nonce}").as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        Self(digest[..SESSION_ID_LEN].to_owned())
    }

    pub fn from_raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
