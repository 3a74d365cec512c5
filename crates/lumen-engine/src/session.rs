use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use lumen_core::SessionId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open key/value map for kind-specific progress fields and labels.
pub type Fields = serde_json::Map<String, Value>;

/// The broadcast variants the engine knows how to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Generic,
    Scalar,
    Blessing,
    AutoResonance,
    Harmonization,
    PastLife,
}

impl SessionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Scalar => "scalar",
            Self::Blessing => "blessing",
            Self::AutoResonance => "auto_resonance",
            Self::Harmonization => "harmonization",
            Self::PastLife => "past_life",
        }
    }

    /// Whether seeds of this kind are recorded in the soul archive.
    pub fn is_archived(self) -> bool {
        matches!(self, Self::Generic | Self::Scalar | Self::Harmonization)
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generic" => Ok(Self::Generic),
            "scalar" => Ok(Self::Scalar),
            "blessing" => Ok(Self::Blessing),
            "auto_resonance" => Ok(Self::AutoResonance),
            "harmonization" => Ok(Self::Harmonization),
            "past_life" => Ok(Self::PastLife),
            other => Err(format!("unknown session kind: {other}")),
        }
    }
}

/// Lifecycle state. `Stopped` and `Completed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Running,
    Stopped,
    Completed,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub iterations: u64,
    pub last_pulse: Option<String>,
    pub field_strength: f64,
    /// Kind-specific fields, flattened next to the common ones.
    #[serde(flatten)]
    pub fields: Fields,
}

/// Snapshot of one session as served to callers.
///
/// `status` is only writable inside the crate; the registry is the single
/// place that performs transitions, and it never leaves a terminal state.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: SessionId,
    pub kind: SessionKind,
    pub(crate) status: SessionStatus,
    pub seed: String,
    pub created_at: DateTime<Utc>,
    pub frequency: f64,
    pub duration_seconds: u64,
    pub remaining_seconds: u64,
    pub progress: Progress,
    #[serde(skip_serializing_if = "Fields::is_empty")]
    pub labels: Fields,
}

/// Run time, cadence and starting fields resolved for a session before it
/// is registered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schedule {
    pub duration_secs: u64,
    pub frequency: f64,
    pub fields: Fields,
}

impl Schedule {
    pub fn new(duration_secs: u64, frequency: f64) -> Self {
        Self {
            duration_secs,
            frequency,
            fields: Fields::new(),
        }
    }
}

impl SessionRecord {
    pub(crate) fn new(
        id: SessionId,
        request: &SessionRequest,
        schedule: Schedule,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind: request.kind,
            status: SessionStatus::Running,
            seed: request.seed.clone(),
            created_at,
            frequency: schedule.frequency,
            duration_seconds: schedule.duration_secs,
            remaining_seconds: schedule.duration_secs,
            progress: Progress {
                fields: schedule.fields,
                ..Progress::default()
            },
            labels: request.labels.clone(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Fixed seed broadcast by every blessing session.
pub const BLESSING_SEED: &str = "Return to Light – 03 05 791";

/// Fixed seed broadcast by every past-life session.
pub const PAST_LIFE_SEED: &str =
    "Past life insight is received with clarity, healing, and divine permission. 32 27 5427";

/// Everything needed to start a session.
///
/// Unset numeric parameters fall back to the defaults of the session kind.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionRequest {
    pub kind: SessionKind,
    pub seed: String,
    pub duration_secs: Option<u64>,
    pub frequency: Option<f64>,
    pub boost: bool,
    pub multiplier: Option<f64>,
    pub labels: Fields,
}

impl SessionRequest {
    pub fn new(kind: SessionKind, seed: impl Into<String>) -> Self {
        Self {
            kind,
            seed: seed.into(),
            duration_secs: None,
            frequency: None,
            boost: false,
            multiplier: None,
            labels: Fields::new(),
        }
    }

    pub fn generic(seed: impl Into<String>) -> Self {
        Self::new(SessionKind::Generic, seed)
    }

    pub fn scalar(seed: impl Into<String>) -> Self {
        Self::new(SessionKind::Scalar, seed)
    }

    pub fn blessing() -> Self {
        Self::new(SessionKind::Blessing, BLESSING_SEED)
    }

    pub fn auto_resonance(cue: impl Into<String>) -> Self {
        Self::new(SessionKind::AutoResonance, cue)
    }

    /// Harmonize a named place. An empty location yields an empty seed and
    /// is rejected by the manager like any other empty seed.
    pub fn harmonization(location: &str) -> Self {
        let location = location.trim();
        let seed = if location.is_empty() {
            String::new()
        } else {
            format!("Harmonizing energetic field of {location}")
        };
        Self::new(SessionKind::Harmonization, seed).with_label("location", location)
    }

    pub fn past_life() -> Self {
        Self::new(SessionKind::PastLife, PAST_LIFE_SEED)
    }

    pub fn with_duration(mut self, secs: u64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    pub fn with_frequency(mut self, hz: f64) -> Self {
        self.frequency = Some(hz);
        self
    }

    pub fn with_boost(mut self, boost: bool) -> Self {
        self.boost = boost;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    pub fn with_label(mut self, key: &str, value: impl Into<Value>) -> Self {
        let _ = self.labels.insert(key.to_owned(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_roundtrips_through_str() {
        for kind in [
            SessionKind::Generic,
            SessionKind::Scalar,
            SessionKind::Blessing,
            SessionKind::AutoResonance,
            SessionKind::Harmonization,
            SessionKind::PastLife,
        ] {
            assert_eq!(kind.as_str().parse::<SessionKind>().unwrap(), kind);
        }
        assert!("bogus".parse::<SessionKind>().is_err());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!SessionStatus::Running.is_terminal());
        assert!(SessionStatus::Stopped.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
    }

    #[test]
    fn record_serializes_camel_case_with_flattened_fields() {
        let request = SessionRequest::generic("calm");
        let mut record = SessionRecord::new(
            SessionId::from_raw("abc"),
            &request,
            Schedule::new(10, 7.83),
            Utc::now(),
        );
        let _ = record
            .progress
            .fields
            .insert("activationKey".into(), json!("K-1"));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "running");
        assert_eq!(value["kind"], "generic");
        assert_eq!(value["remainingSeconds"], 10);
        assert_eq!(value["durationSeconds"], 10);
        assert_eq!(value["frequency"], 7.83);
        assert_eq!(value["progress"]["iterations"], 0);
        assert_eq!(value["progress"]["activationKey"], "K-1");
        assert!(value.get("labels").is_none());
    }

    #[test]
    fn harmonization_seed_and_label() {
        let req = SessionRequest::harmonization(" kitchen ");
        assert_eq!(req.seed, "Harmonizing energetic field of kitchen");
        assert_eq!(req.labels["location"], "kitchen");
        assert!(SessionRequest::harmonization("  ").seed.is_empty());
    }

    #[test]
    fn fixed_seed_kinds() {
        assert_eq!(SessionRequest::blessing().seed, BLESSING_SEED);
        assert_eq!(SessionRequest::past_life().seed, PAST_LIFE_SEED);
    }
}
