use std::time::Duration;

use lumen_settings::EngineSettings;

/// Runtime knobs for the engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Time a terminal session stays queryable before it is removed.
    pub grace_period: Duration,
    /// Tick interval for sessions without an operating frequency, and the
    /// floor for every other interval.
    pub min_tick_interval: Duration,
    pub max_active_sessions: usize,
    pub archive_capacity: usize,
    pub memory_capacity: usize,
    pub memory_window: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(&EngineSettings::default())
    }
}

impl From<&EngineSettings> for EngineConfig {
    fn from(s: &EngineSettings) -> Self {
        Self {
            grace_period: Duration::from_secs(s.grace_period_secs),
            min_tick_interval: Duration::from_millis(s.min_tick_interval_ms.max(1)),
            max_active_sessions: s.max_active_sessions.max(1),
            archive_capacity: s.archive_capacity.max(1),
            memory_capacity: s.memory_capacity.max(1),
            memory_window: Duration::from_secs(s.memory_window_secs),
        }
    }
}

impl EngineConfig {
    /// Sleep between ticks for a session running at `frequency` Hz.
    pub fn tick_interval(&self, frequency: f64) -> Duration {
        if !(frequency.is_finite() && frequency > 0.0) {
            return self.min_tick_interval;
        }
        Duration::try_from_secs_f64(1.0 / frequency)
            .unwrap_or(Duration::MAX)
            .max(self.min_tick_interval)
    }
}
