//! Session lifecycle manager.

use std::sync::Arc;

use chrono::Local;
use lumen_core::{LumenError, SessionId};
use serde::Serialize;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::instrument;

use crate::archive::SoulArchive;
use crate::config::EngineConfig;
use crate::memory::FieldMemory;
use crate::plan::plan_for;
use crate::registry::SessionRegistry;
use crate::session::{SessionKind, SessionRecord, SessionRequest};
use crate::worker::{self, WorkerContext};

/// Returned by [`SessionManager::start_session`] before the first tick runs.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTicket {
    pub session_id: SessionId,
    pub kind: SessionKind,
    pub seed: String,
    /// Resolved run time, after the kind's defaults were applied.
    pub duration_secs: u64,
    pub frequency: f64,
}

/// Starts, queries and stops sessions.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct SessionManager {
    registry: Arc<SessionRegistry>,
    config: EngineConfig,
    permits: Arc<Semaphore>,
    archive: SoulArchive,
    memory: FieldMemory,
}

impl SessionManager {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
            permits: Arc::new(Semaphore::new(config.max_active_sessions)),
            archive: SoulArchive::new(config.archive_capacity),
            memory: FieldMemory::new(config.memory_capacity, config.memory_window),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn archive(&self) -> &SoulArchive {
        &self.archive
    }

    pub fn memory(&self) -> &FieldMemory {
        &self.memory
    }

    /// Validate `request`, register it and spawn its worker.
    ///
    /// Must be called from within a tokio runtime. Returns without waiting
    /// for any tick.
    #[instrument(skip(self, request), fields(kind = %request.kind))]
    pub fn start_session(&self, request: SessionRequest) -> Result<SessionTicket, LumenError> {
        validate(&request)?;
        let mut permits = self.admit(1)?;
        let permit = permits.pop();
        Ok(self.launch(request, permit))
    }

    /// Start every request or none of them.
    ///
    /// All seeds are validated and one admission permit per request is
    /// reserved before any session is registered, so a rejected batch leaves
    /// nothing running.
    #[instrument(skip(self, requests), fields(count = requests.len()))]
    pub fn start_all(
        &self,
        requests: Vec<SessionRequest>,
    ) -> Result<Vec<SessionTicket>, LumenError> {
        for request in &requests {
            validate(request)?;
        }
        let permits = self.admit(requests.len())?;
        Ok(requests
            .into_iter()
            .zip(permits)
            .map(|(request, permit)| self.launch(request, Some(permit)))
            .collect())
    }

    fn admit(&self, count: usize) -> Result<Vec<OwnedSemaphorePermit>, LumenError> {
        let limit = self.config.max_active_sessions;
        let mut permits = Vec::with_capacity(count);
        for _ in 0..count {
            match Arc::clone(&self.permits).try_acquire_owned() {
                Ok(permit) => permits.push(permit),
                Err(_) => {
                    drop(permits);
                    tracing::warn!(limit, requested = count, "session admission limit reached");
                    return Err(LumenError::CapacityExceeded {
                        active: limit - self.permits.available_permits(),
                        limit,
                    });
                }
            }
        }
        Ok(permits)
    }

    fn launch(
        &self,
        request: SessionRequest,
        permit: Option<OwnedSemaphorePermit>,
    ) -> SessionTicket {
        if request.kind.is_archived() {
            let _ = self.archive.record(&request.seed);
        }

        let plan = plan_for(&request, Local::now().time());
        let schedule = plan.schedule();
        let ticket_duration = schedule.duration_secs;
        let ticket_frequency = schedule.frequency;
        let (id, cancel) = self.registry.create(&request, schedule);
        tracing::info!(session_id = %id, kind = %request.kind, "session started");

        let _ = tokio::spawn(worker::run(WorkerContext {
            id: id.clone(),
            plan,
            registry: Arc::clone(&self.registry),
            config: self.config.clone(),
            cancel,
            permit,
        }));

        SessionTicket {
            session_id: id,
            kind: request.kind,
            seed: request.seed,
            duration_secs: ticket_duration,
            frequency: ticket_frequency,
        }
    }

    pub fn status(&self, id: &SessionId) -> Option<SessionRecord> {
        self.registry.get(id)
    }

    /// Request a stop. `true` only if this call moved a running session to
    /// `Stopped`.
    #[instrument(skip(self, id), fields(session_id = %id))]
    pub fn stop(&self, id: &SessionId) -> bool {
        let stopped = self.registry.request_stop(id);
        if stopped {
            tracing::info!("stop requested");
        }
        stopped
    }

    /// Stop every running session, e.g. on shutdown.
    pub fn stop_all(&self) -> usize {
        let stopped = self.registry.stop_all();
        if stopped > 0 {
            tracing::info!(stopped, "stopped all running sessions");
        }
        stopped
    }

    pub fn active_count(&self) -> usize {
        self.registry.active_count()
    }
}

fn validate(request: &SessionRequest) -> Result<(), LumenError> {
    if request.seed.trim().is_empty() {
        return Err(LumenError::invalid("No intention provided"));
    }
    Ok(())
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
