//! Broadcast worker: one tokio task per session.

use std::sync::Arc;
use std::time::Duration;

use lumen_core::SessionId;
use tokio::sync::OwnedSemaphorePermit;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::plan::BroadcastPlan;
use crate::registry::SessionRegistry;
use crate::session::SessionStatus;

/// Everything a worker owns for the lifetime of its session.
pub struct WorkerContext {
    pub id: SessionId,
    /// Built before registration; its schedule is already on the record.
    pub plan: Box<dyn BroadcastPlan>,
    pub registry: Arc<SessionRegistry>,
    pub config: EngineConfig,
    pub cancel: CancellationToken,
    /// Admission permit, released when the worker exits.
    pub permit: Option<OwnedSemaphorePermit>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Exit {
    Elapsed,
    Stopped,
    Vanished,
}

/// Drive a session from start to a terminal state.
pub async fn run(ctx: WorkerContext) {
    let WorkerContext {
        id,
        plan,
        registry,
        config,
        cancel,
        permit,
    } = ctx;

    let duration_secs = plan.duration_secs();
    let duration = Duration::from_secs(duration_secs);
    let frequency = plan.frequency();
    let interval = config.tick_interval(frequency);
    let per_tick = plan.iterations_per_tick();

    tracing::debug!(session_id = %id, duration_secs, frequency, "broadcast started");

    let started = Instant::now();
    let mut tick: u64 = 0;
    let mut iterations: u64 = 0;

    let exit = loop {
        match registry.status(&id) {
            Some(SessionStatus::Running) => {}
            Some(_) => break Exit::Stopped,
            None => break Exit::Vanished,
        }

        let elapsed = started.elapsed();
        if elapsed >= duration {
            break Exit::Elapsed;
        }

        let pulse = plan.pulse(tick);
        iterations = iterations.saturating_add(per_tick);
        let remaining = duration.saturating_sub(elapsed);
        let strength = field_strength(iterations, duration_secs);

        let written = registry.update(&id, |record| {
            record.remaining_seconds = remaining.as_secs();
            record.progress.iterations = iterations;
            record.progress.field_strength = strength;
            record.progress.last_pulse = Some(pulse.digest.clone());
            record.progress.fields.extend(pulse.fields);
        });
        if !written {
            break match registry.status(&id) {
                Some(_) => Exit::Stopped,
                None => Exit::Vanished,
            };
        }
        tracing::trace!(session_id = %id, tick, pulse = %pulse.digest, "pulse");
        tick += 1;

        tokio::select! {
            () = tokio::time::sleep(interval.min(remaining)) => {}
            () = cancel.cancelled() => {}
        }
    };

    match exit {
        Exit::Elapsed => {
            if registry.complete(&id) {
                tracing::info!(session_id = %id, iterations, "broadcast completed");
            }
            let _ = registry.schedule_removal(id, config.grace_period);
        }
        Exit::Stopped => {
            tracing::info!(session_id = %id, iterations, "broadcast stopped");
            let _ = registry.schedule_removal(id, config.grace_period);
        }
        Exit::Vanished => {
            tracing::debug!(session_id = %id, "session removed while running");
        }
    }
    drop(permit);
}

/// `iterations / duration * 100`, rounded to two decimals.
fn field_strength(iterations: u64, duration_secs: u64) -> f64 {
    if duration_secs == 0 {
        return 0.0;
    }
    let raw = iterations as f64 / duration_secs as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}
