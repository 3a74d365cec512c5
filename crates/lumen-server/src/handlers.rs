//! Route handlers.
//!
//! Request bodies accept `seed` or its older name `intention`. Every handler
//! answers with the `{ success, ... }` envelope from [`crate::responses`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Local;
use lumen_core::{LumenError, SessionId};
use lumen_engine::SessionRequest;
use lumen_geometry::constants::SCHUMANN_HZ;
use lumen_geometry::{
    amplify, dual_rotation_field, interlocking_triangles_field, lattice_field,
    polyhedron_resonance, ring_pattern_now, suggest_ritual, toroidal_field, Solid,
};
use serde::Deserialize;
use serde_json::json;

use crate::guidance;
use crate::responses::{failure, success, ApiResult};
use crate::server::AppState;

type Body<T> = Result<Json<T>, JsonRejection>;

fn default_duration() -> u64 {
    60
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_scalar_frequency() -> f64 {
    SCHUMANN_HZ
}

fn default_location() -> String {
    "Unknown Space".into()
}

fn default_user() -> String {
    "anonymous".into()
}

fn required_seed(seed: &str) -> Result<&str, LumenError> {
    let seed = seed.trim();
    if seed.is_empty() {
        return Err(LumenError::invalid("No intention provided"));
    }
    Ok(seed)
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunIntentionRequest {
    #[serde(default, alias = "intention")]
    pub seed: String,
    #[serde(default = "default_duration")]
    pub duration: u64,
    #[serde(default)]
    pub frequency: f64,
    #[serde(default)]
    pub boost: bool,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

pub async fn run_intention(
    State(state): State<AppState>,
    body: Body<RunIntentionRequest>,
) -> ApiResult {
    let Json(req) = body?;
    let request = SessionRequest::generic(req.seed.trim())
        .with_duration(req.duration)
        .with_frequency(req.frequency)
        .with_boost(req.boost)
        .with_multiplier(req.multiplier);
    let ticket = state.manager.start_session(request)?;

    Ok(success(json!({
        "message": format!("Intention is now running for {} seconds.", req.duration),
        "sessionId": ticket.session_id,
        "seed": ticket.seed,
        "frequency": req.frequency,
        "boost": req.boost,
        "multiplier": req.multiplier,
        "suggestedRitual": suggest_ritual(&ticket.seed),
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarRequest {
    #[serde(default, alias = "intention")]
    pub seed: String,
    #[serde(default = "default_duration")]
    pub duration: u64,
    #[serde(default = "default_scalar_frequency")]
    pub frequency: f64,
}

pub async fn broadcast_scalar(
    State(state): State<AppState>,
    body: Body<ScalarRequest>,
) -> ApiResult {
    let Json(req) = body?;
    let request = SessionRequest::scalar(req.seed.trim())
        .with_duration(req.duration)
        .with_frequency(req.frequency);
    let ticket = state.manager.start_session(request)?;

    Ok(success(json!({
        "message": format!(
            "Scalar broadcast running for {} seconds at {} Hz.",
            req.duration, req.frequency
        ),
        "sessionId": ticket.session_id,
        "seed": ticket.seed,
        "frequency": req.frequency,
    })))
}

pub async fn blessing(State(state): State<AppState>) -> ApiResult {
    let ticket = state.manager.start_session(SessionRequest::blessing())?;
    Ok(success(json!({
        "message": "Blessing broadcast initiated.",
        "sessionId": ticket.session_id,
        "seed": ticket.seed,
    })))
}

#[derive(Debug, Deserialize)]
pub struct HeartbeatRequest {
    #[serde(default)]
    pub text: String,
}

pub async fn heartbeat(State(state): State<AppState>, body: Body<HeartbeatRequest>) -> ApiResult {
    let Json(req) = body?;
    let (matched, requests): (Vec<_>, Vec<_>) = guidance::matched_cues(&req.text)
        .into_iter()
        .map(|(cue, seed)| (cue, SessionRequest::auto_resonance(seed).with_label("cue", cue)))
        .unzip();
    let session_ids: Vec<_> = state
        .manager
        .start_all(requests)?
        .into_iter()
        .map(|ticket| ticket.session_id)
        .collect();
    if !matched.is_empty() {
        tracing::info!(cues = matched.len(), "heartbeat cues matched");
    }

    Ok(success(json!({
        "scanned": true,
        "matched": matched,
        "sessionIds": session_ids,
    })))
}

#[derive(Debug, Deserialize)]
pub struct HarmonizeRequest {
    #[serde(default = "default_location")]
    pub location: String,
}

pub async fn harmonize_space(
    State(state): State<AppState>,
    body: Body<HarmonizeRequest>,
) -> ApiResult {
    let Json(req) = body?;
    let request = SessionRequest::harmonization(&req.location);
    let location = req.location.trim();
    let ticket = state.manager.start_session(request)?;

    Ok(success(json!({
        "message": format!("Space harmonization initiated for {location}."),
        "sessionId": ticket.session_id,
        "location": location,
        "seed": ticket.seed,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastLifeRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_user", alias = "user_id")]
    pub user_id: String,
}

pub async fn log_past_life_request(
    State(state): State<AppState>,
    body: Body<PastLifeRequest>,
) -> ApiResult {
    let Json(req) = body?;
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    tracing::info!(user_id = %req.user_id, prompt = %req.prompt, "past life request logged");

    let request = SessionRequest::past_life()
        .with_label("prompt", req.prompt.as_str())
        .with_label("userId", req.user_id.as_str());
    let ticket = state.manager.start_session(request)?;

    Ok(success(json!({
        "message": "Past life request logged and soul alignment activated.",
        "sessionId": ticket.session_id,
        "timestamp": timestamp,
    })))
}

pub async fn check_status(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let id = SessionId::from_raw(id);
    let record = state
        .manager
        .status(&id)
        .ok_or_else(|| LumenError::NotFound("Session not found".into()))?;
    Ok(success(json!({ "data": record })))
}

pub async fn stop_intention(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let id = SessionId::from_raw(id);
    if state.manager.stop(&id) {
        return Ok(success(json!({ "message": "Intention stopped." })));
    }
    match state.manager.status(&id) {
        Some(record) => Ok(failure(format!("Session already {}.", record.status()))),
        None => Err(LumenError::NotFound("Session not found".into()).into()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Codes, memory and guidance
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct HealingCodeRequest {
    #[serde(default)]
    pub issue: String,
    pub limit: Option<usize>,
}

pub async fn get_healing_code(
    State(state): State<AppState>,
    body: Body<HealingCodeRequest>,
) -> ApiResult {
    let Json(req) = body?;
    if req.issue.trim().is_empty() {
        return Err(LumenError::invalid("No issue provided").into());
    }
    tracing::debug!(issue = %req.issue, "healing code lookup");
    let codes = state.codes.lookup(&req.issue, req.limit);
    if codes.is_empty() {
        return Ok(failure("No healing code found for this issue."));
    }
    Ok(success(json!({ "codes": codes })))
}

#[derive(Debug, Deserialize)]
pub struct SeedRequest {
    #[serde(default, alias = "intention")]
    pub seed: String,
}

pub async fn remember_intention(
    State(state): State<AppState>,
    body: Body<SeedRequest>,
) -> ApiResult {
    let Json(req) = body?;
    let seed = required_seed(&req.seed)?;
    let _ = state.manager.memory().remember(seed);
    let _ = state.manager.archive().record(seed);
    Ok(success(json!({ "remembered": seed })))
}

pub async fn recall_memory(State(state): State<AppState>) -> ApiResult {
    Ok(success(json!({ "recent": state.manager.memory().recall() })))
}

pub async fn analyze_patterns(State(state): State<AppState>) -> ApiResult {
    Ok(success(json!({ "patterns": state.manager.archive().analyze() })))
}

pub async fn suggest_ritual_handler(body: Body<SeedRequest>) -> ApiResult {
    let Json(req) = body?;
    let seed = required_seed(&req.seed)?;
    Ok(success(json!({
        "seed": seed,
        "ritual": suggest_ritual(seed),
        "element": guidance::element_for(seed),
        "triangleCode": interlocking_triangles_field(seed).code,
    })))
}

#[derive(Debug, Deserialize)]
pub struct GuidanceRequest {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

pub async fn invoke_guidance(body: Body<GuidanceRequest>) -> ApiResult {
    let Json(req) = body?;
    let kind = req.kind.unwrap_or_else(|| "general".into()).to_lowercase();
    let element = guidance::element_for(&kind);
    Ok(success(json!({
        "invocation": guidance::invocation(&kind),
        "element": element,
        "elementGuidance": guidance::element_guidance(element),
    })))
}

// ─────────────────────────────────────────────────────────────────────────────
// Geometry
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryRequest {
    #[serde(default, alias = "intention")]
    pub seed: String,
    #[serde(alias = "field_type")]
    pub field_type: String,
    pub frequency: Option<f64>,
    #[serde(default)]
    pub boost: bool,
    pub multiplier: Option<f64>,
    pub solid: Option<String>,
    pub duration: Option<u64>,
}

/// Run a single generator stage and return its raw artifact.
pub async fn calculate_geometry(body: Body<GeometryRequest>) -> ApiResult {
    let Json(req) = body?;
    let seed = required_seed(&req.seed)?;
    let frequency = req.frequency.unwrap_or(SCHUMANN_HZ);

    let artifact = match req.field_type.trim().to_lowercase().as_str() {
        "amplify" => json!(amplify(seed, req.multiplier.unwrap_or(1.0))),
        "rotation" => json!(dual_rotation_field(seed, frequency)),
        "toroidal" => json!(toroidal_field(seed, frequency)),
        "triangles" => json!(interlocking_triangles_field(seed)),
        "lattice" => json!(lattice_field(seed, req.boost)),
        "ring" => json!(ring_pattern_now(seed, req.duration.unwrap_or(60))),
        "polyhedron" => {
            let solid = req
                .solid
                .as_deref()
                .map_or_else(Solid::default, Solid::parse_or_default);
            json!(polyhedron_resonance(seed, solid))
        }
        other => {
            return Err(LumenError::invalid(format!("Unknown field type: {other}")).into());
        }
    };

    Ok(success(json!({
        "fieldType": req.field_type,
        "artifact": artifact,
    })))
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "activeSessions": state.manager.active_count(),
    }))
}
