use std::sync::Arc;

use lumen_codes::{Catalog, CodeIndex};
use lumen_engine::{EngineConfig, SessionManager};
use lumen_server::{start, AppState, ServerConfig, ServerHandle};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const CATALOG: &str = "\
EMOTIONAL BALANCE
519 7148 - Anxiety and nervous tension
8149 5431 - Calm mind, release of anxiety
SLEEP
514 854 81 - Restful sleep
";

struct TestServer {
    handle: ServerHandle,
    client: Client,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with(EngineConfig::default()).await
    }

    async fn start_with(engine: EngineConfig) -> Self {
        let state = AppState {
            manager: Arc::new(SessionManager::new(engine)),
            codes: Arc::new(CodeIndex::new(Catalog::parse(CATALOG), 92)),
        };
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            ..Default::default()
        };
        Self {
            handle: start(config, state).await.unwrap(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.handle.port, path)
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = self.client.post(self.url(path)).json(&body).send().await.unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn run_intention_then_poll_status() {
    let server = TestServer::start().await;
    let (status, body) = server
        .post(
            "/run-intention",
            json!({ "intention": "I am calm", "duration": 5, "frequency": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["seed"], "I am calm");
    assert!(body["suggestedRitual"].is_string());
    let id = body["sessionId"].as_str().unwrap().to_owned();
    assert_eq!(id.len(), 32);

    let (status, body) = server
        .get(&format!("/api/check-intention-status/{id}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["kind"], "generic");
    assert_eq!(body["data"]["status"], "running");
}

#[tokio::test]
async fn empty_seed_is_rejected() {
    let server = TestServer::start().await;
    let (status, body) = server.post("/api/run-intention", json!({ "seed": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No intention provided");

    let (_, health) = server.get("/health").await;
    assert_eq!(health["activeSessions"], 0);
}

#[tokio::test]
async fn malformed_body_gets_structured_error() {
    let server = TestServer::start().await;
    let (status, body) = server
        .post("/run-intention", json!({ "seed": "x", "duration": "long" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let server = TestServer::start().await;
    let (status, body) = server.get("/check-intention-status/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Session not found");

    let (status, _) = server.post("/stop-intention/nope", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stop_succeeds_once() {
    let server = TestServer::start().await;
    let (_, body) = server
        .post("/broadcast-scalar", json!({ "seed": "steady", "duration": 30 }))
        .await;
    let id = body["sessionId"].as_str().unwrap().to_owned();

    let (_, first) = server.post(&format!("/stop-intention/{id}"), json!({})).await;
    assert_eq!(first["success"], true);

    let (status, second) = server.post(&format!("/stop-intention/{id}"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["success"], false);

    let (_, body) = server.get(&format!("/check-intention-status/{id}")).await;
    assert_eq!(body["data"]["status"], "stopped");
}

#[tokio::test]
async fn heartbeat_starts_one_session_per_cue() {
    let server = TestServer::start().await;
    let (_, body) = server
        .post("/heartbeat", json!({ "text": "I feel lost and I'm afraid" }))
        .await;
    assert_eq!(body["scanned"], true);
    assert_eq!(body["matched"], json!(["i feel lost", "i'm afraid"]));

    let ids = body["sessionIds"].as_array().unwrap();
    assert_eq!(ids.len(), 2);
    for id in ids {
        let (_, status) = server
            .get(&format!("/check-intention-status/{}", id.as_str().unwrap()))
            .await;
        assert_eq!(status["data"]["kind"], "auto_resonance");
    }

    let (_, none) = server.post("/heartbeat", json!({ "text": "all good" })).await;
    assert_eq!(none["matched"], json!([]));
}

#[tokio::test]
async fn heartbeat_over_capacity_starts_nothing() {
    let server = TestServer::start_with(EngineConfig {
        max_active_sessions: 1,
        ..EngineConfig::default()
    })
    .await;
    let (status, body) = server
        .post("/heartbeat", json!({ "text": "I feel lost and I'm afraid" }))
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "capacity_exceeded");

    let (_, health) = server.get("/health").await;
    assert_eq!(health["activeSessions"], 0);

    let (status, single) = server.post("/heartbeat", json!({ "text": "i'm afraid" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single["sessionIds"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn fixed_seed_sessions() {
    let server = TestServer::start().await;
    let (_, blessing) = server.post("/blessing", json!({})).await;
    assert_eq!(blessing["seed"], "Return to Light – 03 05 791");

    let (_, space) = server.post("/harmonize-space", json!({})).await;
    assert_eq!(space["location"], "Unknown Space");

    let (_, past) = server
        .post("/log-past-life-request", json!({ "prompt": "who was I", "user_id": "u1" }))
        .await;
    assert_eq!(past["success"], true);
    let id = past["sessionId"].as_str().unwrap();
    let (_, status) = server.get(&format!("/check-intention-status/{id}")).await;
    assert_eq!(status["data"]["labels"]["userId"], "u1");
}

#[tokio::test]
async fn healing_code_lookup() {
    let server = TestServer::start().await;
    let (_, body) = server.post("/get-healing-code", json!({ "issue": "anxiety" })).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["codes"].as_array().unwrap().len(), 2);

    let (_, limited) = server
        .post("/get-healing-code", json!({ "issue": "anxiety", "limit": 1 }))
        .await;
    assert_eq!(limited["codes"].as_array().unwrap().len(), 1);

    let (status, missing) = server.post("/get-healing-code", json!({ "issue": "zzqx" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(missing["success"], false);
}

#[tokio::test]
async fn memory_and_patterns() {
    let server = TestServer::start().await;
    let (_, body) = server
        .post("/remember-intention", json!({ "intention": "clarity now" }))
        .await;
    assert_eq!(body["remembered"], "clarity now");

    let (_, recall) = server.get("/recall-memory").await;
    assert_eq!(recall["recent"], json!(["clarity now"]));

    let (_, patterns) = server.get("/api/analyze-patterns").await;
    assert_eq!(patterns["patterns"]["total"], 1);
    assert_eq!(patterns["patterns"]["patterns"]["clarity now"], 1);
}

#[tokio::test]
async fn geometry_and_guidance() {
    let server = TestServer::start().await;
    let (_, torus) = server
        .post(
            "/calculate-geometry",
            json!({ "seed": "heal", "fieldType": "toroidal", "frequency": 7.83 }),
        )
        .await;
    assert_eq!(torus["artifact"]["seed"], "heal");
    let angle = torus["artifact"]["phase_angle"].as_f64().unwrap();
    assert!((0.0..360.0).contains(&angle));

    let (status, _) = server
        .post("/calculate-geometry", json!({ "seed": "heal", "fieldType": "spiral" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, ritual) = server.post("/suggest-ritual", json!({ "seed": "peace" })).await;
    assert!(ritual["ritual"].is_string());
    assert!(ritual["triangleCode"].is_string());

    let (_, guidance) = server.post("/invoke-guidance", json!({})).await;
    assert!(guidance["invocation"]
        .as_str()
        .unwrap()
        .starts_with("You are invited"));
    assert!(guidance["elementGuidance"].is_string());
}
