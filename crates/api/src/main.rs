use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use dashmap::DashMap;
use extract::StructuredExtractor;
use ingest::LoaderError;
use llm::{OpenAiClient, OpenRouterClient, RouterModel};
use serde::{Deserialize, Serialize};
use session::{BatchRequest, BatchRunner, Session, SessionError};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use uuid::Uuid;

mod config;
mod metrics;

use config::{AppConfig, DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_PROMPT};
use metrics::Metrics;

struct AppState {
    // One entry per user session; the result table is never process-global
    sessions: DashMap<Uuid, Arc<Mutex<Session>>>,
    config: AppConfig,
    metrics: Arc<Metrics>,
}

#[derive(Serialize)]
struct CreateSessionResponse {
    session_id: Uuid,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ModelChoice {
    OpenAi,
    Llama,
    Claude,
}

#[derive(Deserialize)]
struct SubmitRequest {
    openai_api_key: String,
    /// Required for the routed models (llama, claude)
    openrouter_api_key: Option<String>,
    model: ModelChoice,
    system_prompt: Option<String>,
    user_prompt: Option<String>,
    iterations: usize,
    document_path: String,
}

#[derive(Serialize)]
struct SubmitResponse {
    response: Option<String>,
    completed: usize,
    failed: usize,
    rows: usize,
}

#[derive(Serialize)]
struct ExportResponse {
    path: String,
    rows: usize,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    active_sessions: usize,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = AppConfig::default();
    std::fs::create_dir_all(&config.export_dir).expect("Failed to create export directory");

    let state = Arc::new(AppState {
        sessions: DashMap::new(),
        config,
        metrics: Metrics::new(),
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(get_stats))
        .route("/sessions", post(create_session))
        .route("/sessions/:id/submit", post(submit))
        .route("/sessions/:id/export", get(export_table))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Failed to bind port 3000");

    tracing::info!("Server listening on http://localhost:3000");

    axum::serve(listener, app).await.expect("Server failed");
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        active_sessions: state.sessions.len(),
    })
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<metrics::MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

async fn create_session(State(state): State<Arc<AppState>>) -> Json<CreateSessionResponse> {
    let session_id = Uuid::new_v4();
    let export_path = state
        .config
        .export_dir
        .join(format!("response-{}.csv", session_id));

    state
        .sessions
        .insert(session_id, Arc::new(Mutex::new(Session::new(export_path))));

    tracing::info!(%session_id, "session created");
    Json(CreateSessionResponse { session_id })
}

async fn submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, (StatusCode, String)> {
    let session = state
        .sessions
        .get(&id)
        .map(|entry| entry.value().clone())
        .ok_or((StatusCode::NOT_FOUND, "unknown session".to_string()))?;
    let mut session = session.lock().await;

    let batch = BatchRequest {
        document_path: req.document_path.clone(),
        system_prompt: req
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        user_prompt: req
            .user_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_PROMPT.to_string()),
        iterations: req.iterations,
    };

    // Structured extraction always goes through OpenAI's JSON mode
    let extractor = StructuredExtractor::new(OpenAiClient::new(req.openai_api_key.clone()));
    let runner_config = state.config.runner_config();

    let started = Instant::now();
    let result = match req.model {
        ModelChoice::OpenAi => {
            let juror = OpenAiClient::new(req.openai_api_key.clone());
            BatchRunner::new(juror, extractor, runner_config)
                .run(&mut session, &batch)
                .await
        }
        ModelChoice::Llama | ModelChoice::Claude => {
            let router_key = req.openrouter_api_key.clone().ok_or((
                StatusCode::BAD_REQUEST,
                "openrouter_api_key is required for routed models".to_string(),
            ))?;
            let model = match req.model {
                ModelChoice::Llama => RouterModel::Llama,
                _ => RouterModel::Claude,
            };
            let juror = OpenRouterClient::new(router_key, model);
            BatchRunner::new(juror, extractor, runner_config)
                .run(&mut session, &batch)
                .await
        }
    };

    match result {
        Ok(outcome) => {
            state.metrics.record_submission(
                true,
                started.elapsed(),
                outcome.completed,
                outcome.failed,
            );
            Ok(Json(SubmitResponse {
                response: outcome.last_response,
                completed: outcome.completed,
                failed: outcome.failed,
                rows: session.history().len(),
            }))
        }
        Err(e) => {
            state
                .metrics
                .record_submission(false, started.elapsed(), 0, 0);
            Err(session_error_response(e))
        }
    }
}

async fn export_table(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExportResponse>, (StatusCode, String)> {
    let session = state
        .sessions
        .get(&id)
        .map(|entry| entry.value().clone())
        .ok_or((StatusCode::NOT_FOUND, "unknown session".to_string()))?;
    let session = session.lock().await;

    export::write_history(session.history(), session.export_path())
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    state.metrics.record_export();

    Ok(Json(ExportResponse {
        path: session.export_path().display().to_string(),
        rows: session.history().len(),
    }))
}

fn session_error_response(e: SessionError) -> (StatusCode, String) {
    let status = match &e {
        SessionError::TooManyIterations { .. } => StatusCode::BAD_REQUEST,
        SessionError::Credential(_) => StatusCode::UNAUTHORIZED,
        SessionError::Loader(LoaderError::FileNotFound(_)) => StatusCode::NOT_FOUND,
        SessionError::Loader(_) => StatusCode::BAD_REQUEST,
        SessionError::IterationFailed { .. } => StatusCode::BAD_GATEWAY,
        SessionError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}
