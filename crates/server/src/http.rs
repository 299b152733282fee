//! HTTP Endpoints
//!
//! Lex V2 webhook plus health, readiness, metrics and record lookup.

use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use intake_core::{ReferenceId, ServiceRequestRecord, REFERENCE_PREFIX};

use crate::lex::{render_response, render_without_session, LexEvent, LexResponse};
use crate::metrics::{metrics_handler, record_malformed, record_turn};
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.config.server.cors_origins,
        state.config.server.cors_enabled,
    );
    let timeout = Duration::from_secs(state.config.server.timeout_seconds);

    Router::new()
        // Conversational host webhook
        .route("/lex/webhook", post(lex_webhook))
        // Operational lookup
        .route("/api/requests/:reference_id", get(get_request))
        // Health check
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let localhost = || {
        CorsLayer::new()
            .allow_origin(HeaderValue::from_static("http://localhost:3000"))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };

    if origins.is_empty() {
        tracing::info!("No CORS origins configured, defaulting to localhost:3000");
        return localhost();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::error!("All configured CORS origins are invalid, falling back to localhost");
        return localhost();
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// `POST /lex/webhook`
///
/// Always answers 200 with a host response; bodies that cannot be parsed get
/// the generic fallback prompt.
async fn lex_webhook(State(state): State<AppState>, body: Bytes) -> Json<LexResponse> {
    let started = Instant::now();

    let event = match LexEvent::parse(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed webhook event");
            record_malformed();
            let action = state.engine.fallback_action();
            record_turn(action.kind(), started.elapsed());
            return Json(render_without_session(&action));
        }
    };

    let request = event.to_turn_request();
    let owned_intent = request.session.intent_name == state.engine.intent_name();

    tracing::debug!(
        session_id = %request.session.session_id,
        intent = %request.session.intent_name,
        phase = ?request.phase,
        "Webhook turn received"
    );

    let response = state.engine.process_turn(request).await;
    record_turn(response.action.kind(), started.elapsed());

    // Slots of an intent we do not own are left to the host
    if owned_intent {
        Json(render_response(&event, &response))
    } else {
        Json(render_without_session(&response.action))
    }
}

/// `GET /api/requests/:reference_id`
async fn get_request(
    State(state): State<AppState>,
    Path(reference_id): Path<String>,
) -> Result<Json<ServiceRequestRecord>, ServerError> {
    if !reference_id.starts_with(REFERENCE_PREFIX) {
        return Err(ServerError::InvalidRequest(format!(
            "Reference id must start with {}",
            REFERENCE_PREFIX
        )));
    }

    let id = ReferenceId::from_string(reference_id);
    state
        .store
        .get(&id)
        .await
        .map_err(|e| ServerError::Persistence(e.to_string()))?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(id.to_string()))
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let config = &state.config;
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "environment": config.environment,
            "intent": state.engine.intent_name(),
            "persistence": if config.persistence.enabled { "scylla" } else { "memory" },
        })),
    )
}

/// Readiness check: the record store must answer a lookup
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let probe = ReferenceId::from_string("A-00000000");

    let store_status =
        match tokio::time::timeout(Duration::from_secs(2), state.store.get(&probe)).await {
            Ok(Ok(_)) => "ok",
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Record store readiness probe failed");
                "error"
            }
            Err(_) => "timeout",
        };

    let ready = store_status == "ok";
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "ready": ready,
            "checks": { "record_store": { "status": store_status } },
        })),
    )
}
