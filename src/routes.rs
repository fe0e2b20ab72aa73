use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{self, MethodCall, MethodResult};
use crate::state::AppState;

/// Name of the method channel the app talks to.
pub const CHANNEL: &str = "offline_translator/argos";

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Method channel
        .route(&format!("/channel/{}", CHANNEL), post(channel_call))
        .route("/channel-ws", get(crate::websocket::websocket_handler))

        // Health check
        .route("/api/health", get(health_check))
}

/// Full application: routes, middleware and state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn channel_call(
    State(state): State<AppState>,
    call: Result<Json<MethodCall>, JsonRejection>,
) -> impl IntoResponse {
    let result = match call {
        Ok(Json(call)) => handlers::handle_call(&state, call).await,
        Err(rejection) => MethodResult::Error {
            message: rejection.body_text(),
        },
    };

    (result.status_code(), Json(result))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let adapter = state.dispatcher.adapter();
    let python_service = match &state.python_service {
        Some(client) => {
            let limit = Duration::from_millis(state.config.engine_config.health_check_timeout_ms);
            let healthy = tokio::time::timeout(limit, client.health_check())
                .await
                .map(|checked| checked.unwrap_or(false))
                .unwrap_or(false);
            json!(healthy)
        }
        None => Value::Null,
    };

    Json(json!({
        "status": "ok",
        "engine": adapter.engine_name(),
        "engine_state": adapter.state(),
        "python_service": python_service,
        "started_at": state.started_at.to_rfc3339(),
    }))
}
