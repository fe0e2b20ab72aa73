use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::dispatcher::Response;
use crate::state::AppState;

/// One method call on the channel, as sent by the app.
#[derive(Debug, Clone, Deserialize)]
pub struct MethodCall {
    /// Opaque correlation id, echoed back on the WebSocket.
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Result of a method call. `Success` covers degraded answers too; `degraded`
/// carries the engine failure for callers that do not want to parse payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResult {
    Success {
        result: String,
        degraded: Option<String>,
    },
    NotImplemented {
        method: String,
    },
    Error {
        message: String,
    },
}

impl MethodResult {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MethodResult::Success { .. } => StatusCode::OK,
            MethodResult::NotImplemented { .. } => StatusCode::NOT_IMPLEMENTED,
            MethodResult::Error { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

/// Reply frame on the WebSocket.
#[derive(Debug, Serialize)]
pub struct Reply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub result: MethodResult,
}

pub async fn handle_call(state: &AppState, call: MethodCall) -> MethodResult {
    debug!("Method call: {}", call.method);

    let outcome = state
        .dispatcher
        .handle_detailed(&call.method, &call.arguments)
        .await;

    match outcome.response {
        Response::Success(result) => MethodResult::Success {
            result,
            degraded: outcome.degraded.map(|e| e.to_string()),
        },
        Response::NotImplemented => MethodResult::NotImplemented { method: call.method },
    }
}

/// Handle one raw WebSocket text frame.
pub async fn handle_frame(state: &AppState, text: &str) -> Reply {
    match serde_json::from_str::<MethodCall>(text) {
        Ok(call) => {
            let id = call.id.clone();
            Reply {
                id,
                result: handle_call(state, call).await,
            }
        }
        Err(e) => Reply {
            id: None,
            result: MethodResult::Error {
                message: format!("invalid method call: {}", e),
            },
        },
    }
}
