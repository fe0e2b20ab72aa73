use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::interface::TranslationEngine;
use crate::error::{EngineError, EngineResult};

/// HTTP client for the Python sidecar that hosts service modules.
///
/// The sidecar exposes modules by name and lets callers invoke any attribute
/// of a module with positional arguments:
/// - `GET  /modules/{module}` answers 200 when the module is importable
/// - `POST /modules/{module}/call/{attr}` with `{"args": [...]}` answers
///   `{"result": <value>, "error": <string|null>}`
#[derive(Debug, Clone)]
pub struct PythonServiceClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CallAttrRequest {
    pub args: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CallAttrResponse {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<String>,
}

impl PythonServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that `module` can be loaded by the sidecar.
    pub async fn get_module(&self, module: &str) -> EngineResult<()> {
        let url = format!("{}/modules/{}", self.base_url, module);
        let response = self.client.get(&url).send().await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(EngineError::NotFound(module.to_string())),
            status => Err(EngineError::Unavailable(format!(
                "loading module {} returned {}",
                module, status
            ))),
        }
    }

    /// Call `module.attr(*args)` and return the raw result value.
    pub async fn call_attr(&self, module: &str, attr: &str, args: Vec<Value>) -> EngineResult<Value> {
        let url = format!("{}/modules/{}/call/{}", self.base_url, module, attr);
        debug!("Calling {}.{} with {} argument(s)", module, attr, args.len());

        let response = self
            .client
            .post(&url)
            .json(&CallAttrRequest { args })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(EngineError::MethodMissing(attr.to_string()));
        }

        if !status.is_success() {
            // Error bodies are best effort; fall back to the status line.
            let detail = response
                .json::<CallAttrResponse>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| format!("{}.{} returned {}", module, attr, status));
            return Err(EngineError::Invocation(detail));
        }

        let body: CallAttrResponse = response.json().await?;
        match body.error {
            Some(error) => Err(EngineError::Invocation(error)),
            None => Ok(body.result),
        }
    }

    pub async fn health_check(&self) -> EngineResult<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}

/// A Python module reached through the sidecar, used as a translation engine.
pub struct PythonModuleEngine {
    client: Arc<PythonServiceClient>,
    module: String,
}

impl PythonModuleEngine {
    /// Resolve `module` on the sidecar. Fails when the sidecar is down or the
    /// module is not installed there.
    pub async fn load(client: Arc<PythonServiceClient>, module: &str) -> EngineResult<Self> {
        client.get_module(module).await?;
        Ok(Self {
            client,
            module: module.to_string(),
        })
    }

    fn stringify(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }
}

#[async_trait]
impl TranslationEngine for PythonModuleEngine {
    async fn init(&self, models_path: Option<&str>) -> EngineResult<Option<String>> {
        let args = match models_path {
            Some(path) => vec![json!(path)],
            None => vec![],
        };
        let value = self.client.call_attr(&self.module, "init", args).await?;
        Ok(Self::stringify(value))
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> EngineResult<Option<String>> {
        let args = vec![json!(text), json!(source_lang), json!(target_lang)];
        let value = self.client.call_attr(&self.module, "translate", args).await?;
        Ok(Self::stringify(value))
    }

    fn name(&self) -> &str {
        &self.module
    }
}
