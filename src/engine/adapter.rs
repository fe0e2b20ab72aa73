use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::info;

use super::interface::TranslationEngine;
use super::registry::EngineRegistry;
use crate::error::{EngineError, EngineResult};
use crate::fallback;

/// Whether the adapter currently holds an engine handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Unresolved,
    Resolved,
}

/// Run an engine call, turning a panic inside it into an invocation error.
async fn isolate<T>(call: impl Future<Output = EngineResult<T>>) -> EngineResult<T> {
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(EngineError::Invocation(format!(
            "engine panicked: {}",
            panic_message(&*panic)
        ))),
    }
}

fn panic_message<'a>(panic: &'a (dyn Any + Send + 'static)) -> &'a str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

/// Late-bound access to the translation engine registered under one logical name.
///
/// The first successful resolution is cached for the life of the adapter. A
/// failed resolution caches nothing, so every call retries until the engine
/// shows up.
pub struct EngineAdapter {
    registry: EngineRegistry,
    engine_name: String,
    engine: OnceCell<Arc<dyn TranslationEngine>>,
}

impl EngineAdapter {
    pub fn new(registry: EngineRegistry, engine_name: impl Into<String>) -> Self {
        Self {
            registry,
            engine_name: engine_name.into(),
            engine: OnceCell::new(),
        }
    }

    pub fn engine_name(&self) -> &str {
        &self.engine_name
    }

    pub fn state(&self) -> EngineState {
        if self.engine.initialized() {
            EngineState::Resolved
        } else {
            EngineState::Unresolved
        }
    }

    async fn engine(&self) -> EngineResult<&Arc<dyn TranslationEngine>> {
        self.engine
            .get_or_try_init(|| async {
                let engine = self.registry.resolve(&self.engine_name).await?;
                info!("Resolved translation engine: {}", self.engine_name);
                Ok(engine)
            })
            .await
    }

    /// Translate through the engine, reporting failures to the caller.
    pub async fn try_translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> EngineResult<String> {
        isolate(async {
            let engine = self.engine().await?;
            let result = engine.translate(text, source_lang, target_lang).await?;
            Ok::<_, EngineError>(result.unwrap_or_default())
        })
        .await
    }

    /// Initialize the engine, reporting failures to the caller.
    pub async fn try_init(&self, models_path: Option<&str>) -> EngineResult<String> {
        isolate(async {
            let engine = self.engine().await?;
            let result = engine.init(models_path).await?;
            Ok::<_, EngineError>(
                result
                    .filter(|ack| !ack.is_empty())
                    .unwrap_or_else(|| fallback::INIT_DEFAULT_ACK.to_string()),
            )
        })
        .await
    }

    /// Translate, or return the stub payload if the engine cannot be used.
    pub async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String {
        let result = self.try_translate(text, source_lang, target_lang).await;
        fallback::settle_translate(result, text).payload
    }

    /// Initialize, or return an `error: ` payload if the engine cannot be used.
    pub async fn init(&self, models_path: Option<&str>) -> String {
        fallback::settle_init(self.try_init(models_path).await).payload
    }
}
