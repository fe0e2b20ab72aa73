//! Stub engines for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::interface::TranslationEngine;
use crate::error::{EngineError, EngineResult};

/// Echoes back exactly what it was called with.
pub struct EchoEngine {
    name: String,
}

impl EchoEngine {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

#[async_trait]
impl TranslationEngine for EchoEngine {
    async fn init(&self, models_path: Option<&str>) -> EngineResult<Option<String>> {
        Ok(Some(format!("init:{}", models_path.unwrap_or("-"))))
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> EngineResult<Option<String>> {
        Ok(Some(format!("{}|{}|{}", text, source_lang, target_lang)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fails every call.
pub struct FailingEngine {
    name: String,
}

impl FailingEngine {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

#[async_trait]
impl TranslationEngine for FailingEngine {
    async fn init(&self, _models_path: Option<&str>) -> EngineResult<Option<String>> {
        Err(EngineError::Invocation("engine exploded".to_string()))
    }

    async fn translate(
        &self,
        _text: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> EngineResult<Option<String>> {
        Err(EngineError::Invocation("engine exploded".to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Panics on every call.
pub struct PanickingEngine {
    name: String,
}

impl PanickingEngine {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

#[async_trait]
impl TranslationEngine for PanickingEngine {
    async fn init(&self, _models_path: Option<&str>) -> EngineResult<Option<String>> {
        panic!("engine bug")
    }

    async fn translate(
        &self,
        _text: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> EngineResult<Option<String>> {
        panic!("engine bug")
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Never answers `init`.
pub struct HangingEngine {
    name: String,
}

impl HangingEngine {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

#[async_trait]
impl TranslationEngine for HangingEngine {
    async fn init(&self, _models_path: Option<&str>) -> EngineResult<Option<String>> {
        std::future::pending().await
    }

    async fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> EngineResult<Option<String>> {
        Ok(Some(text.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Returns the same reply for every call.
pub struct FixedEngine {
    name: String,
    reply: Option<String>,
}

impl FixedEngine {
    pub fn new(name: &str, reply: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            reply: reply.map(|r| r.to_string()),
        }
    }
}

#[async_trait]
impl TranslationEngine for FixedEngine {
    async fn init(&self, _models_path: Option<&str>) -> EngineResult<Option<String>> {
        Ok(self.reply.clone())
    }

    async fn translate(
        &self,
        _text: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> EngineResult<Option<String>> {
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Shared counter for how many times a provider ran.
#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
