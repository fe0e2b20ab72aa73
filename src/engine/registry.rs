use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt};
use tracing::debug;

use super::interface::TranslationEngine;
use crate::error::{EngineError, EngineResult};

/// Produces an engine handle on demand. Providers are looked up by logical name
/// and may fail, e.g. when the backing service is not installed.
pub type EngineProvider =
    Arc<dyn Fn() -> BoxFuture<'static, EngineResult<Arc<dyn TranslationEngine>>> + Send + Sync>;

/// Name-keyed table of engine providers.
///
/// Nothing in the bridge links against a concrete engine: whoever starts the
/// process registers what is installed, and the adapter asks for it by name.
#[derive(Clone, Default)]
pub struct EngineRegistry {
    providers: Arc<DashMap<String, EngineProvider>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under `name`, replacing any previous one.
    pub fn register<F, Fut>(&self, name: impl Into<String>, provider: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = EngineResult<Arc<dyn TranslationEngine>>> + Send + 'static,
    {
        let name = name.into();
        debug!("Registering engine provider: {}", name);
        let provider: EngineProvider = Arc::new(move || provider().boxed());
        self.providers.insert(name, provider);
    }

    /// Register an already constructed engine under its own name.
    pub fn register_engine(&self, engine: Arc<dyn TranslationEngine>) {
        let name = engine.name().to_string();
        self.register(name, move || {
            let engine = engine.clone();
            async move { Ok(engine) }
        });
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Look up `name` and run its provider.
    pub async fn resolve(&self, name: &str) -> EngineResult<Arc<dyn TranslationEngine>> {
        // Clone the provider out so no map guard is held across the await.
        let provider = self.providers.get(name).map(|entry| entry.value().clone());

        match provider {
            Some(provider) => provider().await,
            None => Err(EngineError::NotFound(name.to_string())),
        }
    }
}
