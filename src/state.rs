use std::sync::Arc;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::engine::{
    EngineAdapter, EngineRegistry, PythonModuleEngine, PythonServiceClient, TranslationEngine,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub dispatcher: Arc<Dispatcher>,
    pub python_service: Option<Arc<PythonServiceClient>>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let python_service = config
            .engine_config
            .python_service_url
            .clone()
            .map(|url| Arc::new(PythonServiceClient::new(url)));

        let registry = EngineRegistry::new();
        match &python_service {
            Some(client) => {
                info!(
                    "Engine {} will be loaded from Python service at {}",
                    config.engine_config.engine_name,
                    client.base_url()
                );
                register_python_module(&registry, client.clone(), &config.engine_config.engine_name);
            }
            None => {
                info!("No Python service configured; translations will use the stub fallback");
            }
        }

        info!("Registered engines: {:?}", registry.names());
        Self::assemble(config, registry, python_service)
    }

    /// State backed by a caller-supplied registry instead of the configured sidecar.
    pub fn with_registry(config: Config, registry: EngineRegistry) -> Self {
        Self::assemble(config, registry, None)
    }

    fn assemble(
        config: Config,
        registry: EngineRegistry,
        python_service: Option<Arc<PythonServiceClient>>,
    ) -> Self {
        let adapter = EngineAdapter::new(registry, config.engine_config.engine_name.clone());

        Self {
            config,
            dispatcher: Arc::new(Dispatcher::new(Arc::new(adapter))),
            python_service,
            started_at: Utc::now(),
        }
    }

    /// Send `init` with the configured models path on a background task.
    /// Returns `None` when no models path is configured.
    pub fn spawn_startup_init(&self) -> Option<JoinHandle<String>> {
        let models_path = self.config.engine_config.models_path.clone()?;
        let dispatcher = self.dispatcher.clone();

        Some(tokio::spawn(async move {
            let ack = dispatcher.adapter().init(Some(&models_path)).await;
            info!("Engine init with {}: {}", models_path, ack);
            ack
        }))
    }

    pub fn generate_connection_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Register `module` on the sidecar as an engine. The sidecar is only
/// contacted when a request first needs the engine.
pub fn register_python_module(
    registry: &EngineRegistry,
    client: Arc<PythonServiceClient>,
    module: &str,
) {
    let name = module.to_string();
    registry.register(module, move || {
        let client = client.clone();
        let name = name.clone();
        async move {
            let engine = PythonModuleEngine::load(client, &name).await?;
            Ok::<Arc<dyn TranslationEngine>, _>(Arc::new(engine))
        }
    });
}
