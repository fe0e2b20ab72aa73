pub mod interface;
pub mod registry;
pub mod python_module;
pub mod adapter;

#[cfg(test)]
pub mod testing;

pub use interface::TranslationEngine;
pub use registry::{EngineProvider, EngineRegistry};
pub use python_module::{PythonModuleEngine, PythonServiceClient};
pub use adapter::{EngineAdapter, EngineState};

/// Logical name of the Argos Translate service module.
pub const DEFAULT_ENGINE_NAME: &str = "argos_service";
