use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::engine::EngineAdapter;
use crate::error::EngineError;
use crate::fallback::{self, Settled};

pub const DEFAULT_SOURCE_LANG: &str = "auto";
pub const DEFAULT_TARGET_LANG: &str = "en";

/// Operations the bridge understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Init,
    Translate,
}

impl Operation {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "init" => Some(Operation::Init),
            "translate" => Some(Operation::Translate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Init => "init",
            Operation::Translate => "translate",
        }
    }
}

/// First argument among `keys` that holds a string. Anything else (missing,
/// null, number, non-object arguments) counts as absent.
fn string_arg<'a>(arguments: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| arguments.get(*key).and_then(|v| v.as_str()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateArgs {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl Default for TranslateArgs {
    fn default() -> Self {
        Self {
            text: String::new(),
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
            target_lang: DEFAULT_TARGET_LANG.to_string(),
        }
    }
}

impl TranslateArgs {
    /// Accepts `src`/`tgt` as sent by the app, and `sourceLang`/`targetLang`.
    pub fn from_arguments(arguments: &Value) -> Self {
        let defaults = Self::default();
        Self {
            text: string_arg(arguments, &["text"])
                .map(str::to_string)
                .unwrap_or(defaults.text),
            source_lang: string_arg(arguments, &["src", "sourceLang"])
                .map(str::to_string)
                .unwrap_or(defaults.source_lang),
            target_lang: string_arg(arguments, &["tgt", "targetLang"])
                .map(str::to_string)
                .unwrap_or(defaults.target_lang),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitArgs {
    pub models_path: Option<String>,
}

impl InitArgs {
    pub fn from_arguments(arguments: &Value) -> Self {
        Self {
            models_path: string_arg(arguments, &["models_path", "modelsPath"]).map(str::to_string),
        }
    }
}

/// A decoded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Init(InitArgs),
    Translate(TranslateArgs),
}

impl Request {
    /// Decode a named operation and its loosely typed arguments. Returns `None`
    /// only for unknown operations; bad arguments fall back to defaults.
    pub fn decode(operation: &str, arguments: &Value) -> Option<Self> {
        let request = match Operation::parse(operation)? {
            Operation::Init => Request::Init(InitArgs::from_arguments(arguments)),
            Operation::Translate => Request::Translate(TranslateArgs::from_arguments(arguments)),
        };
        Some(request)
    }

    pub fn operation(&self) -> Operation {
        match self {
            Request::Init(_) => Operation::Init,
            Request::Translate(_) => Operation::Translate,
        }
    }
}

/// What the caller gets back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Success(String),
    NotImplemented,
}

/// A response plus the engine failure hidden behind it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub response: Response,
    pub degraded: Option<EngineError>,
}

/// Routes named operations to the engine adapter.
pub struct Dispatcher {
    adapter: Arc<EngineAdapter>,
}

impl Dispatcher {
    pub fn new(adapter: Arc<EngineAdapter>) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &EngineAdapter {
        &self.adapter
    }

    pub async fn handle(&self, operation: &str, arguments: &Value) -> Response {
        self.handle_detailed(operation, arguments).await.response
    }

    pub async fn handle_detailed(&self, operation: &str, arguments: &Value) -> Outcome {
        match Request::decode(operation, arguments) {
            Some(request) => {
                let settled = self.dispatch(request).await;
                Outcome {
                    response: Response::Success(settled.payload),
                    degraded: settled.degraded,
                }
            }
            None => {
                warn!("Unknown operation: {}", operation);
                Outcome {
                    response: Response::NotImplemented,
                    degraded: None,
                }
            }
        }
    }

    pub async fn dispatch(&self, request: Request) -> Settled {
        debug!("Dispatching {}", request.operation().as_str());

        match request {
            Request::Translate(args) => {
                let result = self
                    .adapter
                    .try_translate(&args.text, &args.source_lang, &args.target_lang)
                    .await;
                fallback::settle_translate(result, &args.text)
            }
            Request::Init(args) => {
                let result = self.adapter.try_init(args.models_path.as_deref()).await;
                fallback::settle_init(result)
            }
        }
    }
}
