//! The one place where engine failures become caller-visible payloads.
//!
//! Degraded service is reported through the payload text: translations come
//! back as the original input behind [`STUB_PREFIX`], and init failures as
//! [`ERROR_PREFIX`] plus a short description. Callers that want more than the
//! string get the underlying [`EngineError`] in [`Settled::degraded`].

use tracing::warn;

use crate::error::{EngineError, EngineResult};

pub const STUB_PREFIX: &str = "[stub translation] ";
pub const ERROR_PREFIX: &str = "error: ";
pub const INIT_DEFAULT_ACK: &str = "ok";

/// A payload ready for the caller, and why it is degraded if it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    pub payload: String,
    pub degraded: Option<EngineError>,
}

impl Settled {
    fn served(payload: String) -> Self {
        Self { payload, degraded: None }
    }
}

pub fn translate(text: &str) -> String {
    format!("{}{}", STUB_PREFIX, text)
}

pub fn init(err: &EngineError) -> String {
    format!("{}{}", ERROR_PREFIX, err)
}

pub fn settle_translate(result: EngineResult<String>, text: &str) -> Settled {
    match result {
        Ok(translated) => Settled::served(translated),
        Err(e) => {
            warn!("translate fell back to stub: {}", e);
            Settled {
                payload: translate(text),
                degraded: Some(e),
            }
        }
    }
}

pub fn settle_init(result: EngineResult<String>) -> Settled {
    match result {
        Ok(ack) => Settled::served(ack),
        Err(e) => {
            warn!("init failed: {}", e);
            Settled {
                payload: init(&e),
                degraded: Some(e),
            }
        }
    }
}
