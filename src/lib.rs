//! Bridge between the offline translator app and a late-bound translation engine.
//!
//! The app sends `init` and `translate` calls over a method channel. The
//! [`dispatcher::Dispatcher`] decodes them and hands them to the
//! [`engine::EngineAdapter`], which resolves the engine by logical name at run
//! time. When the engine is missing or fails, the caller still gets a string
//! payload, built in [`fallback`].

pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod websocket;
