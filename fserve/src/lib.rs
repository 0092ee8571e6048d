//! HTTP boundary for the toolrelay dispatcher.
//!
//! `POST /api/tools/{provider}` runs one tool-augmented turn, `POST /api/chat/custom` sends a
//! single completion to a stored custom model, and `GET /api/health` reports liveness.
//!
//! ```rust
//! use fserve::ServeConfig;
//!
//! let config = ServeConfig::from_lookup(|key| match key {
//!     "TOOLRELAY_BIND" => Some("0.0.0.0:8080".to_string()),
//!     _ => None,
//! })
//! .expect("valid configuration");
//!
//! assert_eq!(config.bind.port(), 8080);
//! assert_eq!(config.default_tool_model, "gpt-3.5-turbo");
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
pub mod wire;

pub use app::{build_service, init_tracing, serve};
pub use config::{ServeConfig, load_custom_models, parse_custom_models};
pub use error::{ApiError, ServeError, ServeErrorKind};
pub use routes::{AppState, REQUEST_ID_HEADER, router};
