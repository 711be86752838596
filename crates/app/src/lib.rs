//! Hosting application: configuration, module wiring, operator views.
//!
//! HTTP, authentication and health checks live outside this workspace; this
//! crate only builds the modules around one shared event bus and exposes what
//! an operator-facing endpoint would serve.

pub mod audit;
pub mod config;
pub mod services;

pub use audit::AuditReport;
pub use config::{AppConfig, ConfigError, SeedItem};
pub use services::{AppServices, SeedOutcome};
