//! Startup initialization and operational checks for the service.
//!
//! # Architecture Overview
//!
//! ```text
//!   config file ──▶ config (load + validate) ──▶ AppConfig
//!                                                   │
//!                                                   ▼
//!                              lifecycle::startup::initialize
//!                 ┌──────────────┬──────────────┬──────────────┐
//!                 ▼              ▼              ▼              ▼
//!             checks         i18n          observability    search
//!         (check registry) (formatter)   (error collector) (lookup
//!                                                           registry,
//!                                                           engine
//!                                                           dispatch)
//! ```
//!
//! Startup runs once per process: it registers the operational checks,
//! constructs the message formatter and error collector, and attaches the
//! configured database engine's text-search lookups. An unsupported engine
//! aborts startup.

// Core subsystems
pub mod config;
pub mod lifecycle;
pub mod search;

// Operational validation
pub mod checks;

// Cross-cutting concerns
pub mod i18n;
pub mod observability;
pub mod version;

pub use checks::{CheckContext, CheckRegistry, CheckReport, Stage};
pub use config::{load_config, AppConfig, ConfigError};
pub use lifecycle::{initialize, AppServices, StartupError};
pub use search::LookupRegistry;
pub use version::BuildInfo;
