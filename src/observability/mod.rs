//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → errors.rs (collected error events)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Recent-error inspection via the collector handle
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; filter comes from config, overridable
//!   by environment
//! - Error events are kept in a bounded in-memory ring and mirrored to the
//!   log stream

pub mod errors;
pub mod logging;

pub use errors::{ErrorCollector, ErrorEvent};
pub use logging::init_logging;
