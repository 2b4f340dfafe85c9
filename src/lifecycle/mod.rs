//! Process lifecycle.
//!
//! # Design Decisions
//! - Startup is a single linear procedure, run exactly once per process
//! - Any startup error is fatal; the process must not limp along against
//!   a broken configuration

pub mod startup;

pub use startup::{initialize, AppServices, StartupError};
