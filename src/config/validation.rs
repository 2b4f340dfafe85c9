//! Configuration validation.
//!
//! Semantic validation on top of the syntactic checks serde already does.
//! Returns all validation errors, not just the first, so a broken config
//! can be fixed in one pass. Runs before a config is accepted into the
//! system.
//!
//! The database engine identifier is deliberately not validated here:
//! engine dispatch happens during startup initialization, which is where an
//! unsupported engine must surface as a fatal error.

use crate::config::schema::AppConfig;
use thiserror::Error;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required string field is empty.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// A port field is zero.
    #[error("{field} must be a non-zero port")]
    InvalidPort { field: &'static str },

    /// An administrator address does not look like an e-mail address.
    #[error("site.admins entry {address:?} is not a valid e-mail address")]
    InvalidAdminAddress { address: String },

    /// A timeout is zero, which would make every probe fail instantly.
    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    /// Error reporting is enabled but no events would be retained.
    #[error("error_reporting.capacity must be greater than zero when reporting is enabled")]
    ZeroReportingCapacity,
}

/// Validate a configuration, collecting every semantic error found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.database.host.is_empty() {
        errors.push(ValidationError::EmptyField {
            field: "database.host",
        });
    }
    if config.database.name.is_empty() {
        errors.push(ValidationError::EmptyField {
            field: "database.name",
        });
    }
    if config.database.port == 0 {
        errors.push(ValidationError::InvalidPort {
            field: "database.port",
        });
    }

    if config.mail.host.is_empty() {
        errors.push(ValidationError::EmptyField { field: "mail.host" });
    }
    if config.mail.port == 0 {
        errors.push(ValidationError::InvalidPort { field: "mail.port" });
    }
    if config.mail.from_address.is_empty() {
        errors.push(ValidationError::EmptyField {
            field: "mail.from_address",
        });
    }

    if config.worker.broker_address.is_empty() {
        errors.push(ValidationError::EmptyField {
            field: "worker.broker_address",
        });
    }
    if config.cache.address.is_empty() {
        errors.push(ValidationError::EmptyField {
            field: "cache.address",
        });
    }
    if config.site.domain.is_empty() {
        errors.push(ValidationError::EmptyField {
            field: "site.domain",
        });
    }

    for address in &config.site.admins {
        if !looks_like_email(address) {
            errors.push(ValidationError::InvalidAdminAddress {
                address: address.clone(),
            });
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "timeouts.connect_secs",
        });
    }

    if config.error_reporting.enabled && config.error_reporting.capacity == 0 {
        errors.push(ValidationError::ZeroReportingCapacity);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Minimal e-mail shape test: one "@" with non-empty local part and a dot
/// in the domain part. Full RFC validation is the mail system's problem.
pub(crate) fn looks_like_email(address: &str) -> bool {
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}
