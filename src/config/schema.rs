//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Data directory settings.
    pub data: DataConfig,

    /// Relational database settings.
    pub database: DatabaseConfig,

    /// Outgoing mail settings.
    pub mail: MailConfig,

    /// Background worker settings.
    pub worker: WorkerConfig,

    /// Cache backend settings.
    pub cache: CacheConfig,

    /// Public site settings.
    pub site: SiteConfig,

    /// Template settings.
    pub templates: TemplateConfig,

    /// Error reporting settings.
    pub error_reporting: ErrorReportingConfig,

    /// Message formatting settings.
    pub i18n: I18nConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Data directory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding all mutable service state.
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./data"),
        }
    }
}

/// Relational database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Engine identifier ("postgresql" or "mysql").
    pub engine: String,

    /// Database server host.
    pub host: String,

    /// Database server port.
    pub port: u16,

    /// Database name.
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            engine: "postgresql".to_string(),
            host: "127.0.0.1".to_string(),
            port: 5432,
            name: "service".to_string(),
        }
    }
}

/// Outgoing mail configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MailConfig {
    /// SMTP server host.
    pub host: String,

    /// SMTP server port.
    pub port: u16,

    /// Sender address for outgoing mail.
    pub from_address: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 25,
            from_address: "webmaster@localhost".to_string(),
        }
    }
}

/// Background worker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Broker address the workers consume from (e.g., "127.0.0.1:5672").
    pub broker_address: String,

    /// Minimum number of workers expected to be running.
    pub min_workers: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            broker_address: "127.0.0.1:5672".to_string(),
            min_workers: 1,
        }
    }
}

/// Cache backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache server address (e.g., "127.0.0.1:6379").
    pub address: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:6379".to_string(),
        }
    }
}

/// Public site configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public domain of the site, without scheme (e.g., "app.example.org").
    pub domain: String,

    /// Administrator e-mail addresses notified on failures.
    pub admins: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: "localhost".to_string(),
            admins: Vec::new(),
        }
    }
}

/// Template configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory holding the template tree.
    pub dir: PathBuf,

    /// Template files that must be present for rendering to work.
    pub required: Vec<String>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./templates"),
            required: vec!["base.html".to_string()],
        }
    }
}

/// Error reporting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ErrorReportingConfig {
    /// Enable collection of error events.
    pub enabled: bool,

    /// DSN of the upstream error sink ("scheme://host/project").
    pub dsn: Option<String>,

    /// Number of recent events kept in memory.
    pub capacity: usize,
}

impl Default for ErrorReportingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dsn: None,
            capacity: 100,
        }
    }
}

/// Message formatting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Enable named placeholders in message templates.
    pub extended_placeholders: bool,

    /// Default locale for formatted messages.
    pub locale: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            extended_placeholders: true,
            locale: "en".to_string(),
        }
    }
}

/// Timeout configuration for connectivity probes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { connect_secs: 5 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive, EnvFilter syntax.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "service_bootstrap=info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_postgresql() {
        let config = AppConfig::default();
        assert_eq!(config.database.engine, "postgresql");
        assert_eq!(config.database.port, 5432);
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: AppConfig = toml::from_str("[site]\ndomain = \"app.example.org\"\n").unwrap();
        assert_eq!(config.site.domain, "app.example.org");
        assert_eq!(config.mail.port, 25);
        assert_eq!(config.timeouts.connect_secs, 5);
        assert!(!config.error_reporting.enabled);
    }
}
