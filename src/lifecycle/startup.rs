//! Startup orchestration.
//!
//! # Responsibilities
//! - Register the operational checks
//! - Construct the message formatter and error collector
//! - Register database-engine-specific text-search lookups
//!
//! # Design Decisions
//! - Fail fast: an unsupported engine aborts startup
//! - Steps run in order, not concurrently
//! - Engine dispatch runs last; it is the only step that can fail
//! - Registries are explicit values owned by the caller, so tests can
//!   supply isolated instances

use crate::checks::{self, CheckRegistry};
use crate::config::AppConfig;
use crate::i18n::MessageFormatter;
use crate::observability::ErrorCollector;
use crate::search::{mysql, postgres, DatabaseEngine, Lookup, LookupRegistry, TextField};
use std::sync::Arc;
use thiserror::Error;

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The configured database engine is not one this service can run
    /// against. Deliberately fatal: continuing without working search
    /// lookups would corrupt query behavior much later.
    #[error("unsupported database engine: {engine}")]
    UnsupportedEngine { engine: String },
}

/// Services constructed during startup initialization.
#[derive(Debug)]
pub struct AppServices {
    pub formatter: MessageFormatter,
    pub errors: ErrorCollector,
}

/// One-time startup initialization.
///
/// Registers the operational checks, constructs the message formatter and
/// the error collector, then resolves the configured database engine and
/// registers its text-search lookups on both textual field kinds. On an
/// unrecognized engine no lookup is registered and the error carries the
/// offending identifier.
///
/// Not idempotent: running this twice on the same registries registers
/// everything twice. The process entry point calls it exactly once.
pub fn initialize(
    config: &AppConfig,
    checks: &mut CheckRegistry,
    lookups: &mut LookupRegistry,
) -> Result<AppServices, StartupError> {
    register_checks(checks);

    let formatter = MessageFormatter::from_config(&config.i18n);
    let errors = ErrorCollector::new(&config.error_reporting);

    register_lookups(lookups, &config.database.engine)?;

    tracing::info!(
        engine = %config.database.engine,
        checks = checks.len(),
        lookups = lookups.len(),
        "Startup initialization complete"
    );

    Ok(AppServices { formatter, errors })
}

fn register_checks(registry: &mut CheckRegistry) {
    registry.register_deploy(checks::DataWritable);
    registry.register_deploy(checks::MailConnection);
    registry.register_deploy(checks::WorkerAvailable);
    registry.register_deploy(checks::DatabaseReachable);
    registry.register_deploy(checks::CacheBackend);
    registry.register_deploy(checks::SettingsSane);
    registry.register_deploy(checks::TemplatesConfigured);
    registry.register_deploy(checks::SiteConfigured);
    registry.register_deploy(checks::PermissionsSane);
    registry.register_deploy(checks::ErrorReportingConfigured);
    registry.register(checks::VersionCurrency);
}

fn register_lookups(registry: &mut LookupRegistry, identifier: &str) -> Result<(), StartupError> {
    let engine =
        DatabaseEngine::from_identifier(identifier).ok_or_else(|| StartupError::UnsupportedEngine {
            engine: identifier.to_string(),
        })?;

    match engine {
        DatabaseEngine::PostgreSql => {
            register_on_both(registry, Arc::new(postgres::FullTextLookup));
            register_on_both(registry, Arc::new(postgres::SubstringLookup));
            register_on_both(registry, Arc::new(postgres::TrigramLookup));
        }
        DatabaseEngine::MySql => {
            register_on_both(registry, Arc::new(mysql::FullTextLookup));
            register_on_both(registry, Arc::new(mysql::SubstringLookup));
            register_on_both(registry, Arc::new(mysql::SoundsLikeLookup));
        }
    }

    tracing::debug!(engine = engine.identifier(), "Search lookups registered");
    Ok(())
}

fn register_on_both(registry: &mut LookupRegistry, lookup: Arc<dyn Lookup>) {
    registry.register(TextField::ShortText, lookup.clone());
    registry.register(TextField::LongText, lookup);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_engine(engine: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.database.engine = engine.to_string();
        config
    }

    #[test]
    fn registers_all_eleven_checks_with_flags() {
        let config = AppConfig::default();
        let mut checks = CheckRegistry::new();
        let mut lookups = LookupRegistry::new();

        initialize(&config, &mut checks, &mut lookups).unwrap();

        let expected = [
            "data_writable",
            "mail_connection",
            "worker_available",
            "database_reachable",
            "cache_backend",
            "settings_sane",
            "templates_configured",
            "site_configured",
            "permissions_sane",
            "error_reporting_configured",
            "version_currency",
        ];
        assert_eq!(checks.names(), expected);

        for name in &expected[..10] {
            assert_eq!(checks.is_deploy_only(name), Some(true), "{name}");
        }
        assert_eq!(checks.is_deploy_only("version_currency"), Some(false));
    }

    #[test]
    fn postgresql_registers_postgres_lookups_on_both_fields() {
        let config = config_with_engine("postgresql");
        let mut checks = CheckRegistry::new();
        let mut lookups = LookupRegistry::new();

        initialize(&config, &mut checks, &mut lookups).unwrap();

        assert_eq!(lookups.len(), 6);
        for field in [TextField::ShortText, TextField::LongText] {
            assert_eq!(lookups.names_for(field), vec!["search", "string", "substring"]);
            let search = lookups.get(field, "search").unwrap();
            assert!(search.expression("body").contains("to_tsvector"));
        }
    }

    #[test]
    fn mysql_registers_mysql_lookups_on_both_fields() {
        let config = config_with_engine("mysql");
        let mut checks = CheckRegistry::new();
        let mut lookups = LookupRegistry::new();

        initialize(&config, &mut checks, &mut lookups).unwrap();

        assert_eq!(lookups.len(), 6);
        for field in [TextField::ShortText, TextField::LongText] {
            let search = lookups.get(field, "search").unwrap();
            assert!(search.expression("body").contains("AGAINST"));
            let string = lookups.get(field, "string").unwrap();
            assert!(string.expression("name").contains("SOUNDEX"));
        }
    }

    #[test]
    fn unsupported_engine_aborts_without_registering_lookups() {
        let config = config_with_engine("sqlite3");
        let mut checks = CheckRegistry::new();
        let mut lookups = LookupRegistry::new();

        let err = initialize(&config, &mut checks, &mut lookups).unwrap_err();
        assert!(err.to_string().contains("sqlite3"));
        assert!(lookups.is_empty());
        // Checks were already registered when the engine dispatch failed.
        assert_eq!(checks.len(), 11);
    }

    #[test]
    fn double_initialization_double_registers() {
        let config = AppConfig::default();
        let mut checks = CheckRegistry::new();
        let mut lookups = LookupRegistry::new();

        initialize(&config, &mut checks, &mut lookups).unwrap();
        initialize(&config, &mut checks, &mut lookups).unwrap();

        assert_eq!(checks.len(), 22);
        // Lookup keys collide, so re-registration replaces instead.
        assert_eq!(lookups.len(), 6);
    }
}
