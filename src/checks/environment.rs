//! Environment and configuration sanity checks.
//!
//! Filesystem, settings, template, site, error-reporting, and version
//! checks. These never touch the network; everything here answers from
//! local state and the loaded configuration.

use crate::checks::{Check, CheckContext, CheckIssue, Severity};
use crate::config::validation::looks_like_email;
use crate::version;
use futures_util::future::BoxFuture;
use std::fs;
use std::path::Path;

/// Verifies the data directory exists and accepts writes.
pub struct DataWritable;

impl DataWritable {
    fn inspect(dir: &Path) -> Vec<CheckIssue> {
        if let Err(e) = fs::create_dir_all(dir) {
            return vec![CheckIssue::new(
                "bootstrap.E001",
                Severity::Critical,
                format!("cannot create data directory {}: {e}", dir.display()),
            )];
        }

        let probe = dir.join(".write-test");
        match fs::write(&probe, b"ok") {
            Ok(()) => {
                let _ = fs::remove_file(&probe);
                Vec::new()
            }
            Err(e) => vec![CheckIssue::new(
                "bootstrap.E001",
                Severity::Critical,
                format!("data directory {} is not writable: {e}", dir.display()),
            )
            .with_hint("fix ownership or mode of the data directory")],
        }
    }
}

impl Check for DataWritable {
    fn name(&self) -> &'static str {
        "data_writable"
    }

    fn run<'a>(&'a self, cx: &'a CheckContext<'a>) -> BoxFuture<'a, Vec<CheckIssue>> {
        Box::pin(async move { Self::inspect(&cx.config.data.dir) })
    }
}

/// Verifies nothing under the data directory is read-only.
pub struct PermissionsSane;

impl PermissionsSane {
    fn inspect(dir: &Path) -> Vec<CheckIssue> {
        let mut issues = Vec::new();

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![CheckIssue::new(
                    "bootstrap.E002",
                    Severity::Error,
                    format!("cannot list data directory {}: {e}", dir.display()),
                )];
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            match entry.metadata() {
                Ok(metadata) if metadata.permissions().readonly() => {
                    issues.push(
                        CheckIssue::new(
                            "bootstrap.E002",
                            Severity::Error,
                            format!("{} is read-only", path.display()),
                        )
                        .with_hint("make all data directory contents writable by the service user"),
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    issues.push(CheckIssue::new(
                        "bootstrap.E002",
                        Severity::Error,
                        format!("cannot stat {}: {e}", path.display()),
                    ));
                }
            }
        }

        issues
    }
}

impl Check for PermissionsSane {
    fn name(&self) -> &'static str {
        "permissions_sane"
    }

    fn run<'a>(&'a self, cx: &'a CheckContext<'a>) -> BoxFuture<'a, Vec<CheckIssue>> {
        Box::pin(async move { Self::inspect(&cx.config.data.dir) })
    }
}

/// Re-verifies settings invariants at runtime.
///
/// The loader already rejects these for file-based configs; this covers
/// configurations assembled programmatically.
pub struct SettingsSane;

impl Check for SettingsSane {
    fn name(&self) -> &'static str {
        "settings_sane"
    }

    fn run<'a>(&'a self, cx: &'a CheckContext<'a>) -> BoxFuture<'a, Vec<CheckIssue>> {
        Box::pin(async move {
            let mut issues = Vec::new();
            let config = cx.config;

            if config.database.name.is_empty() {
                issues.push(CheckIssue::new(
                    "bootstrap.E007",
                    Severity::Error,
                    "database.name is empty",
                ));
            }
            if !looks_like_email(&config.mail.from_address) {
                issues.push(CheckIssue::new(
                    "bootstrap.E007",
                    Severity::Error,
                    format!(
                        "mail.from_address {:?} is not a valid e-mail address",
                        config.mail.from_address
                    ),
                ));
            }
            if config.site.admins.is_empty() {
                issues.push(
                    CheckIssue::new(
                        "bootstrap.W003",
                        Severity::Warning,
                        "no administrators configured",
                    )
                    .with_hint("set site.admins so failures reach somebody"),
                );
            }

            issues
        })
    }
}

/// Verifies the template tree is present and complete.
pub struct TemplatesConfigured;

impl Check for TemplatesConfigured {
    fn name(&self) -> &'static str {
        "templates_configured"
    }

    fn run<'a>(&'a self, cx: &'a CheckContext<'a>) -> BoxFuture<'a, Vec<CheckIssue>> {
        Box::pin(async move {
            let templates = &cx.config.templates;

            if !templates.dir.is_dir() {
                return vec![CheckIssue::new(
                    "bootstrap.E008",
                    Severity::Error,
                    format!(
                        "template directory {} does not exist",
                        templates.dir.display()
                    ),
                )];
            }

            templates
                .required
                .iter()
                .filter(|name| !templates.dir.join(name.as_str()).is_file())
                .map(|name| {
                    CheckIssue::new(
                        "bootstrap.E008",
                        Severity::Error,
                        format!("required template {name:?} is missing"),
                    )
                })
                .collect()
        })
    }
}

/// Verifies the public site configuration.
pub struct SiteConfigured;

impl Check for SiteConfigured {
    fn name(&self) -> &'static str {
        "site_configured"
    }

    fn run<'a>(&'a self, cx: &'a CheckContext<'a>) -> BoxFuture<'a, Vec<CheckIssue>> {
        Box::pin(async move {
            let domain = &cx.config.site.domain;
            let mut issues = Vec::new();

            if domain.is_empty() {
                issues.push(CheckIssue::new(
                    "bootstrap.E009",
                    Severity::Error,
                    "site.domain is empty",
                ));
            } else if domain.contains("://") || domain.contains('/') {
                issues.push(
                    CheckIssue::new(
                        "bootstrap.E009",
                        Severity::Error,
                        format!("site.domain {domain:?} must be a bare domain name"),
                    )
                    .with_hint("drop the scheme and any path, e.g. \"app.example.org\""),
                );
            } else if domain == "localhost" || domain == "example.com" {
                issues.push(
                    CheckIssue::new(
                        "bootstrap.W002",
                        Severity::Warning,
                        format!("site.domain is still the placeholder {domain:?}"),
                    )
                    .with_hint("set the real public domain before deploying"),
                );
            }

            issues
        })
    }
}

/// Verifies error reporting is usable when enabled.
pub struct ErrorReportingConfigured;

impl Check for ErrorReportingConfigured {
    fn name(&self) -> &'static str {
        "error_reporting_configured"
    }

    fn run<'a>(&'a self, cx: &'a CheckContext<'a>) -> BoxFuture<'a, Vec<CheckIssue>> {
        Box::pin(async move {
            let reporting = &cx.config.error_reporting;
            if !reporting.enabled {
                return Vec::new();
            }

            let mut issues = Vec::new();
            match &reporting.dsn {
                None => issues.push(
                    CheckIssue::new(
                        "bootstrap.E010",
                        Severity::Error,
                        "error reporting is enabled but error_reporting.dsn is not set",
                    )
                    .with_hint("set a DSN or disable error_reporting"),
                ),
                Some(dsn) if !dsn.contains("://") => issues.push(CheckIssue::new(
                    "bootstrap.E010",
                    Severity::Error,
                    format!("error_reporting.dsn {dsn:?} is not a valid DSN"),
                )),
                Some(_) => {}
            }
            if reporting.capacity == 0 {
                issues.push(CheckIssue::new(
                    "bootstrap.E010",
                    Severity::Error,
                    "error_reporting.capacity is zero; no events would be retained",
                ));
            }

            issues
        })
    }
}

/// Verifies the running build is current.
pub struct VersionCurrency;

impl Check for VersionCurrency {
    fn name(&self) -> &'static str {
        "version_currency"
    }

    fn run<'a>(&'a self, cx: &'a CheckContext<'a>) -> BoxFuture<'a, Vec<CheckIssue>> {
        Box::pin(async move {
            let running = match version::parse_release(cx.build.version) {
                Some(parsed) => parsed,
                None => {
                    return vec![CheckIssue::new(
                        "bootstrap.E011",
                        Severity::Error,
                        format!("running version {:?} is not parseable", cx.build.version),
                    )];
                }
            };

            let latest = match version::parse_release(version::LATEST_RELEASE) {
                Some(parsed) => parsed,
                None => return Vec::new(),
            };

            if running < latest {
                vec![CheckIssue::new(
                    "bootstrap.W001",
                    Severity::Warning,
                    format!(
                        "running version {} is older than the latest release {}",
                        cx.build.version,
                        version::LATEST_RELEASE
                    ),
                )
                .with_hint("upgrade to the latest release")]
            } else {
                Vec::new()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Check;
    use crate::config::AppConfig;
    use crate::version::BuildInfo;

    fn build() -> BuildInfo {
        BuildInfo::current()
    }

    #[tokio::test]
    async fn data_writable_passes_in_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.data.dir = dir.path().to_path_buf();
        let build = build();
        let cx = CheckContext {
            config: &config,
            build: &build,
        };

        assert!(DataWritable.run(&cx).await.is_empty());
        // The probe file must not linger.
        assert!(!dir.path().join(".write-test").exists());
    }

    #[tokio::test]
    async fn permissions_check_flags_readonly_entry() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("state.bin");
        fs::write(&file, b"x").unwrap();
        let mut perms = fs::metadata(&file).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&file, perms).unwrap();

        let mut config = AppConfig::default();
        config.data.dir = dir.path().to_path_buf();
        let build = build();
        let cx = CheckContext {
            config: &config,
            build: &build,
        };

        let issues = PermissionsSane.run(&cx).await;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "bootstrap.E002");

        // Restore so the tempdir can be removed.
        let mut perms = fs::metadata(&file).unwrap().permissions();
        perms.set_readonly(false);
        fs::set_permissions(&file, perms).unwrap();
    }

    #[tokio::test]
    async fn settings_check_warns_without_admins() {
        let config = AppConfig::default();
        let build = build();
        let cx = CheckContext {
            config: &config,
            build: &build,
        };

        let issues = SettingsSane.run(&cx).await;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn templates_check_reports_each_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.html"), b"<html>").unwrap();

        let mut config = AppConfig::default();
        config.templates.dir = dir.path().to_path_buf();
        config.templates.required = vec![
            "base.html".to_string(),
            "index.html".to_string(),
            "error.html".to_string(),
        ];
        let build = build();
        let cx = CheckContext {
            config: &config,
            build: &build,
        };

        let issues = TemplatesConfigured.run(&cx).await;
        assert_eq!(issues.len(), 2);
    }

    #[tokio::test]
    async fn site_check_rejects_url_domains() {
        let mut config = AppConfig::default();
        config.site.domain = "https://app.example.org".to_string();
        let build = build();
        let cx = CheckContext {
            config: &config,
            build: &build,
        };

        let issues = SiteConfigured.run(&cx).await;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[tokio::test]
    async fn error_reporting_check_requires_dsn_when_enabled() {
        let mut config = AppConfig::default();
        config.error_reporting.enabled = true;
        config.error_reporting.dsn = None;
        let build = build();
        let cx = CheckContext {
            config: &config,
            build: &build,
        };

        let issues = ErrorReportingConfigured.run(&cx).await;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "bootstrap.E010");
    }

    #[tokio::test]
    async fn version_check_warns_on_outdated_build() {
        let config = AppConfig::default();
        let build = BuildInfo {
            version: "0.0.1",
            ..BuildInfo::current()
        };
        let cx = CheckContext {
            config: &config,
            build: &build,
        };

        let issues = VersionCurrency.run(&cx).await;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "bootstrap.W001");
    }

    #[tokio::test]
    async fn version_check_errors_on_garbage_version() {
        let config = AppConfig::default();
        let build = BuildInfo {
            version: "not-a-version",
            ..BuildInfo::current()
        };
        let cx = CheckContext {
            config: &config,
            build: &build,
        };

        let issues = VersionCurrency.run(&cx).await;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "bootstrap.E011");
    }
}
