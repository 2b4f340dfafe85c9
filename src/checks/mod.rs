//! Operational checks subsystem.
//!
//! # Data Flow
//! ```text
//! Startup initialization:
//!     → register checks into CheckRegistry (some deploy-only)
//!
//! Check run (startup or deploy validation):
//!     → CheckRegistry::run(context, stage)
//!     → each check probes environment/config
//!     → issues collected into CheckReport
//! ```
//!
//! # Design Decisions
//! - Registry is an explicit value, not ambient global state
//! - Checks run sequentially in registration order
//! - A failing check is report data, never a process error
//! - Deploy-only checks are skipped during plain startup runs

pub mod connectivity;
pub mod environment;

pub use connectivity::{CacheBackend, DatabaseReachable, MailConnection, WorkerAvailable};
pub use environment::{
    DataWritable, ErrorReportingConfigured, PermissionsSane, SettingsSane, SiteConfigured,
    TemplatesConfigured, VersionCurrency,
};

use crate::config::AppConfig;
use crate::version::BuildInfo;
use futures_util::future::BoxFuture;
use serde::Serialize;
use std::fmt;
use std::time::Instant;

/// Severity of a reported issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// A single problem reported by a check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckIssue {
    /// Stable issue identifier (e.g., "bootstrap.E004").
    pub id: &'static str,

    /// How bad this issue is.
    pub severity: Severity,

    /// Human-readable description.
    pub message: String,

    /// Optional remediation hint.
    pub hint: Option<String>,
}

impl CheckIssue {
    pub fn new(id: &'static str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id,
            severity,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Read-only environment a check runs against.
pub struct CheckContext<'a> {
    pub config: &'a AppConfig,
    pub build: &'a BuildInfo,
}

/// A validation callback run at startup and/or deploy time.
///
/// An empty issue list means the check passed.
pub trait Check: Send + Sync {
    /// Stable name used in reports and registry queries.
    fn name(&self) -> &'static str;

    fn run<'a>(&'a self, cx: &'a CheckContext<'a>) -> BoxFuture<'a, Vec<CheckIssue>>;
}

/// Which validation pass is being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Every process start. Deploy-only checks are skipped.
    Startup,
    /// Explicit deployment validation. All checks run.
    Deploy,
}

struct RegisteredCheck {
    check: Box<dyn Check>,
    deploy_only: bool,
}

/// Registry of operational checks.
///
/// Entries are appended for the registry's lifetime; registering the same
/// check twice runs it twice.
#[derive(Default)]
pub struct CheckRegistry {
    entries: Vec<RegisteredCheck>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check that runs on every validation pass.
    pub fn register(&mut self, check: impl Check + 'static) {
        self.entries.push(RegisteredCheck {
            check: Box::new(check),
            deploy_only: false,
        });
    }

    /// Register a check that only runs during deployment validation.
    pub fn register_deploy(&mut self, check: impl Check + 'static) {
        self.entries.push(RegisteredCheck {
            check: Box::new(check),
            deploy_only: true,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of all registered checks, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.check.name()).collect()
    }

    /// Whether the named check is deploy-only. `None` if not registered.
    pub fn is_deploy_only(&self, name: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|e| e.check.name() == name)
            .map(|e| e.deploy_only)
    }

    /// Run all checks applicable to the given stage, sequentially, in
    /// registration order.
    pub async fn run(&self, cx: &CheckContext<'_>, stage: Stage) -> CheckReport {
        let mut report = CheckReport::default();

        for entry in &self.entries {
            if entry.deploy_only && stage == Stage::Startup {
                continue;
            }

            let name = entry.check.name();
            tracing::debug!(check = name, "Running check");

            let start = Instant::now();
            let issues = entry.check.run(cx).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            if issues.is_empty() {
                tracing::debug!(check = name, duration_ms, "Check passed");
            } else {
                tracing::warn!(
                    check = name,
                    issues = issues.len(),
                    duration_ms,
                    "Check reported issues"
                );
            }

            report.runs.push(CheckRun {
                name,
                issues,
                duration_ms,
            });
        }

        report
    }
}

/// Outcome of one executed check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckRun {
    pub name: &'static str,
    pub issues: Vec<CheckIssue>,
    pub duration_ms: u64,
}

impl CheckRun {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Aggregated outcome of a validation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub runs: Vec<CheckRun>,
}

impl CheckReport {
    /// All issues across all runs, in execution order.
    pub fn issues(&self) -> impl Iterator<Item = &CheckIssue> {
        self.runs.iter().flat_map(|r| r.issues.iter())
    }

    /// Whether any issue is severe enough to fail the pass.
    pub fn has_failures(&self) -> bool {
        self.issues().any(|i| i.severity >= Severity::Error)
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for run in &self.runs {
            summary.total += 1;
            summary.total_duration_ms += run.duration_ms;
            if run.passed() {
                summary.passed += 1;
            } else if run.issues.iter().any(|i| i.severity >= Severity::Error) {
                summary.failed += 1;
            } else {
                summary.warned += 1;
            }
        }
        summary
    }
}

/// Summary statistics for a validation pass.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ReportSummary {
    pub total: u32,
    pub passed: u32,
    pub warned: u32,
    pub failed: u32,
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::BuildInfo;

    struct Static {
        name: &'static str,
        issues: Vec<CheckIssue>,
    }

    impl Check for Static {
        fn name(&self) -> &'static str {
            self.name
        }

        fn run<'a>(&'a self, _cx: &'a CheckContext<'a>) -> BoxFuture<'a, Vec<CheckIssue>> {
            Box::pin(async move { self.issues.clone() })
        }
    }

    #[tokio::test]
    async fn startup_stage_skips_deploy_only_checks() {
        let mut registry = CheckRegistry::new();
        registry.register(Static {
            name: "always",
            issues: Vec::new(),
        });
        registry.register_deploy(Static {
            name: "deploy_only",
            issues: Vec::new(),
        });

        let config = AppConfig::default();
        let build = BuildInfo::current();
        let cx = CheckContext {
            config: &config,
            build: &build,
        };

        let startup = registry.run(&cx, Stage::Startup).await;
        assert_eq!(startup.runs.len(), 1);
        assert_eq!(startup.runs[0].name, "always");

        let deploy = registry.run(&cx, Stage::Deploy).await;
        assert_eq!(deploy.runs.len(), 2);
    }

    #[tokio::test]
    async fn report_summary_counts_by_worst_issue() {
        let mut registry = CheckRegistry::new();
        registry.register(Static {
            name: "ok",
            issues: Vec::new(),
        });
        registry.register(Static {
            name: "warns",
            issues: vec![CheckIssue::new("bootstrap.W900", Severity::Warning, "w")],
        });
        registry.register(Static {
            name: "fails",
            issues: vec![
                CheckIssue::new("bootstrap.W901", Severity::Warning, "w"),
                CheckIssue::new("bootstrap.E900", Severity::Error, "e"),
            ],
        });

        let config = AppConfig::default();
        let build = BuildInfo::current();
        let cx = CheckContext {
            config: &config,
            build: &build,
        };

        let report = registry.run(&cx, Stage::Deploy).await;
        let summary = report.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.warned, 1);
        assert_eq!(summary.failed, 1);
        assert!(report.has_failures());
    }

    #[test]
    fn duplicate_registration_is_not_deduplicated() {
        let mut registry = CheckRegistry::new();
        registry.register(Static {
            name: "twice",
            issues: Vec::new(),
        });
        registry.register(Static {
            name: "twice",
            issues: Vec::new(),
        });
        assert_eq!(registry.len(), 2);
    }
}
