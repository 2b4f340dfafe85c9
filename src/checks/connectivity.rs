//! Connectivity checks for external backends.
//!
//! Each check probes one TCP endpoint the service depends on (mail,
//! database, cache, worker broker). Probes distinguish connection errors
//! from timeouts so the report points at the actual failure mode.

use crate::checks::{Check, CheckContext, CheckIssue, Severity};
use futures_util::future::BoxFuture;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time;

/// Outcome of a single TCP probe.
enum ProbeFailure {
    /// Connection attempt completed with an error (refused, unreachable,
    /// resolution failure).
    Connect(std::io::Error),
    /// No answer within the configured timeout.
    Timeout(Duration),
}

impl ProbeFailure {
    fn describe(&self, target: &str) -> String {
        match self {
            ProbeFailure::Connect(e) => format!("connection to {target} failed: {e}"),
            ProbeFailure::Timeout(limit) => {
                format!("connection to {target} timed out after {}s", limit.as_secs())
            }
        }
    }
}

async fn probe_tcp(target: &str, timeout: Duration) -> Result<(), ProbeFailure> {
    match time::timeout(timeout, TcpStream::connect(target)).await {
        Ok(Ok(_stream)) => Ok(()),
        Ok(Err(e)) => {
            tracing::warn!(target = %target, error = %e, "Probe failed: connection error");
            Err(ProbeFailure::Connect(e))
        }
        Err(_) => {
            tracing::warn!(target = %target, "Probe failed: timeout");
            Err(ProbeFailure::Timeout(timeout))
        }
    }
}

fn connect_timeout(cx: &CheckContext<'_>) -> Duration {
    Duration::from_secs(cx.config.timeouts.connect_secs)
}

/// Verifies the SMTP server accepts connections.
pub struct MailConnection;

impl Check for MailConnection {
    fn name(&self) -> &'static str {
        "mail_connection"
    }

    fn run<'a>(&'a self, cx: &'a CheckContext<'a>) -> BoxFuture<'a, Vec<CheckIssue>> {
        Box::pin(async move {
            let mail = &cx.config.mail;
            let target = format!("{}:{}", mail.host, mail.port);
            match probe_tcp(&target, connect_timeout(cx)).await {
                Ok(()) => Vec::new(),
                Err(failure) => vec![CheckIssue::new(
                    "bootstrap.E003",
                    Severity::Error,
                    format!("cannot reach mail server: {}", failure.describe(&target)),
                )
                .with_hint("verify mail.host and mail.port, and that the SMTP server is running")],
            }
        })
    }
}

/// Verifies the database server accepts connections.
pub struct DatabaseReachable;

impl Check for DatabaseReachable {
    fn name(&self) -> &'static str {
        "database_reachable"
    }

    fn run<'a>(&'a self, cx: &'a CheckContext<'a>) -> BoxFuture<'a, Vec<CheckIssue>> {
        Box::pin(async move {
            let db = &cx.config.database;
            let target = format!("{}:{}", db.host, db.port);
            match probe_tcp(&target, connect_timeout(cx)).await {
                Ok(()) => Vec::new(),
                Err(failure) => vec![CheckIssue::new(
                    "bootstrap.E004",
                    Severity::Critical,
                    format!("cannot reach database: {}", failure.describe(&target)),
                )
                .with_hint("verify database.host and database.port")],
            }
        })
    }
}

/// Verifies the cache backend accepts connections.
pub struct CacheBackend;

impl Check for CacheBackend {
    fn name(&self) -> &'static str {
        "cache_backend"
    }

    fn run<'a>(&'a self, cx: &'a CheckContext<'a>) -> BoxFuture<'a, Vec<CheckIssue>> {
        Box::pin(async move {
            let target = cx.config.cache.address.clone();
            match probe_tcp(&target, connect_timeout(cx)).await {
                Ok(()) => Vec::new(),
                Err(failure) => vec![CheckIssue::new(
                    "bootstrap.E005",
                    Severity::Error,
                    format!("cannot reach cache backend: {}", failure.describe(&target)),
                )
                .with_hint("verify cache.address")],
            }
        })
    }
}

/// Verifies the worker broker accepts connections.
pub struct WorkerAvailable;

impl Check for WorkerAvailable {
    fn name(&self) -> &'static str {
        "worker_available"
    }

    fn run<'a>(&'a self, cx: &'a CheckContext<'a>) -> BoxFuture<'a, Vec<CheckIssue>> {
        Box::pin(async move {
            let worker = &cx.config.worker;
            let target = worker.broker_address.clone();
            match probe_tcp(&target, connect_timeout(cx)).await {
                Ok(()) => Vec::new(),
                Err(failure) => vec![CheckIssue::new(
                    "bootstrap.E006",
                    Severity::Error,
                    format!(
                        "cannot reach worker broker: {}",
                        failure.describe(&target)
                    ),
                )
                .with_hint(format!(
                    "verify worker.broker_address and that at least {} worker(s) are running",
                    worker.min_workers
                ))],
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::version::BuildInfo;
    use tokio::net::TcpListener;

    async fn listener() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    #[tokio::test]
    async fn probe_succeeds_against_live_listener() {
        let (_listener, port) = listener().await;
        let result = probe_tcp(
            &format!("127.0.0.1:{port}"),
            Duration::from_secs(2),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn probe_reports_connection_error_on_closed_port() {
        let (listener, port) = listener().await;
        drop(listener);

        let result = probe_tcp(
            &format!("127.0.0.1:{port}"),
            Duration::from_secs(2),
        )
        .await;
        assert!(matches!(result, Err(ProbeFailure::Connect(_))));
    }

    #[tokio::test]
    async fn database_check_flags_unreachable_server() {
        let (listener, port) = listener().await;
        drop(listener);

        let mut config = AppConfig::default();
        config.database.host = "127.0.0.1".to_string();
        config.database.port = port;
        config.timeouts.connect_secs = 2;
        let build = BuildInfo::current();
        let cx = CheckContext {
            config: &config,
            build: &build,
        };

        let issues = DatabaseReachable.run(&cx).await;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "bootstrap.E004");
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[tokio::test]
    async fn mail_check_passes_against_live_listener() {
        let (_listener, port) = listener().await;

        let mut config = AppConfig::default();
        config.mail.host = "127.0.0.1".to_string();
        config.mail.port = port;
        config.timeouts.connect_secs = 2;
        let build = BuildInfo::current();
        let cx = CheckContext {
            config: &config,
            build: &build,
        };

        assert!(MailConnection.run(&cx).await.is_empty());
    }
}
