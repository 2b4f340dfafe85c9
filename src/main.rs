//! Startup initialization and operational checks binary.
//!
//! Loads the configuration, runs startup initialization, executes the
//! selected validation stage, and reports the result. Exit code 1 when
//! startup aborts or any check reports an error.

use clap::Parser;
use service_bootstrap::checks::{CheckContext, CheckReport, Severity, Stage};
use service_bootstrap::observability::init_logging;
use service_bootstrap::{
    initialize, load_config, BuildInfo, CheckRegistry, LookupRegistry,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "service-bootstrap",
    version,
    about = "Run startup initialization and operational checks"
)]
struct Args {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Run deployment validation (includes deploy-only checks).
    #[arg(long)]
    deploy: bool,

    /// Emit the check report as JSON.
    #[arg(long)]
    json: bool,

    /// Print build information and exit.
    #[arg(long)]
    version_info: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if args.version_info {
        println!("{}", BuildInfo::current());
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability.log_filter);

    tracing::info!(
        config = %args.config.display(),
        version = %env!("CARGO_PKG_VERSION"),
        "service-bootstrap starting"
    );

    let mut checks = CheckRegistry::new();
    let mut lookups = LookupRegistry::new();
    let services = match initialize(&config, &mut checks, &mut lookups) {
        Ok(services) => services,
        Err(e) => {
            tracing::error!(error = %e, "Startup aborted");
            eprintln!("startup aborted: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stage = if args.deploy {
        Stage::Deploy
    } else {
        Stage::Startup
    };
    let build = BuildInfo::current();
    let cx = CheckContext {
        config: &config,
        build: &build,
    };
    let report = checks.run(&cx, stage).await;

    // Failed checks flow into the error collector like any other runtime
    // error would.
    for run in &report.runs {
        for issue in &run.issues {
            if issue.severity >= Severity::Error {
                services.errors.report(run.name, issue.message.clone());
            }
        }
    }

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize report");
                return ExitCode::FAILURE;
            }
        }
    } else {
        render_text(&report);
    }

    if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn render_text(report: &CheckReport) {
    for run in &report.runs {
        if run.passed() {
            println!("{:<28} ok ({}ms)", run.name, run.duration_ms);
            continue;
        }
        println!("{:<28} {} issue(s)", run.name, run.issues.len());
        for issue in &run.issues {
            println!("  {} [{}] {}", issue.id, issue.severity, issue.message);
            if let Some(hint) = &issue.hint {
                println!("      hint: {hint}");
            }
        }
    }

    let summary = report.summary();
    println!(
        "{} checks: {} passed, {} warned, {} failed ({}ms)",
        summary.total, summary.passed, summary.warned, summary.failed, summary.total_duration_ms
    );
}
