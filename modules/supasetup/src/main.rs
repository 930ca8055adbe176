//! Supabase database setup: applies SQL migrations in filename order and
//! verifies the expected tables exist afterwards.
//!
//! Fatal preconditions (bad config, failed connectivity probe, missing
//! migrations) exit with code 1. A completed run exits 0 even when some
//! migrations or table checks failed; the summary banner is the place
//! that reports those.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use supasetup::report::{self, Reporter};
use supasetup::{migrate, verify};
use supasetup_common::{ConnectTarget, SetupConfig};

#[derive(Parser)]
#[command(name = "supasetup", about = "Apply Supabase SQL migrations and verify the result")]
#[command(version)]
struct Cli {
    /// Env file holding NEXT_PUBLIC_SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY
    #[arg(long, default_value = ".env.local")]
    env_file: PathBuf,

    /// Directory containing *.sql migration files
    #[arg(long, default_value = "supabase/migrations")]
    migrations_dir: PathBuf,

    /// Table expected to exist after migrations (repeatable; defaults to
    /// users, articles, workers)
    #[arg(long = "expect-table", value_name = "NAME")]
    expect_tables: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<()> {
    let reporter = Reporter::new();
    reporter.header("Supabase Database Setup");
    reporter.blank();

    let config = SetupConfig::from_env_file(&cli.env_file)?;
    config.log_redacted();
    reporter.info(&format!("Project Reference: {}", config.project_ref));
    reporter.info(&format!("Supabase URL: {}", config.supabase_url));
    reporter.blank();

    let target = ConnectTarget::from_config(&config);

    reporter.info("Testing database connection...");
    target.probe().await?;
    reporter.success("Successfully connected to Supabase database");
    reporter.blank();

    let scripts = migrate::discover(&cli.migrations_dir)?;
    reporter.info(&format!("Found {} migration files", scripts.len()));
    reporter.blank();

    let outcome = migrate::run_all(&target, &scripts, &reporter).await;

    reporter.blank();
    reporter.phase("Verifying database setup...");
    reporter.blank();

    let expected: Vec<String> = if cli.expect_tables.is_empty() {
        verify::DEFAULT_EXPECTED_TABLES.iter().map(|s| s.to_string()).collect()
    } else {
        cli.expect_tables
    };
    let missing = verify::check_tables(&target, &expected, &reporter).await;

    report::print_summary(&reporter, &outcome.failed, &missing);
    Ok(())
}
