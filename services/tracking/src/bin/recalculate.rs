//! Re-derive hours and shifts for every stored work record.
//!
//! Dry run by default; pass `--apply` to write the changes.

use anyhow::{Context, Result};
use clap::Parser;
use common::database::{DatabaseConfig, health_check, init_pool};
use std::path::PathBuf;
use tracing::info;
use tracking::config::TrackingConfig;
use tracking::recalculate::{RecalculationReport, Recalculator};
use tracking::repositories::PgWorkRecordRepository;

/// Recalculate work-record hours and shifts with the current rules.
#[derive(Parser, Debug)]
#[command(name = "recalculate")]
#[command(about = "Recalculate stored work records", long_about = None)]
struct Cli {
    /// Report what would change without writing (default)
    #[arg(long, conflicts_with = "apply")]
    dry_run: bool,

    /// Write the recalculated values
    #[arg(long)]
    apply: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Inbound rule table file, overriding INBOUND_RULES_PATH
    #[arg(long, value_name = "PATH")]
    rules: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    common::telemetry::init_tracing("info")?;

    let mut config = TrackingConfig::from_env()?;
    if let Some(path) = cli.rules {
        config.inbound_rules_path = Some(path);
    }
    let engine = config.rule_engine()?;

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    if !health_check(&pool).await? {
        anyhow::bail!("Failed to connect to database");
    }

    let dry_run = cli.dry_run || !cli.apply;
    info!(
        "Recalculating work records ({})",
        if dry_run { "dry run" } else { "apply" }
    );

    let report = Recalculator::new(PgWorkRecordRepository::new(pool), engine)
        .run(dry_run)
        .await
        .context("recalculation aborted")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &RecalculationReport) {
    for change in &report.changes {
        println!(
            "{} {:<10} hours {:>6.2} -> {:>6.2}  shifts {:>6.3} -> {:>6.3}",
            change.id,
            change.category,
            change.old_hours,
            change.new_hours,
            change.old_shifts,
            change.new_shifts
        );
    }

    let verb = if report.applied { "updated" } else { "would update" };
    println!(
        "{} records scanned, {} {}",
        report.scanned,
        verb,
        report.changes.len()
    );
}
