//! validate_alerts - evaluate ownship fixes against session routes.
//!
//! Loads a sessions JSON export, runs the cross-track evaluator over the
//! ownship fixes, and prints a per-point alert report.

mod input;
mod report;
mod wkt;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xte_core::{Evaluator, SessionIndex};

#[derive(Parser, Debug)]
#[command(author, version, about = "Validate ownship fixes against session routes")]
struct Args {
    /// Path to the sessions JSON export
    #[arg(long, default_value = "sessions.json")]
    sessions: PathBuf,

    /// Maximum number of ownship fixes to evaluate
    #[arg(long, default_value_t = 50)]
    limit: usize,

    /// Emit one JSON report per line instead of the human-readable report
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let sessions = input::load_sessions(&args.sessions)?;
    tracing::info!(
        routes = sessions.routes.len(),
        thresholds = sessions.thresholds.len(),
        ownship = sessions.ownship.len(),
        "loaded sessions export"
    );

    let fixes = input::select_fixes(sessions.ownship, args.limit);

    let index = SessionIndex::new(sessions.routes, sessions.thresholds);
    let evaluator = Evaluator::new(index);
    let reports = evaluator.evaluate_batch(&fixes);

    if args.json {
        for report in &reports {
            println!("{}", serde_json::to_string(report)?);
        }
    } else {
        report::print_report(&reports);
    }

    let summary = report::tally(&reports);
    tracing::info!(
        evaluated = reports.len(),
        alerting = summary.alerting,
        errors = summary.errors,
        "validation complete"
    );

    Ok(())
}
