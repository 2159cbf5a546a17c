//! Human-readable output for evaluation reports.

use xte_core::{Outcome, PointReport};

/// Aggregate counts over a batch. Error records carry no alert and are
/// excluded from the alerting tally.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub alerting: usize,
    pub errors: usize,
}

pub fn tally(reports: &[PointReport]) -> Tally {
    let mut out = Tally::default();
    for report in reports {
        match &report.outcome {
            Outcome::Ok(eval) if eval.alert.is_alerting() => out.alerting += 1,
            Outcome::Ok(_) => {}
            Outcome::Err { .. } => out.errors += 1,
        }
    }
    out
}

pub fn print_report(reports: &[PointReport]) {
    println!("Validation results:");
    for report in reports {
        println!("{}", format_line(report));
    }
}

fn format_line(report: &PointReport) -> String {
    match &report.outcome {
        Outcome::Err { error } => format!("- {}: ERROR: {}", report.fix_id, error),
        Outcome::Ok(eval) => {
            let route = eval.route_id.as_deref().unwrap_or("none");
            let threshold = eval
                .threshold_nm
                .map(|t| format!("{t} nm"))
                .unwrap_or_else(|| "none".to_string());
            let session_level = eval
                .session_level_match
                .map(|l| format!(" (session level {l} nm)"))
                .unwrap_or_default();
            format!(
                "- {} (session {}) -> route {}, distance {} nm, threshold {}, alert={}{}",
                report.fix_id,
                eval.fix.session_id,
                route,
                eval.distance_nm,
                threshold,
                eval.alert,
                session_level
            )
        }
    }
}
