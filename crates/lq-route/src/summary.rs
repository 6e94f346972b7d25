//! Optional human-readable report summaries.
//!
//! Summaries are decoration.  [`enrich_with_summary`] runs the summarizer on
//! a worker thread with a deadline; any failure, panic or timeout is logged
//! and the report is returned with `summary = None`.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::insight::InsightReport;
use crate::model::Route;

/// Produces a one-paragraph description of a route and its insights.
pub trait ReportSummarizer: Send + Sync {
    fn summarize(&self, route: &Route, report: &InsightReport) -> Result<String, String>;
}

/// Local summarizer built from fixed sentence templates.
#[derive(Copy, Clone, Debug, Default)]
pub struct TemplateSummarizer;

impl ReportSummarizer for TemplateSummarizer {
    fn summarize(&self, route: &Route, report: &InsightReport) -> Result<String, String> {
        let traffic = match report.congestion_score {
            s if s > 0.7 => "heavy",
            s if s >= 0.4 => "moderate",
            _ => "light",
        };
        let stops = route.waypoint_order.len();
        let minutes = (report.duration_s / 60.0).round();
        let mut text = format!(
            "{stops} stops over {:.1} km, about {minutes:.0} min with {traffic} traffic. \
             Estimated fuel cost {:.2}, arriving around {}.",
            report.distance_km,
            report.estimated_fuel_cost,
            report.eta.format("%H:%M UTC"),
        );
        if !report.route_confidence {
            text.push_str(" Treat these figures as rough.");
        }
        Ok(text)
    }
}

/// Attach a summary to `report`, waiting at most `timeout`.
pub fn enrich_with_summary(
    mut report: InsightReport,
    route:      &Route,
    summarizer: Arc<dyn ReportSummarizer>,
    timeout:    Duration,
) -> InsightReport {
    let (tx, rx) = mpsc::channel();
    let route = route.clone();
    let snapshot = report.clone();
    let spawned = thread::Builder::new().name("lq-summary".into()).spawn(move || {
        // The receiver may be gone after a timeout.
        let _ = tx.send(summarizer.summarize(&route, &snapshot));
    });
    if let Err(e) = spawned {
        log::warn!("summary skipped: could not spawn worker: {e}");
        return report;
    }

    match rx.recv_timeout(timeout) {
        Ok(Ok(text)) => report.summary = Some(text),
        Ok(Err(e)) => log::warn!("summary skipped: {e}"),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            log::warn!("summary skipped: no answer within {timeout:?}");
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => log::warn!("summary skipped: summarizer panicked"),
    }
    report
}
