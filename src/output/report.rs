// src/output/report.rs

//! Final run summary.

use std::fmt::Write as _;

use crate::engine::{OutcomeRecord, SkipReason};

/// Counts of each kind of outcome in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duplicates: usize,
}

impl RunSummary {
    pub fn from_records(records: &[OutcomeRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            match &record.skip {
                Some(SkipReason::Duplicate) => summary.duplicates += 1,
                Some(SkipReason::SkippedBy(_)) => summary.skipped += 1,
                None if record.succeeded() => summary.succeeded += 1,
                None => summary.failed += 1,
            }
        }
        summary
    }

    /// Nothing failed and nothing was skipped because of a failure.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped + self.duplicates
    }
}

/// Short status text for one record.
pub fn status_text(record: &OutcomeRecord) -> String {
    match &record.skip {
        Some(SkipReason::Duplicate) => "duplicate (already started)".to_string(),
        Some(SkipReason::SkippedBy(upstream)) => format!("skipped ({upstream} did not succeed)"),
        None => match (record.exit_code, record.signal) {
            (Some(0), _) => "ok".to_string(),
            (_, Some(sig)) => format!("killed (signal {sig})"),
            (Some(code), _) => format!("failed (exit {code})"),
            (None, None) => "failed".to_string(),
        },
    }
}

/// Render a table of every record, sorted by project, plus a totals line.
pub fn render_report(records: &[OutcomeRecord]) -> String {
    let mut sorted: Vec<&OutcomeRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.project.cmp(&b.project));

    let project_w = sorted
        .iter()
        .map(|r| r.project.len())
        .max()
        .unwrap_or(0)
        .max("project".len());
    let group_w = sorted
        .iter()
        .map(|r| r.group.len())
        .max()
        .unwrap_or(0)
        .max("group".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:project_w$}  {:group_w$}  status", "project", "group");
    for record in sorted {
        let _ = writeln!(
            out,
            "{:project_w$}  {:group_w$}  {}",
            record.project,
            record.group,
            status_text(record)
        );
    }

    let summary = RunSummary::from_records(records);
    let _ = writeln!(
        out,
        "\n{} ok, {} failed, {} skipped, {} duplicate",
        summary.succeeded, summary.failed, summary.skipped, summary.duplicates
    );
    out
}
