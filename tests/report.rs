// tests/report.rs

use std::collections::BTreeSet;

use fleetrun::dag::WorkItem;
use fleetrun::engine::OutcomeRecord;
use fleetrun::output::report::status_text;
use fleetrun::output::{RunSummary, render_report};

fn item(project: &str) -> WorkItem {
    WorkItem {
        project: project.to_string(),
        action: "build".to_string(),
        group: "ci".to_string(),
        needs: BTreeSet::new(),
        priority: 0,
    }
}

fn exited(project: &str, code: i32) -> OutcomeRecord {
    let mut record = OutcomeRecord::for_item(&item(project));
    record.exit_code = Some(code);
    record
}

fn mixed_run() -> Vec<OutcomeRecord> {
    vec![
        exited("web", 0),
        exited("api", 2),
        OutcomeRecord::skipped_by(&item("docs"), "api"),
        OutcomeRecord::duplicate(&item("web")),
    ]
}

#[test]
fn summary_counts_each_outcome_kind() {
    let summary = RunSummary::from_records(&mixed_run());

    assert_eq!(
        summary,
        RunSummary {
            succeeded: 1,
            failed: 1,
            skipped: 1,
            duplicates: 1,
        }
    );
    assert_eq!(summary.total(), 4);
    assert!(!summary.is_success());
}

#[test]
fn duplicates_alone_do_not_fail_the_run() {
    let records = vec![exited("web", 0), OutcomeRecord::duplicate(&item("web"))];
    assert!(RunSummary::from_records(&records).is_success());
}

#[test]
fn empty_run_is_successful() {
    assert!(RunSummary::from_records(&[]).is_success());
}

#[test]
fn status_text_describes_outcome() {
    let mut killed = OutcomeRecord::for_item(&item("web"));
    killed.signal = Some(9);

    assert_eq!(status_text(&exited("web", 0)), "ok");
    assert_eq!(status_text(&exited("web", 2)), "failed (exit 2)");
    assert_eq!(status_text(&killed), "killed (signal 9)");
    assert_eq!(
        status_text(&OutcomeRecord::skipped_by(&item("docs"), "api")),
        "skipped (api did not succeed)"
    );
    assert_eq!(
        status_text(&OutcomeRecord::duplicate(&item("web"))),
        "duplicate (already started)"
    );
}

#[test]
fn report_is_sorted_by_project_with_totals() {
    let report = render_report(&mixed_run());
    let lines: Vec<&str> = report.lines().collect();

    assert!(lines[0].starts_with("project"));
    assert!(lines[1].starts_with("api "));
    assert!(lines[2].starts_with("docs"));
    assert!(lines[3].starts_with("web "));
    assert!(lines[4].starts_with("web "));
    assert_eq!(
        lines.last().copied(),
        Some("1 ok, 1 failed, 1 skipped, 1 duplicate")
    );
}
