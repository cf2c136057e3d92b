// tests/scheduler_steps.rs

mod common;
use crate::common::init_tracing;

use std::collections::BTreeSet;

use fleetrun::dag::{Scheduler, WorkItem, WorkSet};

fn item(project: &str, priority: i32, needs: &[&str]) -> WorkItem {
    WorkItem {
        project: project.to_string(),
        action: "build".to_string(),
        group: "*".to_string(),
        needs: needs.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
        priority,
    }
}

fn projects(items: &[WorkItem]) -> Vec<&str> {
    items.iter().map(|i| i.project.as_str()).collect()
}

#[test]
fn tiers_start_in_ascending_priority_regardless_of_discovery_order() {
    init_tracing();

    let mut scheduler = Scheduler::new(WorkSet::new(vec![
        item("x", 5, &[]),
        item("z", -2, &[]),
        item("y", 0, &[]),
    ]));

    assert_eq!(scheduler.tiers(), &[-2, 0, 5]);

    let first = scheduler.start_next_tier().unwrap();
    assert_eq!(first.priority, -2);
    assert_eq!(projects(&first.ready), vec!["z"]);

    let second = scheduler.start_next_tier().unwrap();
    assert_eq!(second.priority, 0);
    assert_eq!(projects(&second.ready), vec!["y"]);

    let third = scheduler.start_next_tier().unwrap();
    assert_eq!(third.priority, 5);
    assert_eq!(projects(&third.ready), vec!["x"]);

    assert!(scheduler.start_next_tier().is_none());
    assert!(scheduler.tiers_exhausted());
}

#[test]
fn items_waiting_on_dependencies_are_not_started_with_their_tier() {
    let mut scheduler = Scheduler::new(WorkSet::new(vec![
        item("web", 0, &[]),
        item("api", 0, &["web"]),
    ]));

    let tier = scheduler.start_next_tier().unwrap();
    assert_eq!(projects(&tier.ready), vec!["web"]);
    assert!(scheduler.is_pending("api"));
    assert_eq!(scheduler.outstanding_needs("api"), Some(vec!["web".to_string()]));
}

#[test]
fn success_releases_dependents_even_from_later_tiers() {
    let mut scheduler = Scheduler::new(WorkSet::new(vec![
        item("web", 0, &[]),
        item("slow", 0, &[]),
        item("api", 9, &["web"]),
    ]));

    let tier = scheduler.start_next_tier().unwrap();
    assert_eq!(tier.priority, 0);

    // `slow` is still running; tier 0 has not drained.
    let step = scheduler.step_completion("web", true);
    assert_eq!(projects(&step.newly_ready), vec!["api"]);
    assert!(step.newly_skipped.is_empty());
    assert!(!scheduler.is_pending("api"));
}

#[test]
fn dependents_are_released_only_when_all_needs_succeeded() {
    let mut scheduler = Scheduler::new(WorkSet::new(vec![
        item("a", 0, &[]),
        item("b", 0, &[]),
        item("c", 0, &["a", "b"]),
    ]));
    scheduler.start_next_tier().unwrap();

    let step = scheduler.step_completion("a", true);
    assert!(step.newly_ready.is_empty());
    assert_eq!(scheduler.outstanding_needs("c"), Some(vec!["b".to_string()]));

    let step = scheduler.step_completion("b", true);
    assert_eq!(projects(&step.newly_ready), vec!["c"]);
}

#[test]
fn empty_later_tier_item_is_not_released_by_unrelated_completion() {
    let mut scheduler = Scheduler::new(WorkSet::new(vec![
        item("a", 0, &[]),
        item("late", 4, &[]),
    ]));
    scheduler.start_next_tier().unwrap();

    let step = scheduler.step_completion("a", true);
    assert!(step.newly_ready.is_empty());
    assert!(scheduler.is_pending("late"));

    let tier = scheduler.start_next_tier().unwrap();
    assert_eq!(projects(&tier.ready), vec!["late"]);
}

#[test]
fn failure_skips_dependents_with_per_level_attribution() {
    let mut scheduler = Scheduler::new(WorkSet::new(vec![
        item("root", 0, &[]),
        item("one", 0, &["root"]),
        item("two", 1, &["one"]),
        item("three", 2, &["two"]),
        item("unrelated", 0, &[]),
    ]));
    scheduler.start_next_tier().unwrap();

    let step = scheduler.step_completion("root", false);
    assert!(step.newly_ready.is_empty());

    let mut skipped: Vec<(String, String)> = step
        .newly_skipped
        .iter()
        .map(|s| (s.item.project.clone(), s.skipped_by.clone()))
        .collect();
    skipped.sort();

    assert_eq!(
        skipped,
        vec![
            ("one".to_string(), "root".to_string()),
            ("three".to_string(), "two".to_string()),
            ("two".to_string(), "one".to_string()),
        ]
    );
    assert!(!scheduler.is_pending("three"));
    assert_eq!(scheduler.pending_count(), 0);
}

#[test]
fn each_item_leaves_the_pool_only_once() {
    // d needs b and c; both b and c fail.
    let mut scheduler = Scheduler::new(WorkSet::new(vec![
        item("b", 0, &[]),
        item("c", 0, &[]),
        item("d", 0, &["b", "c"]),
    ]));
    scheduler.start_next_tier().unwrap();

    let first = scheduler.step_completion("b", false);
    assert_eq!(first.newly_skipped.len(), 1);
    assert_eq!(first.newly_skipped[0].skipped_by, "b");

    let second = scheduler.step_completion("c", false);
    assert!(second.is_empty());
}

#[test]
fn duplicate_cascades_like_failure() {
    let mut scheduler = Scheduler::new(WorkSet::new(vec![
        item("a", 0, &[]),
        item("b", 0, &["a"]),
    ]));
    scheduler.start_next_tier().unwrap();

    let step = scheduler.step_duplicate("a");
    assert_eq!(step.newly_skipped.len(), 1);
    assert_eq!(step.newly_skipped[0].item.project, "b");
    assert_eq!(step.newly_skipped[0].skipped_by, "a");
}

#[test]
fn items_needing_projects_outside_the_run_are_skipped_at_finish() {
    let mut scheduler = Scheduler::new(WorkSet::new(vec![
        item("a", 0, &[]),
        item("orphan", 0, &["ghost"]),
    ]));

    while let Some(tier) = scheduler.start_next_tier() {
        for ready in tier.ready {
            scheduler.step_completion(&ready.project, true);
        }
    }

    let stranded = scheduler.finish();
    assert_eq!(stranded.len(), 1);
    assert_eq!(stranded[0].item.project, "orphan");
    assert_eq!(stranded[0].skipped_by, "ghost");
    assert_eq!(scheduler.pending_count(), 0);
}
