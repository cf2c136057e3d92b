// tests/selection_closure.rs

mod common;
use crate::common::builders::{ActionBuilder, ConfigFileBuilder, ProjectBuilder, echo_project};

use std::collections::BTreeSet;
use std::error::Error;

use fleetrun::config::ConfigFile;
use fleetrun::dag::{RunRequest, WorkSet, select, select_work_items};
use fleetrun::errors::FleetError;

type TestResult = Result<(), Box<dyn Error>>;

fn names(work: &WorkSet) -> Vec<&str> {
    work.items().iter().map(|i| i.project.as_str()).collect()
}

fn needs(work: &WorkSet, project: &str) -> BTreeSet<String> {
    work.get(project)
        .unwrap_or_else(|| panic!("{project} not selected"))
        .needs
        .clone()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn subset(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// a needs b, b needs c. b only has `"*"`; a and c have `g`.
fn fallback_chain() -> ConfigFile {
    ConfigFileBuilder::new()
        .with_project(
            "a",
            ProjectBuilder::new("a")
                .action(
                    "build",
                    ActionBuilder::new().group("g", &["echo", "a"]).needs("b").build(),
                )
                .build(),
        )
        .with_project(
            "b",
            ProjectBuilder::new("b")
                .action(
                    "build",
                    ActionBuilder::new().wildcard(&["echo", "b"]).needs("c").build(),
                )
                .build(),
        )
        .with_project(
            "c",
            ProjectBuilder::new("c")
                .action("build", ActionBuilder::new().group("g", &["echo", "c"]).build())
                .build(),
        )
        .build()
}

#[test]
fn direct_match_binds_requested_group_or_wildcard() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .with_project(
            "web",
            ProjectBuilder::new("web")
                .action(
                    "build",
                    ActionBuilder::new()
                        .wildcard(&["make"])
                        .group("ci", &["make", "ci"])
                        .build(),
                )
                .build(),
        )
        .with_project("api", echo_project("api", "build", &[]))
        .build();

    let work = select_work_items(&cfg, "build", "ci", &subset(&["web", "api"]))?;

    assert_eq!(work.get("web").unwrap().group, "ci");
    assert_eq!(work.get("api").unwrap().group, "*");
    Ok(())
}

#[test]
fn projects_without_the_action_or_a_usable_group_are_not_selected() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .with_project("web", echo_project("web", "build", &[]))
        .with_project("docs", echo_project("docs", "publish", &[]))
        .with_project(
            "tool",
            ProjectBuilder::new("tool")
                .action("build", ActionBuilder::new().group("release", &["make"]).build())
                .build(),
        )
        .build();

    let work = select(&cfg, &RunRequest::new("build", "ci"))?;

    assert_eq!(names(&work), vec!["web"]);
    Ok(())
}

#[test]
fn closure_pulls_in_transitive_needs() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .with_project("app", echo_project("app", "build", &["api"]))
        .with_project("api", echo_project("api", "build", &["core"]))
        .with_project("core", echo_project("core", "build", &[]))
        .with_project("other", echo_project("other", "build", &[]))
        .build();

    let work = select_work_items(&cfg, "build", "*", &subset(&["app"]))?;

    assert_eq!(names(&work), vec!["app", "api", "core"]);
    assert_eq!(needs(&work, "app"), set(&["api"]));
    assert_eq!(needs(&work, "api"), set(&["core"]));
    assert!(needs(&work, "core").is_empty());
    Ok(())
}

#[test]
fn project_reached_by_two_paths_is_selected_once() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .with_project("app", echo_project("app", "build", &["left", "right"]))
        .with_project("left", echo_project("left", "build", &["base"]))
        .with_project("right", echo_project("right", "build", &["base"]))
        .with_project("base", echo_project("base", "build", &[]))
        .build();

    let work = select_work_items(&cfg, "build", "*", &subset(&["app", "right"]))?;

    // Subset order first, then depth-first along `needs` in declaration order.
    assert_eq!(names(&work), vec!["app", "right", "left", "base"]);
    Ok(())
}

#[test]
fn effective_priority_prefers_action_then_project_then_zero() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .with_project(
            "both",
            ProjectBuilder::new("both")
                .priority(3)
                .action("build", ActionBuilder::new().wildcard(&["true"]).priority(7).build())
                .build(),
        )
        .with_project(
            "project_only",
            ProjectBuilder::new("project_only")
                .priority(3)
                .action("build", ActionBuilder::new().wildcard(&["true"]).build())
                .build(),
        )
        .with_project("neither", echo_project("neither", "build", &[]))
        .build();

    let work = select(&cfg, &RunRequest::new("build", "*"))?;

    assert_eq!(work.get("both").unwrap().priority, 7);
    assert_eq!(work.get("project_only").unwrap().priority, 3);
    assert_eq!(work.get("neither").unwrap().priority, 0);
    assert_eq!(work.tiers(), vec![0, 3, 7]);
    Ok(())
}

#[test]
fn fallback_rewiring_is_transitive() -> TestResult {
    let cfg = fallback_chain();

    let work = select_work_items(&cfg, "build", "g", &subset(&["a"]))?;

    assert_eq!(names(&work), vec!["a", "c"]);
    assert_eq!(needs(&work, "a"), set(&["c"]));
    assert!(needs(&work, "c").is_empty());
    Ok(())
}

#[test]
fn multi_hop_rewiring_resolves_in_one_pass() -> TestResult {
    // top -> mid1 -> mid2 -> leaf; both mids only have "*".
    let only_star = |needs: &str| {
        ProjectBuilder::new("x")
            .action(
                "build",
                ActionBuilder::new().wildcard(&["true"]).needs(needs).build(),
            )
            .build()
    };
    let cfg = ConfigFileBuilder::new()
        .with_project(
            "top",
            ProjectBuilder::new("top")
                .action("build", ActionBuilder::new().group("g", &["true"]).needs("mid1").build())
                .build(),
        )
        .with_project("mid1", only_star("mid2"))
        .with_project("mid2", only_star("leaf"))
        .with_project(
            "leaf",
            ProjectBuilder::new("leaf")
                .action("build", ActionBuilder::new().group("g", &["true"]).build())
                .build(),
        )
        .build();

    let work = select_work_items(&cfg, "build", "g", &subset(&["top"]))?;

    assert_eq!(names(&work), vec!["top", "leaf"]);
    assert_eq!(needs(&work, "top"), set(&["leaf"]));
    Ok(())
}

#[test]
fn wildcard_only_project_in_subset_runs_but_is_not_waited_on() -> TestResult {
    let cfg = fallback_chain();

    let work = select_work_items(&cfg, "build", "g", &subset(&["a", "b"]))?;

    let b = work.get("b").expect("b selected directly");
    assert_eq!(b.group, "*");
    assert_eq!(needs(&work, "b"), set(&["c"]));
    assert_eq!(needs(&work, "a"), set(&["c"]));
    Ok(())
}

#[test]
fn requesting_the_wildcard_group_needs_no_rewiring() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .with_project("web", echo_project("web", "build", &[]))
        .with_project("api", echo_project("api", "build", &["web"]))
        .build();

    let work = select_work_items(&cfg, "build", "*", &subset(&["web", "api"]))?;

    assert_eq!(needs(&work, "api"), set(&["web"]));
    assert_eq!(work.get("web").unwrap().group, "*");
    Ok(())
}

#[test]
fn rewiring_never_touches_the_configuration() -> TestResult {
    let cfg = fallback_chain();

    let _ = select_work_items(&cfg, "build", "g", &subset(&["a"]))?;

    let a = cfg.action("a", "build").unwrap();
    assert_eq!(a.needs, vec!["b".to_string()]);
    Ok(())
}

#[test]
fn unknown_project_in_subset_is_an_error() {
    let cfg = fallback_chain();

    match select_work_items(&cfg, "build", "g", &subset(&["a", "nope"])) {
        Err(FleetError::UnknownProject(name)) => assert_eq!(name, "nope"),
        other => panic!("expected UnknownProject, got {other:?}"),
    }
}

#[test]
fn empty_subset_selects_every_project() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .with_project("web", echo_project("web", "build", &[]))
        .with_project("api", echo_project("api", "build", &["web"]))
        .build();

    let work = select(&cfg, &RunRequest::new("build", "*"))?;

    assert_eq!(work.len(), 2);
    Ok(())
}
