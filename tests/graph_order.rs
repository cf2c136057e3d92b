// tests/graph_order.rs

mod common;
use crate::common::builders::{ActionBuilder, ConfigFileBuilder, ProjectBuilder, echo_project};

use fleetrun::config::ConfigFile;
use fleetrun::dag::topological_order;

fn position(order: &[String], name: &str) -> usize {
    order
        .iter()
        .position(|p| p == name)
        .unwrap_or_else(|| panic!("{name} missing from {order:?}"))
}

/// app needs lib and api; api needs lib; lib needs core.
fn diamond() -> ConfigFile {
    ConfigFileBuilder::new()
        .with_project("app", echo_project("app", "build", &["api", "lib"]))
        .with_project("api", echo_project("api", "build", &["lib"]))
        .with_project("lib", echo_project("lib", "build", &["core"]))
        .with_project("core", echo_project("core", "build", &[]))
        .build()
}

#[test]
fn needed_projects_come_first() {
    let order = topological_order(&diamond(), "build").unwrap();

    assert_eq!(order.len(), 4);
    assert!(position(&order, "core") < position(&order, "lib"));
    assert!(position(&order, "lib") < position(&order, "api"));
    assert!(position(&order, "lib") < position(&order, "app"));
    assert!(position(&order, "api") < position(&order, "app"));
}

#[test]
fn order_is_reproducible() {
    let cfg = diamond();
    let first = topological_order(&cfg, "build").unwrap();
    for _ in 0..10 {
        assert_eq!(topological_order(&cfg, "build").unwrap(), first);
    }
}

#[test]
fn only_projects_defining_the_action_are_ordered() {
    let cfg = ConfigFileBuilder::new()
        .with_project("web", echo_project("web", "build", &[]))
        .with_project("docs", echo_project("docs", "publish", &[]))
        .build();

    let order = topological_order(&cfg, "build").unwrap();
    assert_eq!(order, vec!["web".to_string()]);

    let none = topological_order(&cfg, "deploy").unwrap();
    assert!(none.is_empty());
}

#[test]
fn needs_of_other_actions_do_not_constrain_order() {
    // `test` of a needs b, but for `build` the edge goes the other way.
    let cfg = ConfigFileBuilder::new()
        .with_project(
            "a",
            ProjectBuilder::new("a")
                .action("build", ActionBuilder::new().wildcard(&["true"]).build())
                .action(
                    "test",
                    ActionBuilder::new().wildcard(&["true"]).needs("b").build(),
                )
                .build(),
        )
        .with_project(
            "b",
            ProjectBuilder::new("b")
                .action(
                    "build",
                    ActionBuilder::new().wildcard(&["true"]).needs("a").build(),
                )
                .action("test", ActionBuilder::new().wildcard(&["true"]).build())
                .build(),
        )
        .build();

    let build = topological_order(&cfg, "build").unwrap();
    assert!(position(&build, "a") < position(&build, "b"));

    let test = topological_order(&cfg, "test").unwrap();
    assert!(position(&test, "b") < position(&test, "a"));
}
