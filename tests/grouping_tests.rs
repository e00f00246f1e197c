// Grouping and aggregate status

mod common;

use common::{PROJECT_LABEL, container};
use dockboard::grouping::GroupingRule;
use dockboard::models::GroupStatus;

fn rule() -> GroupingRule {
    GroupingRule::new(PROJECT_LABEL, "ungrouped")
}

#[test]
fn every_container_lands_in_exactly_one_group() {
    let input = vec![
        container("a", Some("web"), "running"),
        container("b", Some("db"), "exited"),
        container("c", None, "running"),
        container("d", Some("web"), "exited"),
        container("e", Some(""), "created"),
    ];
    let groups = rule().group(input.clone());

    let total: usize = groups.values().map(|g| g.containers.len()).sum();
    assert_eq!(total, input.len());
    assert!(groups.values().all(|g| g.total > 0));

    for c in &input {
        let homes: Vec<&String> = groups
            .iter()
            .filter(|(_, g)| g.containers.iter().any(|m| m.id == c.id))
            .map(|(k, _)| k)
            .collect();
        assert_eq!(homes.len(), 1, "container {} in {:?}", c.id, homes);
        assert_eq!(homes[0], rule().key_for(c));
    }

    let mut keys: Vec<&str> = groups.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["db", "ungrouped", "web"]);
}

#[test]
fn member_order_follows_input_order() {
    let groups = rule().group(vec![
        container("z", Some("web"), "running"),
        container("a", Some("web"), "running"),
        container("m", Some("web"), "exited"),
    ]);
    let ids: Vec<&str> = groups["web"]
        .containers
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(ids, vec!["z", "a", "m"]);
}

#[test]
fn status_reflects_running_members() {
    let groups = rule().group(vec![
        container("a1", Some("all-up"), "running"),
        container("a2", Some("all-up"), "running"),
        container("p1", Some("mixed"), "running"),
        container("p2", Some("mixed"), "exited"),
        container("s1", Some("down"), "exited"),
        container("s2", Some("down"), "paused"),
        container("solo", Some("single"), "running"),
    ]);
    assert_eq!(groups["all-up"].status, GroupStatus::Running);
    assert_eq!(groups["mixed"].status, GroupStatus::Partial);
    assert_eq!(groups["mixed"].running_count, 1);
    assert_eq!(groups["mixed"].total, 2);
    assert_eq!(groups["down"].status, GroupStatus::Stopped);
    assert_eq!(groups["single"].status, GroupStatus::Running);
}

#[test]
fn status_invariant_holds_for_every_group() {
    let states = ["running", "exited", "created", "paused", "restarting", "dead"];
    let mut input = Vec::new();
    for (i, state) in states.iter().cycle().take(30).enumerate() {
        let project = format!("p{}", i % 7);
        input.push(container(&format!("c{}", i), Some(&project), state));
    }
    for group in rule().group(input).values() {
        let all = group.containers.iter().all(|c| c.state.is_running());
        let none = group.containers.iter().all(|c| !c.state.is_running());
        let expected = if all {
            GroupStatus::Running
        } else if none {
            GroupStatus::Stopped
        } else {
            GroupStatus::Partial
        };
        assert_eq!(group.status, expected);
    }
}

#[test]
fn label_comparison_is_exact() {
    let groups = rule().group(vec![
        container("a", Some("Web"), "running"),
        container("b", Some("web"), "running"),
        container("c", Some("web "), "running"),
    ]);
    assert_eq!(groups.len(), 3);
}

#[test]
fn state_match_is_exact() {
    let groups = rule().group(vec![container("a", Some("web"), "Running")]);
    assert_eq!(groups["web"].status, GroupStatus::Stopped);
}

#[test]
fn grouping_twice_gives_same_statuses() {
    let input = vec![
        container("a", Some("web"), "running"),
        container("b", Some("web"), "exited"),
        container("c", None, "running"),
    ];
    let first: Vec<(String, GroupStatus)> = rule()
        .group(input.clone())
        .into_iter()
        .map(|(k, g)| (k, g.status))
        .collect();
    let second: Vec<(String, GroupStatus)> = rule()
        .group(input)
        .into_iter()
        .map(|(k, g)| (k, g.status))
        .collect();
    assert_eq!(first, second);
}

#[test]
fn custom_label_and_fallback() {
    let rule = GroupingRule::new("team", "misc");
    let mut c = container("a", Some("web"), "running");
    c.labels.insert("team".into(), "infra".into());
    let groups = rule.group(vec![c, container("b", Some("web"), "running")]);
    assert!(groups.contains_key("infra"));
    assert!(groups.contains_key("misc"));
    assert!(!groups.contains_key("web"));
}
