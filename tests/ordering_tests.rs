use chrono::NaiveDate;
use due_date_tool::{ScheduledTask, compare_identifiers, sort_for_submission, version_key};
use std::cmp::Ordering;

fn task(position: usize, identifier: &str) -> ScheduledTask {
    ScheduledTask::new(
        position,
        identifier,
        Some(1.0),
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
    )
}

#[test]
fn numeric_segments_compare_by_value() {
    assert_eq!(compare_identifiers("1.2", "1.10"), Ordering::Less);
    assert_eq!(compare_identifiers("2", "10"), Ordering::Less);
    assert_eq!(compare_identifiers("1.10", "2.1"), Ordering::Less);
}

#[test]
fn spaces_and_empty_segments_are_ignored() {
    assert_eq!(compare_identifiers("1. 2", "1.2"), Ordering::Equal);
    assert_eq!(compare_identifiers("1..2.", "1.2"), Ordering::Equal);
    assert_eq!(version_key(" 3 . 14 "), vec!["00003", "00014"]);
}

#[test]
fn parent_sorts_before_children() {
    assert_eq!(compare_identifiers("1", "1.1"), Ordering::Less);
    assert_eq!(compare_identifiers("1.9", "1.9.1"), Ordering::Less);
}

#[test]
fn sort_for_submission_orders_outline() {
    let mut tasks = vec![
        task(0, "2.1"),
        task(1, "1.10"),
        task(2, "1.2"),
        task(3, "1"),
        task(4, "10"),
    ];
    sort_for_submission(&mut tasks);
    let ids: Vec<&str> = tasks.iter().map(|t| t.identifier.as_str()).collect();
    assert_eq!(ids, vec!["1", "1.2", "1.10", "2.1", "10"]);
}

#[test]
fn equal_keys_keep_scheduling_order() {
    let mut tasks = vec![task(0, "1.02"), task(1, "1.2"), task(2, "1. 2")];
    sort_for_submission(&mut tasks);
    let positions: Vec<usize> = tasks.iter().map(|t| t.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}
