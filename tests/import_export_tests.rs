use chrono::{NaiveDate, Weekday};
use due_date_tool::import::read_task_rows;
use due_date_tool::persistence::failure_log::DEFAULT_FAILURE_LOG;
use due_date_tool::{
    CapacityReset, FailureLog, PersistenceError, Schedule, ScheduleParams, TaskRow,
    load_schedule_from_json, save_schedule_to_csv, save_schedule_to_json,
};
use std::fs;
use tempfile::{NamedTempFile, tempdir};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn build_sample_schedule() -> Schedule {
    let params = ScheduleParams::new(d(2024, 6, 3))
        .with_workdays([
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ])
        .with_work_hours(8.0)
        .with_capacity_reset(CapacityReset::OnEverySkip)
        .with_holiday(d(2024, 6, 5));
    let rows = vec![
        TaskRow::new("1.10", Some(6.0)),
        TaskRow::new("1.2", Some(4.0)),
        TaskRow::new("2", None),
        TaskRow::new("1.1", Some(8.0)),
    ];
    Schedule::build(&rows, &params).unwrap()
}

#[test]
fn json_round_trip_preserves_schedule() {
    let schedule = build_sample_schedule();
    let file = NamedTempFile::new().unwrap();
    save_schedule_to_json(&schedule, file.path()).unwrap();

    let loaded = load_schedule_from_json(file.path()).unwrap();
    assert_eq!(loaded, schedule);
    assert_eq!(loaded.params().capacity_reset, CapacityReset::OnEverySkip);
    assert_eq!(loaded.params().calendar.holidays(), &[d(2024, 6, 5)]);
    // 1.1 spills past the Wednesday holiday
    assert_eq!(loaded.find_task("1.1").unwrap().due_date, d(2024, 6, 6));
}

#[test]
fn json_with_backwards_due_dates_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    let json = r#"{
        "params": {"start_date": "2024-06-03"},
        "tasks": [
            {"position": 0, "identifier": "1", "effort": 4.0, "due_date": "2024-06-05"},
            {"position": 1, "identifier": "2", "effort": 4.0, "due_date": "2024-06-03"}
        ]
    }"#;
    fs::write(file.path(), json).unwrap();
    let err = load_schedule_from_json(file.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
}

#[test]
fn json_without_workdays_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    let json = r#"{
        "params": {"start_date": "2024-06-03", "calendar": {"working_days": []}},
        "tasks": []
    }"#;
    fs::write(file.path(), json).unwrap();
    let err = load_schedule_from_json(file.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
}

#[test]
fn json_with_non_positive_work_hours_is_rejected() {
    for hours in ["0", "-4.5"] {
        let file = NamedTempFile::new().unwrap();
        let json = format!(
            r#"{{"params": {{"start_date": "2024-06-03", "work_hours": {hours}}}, "tasks": []}}"#
        );
        fs::write(file.path(), json).unwrap();
        let err = load_schedule_from_json(file.path()).unwrap_err();
        assert!(
            matches!(err, PersistenceError::InvalidData(_)),
            "work_hours {hours} should be rejected"
        );
    }
}

#[test]
fn csv_export_is_sorted_and_reimportable() {
    let schedule = build_sample_schedule();
    let file = NamedTempFile::new().unwrap();
    save_schedule_to_csv(&schedule, file.path()).unwrap();

    let text = fs::read_to_string(file.path()).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("task number,estimation of hours per task,due date")
    );
    assert_eq!(lines.next(), Some("1.1,8,2024-06-06"));
    assert_eq!(lines.next(), Some("1.2,4,2024-06-04"));
    assert_eq!(lines.next(), Some("1.10,6,2024-06-03"));
    assert_eq!(lines.next(), Some("2,,2024-06-04"));

    let rows = read_task_rows(fs::File::open(file.path()).unwrap()).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[3], TaskRow::new("2", None));
}

#[test]
fn failure_log_written_only_when_non_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DEFAULT_FAILURE_LOG);

    assert!(!FailureLog::new().write_to(&path).unwrap());
    assert!(!path.exists());

    let mut log = FailureLog::new();
    log.push("1.2 | 2024-06-03 | Status: 400 | Body: bad request\n");
    log.push("1.3 | 2024-06-04 | Exception: timed out");
    assert!(log.write_to(&path).unwrap());

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "1.2 | 2024-06-03 | Status: 400 | Body: bad request\n1.3 | 2024-06-04 | Exception: timed out\n"
    );
    assert_eq!(FailureLog::read_from(&path).unwrap(), log);
}
