use chrono::{Datelike, NaiveDate, Weekday};
use due_date_tool::calendar::{WorkCalendar, WorkCalendarConfig};
use due_date_tool::ScheduleError;

#[test]
fn default_calendar_weekends_unavailable() {
    let cal = WorkCalendar::default();
    // 2025-01-04 is a Saturday, 2025-01-05 is a Sunday
    let sat = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
    let sun = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
    assert!(!cal.is_available(sat));
    assert!(!cal.is_available(sun));
}

#[test]
fn next_available_skips_weekend() {
    let cal = WorkCalendar::default();
    let fri = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
    let next = cal.next_available(fri).unwrap();
    assert_eq!(next.weekday(), Weekday::Mon);
    assert_eq!(next, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
}

#[test]
fn next_available_is_strictly_after_start() {
    let cal = WorkCalendar::default();
    let mon = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    assert_eq!(cal.next_available(mon), mon.succ_opt());
}

#[test]
fn next_available_stops_at_end_of_date_range() {
    let cal = WorkCalendar::custom(WorkCalendar::ALL_WEEKDAYS, []).unwrap();
    assert_eq!(cal.next_available(NaiveDate::MAX), None);
    let before_max = NaiveDate::MAX.pred_opt().unwrap();
    assert_eq!(cal.next_available(before_max), Some(NaiveDate::MAX));

    // The next matching weekday would fall a week past MAX.
    let only = NaiveDate::MAX.pred_opt().unwrap().pred_opt().unwrap();
    let narrow = WorkCalendar::custom([only.weekday()], []).unwrap();
    assert_eq!(narrow.next_available(only), None);
}

#[test]
fn holidays_are_unavailable() {
    let mut cal = WorkCalendar::default();
    let new_year = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    assert!(cal.is_available(new_year));
    cal.add_holiday(new_year);
    assert!(!cal.is_available(new_year));
    let dec31 = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    assert_eq!(cal.next_available(dec31), NaiveDate::from_ymd_opt(2025, 1, 2));
}

#[test]
fn available_days_in_range_and_count_match() {
    let cal = WorkCalendar::default();
    let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(); // Mon
    let end = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(); // Sun
    let days = cal.available_days_in_range(start, end);
    let count = cal.count_available_days(start, end);
    assert_eq!(days.len() as i64, count);
    assert_eq!(count, 5);
    assert_eq!(days.first().copied().unwrap(), start);
    assert_eq!(days.last().copied().unwrap().weekday(), Weekday::Fri);
}

#[test]
fn set_working_days_sunday_to_thursday() {
    let mut cal = WorkCalendar::default();
    cal.set_working_days(&[
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
    ])
    .unwrap();
    // 2025-01-05 is a Sunday, 2025-01-03 a Friday
    assert!(cal.is_available(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()));
    assert!(!cal.is_available(NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()));
    assert_eq!(
        cal.working_days(),
        vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Sun
        ]
    );
}

#[test]
fn empty_working_days_are_rejected() {
    let mut cal = WorkCalendar::default();
    assert!(matches!(
        cal.set_working_days(&[]),
        Err(ScheduleError::InvalidConfig(_))
    ));
    assert!(matches!(
        WorkCalendar::custom([], []),
        Err(ScheduleError::InvalidConfig(_))
    ));
}

#[test]
fn config_round_trip_preserves_days_and_holidays() {
    let holiday = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
    let cal = WorkCalendar::custom([Weekday::Fri, Weekday::Mon, Weekday::Mon], [holiday]).unwrap();
    let config = cal.to_config();
    assert_eq!(config.working_days(), &[Weekday::Mon, Weekday::Fri]);
    assert_eq!(config.holidays(), &[holiday]);

    let json = serde_json::to_string(&config).unwrap();
    let restored: WorkCalendarConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(WorkCalendar::from_config(&restored).unwrap(), cal);
}

#[test]
fn config_holidays_field_is_optional() {
    let config: WorkCalendarConfig =
        serde_json::from_str(r#"{"working_days":["Mon","Tue"]}"#).unwrap();
    assert!(config.holidays().is_empty());
    assert_eq!(config.working_days(), &[Weekday::Mon, Weekday::Tue]);
}
