use crate::error::{ScheduleError, ScheduleResult};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Predicate over calendar dates: a date is a workday when its weekday is
/// permitted and it is not listed as a holiday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCalendar {
    holidays: HashSet<NaiveDate>,
    non_working_days: HashSet<Weekday>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCalendarConfig {
    working_days: Vec<Weekday>,
    #[serde(default)]
    holidays: Vec<NaiveDate>,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            holidays: HashSet::new(),
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
        }
    }
}

impl WorkCalendar {
    pub const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn custom<I, J>(working_days: I, holidays: J) -> ScheduleResult<Self>
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let config = WorkCalendarConfig::new(working_days, holidays);
        Self::from_config(&config)
    }

    /// Build a calendar from its serialisable form. An empty working-day set
    /// is rejected since no date could ever be scheduled.
    pub fn from_config(config: &WorkCalendarConfig) -> ScheduleResult<Self> {
        let working_set: HashSet<Weekday> = config.working_days.iter().copied().collect();
        if working_set.is_empty() {
            return Err(ScheduleError::invalid_config(
                "at least one workday must be selected",
            ));
        }
        let non_working_days = Self::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !working_set.contains(day))
            .collect();

        Ok(Self {
            holidays: config.holidays.iter().copied().collect(),
            non_working_days,
        })
    }

    pub fn to_config(&self) -> WorkCalendarConfig {
        WorkCalendarConfig::from(self)
    }

    /// Add a single holiday
    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    /// Replace the permitted weekdays (e.g. Sun-Thu weeks).
    pub fn set_working_days(&mut self, days: &[Weekday]) -> ScheduleResult<()> {
        if days.is_empty() {
            return Err(ScheduleError::invalid_config(
                "at least one workday must be selected",
            ));
        }
        self.non_working_days = Self::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !days.contains(day))
            .collect();
        Ok(())
    }

    pub fn working_days(&self) -> Vec<Weekday> {
        Self::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !self.non_working_days.contains(day))
            .collect()
    }

    /// Check if a date is a permitted workday
    pub fn is_available(&self, date: NaiveDate) -> bool {
        !self.holidays.contains(&date) && !self.non_working_days.contains(&date.weekday())
    }

    /// Find the next workday strictly after `from`, or `None` when the walk
    /// runs off the end of the representable date range.
    pub fn next_available(&self, from: NaiveDate) -> Option<NaiveDate> {
        let mut current = from.succ_opt()?;
        while !self.is_available(current) {
            current = current.succ_opt()?;
        }
        Some(current)
    }

    /// Get all workdays in a date range (inclusive)
    pub fn available_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| self.is_available(*day))
            .collect()
    }

    /// Count workdays in a date range (inclusive)
    pub fn count_available_days(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        self.available_days_in_range(start, end).len() as i64
    }
}

impl WorkCalendarConfig {
    pub fn new<I, J>(working_days: I, holidays: J) -> Self
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let mut working: Vec<Weekday> = working_days.into_iter().collect();
        working.sort_by_key(|wd| wd.num_days_from_monday());
        working.dedup();

        let mut holidays: Vec<NaiveDate> = holidays.into_iter().collect();
        holidays.sort();
        holidays.dedup();

        Self {
            working_days: working,
            holidays,
        }
    }

    pub fn working_days(&self) -> &[Weekday] {
        &self.working_days
    }

    pub fn holidays(&self) -> &[NaiveDate] {
        &self.holidays
    }

    pub fn add_holiday(&mut self, date: NaiveDate) {
        if let Err(idx) = self.holidays.binary_search(&date) {
            self.holidays.insert(idx, date);
        }
    }
}

impl Default for WorkCalendarConfig {
    fn default() -> Self {
        WorkCalendarConfig::from(&WorkCalendar::default())
    }
}

impl From<&WorkCalendar> for WorkCalendarConfig {
    fn from(calendar: &WorkCalendar) -> Self {
        let mut holidays: Vec<NaiveDate> = calendar.holidays.iter().copied().collect();
        holidays.sort();

        Self {
            working_days: calendar.working_days(),
            holidays,
        }
    }
}

/// Parse a weekday from an English name ("Monday", "mon") or a digit where
/// 0 is Monday and 6 is Sunday.
pub fn parse_weekday(input: &str) -> Option<Weekday> {
    let trimmed = input.trim();
    if let Ok(index) = trimmed.parse::<u8>() {
        return WorkCalendar::ALL_WEEKDAYS.get(usize::from(index)).copied();
    }
    trimmed.parse::<Weekday>().ok()
}

/// Parse a comma or whitespace separated weekday list, returning the first
/// token that is not a weekday as the error.
pub fn parse_weekday_list(input: &str) -> Result<Vec<Weekday>, String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.trim().is_empty())
        .map(|part| parse_weekday(part).ok_or_else(|| part.trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_weekday_accepts_names_and_indices() {
        assert_eq!(parse_weekday("Monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday(" sat "), Some(Weekday::Sat));
        assert_eq!(parse_weekday("0"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("6"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("7"), None);
        assert_eq!(parse_weekday("someday"), None);
    }

    #[test]
    fn parse_weekday_list_reports_bad_token() {
        assert_eq!(
            parse_weekday_list("Mon, Tue Wed"),
            Ok(vec![Weekday::Mon, Weekday::Tue, Weekday::Wed])
        );
        assert_eq!(parse_weekday_list("Mon,Funday"), Err("Funday".to_string()));
    }
}
