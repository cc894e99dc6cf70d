use crate::calendar::WorkCalendar;
use crate::error::{ScheduleError, ScheduleResult};
use crate::task::billable_hours;
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// When the daily budget is refilled while the cursor walks the calendar.
///
/// Both rules produce the same dates for a run that starts with a full
/// budget; they only diverge if the cursor ever sits on a non-workday with a
/// partially spent budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityReset {
    /// Refill only when the cursor lands on a permitted workday after the
    /// previous day's budget ran out.
    #[default]
    OnWorkdayArrival,
    /// Refill every time a non-workday is skipped, before the new day is
    /// checked.
    OnEverySkip,
}

impl CapacityReset {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityReset::OnWorkdayArrival => "on_workday_arrival",
            CapacityReset::OnEverySkip => "on_every_skip",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "on_workday_arrival" | "arrival" => Some(CapacityReset::OnWorkdayArrival),
            "on_every_skip" | "every_skip" | "legacy" => Some(CapacityReset::OnEverySkip),
            _ => None,
        }
    }
}

/// Scheduling state: the day being filled and the hours still free on it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cursor {
    date: NaiveDate,
    hours_left: f64,
}

impl Cursor {
    /// Take as much of `remaining` as today allows; returns what is left.
    fn consume(&mut self, remaining: f64) -> f64 {
        if remaining <= self.hours_left {
            self.hours_left -= remaining;
            0.0
        } else {
            let left = remaining - self.hours_left;
            self.hours_left = 0.0;
            left
        }
    }
}

/// Greedy packing of task effort into consecutive workdays.
#[derive(Debug, Clone)]
pub struct DueDateScheduler<'a> {
    calendar: &'a WorkCalendar,
    daily_capacity: f64,
    capacity_reset: CapacityReset,
}

impl<'a> DueDateScheduler<'a> {
    pub fn new(calendar: &'a WorkCalendar, daily_capacity: f64) -> ScheduleResult<Self> {
        if !daily_capacity.is_finite() || daily_capacity <= 0.0 {
            return Err(ScheduleError::invalid_config(format!(
                "daily capacity must be a positive number of hours (got {daily_capacity})"
            )));
        }
        if calendar.working_days().is_empty() {
            return Err(ScheduleError::invalid_config(
                "at least one workday must be selected",
            ));
        }
        Ok(Self {
            calendar,
            daily_capacity,
            capacity_reset: CapacityReset::default(),
        })
    }

    pub fn with_capacity_reset(mut self, rule: CapacityReset) -> Self {
        self.capacity_reset = rule;
        self
    }

    pub fn daily_capacity(&self) -> f64 {
        self.daily_capacity
    }

    pub fn capacity_reset(&self) -> CapacityReset {
        self.capacity_reset
    }

    /// Due date for every effort, in input order. Efforts that carry no work
    /// inherit the cursor's current date.
    pub fn execute<I>(&self, start_date: NaiveDate, efforts: I) -> Vec<NaiveDate>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut cursor = Cursor {
            date: start_date,
            hours_left: self.daily_capacity,
        };

        efforts
            .into_iter()
            .enumerate()
            .map(|(idx, effort)| {
                if let Some(hours) = billable_hours(effort) {
                    self.fill(&mut cursor, hours);
                }
                tracing::debug!(
                    row = idx,
                    due = %cursor.date,
                    hours_left = cursor.hours_left,
                    "scheduled task"
                );
                cursor.date
            })
            .collect()
    }

    fn fill(&self, cursor: &mut Cursor, hours: f64) {
        let mut remaining = hours;
        while remaining > 0.0 {
            if !self.calendar.is_available(cursor.date) {
                tracing::trace!(date = %cursor.date, "skipping non-workday");
                let Some(next) = self.calendar.next_available(cursor.date) else {
                    return self.stop_at_calendar_end(cursor, remaining);
                };
                if self.capacity_reset == CapacityReset::OnEverySkip {
                    cursor.hours_left = self.daily_capacity;
                }
                cursor.date = next;
                continue;
            }
            remaining = cursor.consume(remaining);
            if remaining > 0.0 {
                let Some(next) = self.calendar.next_available(cursor.date) else {
                    return self.stop_at_calendar_end(cursor, remaining);
                };
                cursor.date = next;
                cursor.hours_left = self.daily_capacity;
            }
        }
    }

    /// No workday exists past the cursor: the rest of the effort cannot be
    /// placed, so the cursor stays on its date with an empty budget and every
    /// later task lands there too.
    fn stop_at_calendar_end(&self, cursor: &mut Cursor, remaining: f64) {
        tracing::warn!(
            date = %cursor.date,
            unscheduled_hours = remaining,
            "no workday left in the calendar range"
        );
        cursor.hours_left = 0.0;
    }
}

/// One-shot form of [`DueDateScheduler`]: weekdays only, no holidays, the
/// default capacity-reset rule.
pub fn schedule_due_dates<I>(
    start_date: NaiveDate,
    efforts: I,
    workdays: &[Weekday],
    daily_capacity: f64,
) -> ScheduleResult<Vec<NaiveDate>>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let calendar = WorkCalendar::custom(workdays.iter().copied(), [])?;
    let scheduler = DueDateScheduler::new(&calendar, daily_capacity)?;
    Ok(scheduler.execute(start_date, efforts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn cursor_consume_spills_remainder() {
        let mut cursor = Cursor {
            date: d(2024, 6, 3),
            hours_left: 3.0,
        };
        assert_eq!(cursor.consume(5.0), 2.0);
        assert_eq!(cursor.hours_left, 0.0);

        cursor.hours_left = 3.0;
        assert_eq!(cursor.consume(3.0), 0.0);
        assert_eq!(cursor.hours_left, 0.0);
    }

    #[test]
    fn capacity_reset_parses_aliases() {
        assert_eq!(
            CapacityReset::parse("arrival"),
            Some(CapacityReset::OnWorkdayArrival)
        );
        assert_eq!(
            CapacityReset::parse("every-skip"),
            Some(CapacityReset::OnEverySkip)
        );
        assert_eq!(CapacityReset::parse("sometimes"), None);
    }
}
