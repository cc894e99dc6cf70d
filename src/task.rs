use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One input row: an opaque task identifier and its estimated effort in hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRow {
    pub identifier: String,
    #[serde(default)]
    pub effort: Option<f64>,
}

impl TaskRow {
    pub fn new(identifier: impl Into<String>, effort: Option<f64>) -> Self {
        Self {
            identifier: identifier.into(),
            effort,
        }
    }

    /// Effort that actually consumes calendar hours. Missing, NaN, infinite
    /// and non-positive estimates all mean "no work".
    pub fn billable_hours(&self) -> Option<f64> {
        billable_hours(self.effort)
    }

    /// Rows with an empty identifier, or the literal "nan" left behind by
    /// spreadsheet exports, are not tasks.
    pub fn is_blank(&self) -> bool {
        let id = self.identifier.trim();
        id.is_empty() || id.eq_ignore_ascii_case("nan")
    }
}

pub(crate) fn billable_hours(effort: Option<f64>) -> Option<f64> {
    effort.filter(|hours| hours.is_finite() && *hours > 0.0)
}

/// A task after scheduling. `position` is the row's index in scheduling
/// (input) order, which presentation sorting does not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub position: usize,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<f64>,
    pub due_date: NaiveDate,
}

impl ScheduledTask {
    pub fn new(
        position: usize,
        identifier: impl Into<String>,
        effort: Option<f64>,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            position,
            identifier: identifier.into(),
            effort,
            due_date,
        }
    }

    pub fn due_on(&self) -> String {
        self.due_date.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billable_hours_filters_non_work() {
        assert_eq!(TaskRow::new("1", Some(2.5)).billable_hours(), Some(2.5));
        assert_eq!(TaskRow::new("1", Some(0.0)).billable_hours(), None);
        assert_eq!(TaskRow::new("1", Some(-1.0)).billable_hours(), None);
        assert_eq!(TaskRow::new("1", Some(f64::NAN)).billable_hours(), None);
        assert_eq!(TaskRow::new("1", Some(f64::INFINITY)).billable_hours(), None);
        assert_eq!(TaskRow::new("1", None).billable_hours(), None);
    }

    #[test]
    fn blank_rows_are_detected() {
        assert!(TaskRow::new("  ", Some(1.0)).is_blank());
        assert!(TaskRow::new("NaN", Some(1.0)).is_blank());
        assert!(!TaskRow::new("1.2", None).is_blank());
    }
}
