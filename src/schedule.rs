use crate::calculations::DueDateScheduler;
use crate::config::ScheduleParams;
use crate::error::{ScheduleError, ScheduleResult};
use crate::ordering;
use crate::task::{ScheduledTask, TaskRow};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub const TASK_NUMBER_COLUMN: &str = "task number";
pub const HOURS_COLUMN: &str = "hours";
pub const DUE_DATE_COLUMN: &str = "due date";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub task_count: usize,
    pub unestimated_count: usize,
    pub total_hours: f64,
    pub first_due: Option<NaiveDate>,
    pub last_due: Option<NaiveDate>,
}

impl ScheduleSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("hours={}", self.total_hours));
        if self.unestimated_count > 0 {
            parts.push(format!("unestimated={}", self.unestimated_count));
        }
        if let Some(date) = self.first_due {
            parts.push(format!("first_due={date}"));
        }
        if let Some(date) = self.last_due {
            parts.push(format!("finish={date}"));
        }
        parts.join(", ")
    }
}

/// The outcome of one scheduling run: the parameters used and one due date
/// per task, kept in the order rows were scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    params: ScheduleParams,
    tasks: Vec<ScheduledTask>,
}

impl Schedule {
    /// Drop blank rows, then walk the remaining rows in order.
    pub fn build(rows: &[TaskRow], params: &ScheduleParams) -> ScheduleResult<Self> {
        params
            .validate()
            .map_err(|err| ScheduleError::invalid_config(err.to_string()))?;
        let calendar = crate::calendar::WorkCalendar::from_config(&params.calendar)?;
        let scheduler = DueDateScheduler::new(&calendar, params.work_hours)?
            .with_capacity_reset(params.capacity_reset);

        let rows: Vec<&TaskRow> = rows.iter().filter(|row| !row.is_blank()).collect();
        let due_dates = scheduler.execute(params.start_date, rows.iter().map(|row| row.effort));

        let tasks = rows
            .into_iter()
            .zip(due_dates)
            .enumerate()
            .map(|(position, (row, due_date))| {
                ScheduledTask::new(position, row.identifier.trim(), row.effort, due_date)
            })
            .collect::<Vec<_>>();

        tracing::info!(
            tasks = tasks.len(),
            start = %params.start_date,
            work_hours = params.work_hours,
            "schedule computed"
        );
        Ok(Self {
            params: params.clone(),
            tasks,
        })
    }

    pub(crate) fn from_parts(params: ScheduleParams, tasks: Vec<ScheduledTask>) -> Self {
        Self { params, tasks }
    }

    pub fn params(&self) -> &ScheduleParams {
        &self.params
    }

    /// Tasks in scheduling (input) order.
    pub fn tasks(&self) -> &[ScheduledTask] {
        &self.tasks
    }

    /// Tasks in presentation order (natural identifier order).
    pub fn sorted_tasks(&self) -> Vec<ScheduledTask> {
        let mut tasks = self.tasks.clone();
        ordering::sort_for_submission(&mut tasks);
        tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn find_task(&self, identifier: &str) -> Option<&ScheduledTask> {
        self.tasks
            .iter()
            .find(|task| task.identifier == identifier.trim())
    }

    pub fn summary(&self) -> ScheduleSummary {
        let total_hours = self
            .tasks
            .iter()
            .filter_map(|task| crate::task::billable_hours(task.effort))
            .sum();
        let unestimated_count = self
            .tasks
            .iter()
            .filter(|task| crate::task::billable_hours(task.effort).is_none())
            .count();
        ScheduleSummary {
            task_count: self.tasks.len(),
            unestimated_count,
            total_hours,
            first_due: self.tasks.first().map(|task| task.due_date),
            last_due: self.tasks.last().map(|task| task.due_date),
        }
    }

    /// Presentation-ordered table with `task number`, `hours` and `due date`.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let tasks = self.sorted_tasks();
        let names: Vec<&str> = tasks.iter().map(|t| t.identifier.as_str()).collect();
        let hours: Vec<Option<f64>> = tasks.iter().map(|t| t.effort).collect();
        let due: Vec<i32> = tasks.iter().map(|t| date_to_i32(t.due_date)).collect();

        let columns = vec![
            Series::new(PlSmallStr::from_static(TASK_NUMBER_COLUMN), names).into_column(),
            Series::new(PlSmallStr::from_static(HOURS_COLUMN), hours).into_column(),
            Series::new(PlSmallStr::from_static(DUE_DATE_COLUMN), due)
                .cast(&DataType::Date)?
                .into_column(),
        ];
        DataFrame::new(columns)
    }
}

pub(crate) fn date_to_i32(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::default();
    (date - epoch).num_days() as i32
}
