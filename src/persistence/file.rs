use super::{PersistenceError, PersistenceResult};
use crate::config::ScheduleParams;
use crate::schedule::Schedule;
use crate::task::ScheduledTask;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct ScheduleSnapshot {
    params: ScheduleParams,
    tasks: Vec<ScheduledTask>,
}

impl ScheduleSnapshot {
    fn from_schedule(schedule: &Schedule) -> Self {
        Self {
            params: schedule.params().clone(),
            tasks: schedule.tasks().to_vec(),
        }
    }

    fn into_schedule(mut self) -> PersistenceResult<Schedule> {
        self.params
            .validate()
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
        self.tasks.sort_by_key(|task| task.position);
        validate_due_dates(&self.tasks)?;
        Ok(Schedule::from_parts(self.params, self.tasks))
    }
}

/// Due dates never move backwards in scheduling order.
fn validate_due_dates(tasks: &[ScheduledTask]) -> PersistenceResult<()> {
    for pair in tasks.windows(2) {
        if pair[1].due_date < pair[0].due_date {
            return Err(PersistenceError::InvalidData(format!(
                "task {} is due {} before preceding task {} ({})",
                pair[1].identifier, pair[1].due_date, pair[0].identifier, pair[0].due_date
            )));
        }
    }
    Ok(())
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> PersistenceResult<()> {
    let snapshot = ScheduleSnapshot::from_schedule(schedule);
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(path)?;
    let snapshot: ScheduleSnapshot = serde_json::from_reader(file)?;
    snapshot.into_schedule()
}

#[derive(Serialize)]
struct ScheduledTaskCsvRecord<'a> {
    #[serde(rename = "task number")]
    task_number: &'a str,
    #[serde(rename = "estimation of hours per task")]
    hours: String,
    #[serde(rename = "due date")]
    due_date: String,
}

impl<'a> From<&'a ScheduledTask> for ScheduledTaskCsvRecord<'a> {
    fn from(task: &'a ScheduledTask) -> Self {
        Self {
            task_number: &task.identifier,
            hours: task.effort.map(|h| h.to_string()).unwrap_or_default(),
            due_date: format_date(task.due_date),
        }
    }
}

/// Write the schedule in presentation order. The header reuses the import
/// column names so the file can be fed back in as task rows.
pub fn save_schedule_to_csv<P: AsRef<Path>>(schedule: &Schedule, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for task in schedule.sorted_tasks().iter() {
        writer.serialize(ScheduledTaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
