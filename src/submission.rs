//! Pushing a computed schedule to a [`TaskSink`].
//!
//! Tasks are sent in reverse presentation order: the task service inserts
//! each new subtask at the top of the parent's list, so the remote list ends
//! up reading "1.1, 1.2, ..., 2.1" top to bottom.

use crate::persistence::FailureLog;
use crate::schedule::Schedule;
use crate::sink::{NewTask, TaskSink};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Success,
    Fail,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Success => "success",
            SubmissionStatus::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    Started {
        total: usize,
    },
    Task {
        completed: usize,
        total: usize,
        percent: u8,
        name: String,
        success: bool,
    },
    Finished {
        status: SubmissionStatus,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedTask {
    pub name: String,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
    #[serde(default)]
    pub skipped: bool,
}

impl FailedTask {
    pub fn log_line(&self) -> String {
        let due = self.due_date.format("%Y-%m-%d");
        match (self.skipped, self.status) {
            (true, _) => format!("{} | {} | Skipped: {}", self.name, due, self.message),
            (false, Some(status)) => format!(
                "{} | {} | Status: {} | Body: {}",
                self.name, due, status, self.message
            ),
            (false, None) => format!("{} | {} | Exception: {}", self.name, due, self.message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub total: usize,
    pub created: usize,
    pub failures: Vec<FailedTask>,
}

impl SubmissionReport {
    pub fn status(&self) -> SubmissionStatus {
        if self.failures.is_empty() {
            SubmissionStatus::Success
        } else {
            SubmissionStatus::Fail
        }
    }

    pub fn failure_log(&self) -> FailureLog {
        let mut log = FailureLog::new();
        for failure in &self.failures {
            log.push(failure.log_line());
        }
        log
    }

    pub fn to_cli_summary(&self) -> String {
        format!(
            "status={}, created={}/{}, failed={}",
            self.status().as_str(),
            self.created,
            self.total,
            self.failures.len()
        )
    }
}

pub struct Submitter<S> {
    sink: S,
    pause: Duration,
}

impl<S: TaskSink> Submitter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            pause: Duration::ZERO,
        }
    }

    /// Wait this long between consecutive create calls.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn submit<F>(
        &self,
        schedule: &Schedule,
        parent_task_id: &str,
        assignee: &str,
        mut on_progress: F,
    ) -> SubmissionReport
    where
        F: FnMut(ProgressEvent),
    {
        let tasks = schedule.sorted_tasks();
        let total = tasks.len();
        let mut report = SubmissionReport {
            total,
            ..SubmissionReport::default()
        };
        on_progress(ProgressEvent::Started { total });
        tracing::info!(total, parent = parent_task_id, "starting task submission");

        for (done, task) in tasks.iter().rev().enumerate() {
            if done > 0 && !self.pause.is_zero() {
                std::thread::sleep(self.pause);
            }
            let name = task.identifier.trim();
            let success = if name.is_empty() {
                report.failures.push(FailedTask {
                    name: String::new(),
                    due_date: task.due_date,
                    status: None,
                    message: "missing task name".into(),
                    skipped: true,
                });
                false
            } else {
                let request = NewTask {
                    parent_task_id: parent_task_id.to_string(),
                    name: name.to_string(),
                    assignee: assignee.to_string(),
                    due_on: task.due_date,
                };
                let outcome = self.sink.create_task(&request);
                if outcome.success {
                    report.created += 1;
                    tracing::info!(task = name, due = %task.due_date, "task created");
                } else {
                    tracing::warn!(
                        task = name,
                        status = ?outcome.status,
                        message = outcome.message.as_deref().unwrap_or(""),
                        "task creation failed"
                    );
                    report.failures.push(FailedTask {
                        name: name.to_string(),
                        due_date: task.due_date,
                        status: outcome.status,
                        message: outcome.message.unwrap_or_default(),
                        skipped: false,
                    });
                }
                outcome.success
            };

            let completed = done + 1;
            on_progress(ProgressEvent::Task {
                completed,
                total,
                percent: percent_complete(completed, total),
                name: name.to_string(),
                success,
            });
        }

        let status = report.status();
        tracing::info!(summary = %report.to_cli_summary(), "submission finished");
        on_progress(ProgressEvent::Finished { status });
        report
    }
}

fn percent_complete(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (completed * 100 / total).min(100) as u8
}

/// Submit without pacing or progress reporting.
pub fn submit_schedule<S: TaskSink>(
    sink: S,
    schedule: &Schedule,
    parent_task_id: &str,
    assignee: &str,
) -> SubmissionReport {
    Submitter::new(sink).submit(schedule, parent_task_id, assignee, |_| {})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_complete_is_integer_and_capped() {
        assert_eq!(percent_complete(1, 3), 33);
        assert_eq!(percent_complete(3, 3), 100);
        assert_eq!(percent_complete(0, 0), 100);
    }

    #[test]
    fn log_lines_have_pipe_separated_fields() {
        let due = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let rejected = FailedTask {
            name: "1.2".into(),
            due_date: due,
            status: Some(400),
            message: "bad assignee".into(),
            skipped: false,
        };
        assert_eq!(
            rejected.log_line(),
            "1.2 | 2024-06-03 | Status: 400 | Body: bad assignee"
        );
        let errored = FailedTask {
            status: None,
            message: "connection refused".into(),
            ..rejected
        };
        assert_eq!(
            errored.log_line(),
            "1.2 | 2024-06-03 | Exception: connection refused"
        );
    }
}
