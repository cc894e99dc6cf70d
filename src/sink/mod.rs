//! Destinations for scheduled tasks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod asana;
pub mod memory;

pub use asana::AsanaSink;
pub use memory::RecordingSink;

/// A task to create remotely as a subtask of `parent_task_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub parent_task_id: String,
    pub name: String,
    pub assignee: String,
    pub due_on: NaiveDate,
}

/// Result of a single create call. Failures are values: the caller records
/// them and moves on to the next task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SinkOutcome {
    pub fn created() -> Self {
        Self {
            success: true,
            status: None,
            message: None,
        }
    }

    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        Self {
            success: false,
            status: Some(status),
            message: Some(body.into()),
        }
    }

    /// The request never got a status back (connection refused, timeout...).
    pub fn errored(message: impl Into<String>) -> Self {
        Self {
            success: false,
            status: None,
            message: Some(message.into()),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

pub trait TaskSink {
    fn create_task(&self, task: &NewTask) -> SinkOutcome;
}

impl<T: TaskSink + ?Sized> TaskSink for &T {
    fn create_task(&self, task: &NewTask) -> SinkOutcome {
        (**self).create_task(task)
    }
}

impl<T: TaskSink + ?Sized> TaskSink for std::sync::Arc<T> {
    fn create_task(&self, task: &NewTask) -> SinkOutcome {
        (**self).create_task(task)
    }
}
