use super::{NewTask, SinkOutcome, TaskSink};
use parking_lot::Mutex;
use std::collections::HashSet;

/// Keeps every task it is given. Used for dry runs and tests; names added
/// with [`RecordingSink::failing_on`] are rejected with HTTP 400.
#[derive(Debug, Default)]
pub struct RecordingSink {
    created: Mutex<Vec<NewTask>>,
    failing: HashSet<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing.extend(names.into_iter().map(Into::into));
        self
    }

    /// Tasks accepted so far, in call order.
    pub fn created(&self) -> Vec<NewTask> {
        self.created.lock().clone()
    }
}

impl TaskSink for RecordingSink {
    fn create_task(&self, task: &NewTask) -> SinkOutcome {
        if self.failing.contains(&task.name) {
            return SinkOutcome::rejected(400, format!("rejected task {}", task.name));
        }
        self.created.lock().push(task.clone());
        SinkOutcome::created().with_status(201)
    }
}
