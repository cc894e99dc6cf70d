use super::{NewTask, SinkOutcome, TaskSink};
use crate::config::AsanaConfig;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::json;
use std::sync::OnceLock;

/// Creates subtasks through the Asana REST API.
///
/// Uses the blocking client, built on first use; async callers should run
/// it on a blocking thread (`tokio::task::spawn_blocking`).
pub struct AsanaSink {
    client: OnceLock<Client>,
    config: AsanaConfig,
}

impl AsanaSink {
    pub fn new(config: AsanaConfig) -> Self {
        Self {
            client: OnceLock::new(),
            config,
        }
    }

    fn client(&self) -> &Client {
        self.client.get_or_init(Client::new)
    }

    pub fn subtasks_url(&self, parent_task_id: &str) -> String {
        format!(
            "{}/tasks/{}/subtasks",
            self.config.base_url.trim_end_matches('/'),
            parent_task_id.trim()
        )
    }
}

impl TaskSink for AsanaSink {
    fn create_task(&self, task: &NewTask) -> SinkOutcome {
        let payload = json!({
            "data": {
                "name": task.name,
                "assignee": task.assignee,
                "due_on": task.due_on.format("%Y-%m-%d").to_string(),
            }
        });

        let response = self
            .client()
            .post(self.subtasks_url(&task.parent_task_id))
            .bearer_auth(&self.config.token)
            .json(&payload)
            .send();

        match response {
            Ok(response) => {
                let status = response.status();
                let body = response.text().unwrap_or_default();
                tracing::debug!(task = %task.name, status = status.as_u16(), %body, "asana response");
                if status == StatusCode::CREATED {
                    SinkOutcome::created().with_status(status.as_u16())
                } else {
                    SinkOutcome::rejected(status.as_u16(), body)
                }
            }
            Err(err) => {
                tracing::error!(task = %task.name, error = %err, "asana request failed");
                SinkOutcome::errored(err.to_string())
            }
        }
    }
}
