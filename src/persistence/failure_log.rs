use super::PersistenceResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_FAILURE_LOG: &str = "failed_tasks_log.txt";

/// Plain-text record of tasks the remote service did not accept, one line
/// per task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureLog {
    entries: Vec<String>,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.entries.push(line.trim_end_matches('\n').to_string());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|line| format!("{line}\n"))
            .collect()
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            entries: text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(ToOwned::to_owned)
                .collect(),
        }
    }

    /// Writes the log only when it has entries. Returns whether a file was
    /// written.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> PersistenceResult<bool> {
        if self.is_empty() {
            return Ok(false);
        }
        fs::write(path, self.to_text())?;
        Ok(true)
    }

    pub fn read_from<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_text(&text))
    }
}
