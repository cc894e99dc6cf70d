//! Run parameters and service credentials.
//!
//! Nothing here is read from process-wide state implicitly: callers load
//! [`AsanaConfig`] once (usually from the environment) and hand it to the sink.

use crate::calculations::CapacityReset;
use crate::calendar::{WorkCalendarConfig, parse_weekday};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_WORK_HOURS: f64 = 8.5;
pub const DEFAULT_ASANA_BASE_URL: &str = "https://app.asana.com/api/1.0";
pub const ASANA_TOKEN_VAR: &str = "ASANA_PERSONAL_ACCESS_TOKEN";
pub const ASANA_BASE_URL_VAR: &str = "ASANA_BASE_URL";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("start date is required")]
    MissingStartDate,
    #[error("invalid start date '{0}' (expected YYYY-MM-DD)")]
    InvalidStartDate(String),
    #[error("at least one workday must be selected")]
    NoWorkdays,
    #[error("unknown workday '{0}'")]
    UnknownWorkday(String),
    #[error("work hours per day must be a positive number (got {0})")]
    InvalidWorkHours(String),
    #[error("unknown capacity reset rule '{0}'")]
    UnknownCapacityReset(String),
    #[error("parent task id is required")]
    MissingParentTask,
    #[error("assignee email is required")]
    MissingAssignee,
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

/// Everything the scheduler needs for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleParams {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub calendar: WorkCalendarConfig,
    #[serde(default = "default_work_hours")]
    pub work_hours: f64,
    #[serde(default)]
    pub capacity_reset: CapacityReset,
}

fn default_work_hours() -> f64 {
    DEFAULT_WORK_HOURS
}

impl ScheduleParams {
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            calendar: WorkCalendarConfig::default(),
            work_hours: DEFAULT_WORK_HOURS,
            capacity_reset: CapacityReset::default(),
        }
    }

    pub fn with_workdays<I>(mut self, workdays: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        self.calendar = WorkCalendarConfig::new(workdays, self.calendar.holidays().to_vec());
        self
    }

    pub fn with_work_hours(mut self, hours: f64) -> Self {
        self.work_hours = hours;
        self
    }

    pub fn with_capacity_reset(mut self, rule: CapacityReset) -> Self {
        self.capacity_reset = rule;
        self
    }

    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.calendar.add_holiday(date);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.calendar.working_days().is_empty() {
            return Err(ConfigError::NoWorkdays);
        }
        if !self.work_hours.is_finite() || self.work_hours <= 0.0 {
            return Err(ConfigError::InvalidWorkHours(self.work_hours.to_string()));
        }
        Ok(())
    }

    /// Build params from the loosely typed values a form or REPL collects.
    pub fn from_form(
        start_date: &str,
        workdays: &[String],
        work_hours: Option<f64>,
        capacity_reset: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let start_date = parse_start_date(start_date)?;
        let workdays = parse_workdays(workdays)?;
        let capacity_reset = match capacity_reset {
            Some(raw) if !raw.trim().is_empty() => CapacityReset::parse(raw)
                .ok_or_else(|| ConfigError::UnknownCapacityReset(raw.to_string()))?,
            _ => CapacityReset::default(),
        };
        let params = Self::new(start_date)
            .with_workdays(workdays)
            .with_work_hours(work_hours.unwrap_or(DEFAULT_WORK_HOURS))
            .with_capacity_reset(capacity_reset);
        params.validate()?;
        Ok(params)
    }
}

pub fn parse_start_date(raw: &str) -> Result<NaiveDate, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingStartDate);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| ConfigError::InvalidStartDate(trimmed.to_string()))
}

pub fn parse_workdays(names: &[String]) -> Result<Vec<Weekday>, ConfigError> {
    let days = names
        .iter()
        .filter(|name| !name.trim().is_empty())
        .map(|name| parse_weekday(name).ok_or_else(|| ConfigError::UnknownWorkday(name.clone())))
        .collect::<Result<Vec<_>, _>>()?;
    if days.is_empty() {
        return Err(ConfigError::NoWorkdays);
    }
    Ok(days)
}

/// Parameters for one submission to the task service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub schedule: ScheduleParams,
    pub parent_task_id: String,
    pub assignee: String,
}

impl RunConfig {
    pub fn new(
        schedule: ScheduleParams,
        parent_task_id: impl Into<String>,
        assignee: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            schedule,
            parent_task_id: parent_task_id.into().trim().to_string(),
            assignee: assignee.into().trim().to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.schedule.validate()?;
        if self.parent_task_id.trim().is_empty() {
            return Err(ConfigError::MissingParentTask);
        }
        if self.assignee.trim().is_empty() {
            return Err(ConfigError::MissingAssignee);
        }
        Ok(())
    }
}

/// Credentials and endpoint for the Asana REST API.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AsanaConfig {
    pub token: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_ASANA_BASE_URL.to_string()
}

impl std::fmt::Debug for AsanaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsanaConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AsanaConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: default_base_url(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Load `.env` if present, then read the token and optional base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let token = std::env::var(ASANA_TOKEN_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingEnv(ASANA_TOKEN_VAR))?;
        let config = Self::new(token.trim());
        Ok(match std::env::var(ASANA_BASE_URL_VAR) {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(url.trim()),
            _ => config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_token() {
        let config = AsanaConfig::new("secret-token");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("app.asana.com"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = AsanaConfig::new("t").with_base_url("http://localhost:9000/api/");
        assert_eq!(config.base_url, "http://localhost:9000/api");
    }
}
