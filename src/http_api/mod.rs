use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::{ConfigError, RunConfig, ScheduleParams};
use crate::error::ScheduleError;
use crate::import::{ImportError, read_task_rows_from_str};
use crate::persistence::FailureLog;
use crate::persistence::failure_log::DEFAULT_FAILURE_LOG;
use crate::schedule::{Schedule, ScheduleSummary};
use crate::sink::TaskSink;
use crate::submission::{ProgressEvent, SubmissionReport, SubmissionStatus, Submitter};
use crate::task::{ScheduledTask, TaskRow};

pub type SharedSink = Arc<dyn TaskSink + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    sink: SharedSink,
    failure_log: Arc<RwLock<Option<FailureLog>>>,
    log_path: Option<PathBuf>,
    pause: Duration,
}

impl AppState {
    pub fn new(sink: SharedSink) -> Self {
        Self {
            sink,
            failure_log: Arc::new(RwLock::new(None)),
            log_path: None,
            pause: Duration::ZERO,
        }
    }

    /// Also persist each run's failure log to this file.
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn failure_log(&self) -> Option<FailureLog> {
        self.failure_log.read().clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<ConfigError> for ApiError {
    fn from(value: ConfigError) -> Self {
        ApiError::invalid(value.to_string())
    }
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        ApiError::invalid(value.to_string())
    }
}

impl From<ImportError> for ApiError {
    fn from(value: ImportError) -> Self {
        ApiError::invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

fn default_workdays() -> Vec<String> {
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Scheduling inputs. Rows come either as `tasks` or as CSV text in `csv`;
/// when both are present the CSV rows follow the explicit ones.
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub start_date: String,
    #[serde(default = "default_workdays")]
    pub workdays: Vec<String>,
    #[serde(default)]
    pub work_hours: Option<f64>,
    #[serde(default)]
    pub capacity_reset: Option<String>,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    #[serde(default)]
    pub tasks: Vec<TaskRow>,
    #[serde(default)]
    pub csv: Option<String>,
}

impl ScheduleRequest {
    fn into_inputs(self) -> Result<(Vec<TaskRow>, ScheduleParams), ApiError> {
        let mut params = ScheduleParams::from_form(
            &self.start_date,
            &self.workdays,
            self.work_hours,
            self.capacity_reset.as_deref(),
        )?;
        for holiday in self.holidays {
            params = params.with_holiday(holiday);
        }
        let mut rows = self.tasks;
        if let Some(csv) = self.csv.as_deref().filter(|text| !text.trim().is_empty()) {
            rows.extend(read_task_rows_from_str(csv)?);
        }
        Ok((rows, params))
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(flatten)]
    pub schedule: ScheduleRequest,
    pub parent_task_id: String,
    pub assignee: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub summary: ScheduleSummary,
    pub tasks: Vec<ScheduledTask>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: SubmissionStatus,
    pub report: SubmissionReport,
    pub progress: Vec<ProgressEvent>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedule", post(compute_schedule))
        .route("/submit", post(submit_schedule))
        .route("/download-log", get(download_log))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn compute_schedule(
    Json(payload): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let (rows, params) = payload.into_inputs()?;
    let schedule = tokio::task::spawn_blocking(move || Schedule::build(&rows, &params))
        .await
        .map_err(|err| ApiError::internal(format!("scheduling worker failed: {err}")))??;
    Ok(Json(ScheduleResponse {
        summary: schedule.summary(),
        tasks: schedule.sorted_tasks(),
    }))
}

async fn submit_schedule(
    State(state): State<AppState>,
    Json(payload): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let (rows, params) = payload.schedule.into_inputs()?;
    let run = RunConfig::new(params, payload.parent_task_id, payload.assignee)?;

    let sink = state.sink.clone();
    let pause = state.pause;
    let (report, progress) = tokio::task::spawn_blocking(move || {
        let schedule = Schedule::build(&rows, &run.schedule)?;
        let mut progress = Vec::new();
        let report = Submitter::new(sink).with_pause(pause).submit(
            &schedule,
            &run.parent_task_id,
            &run.assignee,
            |event| progress.push(event),
        );
        Ok::<_, ScheduleError>((report, progress))
    })
    .await
    .map_err(|err| ApiError::internal(format!("submission worker failed: {err}")))??;

    let log = report.failure_log();
    if let Some(path) = &state.log_path {
        if let Err(err) = log.write_to(path) {
            tracing::error!(path = %path.display(), error = %err, "failed to write failure log");
        }
    }
    *state.failure_log.write() = if log.is_empty() { None } else { Some(log) };

    Ok(Json(SubmitResponse {
        status: report.status(),
        report,
        progress,
    }))
}

async fn download_log(State(state): State<AppState>) -> Result<Response, ApiError> {
    let log = state
        .failure_log()
        .ok_or_else(|| ApiError::not_found("no failed tasks have been logged"))?;
    let disposition = format!("attachment; filename=\"{DEFAULT_FAILURE_LOG}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        log.to_text(),
    )
        .into_response())
}
