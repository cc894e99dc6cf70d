pub mod calculations;
pub mod calendar;
pub mod config;
pub mod error;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod import;
pub mod ordering;
pub mod persistence;
pub mod schedule;
pub mod sink;
pub mod submission;
pub mod task;
pub mod telemetry;

pub use calculations::{CapacityReset, DueDateScheduler, schedule_due_dates};
pub use calendar::{WorkCalendar, WorkCalendarConfig};
pub use config::{AsanaConfig, ConfigError, RunConfig, ScheduleParams};
pub use error::{ScheduleError, ScheduleResult};
pub use import::{ImportError, load_task_rows_from_csv, read_task_rows};
pub use ordering::{compare_identifiers, sort_for_submission, version_key};
pub use persistence::{
    FailureLog, PersistenceError, load_schedule_from_json, save_schedule_to_csv,
    save_schedule_to_json,
};
pub use schedule::{Schedule, ScheduleSummary};
pub use sink::{AsanaSink, NewTask, RecordingSink, SinkOutcome, TaskSink};
pub use submission::{
    FailedTask, ProgressEvent, SubmissionReport, SubmissionStatus, Submitter, submit_schedule,
};
pub use task::{ScheduledTask, TaskRow};
