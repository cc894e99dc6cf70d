pub mod due_dates;

pub use due_dates::{CapacityReset, DueDateScheduler, schedule_due_dates};
