use chrono::{Duration, NaiveDate, Weekday};
use due_date_tool::calendar::parse_weekday_list;
use due_date_tool::config::{DEFAULT_WORK_HOURS, parse_start_date};
use due_date_tool::{
    AsanaConfig, AsanaSink, CapacityReset, ProgressEvent, RecordingSink, RunConfig, Schedule,
    ScheduleParams, SubmissionReport, Submitter, TaskRow, TaskSink, load_task_rows_from_csv,
    save_schedule_to_csv, save_schedule_to_json, telemetry,
};
use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, Write};

fn cell_text(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Float64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::Date(days) => (NaiveDate::default() + Duration::days(i64::from(*days)))
            .format("%Y-%m-%d")
            .to_string(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
            .collect::<Vec<_>>();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, s) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(s.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (i, value) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(widths[i].saturating_sub(value.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  load <csv_path>                    Load task rows (task number, estimation of hours per task)\n  add <task_number> [hours]          Append a task row\n  rows                               List loaded task rows\n  clear                              Remove all task rows\n  start <YYYY-MM-DD>                 Set the start date\n  workdays <Mon,Tue,...>             Set permitted workdays (names or 0-6, 0 = Monday)\n  hours <float>                      Set work hours per day\n  reset <arrival|every-skip>         Set the capacity reset rule\n  holiday <YYYY-MM-DD>               Exclude a date from scheduling\n  parent <task_id>                   Set the parent task id for submission\n  assignee <email>                   Set the assignee for submission\n  config                             Show current settings\n  show                               Compute and show the schedule\n  save <json|csv> <path>             Compute and write the schedule to disk\n  submit [dry]                       Compute and create subtasks (dry: no remote calls)\n  log <path>                         Write the last run's failure log\n  quit|exit                          Exit"
    );
}

struct Session {
    rows: Vec<TaskRow>,
    start_date: Option<NaiveDate>,
    workdays: Vec<Weekday>,
    holidays: Vec<NaiveDate>,
    work_hours: f64,
    capacity_reset: CapacityReset,
    parent_task_id: Option<String>,
    assignee: Option<String>,
    last_report: Option<SubmissionReport>,
}

impl Session {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            start_date: None,
            workdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            holidays: Vec::new(),
            work_hours: DEFAULT_WORK_HOURS,
            capacity_reset: CapacityReset::default(),
            parent_task_id: None,
            assignee: None,
            last_report: None,
        }
    }

    fn params(&self) -> Result<ScheduleParams, String> {
        let start = self
            .start_date
            .ok_or_else(|| "Start date is required (start <YYYY-MM-DD>).".to_string())?;
        let mut params = ScheduleParams::new(start)
            .with_workdays(self.workdays.iter().copied())
            .with_work_hours(self.work_hours)
            .with_capacity_reset(self.capacity_reset);
        for holiday in &self.holidays {
            params = params.with_holiday(*holiday);
        }
        params.validate().map_err(|e| e.to_string())?;
        Ok(params)
    }

    fn schedule(&self) -> Result<Schedule, String> {
        let params = self.params()?;
        Schedule::build(&self.rows, &params).map_err(|e| e.to_string())
    }

    fn run_config(&self) -> Result<RunConfig, String> {
        RunConfig::new(
            self.params()?,
            self.parent_task_id.clone().unwrap_or_default(),
            self.assignee.clone().unwrap_or_default(),
        )
        .map_err(|e| e.to_string())
    }

    fn print_config(&self) {
        let start = self
            .start_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let workdays = self
            .workdays
            .iter()
            .map(|wd| wd.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let holidays = self
            .holidays
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("Start date         : {}", start);
        println!("Workdays           : {}", workdays);
        println!("Holidays           : {}", holidays);
        println!("Work hours per day : {}", self.work_hours);
        println!("Capacity reset     : {}", self.capacity_reset.as_str());
        println!(
            "Parent task id     : {}",
            self.parent_task_id.as_deref().unwrap_or("-")
        );
        println!(
            "Assignee           : {}",
            self.assignee.as_deref().unwrap_or("-")
        );
        println!("Task rows          : {}", self.rows.len());
    }
}

fn print_schedule(schedule: &Schedule) {
    match schedule.to_dataframe() {
        Ok(df) => println!(
            "Schedule ({})\n{}",
            schedule.summary().to_cli_summary(),
            render_df_as_text_table(&df)
        ),
        Err(e) => println!("Error rendering schedule: {}", e),
    }
}

fn run_submission<S: TaskSink>(sink: S, schedule: &Schedule, run: &RunConfig) -> SubmissionReport {
    Submitter::new(sink)
        .with_pause(std::time::Duration::from_millis(50))
        .submit(
            schedule,
            &run.parent_task_id,
            &run.assignee,
            |event| match event {
                ProgressEvent::Started { total } => println!("Submitting {} tasks...", total),
                ProgressEvent::Task {
                    percent,
                    name,
                    success,
                    ..
                } => {
                    let mark = if success { "ok" } else { "FAILED" };
                    println!("PROGRESS:{}% {} {}", percent, name, mark);
                }
                ProgressEvent::Finished { status } => println!("STATUS:{}", status.as_str()),
            },
        )
}

fn main() {
    telemetry::init_tracing();
    let mut session = Session::new();

    println!("Due Date Tool (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "load" => match parts.next() {
                Some(path) => match load_task_rows_from_csv(path) {
                    Ok(rows) => {
                        println!("Loaded {} task rows from {}", rows.len(), path);
                        session.rows = rows;
                    }
                    Err(e) => println!("Error reading {}: {}", path, e),
                },
                None => println!("Usage: load <csv_path>"),
            },
            "add" => {
                let id = parts.next();
                let hours = parts.next();
                match id {
                    Some(id) => {
                        let effort = match hours.map(str::parse::<f64>) {
                            None => None,
                            Some(Ok(v)) => Some(v),
                            Some(Err(_)) => {
                                println!("Invalid hours");
                                continue;
                            }
                        };
                        session.rows.push(TaskRow::new(id, effort));
                        println!("Added task {}.", id);
                    }
                    None => println!("Usage: add <task_number> [hours]"),
                }
            }
            "rows" => {
                for row in &session.rows {
                    let hours = row.effort.map(|h| h.to_string()).unwrap_or_default();
                    println!("  {:<12} {}", row.identifier, hours);
                }
                println!("{} rows", session.rows.len());
            }
            "clear" => {
                session.rows.clear();
                println!("Task rows cleared.");
            }
            "start" => match parts.next().map(parse_start_date) {
                Some(Ok(date)) => {
                    session.start_date = Some(date);
                    println!("Start date set to {}.", date);
                }
                Some(Err(e)) => println!("Error: {}", e),
                None => println!("Usage: start <YYYY-MM-DD>"),
            },
            "workdays" => {
                let rest = parts.collect::<Vec<_>>().join(" ");
                match parse_weekday_list(&rest) {
                    Ok(days) if !days.is_empty() => {
                        session.workdays = days;
                        println!("Workdays updated.");
                    }
                    Ok(_) => println!("Error: at least one workday must be selected"),
                    Err(token) => println!("Error: unknown workday '{}'", token),
                }
            }
            "hours" => match parts.next().map(str::parse::<f64>) {
                Some(Ok(v)) if v.is_finite() && v > 0.0 => {
                    session.work_hours = v;
                    println!("Work hours per day set to {}.", v);
                }
                Some(_) => println!("Invalid hours (must be a positive number)"),
                None => println!("Usage: hours <float>"),
            },
            "reset" => match parts.next().map(CapacityReset::parse) {
                Some(Some(rule)) => {
                    session.capacity_reset = rule;
                    println!("Capacity reset rule set to {}.", rule.as_str());
                }
                Some(None) => println!("Unknown rule (arrival|every-skip)"),
                None => println!("Usage: reset <arrival|every-skip>"),
            },
            "holiday" => match parts.next().map(parse_start_date) {
                Some(Ok(date)) => {
                    session.holidays.push(date);
                    println!("Holiday {} added.", date);
                }
                Some(Err(_)) => println!("Invalid date (YYYY-MM-DD)"),
                None => println!("Usage: holiday <YYYY-MM-DD>"),
            },
            "parent" => match parts.next() {
                Some(id) => {
                    session.parent_task_id = Some(id.to_string());
                    println!("Parent task id set.");
                }
                None => println!("Usage: parent <task_id>"),
            },
            "assignee" => match parts.next() {
                Some(email) => {
                    session.assignee = Some(email.to_string());
                    println!("Assignee set.");
                }
                None => println!("Usage: assignee <email>"),
            },
            "config" => session.print_config(),
            "show" | "compute" => match session.schedule() {
                Ok(schedule) => print_schedule(&schedule),
                Err(e) => println!("Error: {}", e),
            },
            "save" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some(fmt), Some(path)) => {
                        let schedule = match session.schedule() {
                            Ok(s) => s,
                            Err(e) => {
                                println!("Error: {}", e);
                                continue;
                            }
                        };
                        let result = match fmt {
                            "json" => save_schedule_to_json(&schedule, path),
                            "csv" => save_schedule_to_csv(&schedule, path),
                            _ => {
                                println!("Unknown format '{}'. Use json or csv.", fmt);
                                continue;
                            }
                        };
                        match result {
                            Ok(_) => println!("Schedule saved to {}", path),
                            Err(e) => println!("Error saving schedule: {}", e),
                        }
                    }
                    _ => println!("Usage: save <json|csv> <path>"),
                }
            }
            "submit" => {
                let dry_run = matches!(parts.next(), Some("dry"));
                let run = match session.run_config() {
                    Ok(run) => run,
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                };
                let schedule = match Schedule::build(&session.rows, &run.schedule) {
                    Ok(s) => s,
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                };
                let report = if dry_run {
                    run_submission(RecordingSink::new(), &schedule, &run)
                } else {
                    match AsanaConfig::from_env() {
                        Ok(config) => run_submission(AsanaSink::new(config), &schedule, &run),
                        Err(e) => {
                            println!("Error: {}", e);
                            continue;
                        }
                    }
                };
                println!("Submission finished ({})", report.to_cli_summary());
                for failure in report.failures.iter().take(5) {
                    println!("  {}", failure.log_line());
                }
                if report.failures.len() > 5 {
                    println!("  ...and {} more errors", report.failures.len() - 5);
                }
                print_schedule(&schedule);
                session.last_report = Some(report);
            }
            "log" => match (parts.next(), session.last_report.as_ref()) {
                (Some(path), Some(report)) => match report.failure_log().write_to(path) {
                    Ok(true) => println!("Failure log written to {}", path),
                    Ok(false) => println!("No failed tasks to log."),
                    Err(e) => println!("Error writing log: {}", e),
                },
                (Some(_), None) => println!("No submission has been run yet."),
                (None, _) => println!("Usage: log <path>"),
            },
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
