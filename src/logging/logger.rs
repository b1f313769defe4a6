//! Console/file logger with stage-result collection.
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, SummaryCounts, TaskEntry, TaskStatus};
use super::utils::log_file_path;

/// Implement the `fn(&self, &str)` methods of [`Log`] by delegating to the
/// inherent methods of the same name.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Production [`Log`]: emits through `tracing` and remembers stage results
/// for the closing summary.
///
/// The log file at `$XDG_CACHE_HOME/dotsetup/<command>.log` is written by
/// the subscriber's file layer; the logger only remembers its path.
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
    started: Instant,
}

impl Logger {
    /// Create a logger for `command` (used to name the log file).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file,
            started: Instant::now(),
        }
    }

    /// Path of the run's log file, if the cache directory is usable.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Snapshot of the recorded stage results.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks
            .lock()
            .map_or_else(|_| Vec::new(), |guard| guard.clone())
    }

    /// Log an error.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a command that dry-run mode skipped.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a stage result.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Number of failed stages.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        SummaryCounts::from_entries(&self.task_entries()).failed
    }

    /// Print every recorded stage and the per-status totals.
    #[allow(clippy::print_stdout)]
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");
        for task in &tasks {
            let (icon, color) = match task.status {
                TaskStatus::Ok => ("✓", "\x1b[32m"),
                TaskStatus::NotApplicable => ("·", "\x1b[2m"),
                TaskStatus::Skipped => ("○", "\x1b[33m"),
                TaskStatus::DryRun => ("~", "\x1b[37m"),
                TaskStatus::Failed => ("✗", "\x1b[31m"),
            };
            let suffix = task
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", task.name));
        }

        let counts = SummaryCounts::from_entries(&tasks);
        let totals = [
            (TaskStatus::Ok, counts.ok, "\x1b[32m"),
            (TaskStatus::NotApplicable, counts.not_applicable, "\x1b[2m"),
            (TaskStatus::Skipped, counts.skipped, "\x1b[33m"),
            (TaskStatus::DryRun, counts.dry_run, "\x1b[37m"),
            (TaskStatus::Failed, counts.failed, "\x1b[31m"),
        ]
        .iter()
        .map(|(status, n, color)| format!("{color}{n} {}\x1b[0m", status.label()))
        .collect::<Vec<_>>()
        .join(", ");

        println!();
        self.info(&format!(
            "{} stages in {:.1}s: {totals}",
            counts.total(),
            self.started.elapsed().as_secs_f64()
        ));
        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.record_task(name, status, message);
    }
}
