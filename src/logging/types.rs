//! Core logging types: stage entries, status, and the [`Log`] trait.

/// Outcome of one execution stage, kept for the end-of-run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry {
    /// Stage name (e.g. "Install system packages").
    pub name: String,
    /// Final status.
    pub status: TaskStatus,
    /// Optional detail (skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Stage ran and every checked command succeeded.
    Ok,
    /// Stage had nothing to do for this manifest or platform.
    NotApplicable,
    /// Stage was skipped for a reason worth reporting.
    Skipped,
    /// Stage only printed its commands.
    DryRun,
    /// Stage failed; the run stopped here.
    Failed,
}

impl TaskStatus {
    /// Label used in the summary totals line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotApplicable => "n/a",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }
}

/// Per-status totals for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryCounts {
    /// Stages that succeeded.
    pub ok: usize,
    /// Stages with nothing to do.
    pub not_applicable: usize,
    /// Stages skipped with a reason.
    pub skipped: usize,
    /// Stages that only printed commands.
    pub dry_run: usize,
    /// Stages that failed.
    pub failed: usize,
}

impl SummaryCounts {
    /// Tally a list of entries.
    #[must_use]
    pub fn from_entries(entries: &[TaskEntry]) -> Self {
        let mut counts = Self::default();
        for entry in entries {
            match entry.status {
                TaskStatus::Ok => counts.ok += 1,
                TaskStatus::NotApplicable => counts.not_applicable += 1,
                TaskStatus::Skipped => counts.skipped += 1,
                TaskStatus::DryRun => counts.dry_run += 1,
                TaskStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }

    /// Total number of stages.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.ok + self.not_applicable + self.skipped + self.dry_run + self.failed
    }
}

/// Sink for user-facing output and stage results.
///
/// [`Logger`](super::logger::Logger) is the production implementation;
/// tests substitute recorders.
pub trait Log: Send + Sync {
    /// Log a stage header.
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (console only when verbose).
    fn debug(&self, msg: &str);
    /// Log a warning.
    fn warn(&self, msg: &str);
    /// Log an error.
    fn error(&self, msg: &str);
    /// Log a command that would run outside dry-run mode.
    fn dry_run(&self, msg: &str);
    /// Record a stage result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(status: TaskStatus) -> TaskEntry {
        TaskEntry {
            name: "stage".to_string(),
            status,
            message: None,
        }
    }

    #[test]
    fn counts_tally_each_status() {
        let entries = [
            entry(TaskStatus::Ok),
            entry(TaskStatus::Ok),
            entry(TaskStatus::NotApplicable),
            entry(TaskStatus::DryRun),
            entry(TaskStatus::Failed),
        ];
        let counts = SummaryCounts::from_entries(&entries);
        assert_eq!(counts.ok, 2);
        assert_eq!(counts.not_applicable, 1);
        assert_eq!(counts.skipped, 0);
        assert_eq!(counts.dry_run, 1);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn labels_match_summary_wording() {
        assert_eq!(TaskStatus::NotApplicable.label(), "n/a");
        assert_eq!(TaskStatus::DryRun.label(), "dry-run");
    }
}
