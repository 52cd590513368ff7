use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Process, Timestamp, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Success,
    Failed,
    Running,
    Warning,
    Scheduled,
    Manual,
    Skipped,
    Created,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Running => "running",
            Self::Warning => "warning",
            Self::Scheduled => "scheduled",
            Self::Manual => "manual",
            Self::Skipped => "skipped",
            Self::Created => "created",
        };
        f.write_str(label)
    }
}

/// One CI job execution, as listed under its pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: Uuid,
    pub run_repo_id: u64,
    pub run_repo_url: String,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    pub duration: u64,
}

/// A run with its parent pipeline context and per-process telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    #[serde(flatten)]
    pub metadata: RunMetadata,
    pub pipeline_id: Uuid,
    pub pipeline_repo_id: u64,
    pub pipeline_repo_url: String,
    pub project_name: String,
    pub project_repo_url: String,
    pub job_name: String,
    pub job_status: JobStatus,
    pub processes: Vec<Process>,
}

impl Run {
    /// Metric catalogue of the run, in the order every process carries it.
    pub fn metric_names(&self) -> Vec<&str> {
        self.processes
            .first()
            .map(|p| p.metric_names().collect())
            .unwrap_or_default()
    }

    pub fn process(&self, pid: i64) -> Option<&Process> {
        self.processes.iter().find(|p| p.pid() == pid)
    }
}

impl Validate for Run {
    fn validate(&self) -> Result<(), String> {
        self.processes.iter().try_for_each(Validate::validate)?;

        let mut seen = HashSet::new();
        if let Some(process) = self.processes.iter().find(|p| !seen.insert(p.pid())) {
            return Err(format!("PID {} is listed more than once", process.pid()));
        }

        // Metrics are picked positionally across processes.
        let catalogue = self.metric_names();
        for process in self.processes.iter().skip(1) {
            if !process.metric_names().eq(catalogue.iter().copied()) {
                return Err(format!(
                    "process {} does not share the run's metric catalogue",
                    process.pid()
                ));
            }
        }

        Ok(())
    }
}
