//! # Report Runners
//!
//! The seam between the dispatcher and whatever produces a report.
//!
//! ## Runner Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Dispatcher                                                             │
//! │       │  run(&report, &execution)      execution.status == running     │
//! │       ▼                                                                 │
//! │  ReportRunner                                                           │
//! │       │                                                                 │
//! │       ├── Ok(ExecutionUpdate)   → execution marked completed           │
//! │       └── Err(RunnerError)      → execution marked failed              │
//! │                                   (error text stored on the record)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Delivery to email, webhook or FTP targets is not done here; the
//! shipped [`FileOutputRunner`] writes a JSON report request that a
//! delivery worker can pick up.

use async_trait::async_trait;
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;
use url::Url;

use backroom_core::describe::schedule_description;
use backroom_core::{ExecutionUpdate, ReportExecution, ScheduledReport};

/// Errors a runner reports back for one execution.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Output write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output path is not representable as a URL: {0}")]
    InvalidOutputPath(String),

    /// The runner refused this report (unknown type, bad parameters, ...).
    #[error("Report rejected: {0}")]
    Rejected(String),
}

/// Produces the output for one execution of a scheduled report.
#[async_trait]
pub trait ReportRunner: Send + Sync {
    async fn run(
        &self,
        report: &ScheduledReport,
        execution: &ReportExecution,
    ) -> Result<ExecutionUpdate, RunnerError>;
}

// =============================================================================
// File Output Runner
// =============================================================================

/// Writes `<directory>/<report_id>/<execution_id>.json` per execution.
#[derive(Debug, Clone)]
pub struct FileOutputRunner {
    directory: PathBuf,
}

impl FileOutputRunner {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        FileOutputRunner {
            directory: directory.into(),
        }
    }
}

#[async_trait]
impl ReportRunner for FileOutputRunner {
    async fn run(
        &self,
        report: &ScheduledReport,
        execution: &ReportExecution,
    ) -> Result<ExecutionUpdate, RunnerError> {
        let report_dir = self.directory.join(&report.id);
        tokio::fs::create_dir_all(&report_dir).await?;
        let report_dir = tokio::fs::canonicalize(&report_dir).await?;

        let document = json!({
            "executionId": execution.id,
            "startedAt": execution.start_time.to_rfc3339(),
            "report": {
                "id": report.id,
                "name": report.name,
                "reportType": report.report_type,
                "schedule": schedule_description(&report.schedule),
                "parameters": report.parameters,
            },
            "delivery": report.delivery,
        });
        let body = serde_json::to_vec_pretty(&document)?;

        let path = report_dir.join(format!("{}.json", execution.id));
        tokio::fs::write(&path, &body).await?;

        let output_url = Url::from_file_path(&path)
            .map_err(|_| RunnerError::InvalidOutputPath(path.display().to_string()))?;

        debug!(
            execution_id = %execution.id,
            path = %path.display(),
            bytes = body.len(),
            "Report document written"
        );

        Ok(ExecutionUpdate::default()
            .with_output_url(output_url.to_string())
            .with_detail("bytes", body.len() as u64)
            .with_detail("format", "json"))
    }
}
