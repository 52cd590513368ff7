use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PipelineMetadata, Timestamp, Validate};

/// Monitored repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub project_id: Uuid,
    pub project_name: String,
    pub project_url: String,
    pub project_repo_id: u64,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(flatten)]
    pub metadata: ProjectMetadata,
    pub pipelines: Vec<PipelineMetadata>,
}

impl Project {
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }
}

/// Pipelines may still carry the project path they ran under before a
/// rename, so the listing is not checked against `project_name`.
impl Validate for Project {}
