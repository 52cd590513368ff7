use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{RunMetadata, Timestamp, Validate};

/// One CI pipeline execution, as listed under its project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetadata {
    pub pipeline_id: Uuid,
    pub pipeline_repo_id: u64,
    pub pipeline_repo_url: String,
    pub project_name: String,
    pub project_repo_url: String,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    pub duration: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(flatten)]
    pub metadata: PipelineMetadata,
    pub runs: Vec<RunMetadata>,
}

impl Validate for Pipeline {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures;

    #[test]
    fn test_pipeline_decodes_verbatim() {
        let pipeline: Pipeline = serde_json::from_value(fixtures::pipeline_json()).unwrap();

        assert_eq!(pipeline.metadata.pipeline_id.to_string(), fixtures::PIPELINE_ID);
        assert_eq!(pipeline.metadata.pipeline_repo_id, 1_520_057_997);
        assert_eq!(pipeline.metadata.project_name, "hubblo/carenage");
        assert_eq!(pipeline.metadata.duration, 240);
        assert_eq!(pipeline.runs.len(), 1);
        assert_eq!(pipeline.runs[0].run_id.to_string(), fixtures::RUN_ID);
    }

    #[test]
    fn test_pipeline_serializes_flat() {
        let pipeline: Pipeline = serde_json::from_value(fixtures::pipeline_json()).unwrap();
        let value = serde_json::to_value(&pipeline).unwrap();

        assert!(value.get("metadata").is_none());
        assert_eq!(value["pipeline_repo_id"], 1_520_057_997_u64);
        assert_eq!(value["runs"][0]["run_repo_id"], 8_228_228_299_u64);
    }

    #[test]
    fn test_pipeline_rejects_malformed_uuid() {
        let mut json = fixtures::pipeline_json();
        json["pipeline_id"] = "not-a-uuid".into();

        let result: Result<Pipeline, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }
}
