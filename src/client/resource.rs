use serde::de::DeserializeOwned;

use crate::model::{Pipeline, Project, Run, Validate};

/// Entity served by the telemetry API under `/{COLLECTION}/{id}`.
pub trait Resource: DeserializeOwned + Validate {
    /// Singular name used in diagnostics.
    const KIND: &'static str;

    const COLLECTION: &'static str;
}

impl Resource for Project {
    const KIND: &'static str = "project";
    const COLLECTION: &'static str = "projects";
}

impl Resource for Pipeline {
    const KIND: &'static str = "pipeline";
    const COLLECTION: &'static str = "pipelines";
}

impl Resource for Run {
    const KIND: &'static str = "run";
    const COLLECTION: &'static str = "runs";
}
