//! Typed snapshots of the Carenage telemetry hierarchy.
//!
//! Every level comes in two shapes: a metadata record used in listings, and a
//! full record that embeds the metadata (flattened on the wire) and adds the
//! children. Documents are decoded fresh for every request and never mutated.

mod pipeline;
mod process;
mod project;
mod run;

#[cfg(test)]
pub(crate) mod fixtures;

use chrono::{DateTime, FixedOffset};

pub use pipeline::{Pipeline, PipelineMetadata};
pub use process::Process;
pub use project::{Project, ProjectMetadata};
pub use run::{JobStatus, Run, RunMetadata};

/// Timestamps keep the offset they were served with.
pub type Timestamp = DateTime<FixedOffset>;

/// One `[timestamp, value]` sample of a metric time series.
pub type MetricValue = (Timestamp, f64);

/// Invariants that serde cannot express on its own.
///
/// Checked once at the decode boundary so aggregation can rely on them.
pub trait Validate {
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}
