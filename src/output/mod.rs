mod exports;
mod progress;
mod styling;
mod summary;
mod tables;

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::aggregation::{MetricSelection, ProcessExtrema};
use crate::config::OutputFormat;
use crate::model::{Pipeline, Project, ProjectMetadata, Run};

pub use progress::FetchProgress;
pub use styling::{dim, green_bold};

/// A run together with the aggregates derived from it.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub run: &'a Run,
    pub extrema: Vec<ProcessExtrema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<MetricSelection<'a>>,
}

/// What a single command displays.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Page<'a> {
    Project(&'a Project),
    Pipeline(&'a Pipeline),
    Run(RunReport<'a>),
}

/// Prints the dashboard banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        green_bold("🔋 Carenage"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("CI energy-consumption dashboard")
    );
}

/// Writes `page` in the requested format.
///
/// `current_project` only feeds the summary header; JSON and CSV carry the
/// page data alone.
pub fn render_page(
    page: &Page<'_>,
    current_project: Option<&ProjectMetadata>,
    format: OutputFormat,
    pretty: bool,
    output: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Summary => {
            let body = match page {
                Page::Project(project) => summary::render_project(project),
                Page::Pipeline(pipeline) => summary::render_pipeline(pipeline),
                Page::Run(report) => summary::render_run(report),
            };
            write!(output, "{}{body}", summary::render_header(current_project))?;
            Ok(())
        }
        OutputFormat::Json => exports::export_json(page, pretty, output),
        OutputFormat::Csv => exports::export_csv(page, output),
    }
}
