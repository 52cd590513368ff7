use anyhow::Result;
use std::io::Write;

use crate::aggregation::metric_unit;

use super::{Page, RunReport};

pub fn export_json(page: &Page<'_>, pretty: bool, output: &mut dyn Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(page)?
    } else {
        serde_json::to_string(page)?
    };
    writeln!(output, "{json}")?;
    Ok(())
}

/// CSV view of a page: the child listing for projects and pipelines, the
/// selected series or the per-process extrema for runs.
pub fn export_csv(page: &Page<'_>, output: &mut dyn Write) -> Result<()> {
    match page {
        Page::Project(project) => {
            writeln!(output, "Pipeline ID,Pipeline Repo ID,Started At,Finished At,Duration")?;
            for pipeline in &project.pipelines {
                writeln!(
                    output,
                    "{},{},{},{},{}",
                    pipeline.pipeline_id,
                    pipeline.pipeline_repo_id,
                    pipeline.started_at.to_rfc3339(),
                    pipeline.finished_at.to_rfc3339(),
                    pipeline.duration
                )?;
            }
        }
        Page::Pipeline(pipeline) => {
            writeln!(output, "Run ID,Run Repo ID,Started At,Finished At,Duration")?;
            for run in &pipeline.runs {
                writeln!(
                    output,
                    "{},{},{},{},{}",
                    run.run_id,
                    run.run_repo_id,
                    run.started_at.to_rfc3339(),
                    run.finished_at.to_rfc3339(),
                    run.duration
                )?;
            }
        }
        Page::Run(report) => export_run_csv(report, output)?,
    }

    Ok(())
}

fn export_run_csv(report: &RunReport<'_>, output: &mut dyn Write) -> Result<()> {
    if let Some(selection) = &report.selection {
        writeln!(output, "Timestamp,{}", quote(selection.metric_name))?;
        for (timestamp, value) in selection.series {
            writeln!(output, "{},{value}", timestamp.to_rfc3339())?;
        }
        return Ok(());
    }

    writeln!(output, "PID,Executable,Metric,Unit,Min,Average,Max")?;
    for process in &report.extrema {
        for (name, extrema) in &process.metrics {
            writeln!(
                output,
                "{},{},{},{},{},{},{}",
                process.pid,
                quote(&process.process_exe),
                quote(name),
                quote(metric_unit(name)),
                extrema.min,
                extrema.avg,
                extrema.max
            )?;
        }
    }

    Ok(())
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
