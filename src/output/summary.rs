use std::fmt::Write;

use comfy_table::Cell;

use crate::aggregation::{format_time, metric_unit, MetricSelection, ProcessExtrema};
use crate::model::{Pipeline, Project, ProjectMetadata, Run};

use super::styling::{bright, bright_yellow, cyan, dim, green_bold};
use super::tables::{
    color_coded_duration_cell, color_coded_status_cell, create_table, cyan_header, format_value,
};
use super::RunReport;

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

fn add_field(output: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(output, "  {} {}", dim(format!("{label}:")), value);
}

/// Banner line naming the remembered current project, if any.
pub fn render_header(current: Option<&ProjectMetadata>) -> String {
    let mut output = String::new();
    let _ = write!(output, "{}", green_bold("🔋 Carenage"));
    if let Some(project) = current {
        let _ = write!(
            output,
            "  {} {}",
            dim("current project:"),
            cyan(&project.project_name)
        );
    }
    output.push_str("\n\n");
    output
}

pub fn render_project(project: &Project) -> String {
    let mut output = String::new();
    let metadata = &project.metadata;

    add_section_header(&mut output, "📁", &metadata.project_name);
    add_field(&mut output, "Repository", cyan(&metadata.project_url));
    add_field(&mut output, "Created at", format_time(&metadata.created_at));
    add_field(
        &mut output,
        "Number of pipelines executed",
        bright_yellow(project.pipeline_count()),
    );
    output.push('\n');

    if project.pipelines.is_empty() {
        let _ = writeln!(output, "{}", bright_yellow("No pipeline executed yet."));
        return output;
    }

    add_section_header(&mut output, "📋", "Executed CI pipelines");
    let mut table = create_table();
    table.set_header(cyan_header(&[
        "Pipeline ID",
        "Pipeline date of execution",
        "Duration",
        "Dashboard ID",
    ]));
    for pipeline in &project.pipelines {
        table.add_row(vec![
            Cell::new(format!("#{}", pipeline.pipeline_repo_id)),
            Cell::new(format_time(&pipeline.started_at)),
            color_coded_duration_cell(pipeline.duration),
            Cell::new(pipeline.pipeline_id),
        ]);
    }
    let _ = writeln!(output, "{table}");

    output
}

pub fn render_pipeline(pipeline: &Pipeline) -> String {
    let mut output = String::new();
    let metadata = &pipeline.metadata;

    add_section_header(
        &mut output,
        "🚀",
        &format!("Pipeline #{} metadata", metadata.pipeline_repo_id),
    );
    add_field(&mut output, "Project", cyan(&metadata.project_name));
    add_field(&mut output, "Project repository", &metadata.project_repo_url);
    add_field(&mut output, "Pipeline logs", &metadata.pipeline_repo_url);
    add_field(&mut output, "Started at", format_time(&metadata.started_at));
    add_field(&mut output, "Finished at", format_time(&metadata.finished_at));
    add_field(
        &mut output,
        "Duration",
        color_coded_duration_cell(metadata.duration).content(),
    );
    output.push('\n');

    add_section_header(
        &mut output,
        "📋",
        &format!("Executed runs for pipeline #{}", metadata.pipeline_repo_id),
    );
    if pipeline.runs.is_empty() {
        let _ = writeln!(output, "{}", bright_yellow("No run recorded for this pipeline."));
        return output;
    }

    let mut table = create_table();
    table.set_header(cyan_header(&[
        "Run ID",
        "Run start time of execution",
        "Duration",
        "Dashboard ID",
    ]));
    for run in &pipeline.runs {
        table.add_row(vec![
            Cell::new(format!("Run #{}", run.run_repo_id)),
            Cell::new(format_time(&run.started_at)),
            color_coded_duration_cell(run.duration),
            Cell::new(run.run_id),
        ]);
    }
    let _ = writeln!(output, "{table}");

    output
}

pub fn render_run(report: &RunReport<'_>) -> String {
    let mut output = String::new();
    let run = report.run;

    render_run_metadata(&mut output, run);
    render_processes(&mut output, run);

    match &report.selection {
        Some(selection) => render_selection(&mut output, run, selection),
        None => render_extrema(&mut output, &report.extrema),
    }

    output
}

fn render_run_metadata(output: &mut String, run: &Run) {
    let metadata = &run.metadata;

    add_section_header(output, "⚙️", &format!("Run #{}", metadata.run_repo_id));
    add_field(output, "Project", cyan(&run.project_name));
    add_field(output, "Pipeline", format!("#{}", run.pipeline_repo_id));
    add_field(output, "Pipeline summary and metrics", run.pipeline_id);
    add_field(output, "Job name", &run.job_name);
    add_field(
        output,
        "Job status",
        color_coded_status_cell(run.job_status).content(),
    );
    add_field(output, "Started at", format_time(&metadata.started_at));
    add_field(
        output,
        "Duration",
        color_coded_duration_cell(metadata.duration).content(),
    );
    add_field(
        output,
        "Processes registered",
        bright_yellow(run.processes.len()),
    );
    output.push('\n');
}

fn render_processes(output: &mut String, run: &Run) {
    if run.processes.is_empty() {
        let _ = writeln!(output, "{}", bright_yellow("No process telemetry for this run."));
        return;
    }

    add_section_header(output, "📈", "Metrics");
    for name in run.metric_names() {
        let _ = writeln!(output, "  {} {}", name, dim(format!("({})", metric_unit(name))));
    }
    output.push('\n');

    add_section_header(output, "🧵", "Processes");
    let mut table = create_table();
    table.set_header(cyan_header(&["PID", "Executable", "Command line"]));
    for process in &run.processes {
        table.add_row(vec![
            Cell::new(process.pid()),
            Cell::new(&process.process.process_exe),
            Cell::new(&process.process.process_cmdline),
        ]);
    }
    let _ = writeln!(output, "{table}\n");
}

fn render_extrema(output: &mut String, extrema: &[ProcessExtrema]) {
    if extrema.is_empty() {
        return;
    }

    add_section_header(output, "📊", "Metric values per process");
    let mut table = create_table();
    table.set_header(cyan_header(&["PID", "Metric", "Min", "Average", "Max"]));
    for process in extrema {
        for (name, values) in &process.metrics {
            let unit = metric_unit(name);
            table.add_row(vec![
                Cell::new(process.pid),
                Cell::new(name),
                Cell::new(format_value(values.min, unit)),
                Cell::new(format_value(values.avg, unit)),
                Cell::new(format_value(values.max, unit)),
            ]);
        }
    }
    let _ = writeln!(output, "{table}");
}

fn render_selection(output: &mut String, run: &Run, selection: &MetricSelection<'_>) {
    add_section_header(
        output,
        "📊",
        "Metric values for selected process and metric",
    );
    add_field(output, "Process", selection.pid);
    if let Some(process) = run.process(selection.pid) {
        add_field(output, "Executable", &process.process.process_exe);
    }
    add_field(output, "Metric", selection.metric_name);
    add_field(
        output,
        "Minimum",
        format_value(selection.extrema.min, selection.unit),
    );
    add_field(
        output,
        "Average",
        format_value(selection.extrema.avg, selection.unit),
    );
    add_field(
        output,
        "Maximum",
        format_value(selection.extrema.max, selection.unit),
    );
    output.push('\n');

    let mut table = create_table();
    table.set_header(cyan_header(&["Timestamp", selection.metric_name]));
    for (timestamp, value) in selection.series {
        table.add_row(vec![
            Cell::new(format_time(timestamp)),
            Cell::new(format_value(*value, selection.unit)),
        ]);
    }
    let _ = writeln!(output, "{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{run_extrema, select_metric};
    use crate::model::fixtures;

    fn plain(text: &str) -> String {
        console::strip_ansi_codes(text).into_owned()
    }

    #[test]
    fn test_render_header_names_current_project() {
        let project: Project = serde_json::from_value(fixtures::project_json()).unwrap();

        let header = plain(&render_header(Some(&project.metadata)));
        assert!(header.contains("current project: hubblo/carenage"));
        assert!(!plain(&render_header(None)).contains("current project"));
    }

    #[test]
    fn test_render_project_lists_pipelines() {
        let project: Project = serde_json::from_value(fixtures::project_json()).unwrap();
        let output = plain(&render_project(&project));

        assert!(output.contains("hubblo/carenage"));
        assert!(output.contains("Number of pipelines executed: 2"));
        assert!(output.contains("#1520057997"));
        assert!(output.contains("#1520061204"));
        assert!(output.contains(fixtures::PIPELINE_ID));
    }

    #[test]
    fn test_render_pipeline_lists_runs() {
        let pipeline: Pipeline = serde_json::from_value(fixtures::pipeline_json()).unwrap();
        let output = plain(&render_pipeline(&pipeline));

        assert!(output.contains("Pipeline #1520057997 metadata"));
        assert!(output.contains("Executed runs for pipeline #1520057997"));
        assert!(output.contains("Run #8228228299"));
        assert!(output.contains("00:04:00"));
    }

    #[test]
    fn test_render_run_without_selection_shows_extrema() {
        let run = fixtures::run();
        let report = RunReport {
            run: &run,
            extrema: run_extrema(&run).unwrap(),
            selection: None,
        };
        let output = plain(&render_run(&report));

        assert!(output.contains("Run #8228228299"));
        assert!(output.contains("test_for_merge_request"));
        assert!(output.contains("success"));
        assert!(output.contains("Processes registered: 2"));
        assert!(output.contains("cpu_adp_average_impact_kgsbeq (kgsbeq)"));
        assert!(output.contains("Metric values per process"));
        assert!(output.contains("20.000 w"));
    }

    #[test]
    fn test_render_run_with_selection_shows_series() {
        let run = fixtures::run();
        let report = RunReport {
            run: &run,
            extrema: Vec::new(),
            selection: Some(select_metric(&run, 64, "average_power_measured_w").unwrap()),
        };
        let output = plain(&render_run(&report));

        assert!(output.contains("Metric values for selected process and metric"));
        assert!(output.contains("Executable: /usr/bin/cargo"));
        assert!(output.contains("Minimum: 10.000 w"));
        assert!(output.contains("Maximum: 30.000 w"));
        assert!(output.contains("2024-06-13 10:00:10"));
        assert!(!output.contains("Metric values per process"));
    }
}
