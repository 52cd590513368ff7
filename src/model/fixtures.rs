use serde_json::{json, Value};

use super::Run;

pub const PROJECT_ID: &str = "3a1f9a71-fdd2-4e89-9769-70cfb731a02d";
pub const PIPELINE_ID: &str = "d199e857-fb0f-46b1-9846-74e53b494740";
pub const RUN_ID: &str = "c86fe1e5-8828-4f53-822b-df7e2ced37db";

const OTHER_PIPELINE_ID: &str = "f47ac10b-58cc-4372-a567-0e02b2c3d479";

pub fn project_json() -> Value {
    json!({
        "project_id": PROJECT_ID,
        "project_name": "hubblo/carenage",
        "project_url": "https://gitlab.com/hubblo/carenage",
        "project_repo_id": 57_860_284,
        "created_at": "2024-06-13T09:12:44+02:00",
        "pipelines": [
            pipeline_metadata_json(PIPELINE_ID, 1_520_057_997, "2024-06-13T10:00:00+02:00"),
            pipeline_metadata_json(OTHER_PIPELINE_ID, 1_520_061_204, "2024-06-14T16:30:00+02:00"),
        ]
    })
}

pub fn pipeline_json() -> Value {
    let mut pipeline =
        pipeline_metadata_json(PIPELINE_ID, 1_520_057_997, "2024-06-13T10:00:00+02:00");
    pipeline["runs"] = json!([{
        "run_id": RUN_ID,
        "run_repo_id": 8_228_228_299_u64,
        "run_repo_url": "https://gitlab.com/hubblo/carenage/-/jobs/8228228299",
        "started_at": "2024-06-13T10:00:00+02:00",
        "finished_at": "2024-06-13T10:03:00+02:00",
        "duration": 180
    }]);
    pipeline
}

/// Run with processes 53 and 64 sharing a two-metric catalogue.
pub fn run_json() -> Value {
    json!({
        "run_id": RUN_ID,
        "run_repo_id": 8_228_228_299_u64,
        "run_repo_url": "https://gitlab.com/hubblo/carenage/-/jobs/8228228299",
        "started_at": "2024-06-13T10:00:00+02:00",
        "finished_at": "2024-06-13T10:03:00+02:00",
        "duration": 180,
        "pipeline_id": PIPELINE_ID,
        "pipeline_repo_id": 1_520_057_997,
        "pipeline_repo_url": "https://gitlab.com/hubblo/carenage/-/pipelines/1520057997",
        "project_name": "hubblo/carenage",
        "project_repo_url": "https://gitlab.com/hubblo/carenage",
        "job_name": "test_for_merge_request",
        "job_status": "success",
        "processes": [
            process_json(
                53,
                "/usr/bin/bash",
                "bash -c cargo test",
                [5.0, 5.0, 5.0],
                [3.0, 1.0, 2.0]
            ),
            process_json(
                64,
                "/usr/bin/cargo",
                "cargo test",
                [10.0, 20.0, 30.0],
                [0.25, 0.75, 0.5]
            ),
        ]
    })
}

pub fn run() -> Run {
    serde_json::from_value(run_json()).unwrap()
}

fn pipeline_metadata_json(id: &str, repo_id: u64, started_at: &str) -> Value {
    json!({
        "pipeline_id": id,
        "pipeline_repo_id": repo_id,
        "pipeline_repo_url": format!("https://gitlab.com/hubblo/carenage/-/pipelines/{repo_id}"),
        "project_name": "hubblo/carenage",
        "project_repo_url": "https://gitlab.com/hubblo/carenage",
        "started_at": started_at,
        "finished_at": started_at,
        "duration": 240
    })
}

fn process_json(pid: i64, exe: &str, cmdline: &str, power: [f64; 3], impact: [f64; 3]) -> Value {
    let timestamps = [
        "2024-06-13T10:00:00+02:00",
        "2024-06-13T10:00:05+02:00",
        "2024-06-13T10:00:10+02:00",
    ];
    let series = |values: [f64; 3]| -> Value {
        timestamps
            .iter()
            .zip(values)
            .map(|(ts, value)| json!([ts, value]))
            .collect()
    };

    json!({
        "process": {
            "process_pid": pid,
            "process_exe": exe,
            "process_cmdline": cmdline
        },
        "metrics": [
            {"metric_name": "average_power_measured_w", "metric_values": series(power)},
            {"metric_name": "cpu_adp_average_impact_kgsbeq", "metric_values": series(impact)}
        ]
    })
}
