use serde::{Deserialize, Serialize};

use super::{MetricValue, Validate};

/// OS process observed during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub process_pid: i64,
    pub process_exe: String,
    pub process_cmdline: String,
}

/// Named time series, e.g. `cpu_adp_average_impact_kgsbeq`.
///
/// Names follow `<subject>_<statistic>_<unit>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub metric_name: String,
    pub metric_values: Vec<MetricValue>,
}

impl Validate for Metric {
    fn validate(&self) -> Result<(), String> {
        if self.metric_values.is_empty() {
            return Err(format!("metric \"{}\" has no values", self.metric_name));
        }

        let out_of_order = self
            .metric_values
            .windows(2)
            .any(|pair| pair[1].0 < pair[0].0);
        if out_of_order {
            return Err(format!(
                "metric \"{}\" has decreasing timestamps",
                self.metric_name
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub process: ProcessInfo,
    pub metrics: Vec<Metric>,
}

impl Process {
    pub fn pid(&self) -> i64 {
        self.process.process_pid
    }

    pub fn metric(&self, metric_name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.metric_name == metric_name)
    }

    pub fn metric_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.metrics.iter().map(|m| m.metric_name.as_str())
    }
}

impl Validate for Process {
    fn validate(&self) -> Result<(), String> {
        self.metrics
            .iter()
            .try_for_each(Validate::validate)
            .map_err(|reason| format!("process {}: {reason}", self.pid()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metric(values: serde_json::Value) -> Metric {
        serde_json::from_value(json!({
            "metric_name": "average_power_measured_w",
            "metric_values": values,
        }))
        .unwrap()
    }

    #[test]
    fn test_metric_values_decode_from_pairs() {
        let m = metric(json!([
            ["2024-06-13T10:00:00+02:00", 12.5],
            ["2024-06-13T10:00:05+02:00", 14]
        ]));

        assert_eq!(m.metric_values.len(), 2);
        assert_eq!(m.metric_values[0].0.to_rfc3339(), "2024-06-13T10:00:00+02:00");
        assert_eq!(m.metric_values[1].1, 14.0);
    }

    #[test]
    fn test_metric_rejects_empty_series() {
        let m = metric(json!([]));
        let err = m.validate().unwrap_err();
        assert!(err.contains("no values"));
    }

    #[test]
    fn test_metric_rejects_decreasing_timestamps() {
        let m = metric(json!([
            ["2024-06-13T10:00:05+02:00", 1.0],
            ["2024-06-13T10:00:00+02:00", 2.0]
        ]));
        assert!(m.validate().unwrap_err().contains("decreasing"));
    }

    #[test]
    fn test_metric_accepts_equal_timestamps() {
        let m = metric(json!([
            ["2024-06-13T10:00:00+02:00", 1.0],
            ["2024-06-13T08:00:00Z", 2.0]
        ]));
        assert!(m.validate().is_ok());
    }

    #[test]
    fn test_metric_rejects_non_numeric_value() {
        let result: Result<Metric, _> = serde_json::from_value(json!({
            "metric_name": "x_w",
            "metric_values": [["2024-06-13T10:00:00+02:00", "12.5"]],
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_process_validation_names_the_pid() {
        let process: Process = serde_json::from_value(json!({
            "process": {
                "process_pid": 64,
                "process_exe": "/usr/bin/cargo",
                "process_cmdline": "cargo test"
            },
            "metrics": [{"metric_name": "average_power_measured_w", "metric_values": []}],
        }))
        .unwrap();

        let err = process.validate().unwrap_err();
        assert!(err.starts_with("process 64:"));
    }
}
