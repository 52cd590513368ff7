//! Derived views over fetched runs: formatted scalars, series selection and
//! min/max/average summaries.
//!
//! Everything here is pure and synchronous. Inputs are borrowed snapshots, so
//! any number of aggregations can be evaluated over the same run.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::AggregationError;
use crate::model::{MetricValue, Process, Run, Timestamp};

type Result<T> = std::result::Result<T, AggregationError>;

const SECONDS_PER_DAY: u64 = 86_400;

/// Formats a duration as `HH:MM:SS`.
///
/// This is a time of day, not an elapsed-time counter: durations of a day or
/// more wrap around through `00:00:00`.
pub fn format_duration(seconds: u64) -> String {
    let seconds = seconds % SECONDS_PER_DAY;
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Table-cell rendering of a timestamp, in the offset it was recorded with.
pub fn format_time(timestamp: &Timestamp) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Unit suffix of a metric name: `average_power_measured_w` gives `w`.
///
/// A name without any `_` is returned whole.
pub fn metric_unit(metric_name: &str) -> &str {
    metric_name
        .rsplit_once('_')
        .map_or(metric_name, |(_, unit)| unit)
}

pub fn average(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(AggregationError::EmptySeries);
    }

    #[allow(clippy::cast_precision_loss)]
    let count = values.len() as f64;
    Ok(values.iter().sum::<f64>() / count)
}

/// Series of `metric_name` for the process with PID `pid`.
///
/// PIDs are unique within a run; seeing one twice is reported as a data
/// integrity error rather than picking either.
pub fn select_series<'a>(
    processes: &'a [Process],
    pid: i64,
    metric_name: &str,
) -> Result<&'a [MetricValue]> {
    let mut matching = processes.iter().filter(|p| p.pid() == pid);

    let process = matching
        .next()
        .ok_or(AggregationError::ProcessNotFound { pid })?;

    let extra = matching.count();
    if extra > 0 {
        return Err(AggregationError::DuplicateProcess {
            pid,
            count: extra + 1,
        });
    }

    process
        .metric(metric_name)
        .map(|metric| metric.metric_values.as_slice())
        .ok_or_else(|| AggregationError::MetricNotFound {
            pid,
            metric: metric_name.to_string(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extrema {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Minimum, maximum and mean of the values of a series. Timestamps are ignored.
pub fn series_extrema(series: &[MetricValue]) -> Result<Extrema> {
    let values: Vec<f64> = series.iter().map(|(_, value)| *value).collect();
    let avg = average(&values)?;

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        });

    Ok(Extrema { min, max, avg })
}

/// Everything needed to draw one process/metric graph with its summary.
#[derive(Debug, Serialize)]
pub struct MetricSelection<'a> {
    pub pid: i64,
    pub metric_name: &'a str,
    pub unit: &'a str,
    pub extrema: Extrema,
    pub series: &'a [MetricValue],
}

pub fn select_metric<'a>(
    run: &'a Run,
    pid: i64,
    metric_name: &'a str,
) -> Result<MetricSelection<'a>> {
    let series = select_series(&run.processes, pid, metric_name)?;

    Ok(MetricSelection {
        pid,
        metric_name,
        unit: metric_unit(metric_name),
        extrema: series_extrema(series)?,
        series,
    })
}

/// Extrema of every metric of one process, in catalogue order.
#[derive(Debug, Serialize)]
pub struct ProcessExtrema {
    pub pid: i64,
    pub process_exe: String,
    pub metrics: IndexMap<String, Extrema>,
}

pub fn run_extrema(run: &Run) -> Result<Vec<ProcessExtrema>> {
    run.processes
        .iter()
        .map(|process| -> Result<ProcessExtrema> {
            let metrics = process
                .metrics
                .iter()
                .map(|metric| {
                    series_extrema(&metric.metric_values)
                        .map(|extrema| (metric.metric_name.clone(), extrema))
                })
                .collect::<Result<IndexMap<_, _>>>()?;

            Ok(ProcessExtrema {
                pid: process.pid(),
                process_exe: process.process.process_exe.clone(),
                metrics,
            })
        })
        .collect()
}
