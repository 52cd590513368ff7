use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("{kind} {id}: 404 Not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

/// Why a single GET against the telemetry API produced no entity.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to fetch {resource} data with ID \"{id}\". Response status: 404")]
    NotFound { resource: &'static str, id: String },

    #[error("Failed to fetch {resource} data with ID \"{id}\". Response status: {status}")]
    Server {
        resource: &'static str,
        id: String,
        status: u16,
    },

    #[error("Failed to fetch {resource} data with ID \"{id}\". Response status: {status}")]
    Status {
        resource: &'static str,
        id: String,
        status: u16,
    },

    #[error("Network error while fetching {resource} \"{id}\": {source}")]
    Network {
        resource: &'static str,
        id: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed {resource} document for ID \"{id}\": {reason}")]
    Decode {
        resource: &'static str,
        id: String,
        reason: String,
    },
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network { source, .. } if source.is_timeout())
    }
}

/// Precondition violations of the aggregation functions.
///
/// These point at a programming or data-integrity error, so they are surfaced
/// to the caller instead of being folded into a zero value.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AggregationError {
    #[error("Cannot aggregate an empty series")]
    EmptySeries,

    #[error("No process with PID {pid} in this run")]
    ProcessNotFound { pid: i64 },

    #[error("PID {pid} appears {count} times in this run")]
    DuplicateProcess { pid: i64, count: usize },

    #[error("Process {pid} has no metric named \"{metric}\"")]
    MetricNotFound { pid: i64, metric: String },
}
