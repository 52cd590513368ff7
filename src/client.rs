mod resource;

use std::time::Duration;

use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::error::{DashboardError, FetchError, Result};
use crate::model::{Pipeline, Project, Run};

pub use resource::Resource;

pub const DEFAULT_API_URL: &str = "https://api.carenage.hubblo.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Read-only client for the Carenage telemetry API.
///
/// Every fetch is a single GET. Failures never reach the caller as errors
/// from the `fetch_*` methods: they are logged and collapsed into `None`.
/// Callers that need the cause use [`CarenageClient::try_fetch`].
pub struct CarenageClient {
    client: Client,
    api_url: Url,
}

impl CarenageClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("carenage-dashboard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = Url::parse(base_url)
            .map_err(|e| DashboardError::Config(format!("Invalid API URL: {e}")))?;

        if api_url.cannot_be_a_base() {
            return Err(DashboardError::Config(format!(
                "Invalid API URL: {base_url} cannot hold resource paths"
            )));
        }

        Ok(Self { client, api_url })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// `{api_url}/{collection}/{id}`, with `id` encoded as one path segment.
    fn resource_url<R: Resource>(&self, id: &str) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(R::COLLECTION).push(id);
        }
        url
    }

    /// Fetches one entity and reports why it could not be obtained.
    ///
    /// The body must decode into the full entity shape and satisfy its
    /// [`Validate`](crate::model::Validate) invariants; anything else is a
    /// [`FetchError::Decode`].
    pub async fn try_fetch<R: Resource>(&self, id: &str) -> std::result::Result<R, FetchError> {
        let url = self.resource_url::<R>(id);
        debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| network_error::<R>(id, source))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                resource: R::KIND,
                id: id.to_string(),
            });
        }
        if status.is_server_error() {
            return Err(FetchError::Server {
                resource: R::KIND,
                id: id.to_string(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                resource: R::KIND,
                id: id.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| network_error::<R>(id, source))?;

        let entity: R = serde_json::from_slice(&body)
            .map_err(|e| decode_error::<R>(id, e.to_string()))?;
        entity
            .validate()
            .map_err(|reason| decode_error::<R>(id, reason))?;

        Ok(entity)
    }

    /// Fetches one entity, logging and swallowing any failure.
    pub async fn fetch<R: Resource>(&self, id: &str) -> Option<R> {
        match self.try_fetch::<R>(id).await {
            Ok(entity) => {
                info!("Fetched {} {id}", R::KIND);
                Some(entity)
            }
            Err(err) if err.is_timeout() => {
                warn!("{err} (timed out)");
                None
            }
            Err(err) => {
                warn!("{err}");
                None
            }
        }
    }

    pub async fn fetch_project(&self, id: &str) -> Option<Project> {
        self.fetch(id).await
    }

    pub async fn fetch_pipeline(&self, id: &str) -> Option<Pipeline> {
        self.fetch(id).await
    }

    pub async fn fetch_run(&self, id: &str) -> Option<Run> {
        self.fetch(id).await
    }
}

fn network_error<R: Resource>(id: &str, source: reqwest::Error) -> FetchError {
    FetchError::Network {
        resource: R::KIND,
        id: id.to_string(),
        source,
    }
}

fn decode_error<R: Resource>(id: &str, reason: String) -> FetchError {
    FetchError::Decode {
        resource: R::KIND,
        id: id.to_string(),
        reason,
    }
}
