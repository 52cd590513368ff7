use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::fs::File;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::aggregation::{run_extrema, select_metric};
use crate::client::{CarenageClient, Resource};
use crate::config::{Config, OutputFormat};
use crate::error::DashboardError;
use crate::model::{Pipeline, Project, ProjectMetadata, Run};
use crate::output::{self, dim, FetchProgress, Page, RunReport};
use crate::session::SessionStore;

#[derive(Parser)]
#[command(name = "carenage-dashboard")]
#[command(author, version, about = "CI energy-consumption dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./carenage.{toml,json,yaml,yml})
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Carenage API origin
    #[arg(long, global = true, env = "CARENAGE_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Pretty print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    /// Output file path (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a project and its pipelines
    Project { id: String },

    /// Show a pipeline and its runs
    Pipeline { id: String },

    /// Show a run, its processes and metric values
    Run {
        id: String,

        /// PID of the process to graph
        #[arg(long, requires = "metric")]
        pid: Option<i64>,

        /// Metric to graph for the selected process
        #[arg(long, requires = "pid")]
        metric: Option<String>,
    },

    /// Inspect or reset the remembered current project
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    Show,
    Clear,
}

/// Flag values layered over the configuration file.
struct Settings {
    api_url: String,
    timeout: Duration,
    format: OutputFormat,
    pretty: bool,
}

impl Cli {
    fn settings(&self, config: &Config) -> Settings {
        Settings {
            api_url: self
                .api_url
                .clone()
                .unwrap_or_else(|| config.api.base_url.clone()),
            timeout: Duration::from_secs(self.timeout.unwrap_or(config.api.timeout_secs)),
            format: self.format.unwrap_or(config.output.format),
            pretty: self.pretty || config.output.pretty,
        }
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let settings = self.settings(&config);
        let mut session = SessionStore::new(config.session.enabled)?;

        if let Commands::Session { action } = &self.command {
            return Self::execute_session(action, &mut session);
        }

        let client = CarenageClient::new(&settings.api_url, settings.timeout)?;
        info!("Using Carenage API at {}", client.api_url());

        match &self.command {
            Commands::Project { id } => {
                self.execute_project(&client, &mut session, id, &settings).await
            }
            Commands::Pipeline { id } => {
                let (pipeline, current) = fetch_with_current_project(
                    &client,
                    &session,
                    Pipeline::KIND,
                    id,
                    client.fetch_pipeline(id),
                )
                .await;
                let pipeline = require(pipeline, id)?;
                self.write_page(
                    &Page::Pipeline(&pipeline),
                    current.as_ref().map(|p| &p.metadata),
                    &settings,
                )
            }
            Commands::Run { id, pid, metric } => {
                let (run, current) = fetch_with_current_project(
                    &client,
                    &session,
                    Run::KIND,
                    id,
                    client.fetch_run(id),
                )
                .await;
                let run = require(run, id)?;

                let report = match (pid, metric) {
                    (Some(pid), Some(metric)) => {
                        let selection =
                            select_metric(&run, *pid, metric).map_err(DashboardError::from)?;
                        RunReport {
                            run: &run,
                            extrema: Vec::new(),
                            selection: Some(selection),
                        }
                    }
                    _ => RunReport {
                        run: &run,
                        extrema: run_extrema(&run).map_err(DashboardError::from)?,
                        selection: None,
                    },
                };

                self.write_page(
                    &Page::Run(report),
                    current.as_ref().map(|p| &p.metadata),
                    &settings,
                )
            }
            Commands::Session { .. } => Ok(()),
        }
    }

    async fn execute_project(
        &self,
        client: &CarenageClient,
        session: &mut SessionStore,
        id: &str,
        settings: &Settings,
    ) -> Result<()> {
        let progress = FetchProgress::start(Project::KIND, id);
        let project = client.fetch_project(id).await;
        progress.finish(project.is_some());
        let project = require(project, id)?;

        session.remember_project(id)?;

        // The header names the remembered project, which may be another one.
        let current = match session.current_project() {
            Some(current_id) if current_id != id => client.fetch_project(current_id).await,
            _ => None,
        };
        let header = current.as_ref().map_or(&project.metadata, |p| &p.metadata);

        self.write_page(&Page::Project(&project), Some(header), settings)
    }

    fn execute_session(action: &SessionAction, session: &mut SessionStore) -> Result<()> {
        match action {
            SessionAction::Show => {
                match session.current_project() {
                    Some(id) => println!("{id}"),
                    None => eprintln!("No current project remembered"),
                }
                eprintln!(
                    "{}",
                    dim(format!("Session file: {}", session.path().display()))
                );
                Ok(())
            }
            SessionAction::Clear => {
                session.clear()?;
                Ok(())
            }
        }
    }

    fn write_page(
        &self,
        page: &Page<'_>,
        current_project: Option<&ProjectMetadata>,
        settings: &Settings,
    ) -> Result<()> {
        if let Some(output_path) = &self.output {
            let mut file = File::create(output_path)?;
            output::render_page(
                page,
                current_project,
                settings.format,
                settings.pretty,
                &mut file,
            )?;
            info!("Output written to: {}", output_path.display());
        } else {
            let mut stdout = io::stdout().lock();
            output::render_page(
                page,
                current_project,
                settings.format,
                settings.pretty,
                &mut stdout,
            )?;
        }

        Ok(())
    }
}

/// Awaits the `entity` fetch together with the remembered current project.
///
/// Both requests are independent and run concurrently.
async fn fetch_with_current_project<R>(
    client: &CarenageClient,
    session: &SessionStore,
    kind: &str,
    id: &str,
    entity: impl Future<Output = Option<R>>,
) -> (Option<R>, Option<Project>) {
    let progress = FetchProgress::start(kind, id);

    let current = async {
        match session.current_project() {
            Some(project_id) => client.fetch_project(project_id).await,
            None => None,
        }
    };
    let (entity, current) = futures::future::join(entity, current).await;

    progress.finish(entity.is_some());
    if session.current_project().is_some() && current.is_none() {
        warn!("Remembered current project could not be fetched");
    }

    (entity, current)
}

/// Turns an absent fetch result into the user-facing not-found error.
fn require<R: Resource>(entity: Option<R>, id: &str) -> Result<R, DashboardError> {
    entity.ok_or_else(|| DashboardError::NotFound {
        kind: R::KIND,
        id: id.to_string(),
    })
}
