mod analyze;
mod command;
mod model;
mod report;
mod source;
mod utils;

use crate::command::{execute, Command};
use crate::source::{GiteaSource, SnapshotSource};
use crate::utils::{init_logging, multi_progress};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use model::{Error, People, Repository, Result};
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum SourceKind {
    /// Gitea pulls API
    Gitea,
    /// JSON export of pull requests
    Snapshot,
}

/// Pull request activity reports across tracked repositories.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
struct Args {
    #[arg(long = "repos", default_value = "repositories.json")]
    repos_path: String,
    /// Contributor affiliations, `{"login": {"org": "...", "signed": true}}`
    #[arg(long = "people")]
    people_path: Option<String>,
    /// Organization whose members count as internal (repeatable)
    #[arg(long = "internal-org", value_name = "ORG")]
    internal_orgs: Vec<String>,
    #[arg(long, value_enum, default_value_t = SourceKind::Gitea)]
    source: SourceKind,
    #[arg(long = "gitea-url", env = "GITEA_URL")]
    gitea_url: Option<String>,
    #[arg(long = "gitea-token", env = "GITEA_TOKEN", hide_env_values = true)]
    gitea_token: Option<String>,
    #[arg(long = "snapshot", value_name = "PATH")]
    snapshot_path: Option<String>,
    /// Also write the report as markdown to this file
    #[arg(long = "markdown", value_name = "PATH")]
    markdown_path: Option<String>,
    /// Hide fetch progress
    #[arg(long, short)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

enum SourceSettings<'a> {
    Gitea { url: &'a String, token: &'a String },
    Snapshot { path: &'a str },
}

impl Args {
    fn source_settings(&self) -> Result<SourceSettings<'_>> {
        match self.source {
            SourceKind::Gitea => {
                let (Some(url), Some(token)) = (&self.gitea_url, &self.gitea_token) else {
                    return Err(Error::usage(
                        "--source gitea needs --gitea-url and --gitea-token",
                    ));
                };
                Ok(SourceSettings::Gitea { url, token })
            }
            SourceKind::Snapshot => {
                let Some(path) = &self.snapshot_path else {
                    return Err(Error::usage("--source snapshot needs --snapshot"));
                };
                Ok(SourceSettings::Snapshot { path })
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logging("warn");
    let args = Args::parse();
    match run(&args).await {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(args: &Args) -> Result<String> {
    let plan = args.command.plan(Utc::now())?;
    let settings = args.source_settings()?;

    let repos = Repository::tracked(Repository::from_config(&args.repos_path)?);
    info!(count = repos.len(), "Loaded tracked repositories");
    let people = match &args.people_path {
        Some(path) => People::from_config(path, &args.internal_orgs)?,
        None => People::new(vec![], &args.internal_orgs),
    };
    info!(count = people.len(), "Loaded contributor affiliations");

    let multi_progress = multi_progress(args.quiet);
    let markdown_path = args.markdown_path.as_deref();
    match settings {
        SourceSettings::Gitea { url, token } => {
            let source = GiteaSource::new(url, token, people);
            execute(plan, &source, &repos, &multi_progress, markdown_path).await
        }
        SourceSettings::Snapshot { path } => {
            let source = SnapshotSource::from_file(path, people)?;
            execute(plan, &source, &repos, &multi_progress, markdown_path).await
        }
    }
}
