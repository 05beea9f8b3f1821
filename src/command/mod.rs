pub mod dates;
pub mod orgs;
pub mod periods;

use crate::analyze::PeriodOptions;
use crate::model::{PullRequest, Repository, Result};
use crate::report::{MarkdownReport, TextReport};
use crate::source::{FetchQuery, PullRequestSource};
use crate::utils::MultiProgressNew;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use indicatif::MultiProgress;
use orgs::{OrgWindow, OrgsArgs};
use periods::PeriodsArgs;
use tracing::info;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Internal & external pull requests, opened & merged, by quarter, month or week
    Periods(PeriodsArgs),
    /// Merged external pull requests by contributing organization
    Orgs(OrgsArgs),
}

impl Command {
    pub fn plan(&self, now: DateTime<Utc>) -> Result<Plan> {
        match self {
            Command::Periods(args) => Ok(Plan::Periods(args.options()?)),
            Command::Orgs(args) => Ok(Plan::Orgs(args.window(now)?)),
        }
    }
}

/// Validated report request, built before anything is fetched.
#[derive(Debug, Clone)]
pub enum Plan {
    Periods(PeriodOptions),
    Orgs(OrgWindow),
}

/// Runs the planned report and returns its text rendering.
pub async fn execute<S: PullRequestSource>(
    plan: Plan,
    source: &S,
    repos: &[Repository],
    multi_progress: &MultiProgress,
    markdown_path: Option<&str>,
) -> Result<String> {
    match plan {
        Plan::Periods(options) => {
            let report = periods::run(options, source, repos, multi_progress).await?;
            if let Some(path) = markdown_path {
                report.write_markdown(path)?;
            }
            Ok(report.render_text())
        }
        Plan::Orgs(window) => {
            let summary = orgs::run(window, source, repos, multi_progress).await?;
            if let Some(path) = markdown_path {
                summary.write_markdown(path)?;
            }
            Ok(summary.render_text())
        }
    }
}

async fn fetch_repo<S: PullRequestSource>(
    source: &S,
    repo: &Repository,
    query: &FetchQuery,
    multi_progress: &MultiProgress,
) -> Result<Vec<PullRequest>> {
    let pb = multi_progress.add_spinner(format!("{}: waiting ...", repo.name));
    let progress_pb = pb.clone();
    let name = repo.name.clone();
    let progress = move |page: i64| {
        progress_pb.set_message(format!("{name}: fetch pull requests (#{page} page) ..."));
    };

    let pulls = source.fetch(repo, query, Box::new(progress)).await?;
    info!(repo = %repo.name, count = pulls.len(), "Fetched pull requests");
    pb.finish_with_message(format!(
        "✅ {}: completed fetch pull requests (find {} pull requests)",
        repo.name,
        pulls.len()
    ));
    Ok(pulls)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{CombinedState, Intext};
    use crate::source::PageProgress;
    use crate::utils::multi_progress;
    use chrono::TimeZone;
    use std::cell::{Cell, RefCell};

    /// In-memory source returning the same pulls for every repository.
    pub(crate) struct FakeSource {
        pulls: Vec<PullRequest>,
        fetches: Cell<usize>,
        last_query: RefCell<Option<FetchQuery>>,
    }

    impl FakeSource {
        pub(crate) fn new(pulls: Vec<PullRequest>) -> Self {
            Self {
                pulls,
                fetches: Cell::new(0),
                last_query: RefCell::new(None),
            }
        }

        /// One external pull opened 2023-01-10, merged 2023-04-05.
        pub(crate) fn scenario() -> Self {
            Self::new(vec![PullRequest {
                number: 101,
                title: "Add course outline".to_string(),
                author_login: "zoe".to_string(),
                base_ref: "master".to_string(),
                state: CombinedState::Merged,
                intext: Intext::External,
                org: Some("acme".to_string()),
                created_at: Utc.with_ymd_and_hms(2023, 1, 10, 12, 0, 0).unwrap(),
                merged_at: Some(Utc.with_ymd_and_hms(2023, 4, 5, 0, 0, 0).unwrap()),
                closed_at: Some(Utc.with_ymd_and_hms(2023, 4, 5, 0, 0, 0).unwrap()),
                lines: None,
            }])
        }

        pub(crate) fn fetches(&self) -> usize {
            self.fetches.get()
        }

        pub(crate) fn last_query(&self) -> Option<FetchQuery> {
            self.last_query.borrow().clone()
        }
    }

    impl PullRequestSource for FakeSource {
        async fn fetch<'a>(
            &self,
            _repo: &Repository,
            query: &FetchQuery,
            mut cb: PageProgress<'a>,
        ) -> Result<Vec<PullRequest>> {
            cb(1);
            self.fetches.set(self.fetches.get() + 1);
            *self.last_query.borrow_mut() = Some(query.clone());
            Ok(self.pulls.clone())
        }
    }

    #[tokio::test]
    async fn execute_org_summary() {
        let source = FakeSource::scenario();
        let repos = vec![Repository::new("platform", "openedx", true)];
        let plan = Plan::Orgs(OrgWindow {
            start: None,
            end: None,
        });

        let text = execute(plan, &source, &repos, &multi_progress(true), None)
            .await
            .unwrap();
        assert_eq!(text, "acme: 1\n");
    }

    #[tokio::test]
    async fn execute_period_report() {
        let source = FakeSource::scenario();
        let repos = vec![Repository::new("platform", "openedx", true)];
        let options = PeriodsArgs::default().options().unwrap();

        let text = execute(
            Plan::Periods(options),
            &source,
            &repos,
            &multi_progress(true),
            None,
        )
        .await
        .unwrap();
        let rows = text.lines().map(|l| l.split_whitespace().next()).collect::<Vec<_>>();
        assert_eq!(rows, vec![Some("quarter"), Some("2023-Q1"), Some("2023-Q2")]);
    }

    #[tokio::test]
    async fn conflicting_flags_stop_before_any_fetch() {
        let source = FakeSource::scenario();
        let repos = vec![Repository::new("platform", "openedx", true)];
        let command = Command::Orgs(OrgsArgs {
            since: Some(30),
            start: Some("2023-01-01".to_string()),
            end: None,
        });

        let result: crate::model::Result<String> = async {
            let plan = command.plan(Utc::now())?;
            execute(plan, &source, &repos, &multi_progress(true), None).await
        }
        .await;

        assert!(matches!(result, Err(crate::model::Error::Usage(_))));
        assert_eq!(source.fetches(), 0);
    }
}
