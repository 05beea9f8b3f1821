use crate::analyze::{Period, PeriodAggregator, PeriodOptions, PeriodReport};
use crate::command::dates::parse_date;
use crate::command::fetch_repo;
use crate::model::{DetailLevel, Error, Repository, Result};
use crate::source::{FetchQuery, PullRequestSource, StateFilter};
use clap::Args;
use indicatif::MultiProgress;

/// Internal & external pull requests, opened & merged, by quarter.
#[derive(Args, Debug, Clone, Default)]
pub struct PeriodsArgs {
    /// Report on months instead of quarters
    #[arg(long)]
    pub monthly: bool,
    /// Report on weeks instead of quarters
    #[arg(long)]
    pub weekly: bool,
    /// Include a small/large breakdown (needs --size-threshold)
    #[arg(long = "by-size")]
    pub by_size: bool,
    /// Changed lines at which a pull request counts as large
    #[arg(long = "size-threshold", value_name = "LINES")]
    pub size_threshold: Option<u64>,
    /// Count the number of lines changed instead of number of pull requests
    #[arg(long)]
    pub lines: bool,
    /// Date to start collecting, e.g. 20141225, Dec/25/2014, 2014-12-25
    #[arg(long)]
    pub start: Option<String>,
    /// Include closed pull requests also
    #[arg(long)]
    pub closed: bool,
}

impl PeriodsArgs {
    pub fn options(&self) -> Result<PeriodOptions> {
        let period = match (self.monthly, self.weekly) {
            (true, true) => return Err(Error::usage("Can't use --monthly and --weekly")),
            (true, false) => Period::Month,
            (false, true) => Period::Week,
            (false, false) => Period::Quarter,
        };
        let size_threshold = match (self.by_size, self.size_threshold) {
            (true, None) => return Err(Error::usage("--by-size needs --size-threshold")),
            (true, Some(0)) => return Err(Error::usage("--size-threshold must be positive")),
            (true, threshold) => threshold,
            (false, _) => None,
        };
        let start = match &self.start {
            Some(start) => parse_date(start)?,
            None => PeriodOptions::default_start(),
        };
        Ok(PeriodOptions {
            period,
            start,
            size_threshold,
            lines: self.lines,
            closed: self.closed,
        })
    }
}

pub async fn run<S: PullRequestSource>(
    options: PeriodOptions,
    source: &S,
    repos: &[Repository],
    multi_progress: &MultiProgress,
) -> Result<PeriodReport> {
    let query = FetchQuery {
        state: StateFilter::All,
        detail: options.detail_level(),
        org_scoped: true,
        since: None,
    };
    let mut aggregator = PeriodAggregator::new(options);
    for repo in repos {
        let pulls = fetch_repo(source, repo, &query, multi_progress).await?;
        if query.detail == DetailLevel::Full && pulls.iter().any(|p| p.lines.is_none()) {
            tracing::warn!(repo = %repo.name, "Some pull requests have no line counts, counting them as 0 lines");
        }
        aggregator.fold(&pulls)?;
    }
    Ok(aggregator.report())
}
