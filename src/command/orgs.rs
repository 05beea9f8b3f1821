use crate::analyze::OrgSummary;
use crate::command::dates::{midnight, parse_date};
use crate::command::fetch_repo;
use crate::model::{DetailLevel, Error, Repository, Result};
use crate::source::{FetchQuery, PullRequestSource, StateFilter};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use indicatif::MultiProgress;

/// Summarize merged external pull requests by organization.
#[derive(Args, Debug, Clone, Default)]
pub struct OrgsArgs {
    /// Only consider pull requests closed in the past DAYS days (0 means no limit)
    #[arg(long, value_name = "DAYS")]
    pub since: Option<u32>,
    /// Date to start collecting, e.g. 20141225, Dec/25/2014, 2014-12-25
    #[arg(long)]
    pub start: Option<String>,
    /// Date to end collecting (exclusive), e.g. 25/Dec/2014, 12/25/2014
    #[arg(long)]
    pub end: Option<String>,
}

/// `[start, end)` window of the organization summary.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OrgWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl OrgsArgs {
    pub fn window(&self, now: DateTime<Utc>) -> Result<OrgWindow> {
        let since = self.since.filter(|days| *days > 0);
        let start = match (since, &self.start) {
            (Some(_), Some(_)) => return Err(Error::usage("Can't use --since and --start")),
            (Some(days), None) => {
                Some(midnight(now.date_naive()) - Duration::days(i64::from(days)))
            }
            (None, Some(start)) => Some(parse_date(start)?),
            (None, None) => None,
        };
        let end = self.end.as_deref().map(parse_date).transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                return Err(Error::usage("--end must be after the start of the window"));
            }
        }
        Ok(OrgWindow { start, end })
    }
}

pub async fn run<S: PullRequestSource>(
    window: OrgWindow,
    source: &S,
    repos: &[Repository],
    multi_progress: &MultiProgress,
) -> Result<OrgSummary> {
    let query = FetchQuery {
        state: StateFilter::Closed,
        detail: DetailLevel::List,
        org_scoped: true,
        since: window.start,
    };
    let mut summary = OrgSummary::new(window.end);
    for repo in repos {
        let pulls = fetch_repo(source, repo, &query, multi_progress).await?;
        summary.fold(pulls);
    }
    Ok(summary)
}
