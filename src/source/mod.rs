pub mod gitea;
pub mod snapshot;

pub use gitea::GiteaSource;
pub use snapshot::SnapshotSource;

use crate::model::{
    ApiPullRequest, CombinedState, DetailLevel, People, PullRequest, Repository, Result,
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StateFilter {
    Open,
    Closed,
    All,
}

impl StateFilter {
    fn accepts(&self, state: CombinedState) -> bool {
        match self {
            StateFilter::Open => state == CombinedState::Open,
            StateFilter::Closed => state != CombinedState::Open,
            StateFilter::All => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchQuery {
    pub state: StateFilter,
    pub detail: DetailLevel,
    /// Attach the author's organization to each pull.
    pub org_scoped: bool,
    /// Keep pulls with any event at or after this moment.
    pub since: Option<DateTime<Utc>>,
}

pub type PageProgress<'a> = Box<dyn FnMut(i64) + 'a>;

pub trait PullRequestSource {
    async fn fetch<'a>(
        &self,
        repo: &Repository,
        query: &FetchQuery,
        cb: PageProgress<'a>,
    ) -> Result<Vec<PullRequest>>;
}

/// Normalizes raw API pulls and applies the query filters.
fn select(
    api_pulls: impl IntoIterator<Item = ApiPullRequest>,
    people: &People,
    query: &FetchQuery,
) -> Result<Vec<PullRequest>> {
    let mut pulls = Vec::new();
    for api_pull in api_pulls {
        let pull = PullRequest::normalize(api_pull, people, query.detail, query.org_scoped)?;
        if !query.state.accepts(pull.state) {
            continue;
        }
        if let Some(since) = query.since {
            if pull.last_event_at() < since {
                continue;
            }
        }
        pulls.push(pull);
    }
    Ok(pulls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn api(number: u64, state: &str, created: &str, merged: Option<&str>) -> ApiPullRequest {
        serde_json::from_value(json!({
            "number": number,
            "title": "t",
            "user": { "login": "someone" },
            "base": { "ref": "master" },
            "state": state,
            "created_at": created,
            "merged_at": merged,
            "closed_at": merged,
        }))
        .unwrap()
    }

    fn query(state: StateFilter, since: Option<DateTime<Utc>>) -> FetchQuery {
        FetchQuery {
            state,
            detail: DetailLevel::List,
            org_scoped: true,
            since,
        }
    }

    fn numbers(pulls: &[PullRequest]) -> Vec<u64> {
        pulls.iter().map(|p| p.number).collect()
    }

    fn sample() -> Vec<ApiPullRequest> {
        vec![
            api(1, "open", "2023-01-01T00:00:00Z", None),
            api(2, "closed", "2023-01-01T00:00:00Z", Some("2023-03-01T00:00:00Z")),
            api(3, "closed", "2022-01-01T00:00:00Z", Some("2022-02-01T00:00:00Z")),
        ]
    }

    #[test]
    fn state_filter_selects_pulls() {
        let people = People::default();
        let open = select(sample(), &people, &query(StateFilter::Open, None)).unwrap();
        assert_eq!(numbers(&open), vec![1]);
        let closed = select(sample(), &people, &query(StateFilter::Closed, None)).unwrap();
        assert_eq!(numbers(&closed), vec![2, 3]);
        let all = select(sample(), &people, &query(StateFilter::All, None)).unwrap();
        assert_eq!(numbers(&all), vec![1, 2, 3]);
    }

    #[test]
    fn since_keeps_pulls_with_a_recent_event() {
        let since = Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap();
        let pulls = select(sample(), &People::default(), &query(StateFilter::All, Some(since)))
            .unwrap();
        assert_eq!(numbers(&pulls), vec![2]);
    }
}
