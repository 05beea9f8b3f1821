use crate::model::{ApiPullRequest, Error, People, PullRequest, Repository, Result};
use crate::source::{select, FetchQuery, PageProgress, PullRequestSource, StateFilter};
use gitea_sdk::model::issues::State;
use gitea_sdk::{Auth, Client};
use serde::Serialize;
use tracing::debug;

pub struct GiteaSource {
    client: Client,
    people: People,
}

impl GiteaSource {
    pub fn new(url: &String, token: &String, people: People) -> Self {
        Self {
            client: Client::new(url, Auth::Token(token)),
            people,
        }
    }
}

impl PullRequestSource for GiteaSource {
    async fn fetch<'a>(
        &self,
        repo: &Repository,
        query: &FetchQuery,
        mut cb: PageProgress<'a>,
    ) -> Result<Vec<PullRequest>> {
        let mut page = 1;
        let mut api_pulls: Vec<ApiPullRequest> = vec![];
        let pulls = self.client.pulls(&repo.owner, &repo.name);

        loop {
            cb(page);
            let gitea_pull_requests = pulls
                .list()
                .limit(50)
                .page(page)
                .state(gitea_state(query.state))
                .send(&self.client)
                .await
                .map_err(|err| {
                    Error::fetch(format!("{}/{}: {:?}", repo.owner, repo.name, err))
                })?;
            if gitea_pull_requests.is_empty() {
                break;
            }
            debug!(
                repo = %repo.name,
                page,
                count = gitea_pull_requests.len(),
                "Fetched page of pull requests"
            );

            for gitea_pull_request in &gitea_pull_requests {
                api_pulls.push(to_api_pull(gitea_pull_request)?);
            }
            page += 1;
        }

        select(api_pulls, &self.people, query)
    }
}

/// Re-reads an SDK pull request as the wire shape shared with snapshots.
fn to_api_pull(gitea_pull_request: &impl Serialize) -> Result<ApiPullRequest> {
    serde_json::to_value(gitea_pull_request)
        .and_then(serde_json::from_value)
        .map_err(|err| Error::fetch(format!("unexpected pull request payload: {err}")))
}

fn gitea_state(state: StateFilter) -> State {
    match state {
        StateFilter::Open => State::Open,
        StateFilter::Closed => State::Closed,
        StateFilter::All => State::All,
    }
}
