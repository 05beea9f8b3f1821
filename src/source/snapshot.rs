use crate::model::{ApiPullRequest, Error, People, PullRequest, Repository, Result};
use crate::source::{select, FetchQuery, PageProgress, PullRequestSource};
use indexmap::IndexMap;
use std::fs;

/// Pull requests exported ahead of time, keyed by `owner/name` or `name`.
pub struct SnapshotSource {
    repos: IndexMap<String, Vec<ApiPullRequest>>,
    people: People,
}

impl SnapshotSource {
    pub fn from_file(path: &str, people: People) -> Result<Self> {
        let json_str = fs::read_to_string(path)
            .map_err(|err| Error::config(format!("can't read snapshot `{path}`: {err}")))?;
        Self::parse(&json_str, people)
    }

    fn parse(json_str: &str, people: People) -> Result<Self> {
        let repos: IndexMap<String, Vec<ApiPullRequest>> = serde_json::from_str(json_str)?;
        Ok(Self { repos, people })
    }

    fn pulls_of(&self, repo: &Repository) -> Option<&Vec<ApiPullRequest>> {
        self.repos
            .get(&format!("{}/{}", repo.owner, repo.name))
            .or_else(|| self.repos.get(&repo.name))
    }
}

impl PullRequestSource for SnapshotSource {
    async fn fetch<'a>(
        &self,
        repo: &Repository,
        query: &FetchQuery,
        mut cb: PageProgress<'a>,
    ) -> Result<Vec<PullRequest>> {
        cb(1);
        let Some(api_pulls) = self.pulls_of(repo) else {
            return Err(Error::fetch(format!(
                "{}/{} not in snapshot",
                repo.owner, repo.name
            )));
        };
        select(api_pulls.iter().cloned(), &self.people, query)
    }
}
