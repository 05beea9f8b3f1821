use crate::model::{Error, People, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum Intext {
    Internal,
    External,
}

impl Intext {
    pub const ALL: [Intext; 2] = [Intext::Internal, Intext::External];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intext::Internal => "internal",
            Intext::External => "external",
        }
    }
}

impl fmt::Display for Intext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum CombinedState {
    Open,
    Closed,
    Merged,
}

impl CombinedState {
    pub fn derive(raw_state: &str, merged_at: Option<&DateTime<Utc>>) -> Self {
        if merged_at.is_some() {
            CombinedState::Merged
        } else if raw_state.eq_ignore_ascii_case("closed") {
            CombinedState::Closed
        } else {
            CombinedState::Open
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct LineStats {
    pub additions: u64,
    pub deletions: u64,
}

impl LineStats {
    pub fn total(&self) -> u64 {
        self.additions + self.deletions
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub author_login: String,
    pub base_ref: String,
    pub state: CombinedState,
    pub intext: Intext,
    pub org: Option<String>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub lines: Option<LineStats>,
}

/// Pull request as returned by the Gitea/GitHub pulls API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub user: ApiUser,
    pub base: ApiBranch,
    pub state: String,
    pub created_at: String,
    #[serde(default)]
    pub merged_at: Option<String>,
    #[serde(default)]
    pub closed_at: Option<String>,
    #[serde(default)]
    pub additions: Option<u64>,
    #[serde(default)]
    pub deletions: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiBranch {
    #[serde(rename = "ref")]
    pub name: String,
}

/// Controls how much of a fetched pull request is kept.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DetailLevel {
    /// Cheap listing, line counts are dropped.
    List,
    Full,
}

impl PullRequest {
    pub fn normalize(
        api: ApiPullRequest,
        people: &People,
        detail: DetailLevel,
        org_scoped: bool,
    ) -> Result<Self> {
        let created_at = parse_timestamp(&api.created_at)?;
        let merged_at = api.merged_at.as_deref().map(parse_timestamp).transpose()?;
        let closed_at = api.closed_at.as_deref().map(parse_timestamp).transpose()?;
        let state = CombinedState::derive(&api.state, merged_at.as_ref());
        let affiliation = people.affiliation(&api.user.login);
        let lines = match (detail, api.additions, api.deletions) {
            (DetailLevel::Full, Some(additions), Some(deletions)) => Some(LineStats {
                additions,
                deletions,
            }),
            _ => None,
        };

        Ok(Self {
            number: api.number,
            title: api.title,
            author_login: api.user.login,
            base_ref: api.base.name,
            state,
            intext: affiliation.intext,
            org: org_scoped.then_some(affiliation.org),
            created_at,
            merged_at,
            closed_at,
            lines,
        })
    }

    /// Latest event of the pull request, used for `since` filtering.
    pub fn last_event_at(&self) -> DateTime<Utc> {
        [Some(self.created_at), self.merged_at, self.closed_at]
            .into_iter()
            .flatten()
            .max()
            .unwrap_or(self.created_at)
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|datetime| datetime.with_timezone(&Utc))
        .map_err(|_| Error::fetch(format!("Not a valid date time: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::person::Person;

    fn api(state: &str, merged_at: Option<&str>) -> ApiPullRequest {
        serde_json::from_value(serde_json::json!({
            "number": 42,
            "title": "Fix the thing",
            "user": { "login": "alice" },
            "base": { "ref": "master" },
            "state": state,
            "created_at": "2023-01-10T08:00:00+02:00",
            "merged_at": merged_at,
            "closed_at": merged_at,
            "additions": 10,
            "deletions": 5
        }))
        .unwrap()
    }

    fn people() -> People {
        People::new(vec![Person::new("alice", Some("acme"), true)], &["edX"])
    }

    #[test]
    fn merged_iff_merged_at_present() {
        let merged = PullRequest::normalize(
            api("closed", Some("2023-02-01T00:00:00Z")),
            &people(),
            DetailLevel::List,
            true,
        )
        .unwrap();
        assert_eq!(merged.state, CombinedState::Merged);

        let closed =
            PullRequest::normalize(api("closed", None), &people(), DetailLevel::List, true)
                .unwrap();
        assert_eq!(closed.state, CombinedState::Closed);

        let open =
            PullRequest::normalize(api("open", None), &people(), DetailLevel::List, true).unwrap();
        assert_eq!(open.state, CombinedState::Open);
    }

    #[test]
    fn timestamps_are_normalized_to_utc() {
        let pull =
            PullRequest::normalize(api("open", None), &people(), DetailLevel::List, true).unwrap();
        assert_eq!(pull.created_at.to_rfc3339(), "2023-01-10T06:00:00+00:00");
    }

    #[test]
    fn list_detail_drops_line_counts() {
        let listed =
            PullRequest::normalize(api("open", None), &people(), DetailLevel::List, true).unwrap();
        assert_eq!(listed.lines, None);

        let full =
            PullRequest::normalize(api("open", None), &people(), DetailLevel::Full, true).unwrap();
        assert_eq!(full.lines.map(|l| l.total()), Some(15));
    }

    #[test]
    fn org_is_only_attached_when_scoped() {
        let scoped =
            PullRequest::normalize(api("open", None), &people(), DetailLevel::List, true).unwrap();
        assert_eq!(scoped.org.as_deref(), Some("acme"));
        assert_eq!(scoped.intext, Intext::External);

        let unscoped =
            PullRequest::normalize(api("open", None), &people(), DetailLevel::List, false).unwrap();
        assert_eq!(unscoped.org, None);
    }

    #[test]
    fn invalid_timestamp_is_rejected() {
        let mut raw = api("open", None);
        raw.created_at = "2023-01-10 08:00".to_string();
        let err = PullRequest::normalize(raw, &people(), DetailLevel::List, true).unwrap_err();
        assert!(matches!(err, Error::Source(_)));
    }
}
