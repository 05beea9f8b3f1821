use crate::model::{CombinedState, Intext, PullRequest, OTHER_ORG, UNSIGNED_ORG};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Merged external pulls grouped by contributing organization.
#[derive(Debug, Clone, Default)]
pub struct OrgSummary {
    end: Option<DateTime<Utc>>,
    by_org: IndexMap<String, Vec<PullRequest>>,
}

impl OrgSummary {
    pub fn new(end: Option<DateTime<Utc>>) -> Self {
        Self {
            end,
            by_org: IndexMap::new(),
        }
    }

    pub fn fold(&mut self, pulls: impl IntoIterator<Item = PullRequest>) {
        for pull in pulls {
            self.insert(pull);
        }
    }

    pub fn insert(&mut self, pull: PullRequest) {
        if pull.intext != Intext::External || pull.state != CombinedState::Merged {
            return;
        }
        if let (Some(end), Some(merged_at)) = (self.end, pull.merged_at) {
            if merged_at >= end {
                return;
            }
        }
        let org = pull.org.clone().unwrap_or_else(|| OTHER_ORG.to_string());
        self.by_org.entry(org).or_default().push(pull);
    }

    /// Organizations by descending merged count, ties in first-seen order.
    pub fn counts(&self) -> Vec<(&str, usize)> {
        let mut counts = self
            .by_org
            .iter()
            .map(|(org, pulls)| (org.as_str(), pulls.len()))
            .collect::<Vec<_>>();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    pub fn pulls_of(&self, org: &str) -> &[PullRequest] {
        self.by_org.get(org).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn other(&self) -> &[PullRequest] {
        self.pulls_of(OTHER_ORG)
    }

    pub fn unsigned(&self) -> &[PullRequest] {
        self.pulls_of(UNSIGNED_ORG)
    }
}
