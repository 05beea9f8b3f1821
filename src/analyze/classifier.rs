use crate::model::{Intext, PullRequest};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static RELEASE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^release$|^rc/").expect("valid release ref pattern"));

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum Size {
    Small,
    Large,
}

impl Size {
    pub const ALL: [Size; 2] = [Size::Small, Size::Large];

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::Small => "small",
            Size::Large => "large",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify_intext(pull: &PullRequest) -> Intext {
    pull.intext
}

/// Pulls changing fewer lines than `threshold` are small.
pub fn classify_size(pull: &PullRequest, threshold: u64) -> Size {
    if lines_in_pull(pull) < threshold {
        Size::Small
    } else {
        Size::Large
    }
}

/// Changed lines, zero when line counts were not fetched.
pub fn lines_in_pull(pull: &PullRequest) -> u64 {
    pull.lines.map(|lines| lines.total()).unwrap_or(0)
}

/// Release-process pulls don't count as contributions.
pub fn excluded_by_ref(pull: &PullRequest) -> bool {
    RELEASE_REF.is_match(&pull.base_ref)
}
