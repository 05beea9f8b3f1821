use crate::model::{Error, Result};
use indexmap::IndexMap;
use serde_json::{from_str, Value};
use std::fs;

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Repository {
    pub name: String,
    pub owner: String,
    pub track_pulls: bool,
}

// New
impl Repository {
    pub fn from_config(path: &str) -> Result<Vec<Self>> {
        let json_str = fs::read_to_string(path)
            .map_err(|err| Error::config(format!("can't read `{path}`: {err}")))?;
        Self::parse(&json_str)
    }

    pub fn new(name: impl ToString, owner: impl ToString, track_pulls: bool) -> Self {
        Self {
            name: name.to_string(),
            owner: owner.to_string(),
            track_pulls,
        }
    }

    pub fn tracked(repos: Vec<Self>) -> Vec<Self> {
        repos.into_iter().filter(|repo| repo.track_pulls).collect()
    }
}

// Parser
impl Repository {
    fn parse(json_str: &str) -> Result<Vec<Self>> {
        let elements: IndexMap<String, Value> = from_str(json_str)?;
        let mut result = Vec::new();
        for (name, details) in elements {
            let Some(owner) = details["owner"].as_str() else {
                return Err(Error::config(format!("Not found 'owner' field for `{name}`")));
            };
            let track_pulls = match &details["track_pulls"] {
                Value::Null => true,
                Value::Bool(track) => *track,
                other => {
                    return Err(Error::config(format!(
                        "'track_pulls' for `{name}` must be a boolean, got {other}"
                    )))
                }
            };
            result.push(Self::new(name, owner, track_pulls));
        }
        Ok(result)
    }
}
