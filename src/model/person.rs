use crate::model::{Error, Intext, Result};
use indexmap::IndexMap;
use serde_json::{from_str, Value};
use std::collections::HashSet;
use std::fs;

/// Organization bucket for signed contributors without an organization.
pub const OTHER_ORG: &str = "other";
/// Organization bucket for authors without a contributor agreement on file.
pub const UNSIGNED_ORG: &str = "unsigned";

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Person {
    pub login: String,
    pub org: Option<String>,
    pub signed: bool,
}

// Create
impl Person {
    pub fn new(login: impl ToString, org: Option<impl ToString>, signed: bool) -> Self {
        Self {
            login: login.to_string(),
            org: org.map(|o| o.to_string()),
            signed,
        }
    }
}

/// Resolves an author login to its organization and internal/external class.
#[derive(Debug, Clone, Default)]
pub struct People {
    people: IndexMap<String, Person>,
    internal_orgs: HashSet<String>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Affiliation {
    pub intext: Intext,
    pub org: String,
}

impl People {
    pub fn from_config(path: &str, internal_orgs: &[String]) -> Result<Self> {
        let json_str = fs::read_to_string(path)
            .map_err(|err| Error::config(format!("can't read `{path}`: {err}")))?;
        Ok(Self::new(Self::parse(&json_str)?, internal_orgs))
    }

    pub fn new(people: Vec<Person>, internal_orgs: &[impl ToString]) -> Self {
        Self {
            people: people
                .into_iter()
                .map(|p| (p.login.to_lowercase(), p))
                .collect(),
            internal_orgs: internal_orgs.iter().map(|o| o.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn affiliation(&self, login: &str) -> Affiliation {
        let person = self
            .people
            .get(&login.to_lowercase())
            .filter(|p| p.signed);
        let Some(person) = person else {
            return Affiliation {
                intext: Intext::External,
                org: UNSIGNED_ORG.to_string(),
            };
        };
        match &person.org {
            Some(org) if self.internal_orgs.contains(org) => Affiliation {
                intext: Intext::Internal,
                org: org.clone(),
            },
            Some(org) => Affiliation {
                intext: Intext::External,
                org: org.clone(),
            },
            None => Affiliation {
                intext: Intext::External,
                org: OTHER_ORG.to_string(),
            },
        }
    }
}

// Parser
impl People {
    fn parse(json_str: &str) -> Result<Vec<Person>> {
        let elements: IndexMap<String, Value> = from_str(json_str)?;
        let mut result = Vec::new();
        for (login, details) in elements {
            let org = match &details["org"] {
                Value::Null => None,
                Value::String(org) if org.trim().is_empty() => None,
                Value::String(org) => Some(org.clone()),
                _ => return Err(Error::config(format!("'org' for `{login}` must be a string"))),
            };
            let Some(signed) = details["signed"].as_bool() else {
                return Err(Error::config(format!("Not found 'signed' field for `{login}`")));
            };
            result.push(Person::new(login, org, signed));
        }
        Ok(result)
    }
}
