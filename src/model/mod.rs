mod error;
pub mod person;
pub mod pull_request;
mod repository;

pub use error::{Error, Result};
pub use person::{People, OTHER_ORG, UNSIGNED_ORG};
pub use pull_request::{
    ApiPullRequest, CombinedState, DetailLevel, Intext, PullRequest,
};
pub use repository::Repository;
