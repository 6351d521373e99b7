//! Committee scoring: validated score submissions persisted through a
//! repository, plus the HTTP routes the secure portal calls.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::ScoreSubmission;
pub use repository::{RepositoryError, ScoreRepository};
pub use router::{committee_router, ROLE_HEADER};
pub use service::{CommitteeScoringService, ScoringServiceError};
