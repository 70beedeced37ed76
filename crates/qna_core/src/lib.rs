//! Core domain logic for the Q&A deletion workflow.
//! This crate is the single source of truth for ownership and audit rules.

pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use error::{IllegalStateError, QnaError, QnaResult, ValidationError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::answer::{Answer, AnswerId};
pub use model::answers::{Answers, DeletePolicy};
pub use model::delete_history::{ContentType, DeleteHistories, DeleteHistory};
pub use model::identity::{Identity, UserId};
pub use model::question::{Question, QuestionId, TITLE_MAX_CHARS};
pub use repo::question_repo::{
    QuestionRepository, RepoError, RepoResult, SqliteQuestionRepository,
};
pub use service::question_service::{QuestionService, ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
