//! Domain error taxonomy.
//!
//! # Responsibility
//! - Describe every failure the question/answer aggregate can report.
//! - Stay free of storage and logging concerns.
//!
//! # Invariants
//! - Domain operations that return an error have not mutated any state.

use crate::model::delete_history::ContentType;
use crate::model::question::QuestionId;
use thiserror::Error;
use uuid::Uuid;

pub type QnaResult<T> = Result<T, QnaError>;

/// Errors raised by the question/answer aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QnaError {
    /// Malformed input at construction or revision.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No acting identity was supplied.
    #[error("an authenticated user is required")]
    Unauthenticated,
    /// Ownership check failed for the named content.
    #[error("not allowed to delete {content_type} {content_id}")]
    DeletionNotAllowed {
        content_type: ContentType,
        content_id: Uuid,
    },
    /// Operation conflicts with the entity lifecycle.
    #[error(transparent)]
    IllegalState(#[from] IllegalStateError),
}

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters, got {actual}")]
    TitleTooLong { max: usize, actual: usize },
    #[error("contents must not be empty")]
    EmptyContents,
    #[error("id must not be nil")]
    NilId,
}

/// Lifecycle violations. These indicate misuse, not user error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalStateError {
    #[error("{content_type} {content_id} is already deleted")]
    AlreadyDeleted {
        content_type: ContentType,
        content_id: Uuid,
    },
    #[error("answer {answer_id} already belongs to question {question_id}")]
    AnswerAlreadyAttached {
        answer_id: Uuid,
        question_id: QuestionId,
    },
}
