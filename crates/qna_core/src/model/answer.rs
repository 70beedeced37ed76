//! Answer entity.
//!
//! # Invariants
//! - `writer` never changes after construction.
//! - `question_id` is bound at most once; an answer is never re-parented.
//! - `is_deleted` only moves from `false` to `true`.

use crate::error::{IllegalStateError, QnaResult, ValidationError};
use crate::model::identity::Identity;
use crate::model::question::{validate_contents, QuestionId};
use serde::Serialize;
use uuid::Uuid;

pub type AnswerId = Uuid;

/// Reply attached to exactly one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    id: AnswerId,
    writer: Identity,
    question_id: Option<QuestionId>,
    contents: String,
    is_deleted: bool,
}

impl Answer {
    /// Creates a detached answer with a generated id.
    pub fn new(writer: Identity, contents: impl Into<String>) -> QnaResult<Self> {
        Self::with_id(Uuid::new_v4(), writer, contents)
    }

    /// Creates a detached answer with a caller-provided id.
    pub fn with_id(id: AnswerId, writer: Identity, contents: impl Into<String>) -> QnaResult<Self> {
        if id.is_nil() {
            return Err(ValidationError::NilId.into());
        }
        let contents = validate_contents(contents.into())?;
        Ok(Self {
            id,
            writer,
            question_id: None,
            contents,
            is_deleted: false,
        })
    }

    /// Rebuilds an answer from persisted columns without re-running input
    /// normalization.
    pub(crate) fn from_persisted(
        id: AnswerId,
        writer: Identity,
        question_id: QuestionId,
        contents: String,
        is_deleted: bool,
    ) -> Self {
        Self {
            id,
            writer,
            question_id: Some(question_id),
            contents,
            is_deleted,
        }
    }

    pub fn id(&self) -> AnswerId {
        self.id
    }

    pub fn writer(&self) -> Identity {
        self.writer
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Owning question, once attached.
    pub fn question_id(&self) -> Option<QuestionId> {
        self.question_id
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        self.writer == *identity
    }

    /// Binds this answer to its owning question.
    ///
    /// Binding to the same question again is a no-op.
    pub fn attach_to(&mut self, question_id: QuestionId) -> QnaResult<()> {
        match self.question_id {
            Some(current) if current != question_id => {
                Err(IllegalStateError::AnswerAlreadyAttached {
                    answer_id: self.id,
                    question_id: current,
                }
                .into())
            }
            _ => {
                self.question_id = Some(question_id);
                Ok(())
            }
        }
    }

    /// Marks this answer as softly deleted.
    ///
    /// Authorization is checked by `Answers::delete_all` before this runs.
    pub(crate) fn delete(&mut self) {
        self.is_deleted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::Answer;
    use crate::error::{IllegalStateError, QnaError, ValidationError};
    use crate::model::identity::Identity;
    use uuid::Uuid;

    #[test]
    fn new_answer_is_detached_and_active() {
        let writer = Identity::generate();
        let answer = Answer::new(writer, "use a transaction").unwrap();

        assert!(!answer.id().is_nil());
        assert_eq!(answer.question_id(), None);
        assert!(!answer.is_deleted());
        assert!(answer.is_owned_by(&writer));
        assert!(!answer.is_owned_by(&Identity::generate()));
    }

    #[test]
    fn blank_contents_are_rejected() {
        let err = Answer::new(Identity::generate(), " \n ").unwrap_err();
        assert_eq!(err, QnaError::Validation(ValidationError::EmptyContents));
    }

    #[test]
    fn attach_to_same_question_is_noop_and_other_question_fails() {
        let mut answer = Answer::new(Identity::generate(), "body").unwrap();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        answer.attach_to(first).unwrap();
        answer.attach_to(first).unwrap();

        let err = answer.attach_to(second).unwrap_err();
        assert_eq!(
            err,
            QnaError::IllegalState(IllegalStateError::AnswerAlreadyAttached {
                answer_id: answer.id(),
                question_id: first,
            })
        );
        assert_eq!(answer.question_id(), Some(first));
    }
}
