//! Question aggregate root.
//!
//! # Responsibility
//! - Validate question input at construction.
//! - Own the answer collection and run the authorized delete protocol.
//!
//! # Invariants
//! - `writer` is set once at creation and never changes.
//! - Deletion is all-or-nothing: every check runs before any flag flips.
//! - A deleted question rejects revision, new answers and re-deletion.

use crate::error::{IllegalStateError, QnaError, QnaResult, ValidationError};
use crate::model::answer::Answer;
use crate::model::answers::{Answers, DeletePolicy};
use crate::model::delete_history::{ContentType, DeleteHistories, DeleteHistory};
use crate::model::identity::Identity;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub type QuestionId = Uuid;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    title: String,
    contents: String,
    writer: Identity,
    is_deleted: bool,
    answers: Answers,
}

impl Question {
    /// Creates a question with a generated id.
    ///
    /// Checks run in order title, contents, author; the first failure wins.
    pub fn create(
        title: impl Into<String>,
        contents: impl Into<String>,
        author: Option<Identity>,
    ) -> QnaResult<Self> {
        Self::with_id(Uuid::new_v4(), title, contents, author)
    }

    /// Creates a question with a caller-provided id.
    pub fn with_id(
        id: QuestionId,
        title: impl Into<String>,
        contents: impl Into<String>,
        author: Option<Identity>,
    ) -> QnaResult<Self> {
        if id.is_nil() {
            return Err(ValidationError::NilId.into());
        }
        let title = validate_title(title.into())?;
        let contents = validate_contents(contents.into())?;
        let writer = author.ok_or(QnaError::Unauthenticated)?;

        Ok(Self {
            id,
            title,
            contents,
            writer,
            is_deleted: false,
            answers: Answers::new(id),
        })
    }

    pub(crate) fn from_persisted(
        id: QuestionId,
        title: String,
        contents: String,
        writer: Identity,
        is_deleted: bool,
    ) -> Self {
        Self {
            id,
            title,
            contents,
            writer,
            is_deleted,
            answers: Answers::new(id),
        }
    }

    pub fn id(&self) -> QuestionId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn writer(&self) -> Identity {
        self.writer
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub(crate) fn answers_mut(&mut self) -> &mut Answers {
        &mut self.answers
    }

    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        self.writer == *identity
    }

    /// Attaches `answer` to this question.
    pub fn add_answer(&mut self, answer: Answer) -> QnaResult<()> {
        self.ensure_active()?;
        self.answers.add(answer)
    }

    /// Replaces title and contents. Both are validated before either changes.
    pub fn revise(
        &mut self,
        title: impl Into<String>,
        contents: impl Into<String>,
    ) -> QnaResult<()> {
        self.ensure_active()?;
        let title = validate_title(title.into())?;
        let contents = validate_contents(contents.into())?;
        self.title = title;
        self.contents = contents;
        Ok(())
    }

    /// Deletes this question and its answers on behalf of `deleter`.
    pub fn delete(&mut self, deleter: &Identity) -> QnaResult<DeleteHistories> {
        self.delete_at(deleter, now_epoch_ms())
    }

    /// Same as [`Question::delete`] with an explicit timestamp.
    pub fn delete_at(&mut self, deleter: &Identity, created_at: i64) -> QnaResult<DeleteHistories> {
        self.delete_with_policy(deleter, DeletePolicy::default(), created_at)
    }

    /// Deletes under an explicit answer authorization policy.
    ///
    /// The returned histories hold the question entry first, then one entry
    /// per deleted answer in collection order.
    pub fn delete_with_policy(
        &mut self,
        deleter: &Identity,
        policy: DeletePolicy,
        created_at: i64,
    ) -> QnaResult<DeleteHistories> {
        self.ensure_active()?;
        if !self.is_owned_by(deleter) {
            return Err(QnaError::DeletionNotAllowed {
                content_type: ContentType::Question,
                content_id: self.id,
            });
        }

        // Answers validate every child before flipping any flag, so the
        // question flag is only set once the cascade has succeeded.
        let answer_histories = self
            .answers
            .delete_all_with_policy(deleter, policy, created_at)?;
        self.is_deleted = true;

        let mut histories = DeleteHistories::new();
        histories
            .add_history(DeleteHistory::of_question(self.id, *deleter, created_at))
            .add_all(answer_histories);
        Ok(histories)
    }

    fn ensure_active(&self) -> QnaResult<()> {
        if self.is_deleted {
            return Err(IllegalStateError::AlreadyDeleted {
                content_type: ContentType::Question,
                content_id: self.id,
            }
            .into());
        }
        Ok(())
    }
}

/// Trims and bounds a question title.
pub fn validate_title(title: String) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let actual = trimmed.chars().count();
    if actual > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong {
            max: TITLE_MAX_CHARS,
            actual,
        });
    }
    Ok(trimmed.to_string())
}

/// Rejects blank bodies. Inner whitespace and markdown are kept as-is.
pub fn validate_contents(contents: String) -> Result<String, ValidationError> {
    if contents.trim().is_empty() {
        return Err(ValidationError::EmptyContents);
    }
    Ok(contents)
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{validate_contents, validate_title, TITLE_MAX_CHARS};
    use crate::error::ValidationError;

    #[test]
    fn validate_title_trims_and_counts_chars() {
        assert_eq!(validate_title("  hello ".to_string()).unwrap(), "hello");

        let at_limit = "가".repeat(TITLE_MAX_CHARS);
        assert!(validate_title(at_limit).is_ok());

        let too_long = "a".repeat(TITLE_MAX_CHARS + 1);
        assert_eq!(
            validate_title(too_long).unwrap_err(),
            ValidationError::TitleTooLong {
                max: TITLE_MAX_CHARS,
                actual: TITLE_MAX_CHARS + 1,
            }
        );
    }

    #[test]
    fn validate_contents_keeps_original_text() {
        let body = "  line one\n\nline two  ".to_string();
        assert_eq!(validate_contents(body.clone()).unwrap(), body);
        assert_eq!(
            validate_contents("\t".to_string()).unwrap_err(),
            ValidationError::EmptyContents
        );
    }
}
