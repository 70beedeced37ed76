//! Question use-case service.
//!
//! # Responsibility
//! - Resolve the acting identity and load the full aggregate before mutation.
//! - Hand deletion results to the repository as one unit of work.
//!
//! # Invariants
//! - Domain rules are enforced by `Question`; this layer never bypasses them.
//! - A rejected deletion performs no repository writes.

use crate::error::QnaError;
use crate::model::answer::Answer;
use crate::model::answers::DeletePolicy;
use crate::model::delete_history::{DeleteHistories, DeleteHistory};
use crate::model::identity::Identity;
use crate::model::question::{now_epoch_ms, Question, QuestionId};
use crate::repo::question_repo::{QuestionRepository, RepoError};
use log::{info, warn};
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from question service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Domain rule rejected the operation.
    #[error(transparent)]
    Domain(QnaError),
    /// Target question does not exist or is hidden.
    #[error("question not found: {0}")]
    QuestionNotFound(QuestionId),
    /// Repository-level failure.
    #[error(transparent)]
    Repo(RepoError),
}

impl From<QnaError> for ServiceError {
    fn from(value: QnaError) -> Self {
        Self::Domain(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::QuestionNotFound(id),
            RepoError::Domain(err) => Self::Domain(err),
            other => Self::Repo(other),
        }
    }
}

/// Question service facade.
pub struct QuestionService<R: QuestionRepository> {
    repo: R,
    policy: DeletePolicy,
}

impl<R: QuestionRepository> QuestionService<R> {
    /// Creates a service that requires every answer to be owned by the deleter.
    pub fn new(repo: R) -> Self {
        Self::with_policy(repo, DeletePolicy::default())
    }

    pub fn with_policy(repo: R, policy: DeletePolicy) -> Self {
        Self { repo, policy }
    }

    pub fn policy(&self) -> DeletePolicy {
        self.policy
    }

    /// Validates and stores a new question.
    pub fn create_question(
        &mut self,
        title: impl Into<String>,
        contents: impl Into<String>,
        author: Option<Identity>,
    ) -> ServiceResult<Question> {
        let question = Question::create(title, contents, author)?;
        self.repo.create_question(&question)?;
        info!(
            "event=question_create module=service status=ok question_id={}",
            question.id()
        );
        Ok(question)
    }

    /// Adds an answer written by `author` to an existing question.
    pub fn add_answer(
        &mut self,
        question_id: QuestionId,
        author: Option<Identity>,
        contents: impl Into<String>,
    ) -> ServiceResult<Answer> {
        let author = author.ok_or(QnaError::Unauthenticated)?;
        let answer = Answer::new(author, contents)?;
        let mut created = answer.clone();

        let mut question = self.load(question_id, true)?;
        question.add_answer(answer)?;
        created.attach_to(question.id())?;
        self.repo.save(&question)?;

        info!(
            "event=answer_create module=service status=ok question_id={question_id} answer_id={}",
            created.id()
        );
        Ok(created)
    }

    /// Returns an active question with its answers.
    pub fn get_question(&self, question_id: QuestionId) -> ServiceResult<Option<Question>> {
        Ok(self
            .repo
            .load_question_with_answers(question_id, false)?)
    }

    /// Deletes a question and its answers on behalf of `actor`.
    ///
    /// # Contract
    /// - `actor = None` fails with `Unauthenticated` before any load.
    /// - Deleted questions are loaded so that re-deletion reports
    ///   `IllegalState` instead of not-found.
    /// - Flag updates and history rows are committed together.
    pub fn delete_question(
        &mut self,
        question_id: QuestionId,
        actor: Option<Identity>,
    ) -> ServiceResult<DeleteHistories> {
        let actor = actor.ok_or(QnaError::Unauthenticated)?;
        let mut question = self.load(question_id, true)?;

        let histories = match question.delete_with_policy(&actor, self.policy, now_epoch_ms()) {
            Ok(histories) => histories,
            Err(err) => {
                warn!(
                    "event=question_delete module=service status=rejected question_id={question_id} error={err}"
                );
                return Err(err.into());
            }
        };

        self.repo.save_deletion(&question, &histories)?;
        info!(
            "event=question_delete module=service status=ok question_id={question_id} histories={}",
            histories.len()
        );
        Ok(histories)
    }

    /// Lists the stored deletion audit trail.
    pub fn delete_histories(&self) -> ServiceResult<Vec<DeleteHistory>> {
        Ok(self.repo.list_delete_histories()?)
    }

    fn load(&self, question_id: QuestionId, include_deleted: bool) -> ServiceResult<Question> {
        self.repo
            .load_question_with_answers(question_id, include_deleted)?
            .ok_or(ServiceError::QuestionNotFound(question_id))
    }
}
