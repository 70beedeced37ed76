//! Ordered answer collection owned by one question.
//!
//! # Responsibility
//! - Keep answers in insertion order.
//! - Run the cascade deletion with validate-then-commit semantics.
//!
//! # Invariants
//! - Every contained answer is bound to `question_id`.
//! - A failed cascade leaves every answer untouched.
//! - Already-deleted answers take no part in a cascade.

use crate::error::{QnaError, QnaResult};
use crate::model::answer::{Answer, AnswerId};
use crate::model::delete_history::{ContentType, DeleteHistories, DeleteHistory};
use crate::model::identity::Identity;
use crate::model::question::QuestionId;
use serde::Serialize;

/// Authorization rule applied to answers during a question deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Every active answer must be written by the deleter.
    #[default]
    AnswerAuthors,
    /// The question owner may delete every answer regardless of author.
    QuestionOwner,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Answers {
    #[serde(skip)]
    question_id: QuestionId,
    items: Vec<Answer>,
}

impl Answers {
    pub fn new(question_id: QuestionId) -> Self {
        Self {
            question_id,
            items: Vec::new(),
        }
    }

    /// Appends `answer` and binds it to the owning question.
    pub fn add(&mut self, mut answer: Answer) -> QnaResult<()> {
        answer.attach_to(self.question_id)?;
        self.items.push(answer);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Answer> {
        self.items.iter()
    }

    pub fn get(&self, id: AnswerId) -> Option<&Answer> {
        self.items.iter().find(|answer| answer.id() == id)
    }

    /// Deletes every active answer written by `deleter`.
    ///
    /// Fails with `DeletionNotAllowed` naming the first foreign answer; in that
    /// case nothing is mutated.
    pub fn delete_all(&mut self, deleter: &Identity, created_at: i64) -> QnaResult<DeleteHistories> {
        self.delete_all_with_policy(deleter, DeletePolicy::AnswerAuthors, created_at)
    }

    /// Policy-aware cascade. `DeletePolicy::QuestionOwner` assumes the caller
    /// already verified question ownership.
    pub(crate) fn delete_all_with_policy(
        &mut self,
        deleter: &Identity,
        policy: DeletePolicy,
        created_at: i64,
    ) -> QnaResult<DeleteHistories> {
        self.ensure_deletable_by(deleter, policy)?;

        let mut histories = DeleteHistories::new();
        for answer in self.items.iter_mut().filter(|answer| !answer.is_deleted()) {
            answer.delete();
            histories.add_history(DeleteHistory::of_answer(answer.id(), *deleter, created_at));
        }
        Ok(histories)
    }

    pub(crate) fn ensure_deletable_by(
        &self,
        deleter: &Identity,
        policy: DeletePolicy,
    ) -> QnaResult<()> {
        if policy == DeletePolicy::QuestionOwner {
            return Ok(());
        }

        match self
            .items
            .iter()
            .filter(|answer| !answer.is_deleted())
            .find(|answer| !answer.is_owned_by(deleter))
        {
            Some(foreign) => Err(QnaError::DeletionNotAllowed {
                content_type: ContentType::Answer,
                content_id: foreign.id(),
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn push_persisted(&mut self, answer: Answer) {
        self.items.push(answer);
    }
}

impl<'a> IntoIterator for &'a Answers {
    type Item = &'a Answer;
    type IntoIter = std::slice::Iter<'a, Answer>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Answers, DeletePolicy};
    use crate::error::QnaError;
    use crate::model::answer::Answer;
    use crate::model::delete_history::ContentType;
    use crate::model::identity::Identity;
    use uuid::Uuid;

    fn answers_by(writers: &[Identity]) -> Answers {
        let mut answers = Answers::new(Uuid::new_v4());
        for writer in writers {
            answers.add(Answer::new(*writer, "answer").unwrap()).unwrap();
        }
        answers
    }

    #[test]
    fn empty_collection_yields_empty_histories() {
        let mut answers = Answers::new(Uuid::new_v4());
        let histories = answers.delete_all(&Identity::generate(), 10).unwrap();
        assert!(histories.is_empty());
    }

    #[test]
    fn foreign_answer_in_the_middle_blocks_every_mutation() {
        let owner = Identity::generate();
        let other = Identity::generate();
        let mut answers = answers_by(&[owner, other, owner]);
        let foreign_id = answers.iter().nth(1).unwrap().id();

        let err = answers.delete_all(&owner, 10).unwrap_err();

        assert_eq!(
            err,
            QnaError::DeletionNotAllowed {
                content_type: ContentType::Answer,
                content_id: foreign_id,
            }
        );
        assert!(answers.iter().all(|answer| !answer.is_deleted()));
    }

    #[test]
    fn question_owner_policy_skips_per_answer_check() {
        let owner = Identity::generate();
        let mut answers = answers_by(&[Identity::generate(), owner]);

        let histories = answers
            .delete_all_with_policy(&owner, DeletePolicy::QuestionOwner, 10)
            .unwrap();

        assert_eq!(histories.len(), 2);
        assert!(histories.iter().all(|entry| entry.deleted_by() == owner));
        assert!(answers.iter().all(Answer::is_deleted));
    }

    #[test]
    fn already_deleted_answers_are_skipped_by_cascade() {
        let owner = Identity::generate();
        let question_id = Uuid::new_v4();
        let mut answers = Answers::new(question_id);
        answers.add(Answer::new(owner, "active").unwrap()).unwrap();
        answers.push_persisted(Answer::from_persisted(
            Uuid::new_v4(),
            Identity::generate(),
            question_id,
            "removed earlier".to_string(),
            true,
        ));
        answers.add(Answer::new(owner, "also active").unwrap()).unwrap();
        let active_ids = answers
            .iter()
            .filter(|answer| !answer.is_deleted())
            .map(Answer::id)
            .collect::<Vec<_>>();

        let histories = answers.delete_all(&owner, 10).unwrap();

        let history_ids = histories
            .iter()
            .map(|entry| entry.content_id())
            .collect::<Vec<_>>();
        assert_eq!(history_ids, active_ids);
        assert!(answers.iter().all(Answer::is_deleted));
    }

    #[test]
    fn add_binds_back_reference() {
        let question_id = Uuid::new_v4();
        let mut answers = Answers::new(question_id);
        answers
            .add(Answer::new(Identity::generate(), "body").unwrap())
            .unwrap();
        assert_eq!(answers.iter().next().unwrap().question_id(), Some(question_id));
    }
}
