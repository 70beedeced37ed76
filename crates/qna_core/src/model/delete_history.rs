//! Deletion audit records.
//!
//! # Responsibility
//! - Describe one deletion event as an immutable value.
//! - Collect the events of one deletion operation in order.
//!
//! # Invariants
//! - `DeleteHistories` is append-only: no dedup, no reordering.
//! - Within one aggregate deletion the question entry comes first.

use crate::model::identity::Identity;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Kind of content a history entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Question,
    Answer,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Answer => "answer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "question" => Some(Self::Question),
            "answer" => Some(Self::Answer),
            _ => None,
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One deletion event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteHistory {
    content_type: ContentType,
    content_id: Uuid,
    deleted_by: Identity,
    /// Unix epoch milliseconds.
    created_at: i64,
}

impl DeleteHistory {
    pub fn new(
        content_type: ContentType,
        content_id: Uuid,
        deleted_by: Identity,
        created_at: i64,
    ) -> Self {
        Self {
            content_type,
            content_id,
            deleted_by,
            created_at,
        }
    }

    pub fn of_question(content_id: Uuid, deleted_by: Identity, created_at: i64) -> Self {
        Self::new(ContentType::Question, content_id, deleted_by, created_at)
    }

    pub fn of_answer(content_id: Uuid, deleted_by: Identity, created_at: i64) -> Self {
        Self::new(ContentType::Answer, content_id, deleted_by, created_at)
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn content_id(&self) -> Uuid {
        self.content_id
    }

    pub fn deleted_by(&self) -> Identity {
        self.deleted_by
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }
}

/// Ordered history entries produced by one deletion operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeleteHistories(Vec<DeleteHistory>);

impl DeleteHistories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_history(&mut self, history: DeleteHistory) -> &mut Self {
        self.0.push(history);
        self
    }

    pub fn add_all(&mut self, other: DeleteHistories) -> &mut Self {
        self.0.extend(other.0);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeleteHistory> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[DeleteHistory] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<DeleteHistory> {
        self.0
    }
}

impl FromIterator<DeleteHistory> for DeleteHistories {
    fn from_iter<T: IntoIterator<Item = DeleteHistory>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for DeleteHistories {
    type Item = DeleteHistory;
    type IntoIter = std::vec::IntoIter<DeleteHistory>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DeleteHistories {
    type Item = &'a DeleteHistory;
    type IntoIter = std::slice::Iter<'a, DeleteHistory>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentType, DeleteHistories, DeleteHistory};
    use crate::model::identity::Identity;
    use uuid::Uuid;

    #[test]
    fn content_type_parse_matches_as_str() {
        for kind in [ContentType::Question, ContentType::Answer] {
            assert_eq!(ContentType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ContentType::parse("comment"), None);
    }

    #[test]
    fn add_all_appends_in_call_order() {
        let deleter = Identity::generate();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let third = Uuid::new_v4();

        let mut histories = DeleteHistories::new();
        histories.add_history(DeleteHistory::of_question(first, deleter, 1));

        let mut tail = DeleteHistories::new();
        tail.add_history(DeleteHistory::of_answer(second, deleter, 2))
            .add_history(DeleteHistory::of_answer(third, deleter, 2));
        histories.add_all(tail);

        let ids = histories
            .iter()
            .map(DeleteHistory::content_id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![first, second, third]);
    }

    #[test]
    fn duplicate_entries_are_kept() {
        let entry = DeleteHistory::of_answer(Uuid::new_v4(), Identity::generate(), 7);
        let mut histories = DeleteHistories::new();
        histories.add_history(entry.clone()).add_history(entry);
        assert_eq!(histories.len(), 2);
    }
}
