//! Question repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Load a question together with its full answer collection.
//! - Persist flag changes and deletion histories.
//!
//! # Invariants
//! - Answers are stored with their collection position and loaded in that order.
//! - `save_deletion` writes the aggregate and its histories in one transaction.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::error::{IllegalStateError, QnaError};
use crate::model::answer::Answer;
use crate::model::delete_history::{ContentType, DeleteHistories, DeleteHistory};
use crate::model::identity::Identity;
use crate::model::question::{Question, QuestionId};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use thiserror::Error;
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("question not found: {0}")]
    NotFound(QuestionId),
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
    #[error(transparent)]
    Domain(#[from] QnaError),
    /// Stored aggregate changed after it was loaded.
    #[error("question {0} changed since it was loaded")]
    Conflict(QuestionId),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence collaborator for the question aggregate.
pub trait QuestionRepository {
    /// Inserts a new question and its current answers.
    fn create_question(&mut self, question: &Question) -> RepoResult<QuestionId>;
    /// Loads a question with every answer, deleted ones included.
    ///
    /// Deleted questions are returned only when `include_deleted` is set.
    fn load_question_with_answers(
        &self,
        id: QuestionId,
        include_deleted: bool,
    ) -> RepoResult<Option<Question>>;
    /// Writes question and answer state. New answers are inserted.
    ///
    /// Fails with `IllegalState` when the stored question is already deleted.
    fn save(&mut self, question: &Question) -> RepoResult<()>;
    /// Appends history rows in the given order.
    fn save_all(&mut self, histories: &DeleteHistories) -> RepoResult<()>;
    /// Runs `save` and `save_all` as one unit of work.
    ///
    /// Nothing is written when another writer deleted the question or added
    /// an answer since it was loaded.
    fn save_deletion(&mut self, question: &Question, histories: &DeleteHistories)
        -> RepoResult<()>;
    /// Lists every stored history row in insertion order.
    fn list_delete_histories(&self) -> RepoResult<Vec<DeleteHistory>>;
}

/// SQLite-backed question repository.
pub struct SqliteQuestionRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteQuestionRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl QuestionRepository for SqliteQuestionRepository<'_> {
    fn create_question(&mut self, question: &Question) -> RepoResult<QuestionId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO questions (uuid, title, contents, writer_id, is_deleted)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                question.id().to_string(),
                question.title(),
                question.contents(),
                question.writer().to_string(),
                bool_to_int(question.is_deleted()),
            ],
        )?;
        write_answers(&tx, question)?;
        tx.commit()?;

        Ok(question.id())
    }

    fn load_question_with_answers(
        &self,
        id: QuestionId,
        include_deleted: bool,
    ) -> RepoResult<Option<Question>> {
        let question = self
            .conn
            .query_row(
                "SELECT uuid, title, contents, writer_id, is_deleted
                 FROM questions
                 WHERE uuid = ?1
                   AND (?2 = 1 OR is_deleted = 0);",
                params![id.to_string(), bool_to_int(include_deleted)],
                |row| Ok(parse_question_row(row)),
            )
            .optional()?
            .transpose()?;

        let Some(mut question) = question else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT uuid, writer_id, contents, is_deleted
             FROM answers
             WHERE question_uuid = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        while let Some(row) = rows.next()? {
            let answer = parse_answer_row(row, id)?;
            question.answers_mut().push_persisted(answer);
        }

        Ok(Some(question))
    }

    fn save(&mut self, question: &Question) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        write_question(&tx, question)?;
        tx.commit()?;
        Ok(())
    }

    fn save_all(&mut self, histories: &DeleteHistories) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        insert_histories(&tx, histories)?;
        tx.commit()?;
        Ok(())
    }

    fn save_deletion(
        &mut self,
        question: &Question,
        histories: &DeleteHistories,
    ) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        write_question(&tx, question)?;
        insert_histories(&tx, histories)?;
        tx.commit()?;
        Ok(())
    }

    fn list_delete_histories(&self) -> RepoResult<Vec<DeleteHistory>> {
        let mut stmt = self.conn.prepare(
            "SELECT content_type, content_id, deleted_by, created_at
             FROM delete_histories
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut histories = Vec::new();
        while let Some(row) = rows.next()? {
            histories.push(parse_history_row(row)?);
        }
        Ok(histories)
    }
}

fn ensure_schema_ready(conn: &Connection) -> RepoResult<()> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    if version > latest_version() {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: version,
            latest_supported: latest_version(),
        }
        .into());
    }
    if version < latest_version() {
        return Err(RepoError::InvalidData(format!(
            "schema version {version} is behind {}; open the database with db::open_db",
            latest_version()
        )));
    }
    Ok(())
}

/// Writes question and answer state over a stored row that is still active.
///
/// Writing a deleted aggregate also requires that no stored answer is left
/// active, so answers added by another writer since load are never orphaned.
fn write_question(conn: &Connection, question: &Question) -> RepoResult<()> {
    let changed = conn.execute(
        "UPDATE questions
         SET
            title = ?2,
            contents = ?3,
            is_deleted = ?4,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE uuid = ?1
           AND is_deleted = 0;",
        params![
            question.id().to_string(),
            question.title(),
            question.contents(),
            bool_to_int(question.is_deleted()),
        ],
    )?;
    if changed == 0 {
        return Err(inactive_question_error(conn, question.id())?);
    }

    write_answers(conn, question)?;

    if question.is_deleted() {
        let active_answers: i64 = conn.query_row(
            "SELECT COUNT(*)
             FROM answers
             WHERE question_uuid = ?1
               AND is_deleted = 0;",
            [question.id().to_string()],
            |row| row.get(0),
        )?;
        if active_answers > 0 {
            return Err(RepoError::Conflict(question.id()));
        }
    }

    Ok(())
}

fn inactive_question_error(conn: &Connection, id: QuestionId) -> RepoResult<RepoError> {
    let stored = conn
        .query_row(
            "SELECT is_deleted FROM questions WHERE uuid = ?1;",
            [id.to_string()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;

    Ok(match stored {
        None => RepoError::NotFound(id),
        Some(_) => RepoError::Domain(
            IllegalStateError::AlreadyDeleted {
                content_type: ContentType::Question,
                content_id: id,
            }
            .into(),
        ),
    })
}

fn write_answers(conn: &Connection, question: &Question) -> RepoResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO answers (uuid, question_uuid, position, writer_id, contents, is_deleted)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (uuid) DO UPDATE
         SET
            contents = excluded.contents,
            is_deleted = excluded.is_deleted,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE answers.question_uuid = excluded.question_uuid;",
    )?;

    for (position, answer) in question.answers().iter().enumerate() {
        let position = i64::try_from(position)
            .map_err(|_| RepoError::InvalidData(format!("answer position overflow: {position}")))?;
        stmt.execute(params![
            answer.id().to_string(),
            question.id().to_string(),
            position,
            answer.writer().to_string(),
            answer.contents(),
            bool_to_int(answer.is_deleted()),
        ])?;
    }

    Ok(())
}

fn insert_histories(conn: &Connection, histories: &DeleteHistories) -> RepoResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO delete_histories (content_type, content_id, deleted_by, created_at)
         VALUES (?1, ?2, ?3, ?4);",
    )?;
    for history in histories {
        stmt.execute(params![
            history.content_type().as_str(),
            history.content_id().to_string(),
            history.deleted_by().to_string(),
            history.created_at(),
        ])?;
    }
    Ok(())
}

fn parse_question_row(row: &Row<'_>) -> RepoResult<Question> {
    let id = parse_uuid_column(row, "uuid", "questions")?;
    let writer = parse_uuid_column(row, "writer_id", "questions")?;
    let is_deleted = parse_flag_column(row, "questions")?;

    Ok(Question::from_persisted(
        id,
        row.get("title")?,
        row.get("contents")?,
        Identity::new(writer),
        is_deleted,
    ))
}

fn parse_answer_row(row: &Row<'_>, question_id: QuestionId) -> RepoResult<Answer> {
    let id = parse_uuid_column(row, "uuid", "answers")?;
    let writer = parse_uuid_column(row, "writer_id", "answers")?;
    let is_deleted = parse_flag_column(row, "answers")?;

    Ok(Answer::from_persisted(
        id,
        Identity::new(writer),
        question_id,
        row.get("contents")?,
        is_deleted,
    ))
}

fn parse_history_row(row: &Row<'_>) -> RepoResult<DeleteHistory> {
    let type_text: String = row.get("content_type")?;
    let content_type = ContentType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid content type `{type_text}` in delete_histories.content_type"
        ))
    })?;

    Ok(DeleteHistory::new(
        content_type,
        parse_uuid_column(row, "content_id", "delete_histories")?,
        Identity::new(parse_uuid_column(row, "deleted_by", "delete_histories")?),
        row.get("created_at")?,
    ))
}

fn parse_uuid_column(row: &Row<'_>, column: &str, table: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{text}` in {table}.{column}"))
    })
}

fn parse_flag_column(row: &Row<'_>, table: &str) -> RepoResult<bool> {
    match row.get::<_, i64>("is_deleted")? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid is_deleted value `{other}` in {table}.is_deleted"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
