//! Feedback repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the parameterized insert/count/update primitives plus the
//!   atomic upsert composed from them.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - All statements bind values; no caller text is interpolated into SQL.
//! - `upsert_rating` leaves exactly one row per email, holding the last
//!   committed rating, even under concurrent submissions.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::feedback::{FeedbackId, FeedbackRecord, RawSubmission};
use crate::validate::CleanSubmission;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const FEEDBACK_SELECT_SQL: &str = "SELECT
    feedback_id,
    full_name,
    email,
    rating
FROM feedback";

const COUNT_BY_EMAIL_SQL: &str = "SELECT COUNT(email) FROM feedback WHERE email = ?1;";
const INSERT_SQL: &str = "INSERT INTO feedback (full_name, email, rating) VALUES (?1, ?2, ?3);";
const UPDATE_RATING_SQL: &str = "UPDATE feedback SET rating = ?1 WHERE email = ?2;";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for feedback persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// No record exists for the given email.
    NotFound(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(email) => write!(f, "no feedback record for email {email}"),
            Self::InvalidData(message) => write!(f, "invalid persisted feedback data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Result of an upsert keyed by normalized email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record existed; a new row was created with this id.
    Inserted(FeedbackId),
    /// A record existed; only its rating was overwritten.
    RatingUpdated,
}

/// Query options for listing feedback records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackListQuery {
    /// Maximum rows to return. `None` returns everything.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for feedback persistence.
///
/// All write operations take already-normalized values: email lower-cased,
/// rating within range. The store's submit path is the only producer.
pub trait FeedbackRepository {
    /// Creates a new record and returns its surrogate id.
    fn insert(&self, full_name: &str, email: &str, rating: u8) -> RepoResult<FeedbackId>;
    /// Existence check keyed strictly on email; `0` means absent.
    fn count_by_email(&self, email: &str) -> RepoResult<i64>;
    /// Overwrites the rating of the record with the given email.
    fn update_rating_by_email(&self, rating: u8, email: &str) -> RepoResult<()>;
    /// Inserts or updates-rating in one atomic step keyed by email.
    ///
    /// Implementations must serialize concurrent upserts for the same
    /// email so exactly one record remains.
    fn upsert_rating(&mut self, full_name: &str, email: &str, rating: u8)
        -> RepoResult<UpsertOutcome>;
    /// Fetches the record with the given email, if any.
    fn find_by_email(&self, email: &str) -> RepoResult<Option<FeedbackRecord>>;
    /// Lists records ordered by surrogate id.
    fn list(&self, query: &FeedbackListQuery) -> RepoResult<Vec<FeedbackRecord>>;
}

/// SQLite-backed feedback repository.
#[derive(Debug)]
pub struct SqliteFeedbackRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteFeedbackRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_feedback_schema(conn)?;
        Ok(Self { conn })
    }
}

impl FeedbackRepository for SqliteFeedbackRepository<'_> {
    fn insert(&self, full_name: &str, email: &str, rating: u8) -> RepoResult<FeedbackId> {
        self.conn
            .execute(INSERT_SQL, params![full_name, email, i64::from(rating)])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn count_by_email(&self, email: &str) -> RepoResult<i64> {
        let count = self
            .conn
            .query_row(COUNT_BY_EMAIL_SQL, [email], |row| row.get(0))?;
        Ok(count)
    }

    fn update_rating_by_email(&self, rating: u8, email: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(UPDATE_RATING_SQL, params![i64::from(rating), email])?;
        if changed == 0 {
            return Err(RepoError::NotFound(email.to_string()));
        }
        Ok(())
    }

    fn upsert_rating(
        &mut self,
        full_name: &str,
        email: &str,
        rating: u8,
    ) -> RepoResult<UpsertOutcome> {
        // Immediate transaction takes the write lock up front, so the
        // existence check and the write cannot interleave with another
        // submission for the same email. The unique index on `email` is
        // the schema-level backstop.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let count: i64 = tx.query_row(COUNT_BY_EMAIL_SQL, [email], |row| row.get(0))?;
        let outcome = if count > 0 {
            tx.execute(UPDATE_RATING_SQL, params![i64::from(rating), email])?;
            UpsertOutcome::RatingUpdated
        } else {
            tx.execute(INSERT_SQL, params![full_name, email, i64::from(rating)])?;
            UpsertOutcome::Inserted(tx.last_insert_rowid())
        };

        tx.commit()?;
        Ok(outcome)
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<FeedbackRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FEEDBACK_SELECT_SQL} WHERE email = ?1;"))?;

        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_feedback_row(row)?));
        }

        Ok(None)
    }

    fn list(&self, query: &FeedbackListQuery) -> RepoResult<Vec<FeedbackRecord>> {
        let mut sql = format!("{FEEDBACK_SELECT_SQL} ORDER BY feedback_id ASC");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_feedback_row(row)?);
        }

        Ok(records)
    }
}

fn ensure_feedback_schema(conn: &Connection) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'feedback'
        );",
        [],
        |row| row.get(0),
    )?;

    if exists == 0 {
        return Err(RepoError::InvalidData(
            "feedback table missing; open the database through db::open_db".to_string(),
        ));
    }

    Ok(())
}

fn parse_feedback_row(row: &Row<'_>) -> RepoResult<FeedbackRecord> {
    let id: FeedbackId = row.get("feedback_id")?;
    let full_name: String = row.get("full_name")?;
    let email: String = row.get("email")?;
    let rating: i64 = row.get("rating")?;

    // Re-run field validation on what storage handed back, so corrupted or
    // externally-edited rows surface as errors instead of flowing onward.
    let raw = RawSubmission::new(full_name.as_str(), email.as_str(), rating.to_string());
    let clean = CleanSubmission::parse(&raw).map_err(|errors| {
        RepoError::InvalidData(format!("row {id} violates feedback invariants: {errors}"))
    })?;

    Ok(FeedbackRecord {
        id,
        full_name,
        email,
        rating: clean.rating(),
    })
}
