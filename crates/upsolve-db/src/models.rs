use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// A registered user.
///
/// Accounts are created through Google sign-in (or the test-token shortcut),
/// so `google_id` is always present and unique. Problem preferences are
/// stored flat; the API layer nests them for the wire.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub google_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    /// Tags preselected in the problem picker
    pub default_tags: Vec<String>,
    /// Lower bound of the preferred difficulty range
    pub min_rating: i32,
    /// Upper bound of the preferred difficulty range
    pub max_rating: i32,
    pub created_at: DateTime<Utc>,
}

/// A recorded submission for one catalog problem.
///
/// At most one row exists per (user_id, contest_id, problem_index);
/// resubmitting overwrites the mutable fields in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProblemAttempt {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Derived identifier, contest id and index concatenated (e.g. "1400B")
    pub problem_id: String,
    pub contest_id: i64,
    pub problem_index: String,
    pub problem_name: String,
    pub problem_rating: Option<i32>,
    pub problem_tags: Vec<String>,
    pub solved: bool,
    /// Seconds spent, when the solving timer was used
    pub time_taken: Option<i32>,
    pub code: Option<String>,
    pub language: Option<String>,
    pub review_feedback: Option<String>,
    pub attempt_date: DateTime<Utc>,
}

/// A problem saved for later, unique per (user_id, contest_id, problem_index).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkedProblem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub problem_id: String,
    pub contest_id: i64,
    pub problem_index: String,
    pub problem_name: String,
    pub problem_rating: Option<i32>,
    pub problem_tags: Vec<String>,
    pub bookmarked_at: DateTime<Utc>,
}

/// Field set written by the attempt upsert.
///
/// `problem_id` is not part of this struct; the repository derives it from
/// the contest id and index.
#[derive(Debug, Clone)]
pub struct AttemptUpsert {
    pub contest_id: i64,
    pub problem_index: String,
    pub problem_name: String,
    pub problem_rating: Option<i32>,
    pub problem_tags: Vec<String>,
    pub solved: bool,
    pub time_taken: Option<i32>,
    pub code: Option<String>,
    pub language: Option<String>,
    pub review_feedback: Option<String>,
}

/// Field set written when creating a bookmark.
#[derive(Debug, Clone)]
pub struct BookmarkInsert {
    pub contest_id: i64,
    pub problem_index: String,
    pub problem_name: String,
    pub problem_rating: Option<i32>,
    pub problem_tags: Vec<String>,
}

/// Projection returned by the stored-code lookup.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttemptCode {
    pub code: Option<String>,
    pub language: Option<String>,
}

/// Projection served by the solved-problems listing. Leaves out the code and
/// review payloads, which can be large.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SolvedProblem {
    pub contest_id: i64,
    pub problem_index: String,
    pub problem_name: String,
    pub problem_rating: Option<i32>,
    pub problem_tags: Vec<String>,
    pub time_taken: Option<i32>,
    pub language: Option<String>,
    pub attempt_date: DateTime<Utc>,
}
