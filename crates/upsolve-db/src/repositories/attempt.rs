use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{AttemptCode, AttemptUpsert, ProblemAttempt, SolvedProblem};

/// Insert an attempt, or overwrite the mutable fields of the existing row
/// for the same (user, contest, index) key.
///
/// `problem_name`, `problem_id` and `attempt_date` are set on first insert
/// and kept on resubmission. The composite unique constraint makes this a
/// single atomic statement, so two concurrent submissions cannot create a
/// duplicate row.
pub async fn upsert<'e, E>(
    executor: E,
    user_id: Uuid,
    attempt: &AttemptUpsert,
) -> Result<ProblemAttempt, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let problem_id = format!("{}{}", attempt.contest_id, attempt.problem_index);

    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO problem_attempts
                (user_id, problem_id, contest_id, problem_index, problem_name, problem_rating,
                 problem_tags, solved, time_taken, code, language, review_feedback)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (user_id, contest_id, problem_index)
            DO UPDATE SET
                problem_rating = EXCLUDED.problem_rating,
                problem_tags = EXCLUDED.problem_tags,
                solved = EXCLUDED.solved,
                time_taken = EXCLUDED.time_taken,
                code = EXCLUDED.code,
                language = EXCLUDED.language,
                review_feedback = EXCLUDED.review_feedback
            RETURNING id, user_id, problem_id, contest_id, problem_index, problem_name, problem_rating,
                      problem_tags, solved, time_taken, code, language, review_feedback, attempt_date
        "#,
    )
    .bind(user_id)
    .bind(&problem_id)
    .bind(attempt.contest_id)
    .bind(&attempt.problem_index)
    .bind(&attempt.problem_name)
    .bind(attempt.problem_rating)
    .bind(&attempt.problem_tags)
    .bind(attempt.solved)
    .bind(attempt.time_taken)
    .bind(attempt.code.as_deref())
    .bind(attempt.language.as_deref())
    .bind(attempt.review_feedback.as_deref())
    .fetch_one(executor)
    .await
}

pub async fn find_by_key<'e, E>(
    executor: E,
    user_id: Uuid,
    contest_id: i64,
    problem_index: &str,
) -> Result<Option<ProblemAttempt>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, problem_id, contest_id, problem_index, problem_name, problem_rating,
                   problem_tags, solved, time_taken, code, language, review_feedback, attempt_date
            FROM problem_attempts
            WHERE user_id = $1 AND contest_id = $2 AND problem_index = $3
        "#,
    )
    .bind(user_id)
    .bind(contest_id)
    .bind(problem_index)
    .fetch_optional(executor)
    .await
}

pub async fn find_code_by_key<'e, E>(
    executor: E,
    user_id: Uuid,
    contest_id: i64,
    problem_index: &str,
) -> Result<Option<AttemptCode>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT code, language
            FROM problem_attempts
            WHERE user_id = $1 AND contest_id = $2 AND problem_index = $3
        "#,
    )
    .bind(user_id)
    .bind(contest_id)
    .bind(problem_index)
    .fetch_optional(executor)
    .await
}

/// The user's complete history, oldest first. Feeds the statistics
/// aggregator, which does its own ordering for display.
pub async fn list_all<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<ProblemAttempt>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, problem_id, contest_id, problem_index, problem_name, problem_rating,
                   problem_tags, solved, time_taken, code, language, review_feedback, attempt_date
            FROM problem_attempts
            WHERE user_id = $1
            ORDER BY attempt_date
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// One page of attempts, newest first, optionally filtered by outcome.
pub async fn list_page<'e, E>(
    executor: E,
    user_id: Uuid,
    solved: Option<bool>,
    limit: i64,
    offset: i64,
) -> Result<Vec<ProblemAttempt>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, problem_id, contest_id, problem_index, problem_name, problem_rating,
                   problem_tags, solved, time_taken, code, language, review_feedback, attempt_date
            FROM problem_attempts
            WHERE user_id = $1 AND ($2::boolean IS NULL OR solved = $2)
            ORDER BY attempt_date DESC
            LIMIT $3 OFFSET $4
        "#,
    )
    .bind(user_id)
    .bind(solved)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

/// One page of solved attempts, newest first, without the code payload.
pub async fn list_solved_page<'e, E>(
    executor: E,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<SolvedProblem>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT contest_id, problem_index, problem_name, problem_rating, problem_tags,
                   time_taken, language, attempt_date
            FROM problem_attempts
            WHERE user_id = $1 AND solved = TRUE
            ORDER BY attempt_date DESC
            LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

pub async fn count<'e, E>(
    executor: E,
    user_id: Uuid,
    solved: Option<bool>,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*)
            FROM problem_attempts
            WHERE user_id = $1 AND ($2::boolean IS NULL OR solved = $2)
        "#,
    )
    .bind(user_id)
    .bind(solved)
    .fetch_one(executor)
    .await
}
