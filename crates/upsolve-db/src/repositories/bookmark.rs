use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{BookmarkInsert, BookmarkedProblem};

/// Insert a bookmark. A duplicate (user, contest, index) key surfaces as a
/// unique-constraint violation; callers map it with
/// [`crate::is_unique_violation`] instead of racing a lookup first.
pub async fn insert<'e, E>(
    executor: E,
    user_id: Uuid,
    bookmark: &BookmarkInsert,
) -> Result<BookmarkedProblem, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let problem_id = format!("{}{}", bookmark.contest_id, bookmark.problem_index);

    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO bookmarked_problems
                (user_id, problem_id, contest_id, problem_index, problem_name, problem_rating, problem_tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, problem_id, contest_id, problem_index, problem_name, problem_rating,
                      problem_tags, bookmarked_at
        "#,
    )
    .bind(user_id)
    .bind(&problem_id)
    .bind(bookmark.contest_id)
    .bind(&bookmark.problem_index)
    .bind(&bookmark.problem_name)
    .bind(bookmark.problem_rating)
    .bind(&bookmark.problem_tags)
    .fetch_one(executor)
    .await
}

/// Delete a bookmark, returning the number of rows removed (0 or 1).
pub async fn delete<'e, E>(
    executor: E,
    user_id: Uuid,
    contest_id: i64,
    problem_index: &str,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM bookmarked_problems
            WHERE user_id = $1 AND contest_id = $2 AND problem_index = $3
        "#,
    )
    .bind(user_id)
    .bind(contest_id)
    .bind(problem_index)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn list<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Vec<BookmarkedProblem>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, problem_id, contest_id, problem_index, problem_name, problem_rating,
                   problem_tags, bookmarked_at
            FROM bookmarked_problems
            WHERE user_id = $1
            ORDER BY bookmarked_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}
