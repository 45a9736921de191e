use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::User;

pub async fn find_by_id<'e, E>(executor: E, user_id: Uuid) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, google_id, name, email, avatar_url, default_tags, min_rating, max_rating, created_at
            FROM users
            WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub async fn find_by_google_id<'e, E>(
    executor: E,
    google_id: &str,
) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, google_id, name, email, avatar_url, default_tags, min_rating, max_rating, created_at
            FROM users
            WHERE google_id = $1
        "#,
    )
    .bind(google_id)
    .fetch_optional(executor)
    .await
}

pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, google_id, name, email, avatar_url, default_tags, min_rating, max_rating, created_at
            FROM users
            WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await
}

#[allow(clippy::too_many_arguments)]
pub async fn create<'e, E>(
    executor: E,
    google_id: &str,
    name: &str,
    email: &str,
    avatar_url: Option<&str>,
    default_tags: &[String],
    min_rating: i32,
    max_rating: i32,
) -> Result<User, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO users (google_id, name, email, avatar_url, default_tags, min_rating, max_rating)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, google_id, name, email, avatar_url, default_tags, min_rating, max_rating, created_at
        "#,
    )
    .bind(google_id)
    .bind(name)
    .bind(email)
    .bind(avatar_url)
    .bind(default_tags)
    .bind(min_rating)
    .bind(max_rating)
    .fetch_one(executor)
    .await
}

/// Partial preference update. `None` keeps the stored value.
pub async fn update_preferences<'e, E>(
    executor: E,
    user_id: Uuid,
    default_tags: Option<Vec<String>>,
    min_rating: Option<i32>,
    max_rating: Option<i32>,
) -> Result<User, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE users
            SET default_tags = COALESCE($1, default_tags),
                min_rating = COALESCE($2, min_rating),
                max_rating = COALESCE($3, max_rating),
                updated_at = NOW()
            WHERE id = $4
            RETURNING id, google_id, name, email, avatar_url, default_tags, min_rating, max_rating, created_at
        "#,
    )
    .bind(default_tags)
    .bind(min_rating)
    .bind(max_rating)
    .bind(user_id)
    .fetch_one(executor)
    .await
}
