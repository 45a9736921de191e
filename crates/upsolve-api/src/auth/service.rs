use sqlx::PgPool;
use upsolve_db::models::User;
use upsolve_db::repositories::user as user_repo;

use crate::error::ApiError;

const DEFAULT_MIN_RATING: i32 = 800;
const DEFAULT_MAX_RATING: i32 = 3500;

/// Seed values for the fixed account behind `POST /auth/token`.
const TEST_GOOGLE_ID: &str = "test-123456";
const TEST_NAME: &str = "Test User";
const TEST_EMAIL: &str = "test@example.com";
const TEST_AVATAR: &str = "https://via.placeholder.com/150";
const TEST_TAGS: &[&str] = &["greedy", "math", "dp"];
const TEST_MIN_RATING: i32 = 800;
const TEST_MAX_RATING: i32 = 2000;

/// Find or create a user from Google sign-in
///
/// This function will:
/// 1. Check if a user exists with this Google ID
/// 2. If not, check if a user exists with this email
/// 3. If not, create a new user with default preferences
///
/// Two concurrent callbacks can race past both lookups; the unique
/// constraints catch the duplicate insert and the loser re-reads the row.
pub async fn find_or_create_google_user(
    pool: &PgPool,
    google_id: &str,
    email: &str,
    name: Option<&str>,
    picture: Option<&str>,
) -> Result<User, ApiError> {
    if let Some(user) = user_repo::find_by_google_id(pool, google_id).await? {
        return Ok(user);
    }

    // An email hit means the account was created through another sign-in
    // path (e.g. the test token); keep its stored identity
    if let Some(user) = user_repo::find_by_email(pool, email).await? {
        return Ok(user);
    }

    // Fall back to the mailbox name when Google sends no display name
    let name = name
        .map(str::to_string)
        .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string());

    match user_repo::create(
        pool,
        google_id,
        &name,
        email,
        picture,
        &[],
        DEFAULT_MIN_RATING,
        DEFAULT_MAX_RATING,
    )
    .await
    {
        Ok(user) => Ok(user),
        Err(err) if upsolve_db::is_unique_violation(&err) => {
            // Lost the creation race; the row exists now
            user_repo::find_by_google_id(pool, google_id)
                .await?
                .ok_or(ApiError::Database(err))
        }
        Err(err) => Err(err.into()),
    }
}

/// Find or create the fixed test user
///
/// Backs the `POST /auth/token` shortcut used for API exploration without a
/// Google account. Seeded with a small preference set so downstream screens
/// have something to show.
pub async fn find_or_create_test_user(pool: &PgPool) -> Result<User, ApiError> {
    if let Some(user) = user_repo::find_by_email(pool, TEST_EMAIL).await? {
        return Ok(user);
    }

    let tags = TEST_TAGS.iter().map(|t| t.to_string()).collect::<Vec<_>>();

    match user_repo::create(
        pool,
        TEST_GOOGLE_ID,
        TEST_NAME,
        TEST_EMAIL,
        Some(TEST_AVATAR),
        &tags,
        TEST_MIN_RATING,
        TEST_MAX_RATING,
    )
    .await
    {
        Ok(user) => Ok(user),
        Err(err) if upsolve_db::is_unique_violation(&err) => {
            user_repo::find_by_email(pool, TEST_EMAIL)
                .await?
                .ok_or(ApiError::Database(err))
        }
        Err(err) => Err(err.into()),
    }
}
