use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::users::repo_types::{NewUser, User, UserFilter, UserStatus};

#[derive(Debug, Error)]
pub enum RepoError {
    /// Insert hit the unique index on `users.email`.
    #[error("email already taken")]
    UniqueViolation,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence contract for users. Lookups return `Ok(None)` when no row
/// matches, so callers can tell "absent" from "lookup failed".
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> RepoResult<User>;

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Writes first/last name, phone and avatar; `None` if the row is gone.
    async fn update(&self, user: &User) -> RepoResult<Option<User>>;

    /// Returns whether a row was touched.
    async fn update_status(&self, id: Uuid, status: UserStatus) -> RepoResult<bool>;

    /// Newest first.
    async fn list(&self, filter: UserFilter, limit: i64, offset: i64) -> RepoResult<Vec<User>>;

    async fn count(&self, filter: UserFilter) -> RepoResult<i64>;
}

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, role, status, \
                            avatar_url, phone, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_insert_error(err: sqlx::Error) -> RepoError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::UniqueViolation,
        _ => RepoError::Database(err),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> RepoResult<User> {
        let sql = format!(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, role, status, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.role)
            .bind(user.status)
            .bind(&user.phone)
            .fetch_one(&self.db)
            .await
            .map_err(map_insert_error)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn update(&self, user: &User) -> RepoResult<Option<User>> {
        let sql = format!(
            r#"
            UPDATE users
               SET first_name = $2,
                   last_name  = $3,
                   phone      = $4,
                   avatar_url = $5,
                   updated_at = NOW()
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.phone)
            .bind(&user.avatar_url)
            .fetch_optional(&self.db)
            .await?;
        Ok(updated)
    }

    async fn update_status(&self, id: Uuid, status: UserStatus) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
               SET status = $2, updated_at = NOW()
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: UserFilter, limit: i64, offset: i64) -> RepoResult<Vec<User>> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
              FROM users
             WHERE ($1::user_role IS NULL OR role = $1)
               AND ($2::user_status IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4
            "#
        );
        let rows = sqlx::query_as::<_, User>(&sql)
            .bind(filter.role)
            .bind(filter.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn count(&self, filter: UserFilter) -> RepoResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
              FROM users
             WHERE ($1::user_role IS NULL OR role = $1)
               AND ($2::user_status IS NULL OR status = $2)
            "#,
        )
        .bind(filter.role)
        .bind(filter.status)
        .fetch_one(&self.db)
        .await?;
        Ok(total)
    }
}
