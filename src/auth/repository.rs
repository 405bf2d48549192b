// Database repository for user accounts

use sqlx::MySqlPool;

use crate::auth::{error::AuthError, models::{Role, User}};
use crate::db;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: MySqlPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create a new user and return the stored row
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        let result = sqlx::query(
            "INSERT INTO users (name, email, password_hash, role) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // Lost a race with a concurrent signup for the same email
            if db::is_unique_violation(&e) {
                return AuthError::EmailAlreadyExists;
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        let id = db::inserted_id(&result)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::DatabaseError(format!("user {} missing after insert", id)))
    }

    /// Find a user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER(?)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = ?",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Check if an email is already registered, optionally ignoring one account
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> Result<bool, AuthError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE LOWER(email) = LOWER(?) AND id <> COALESCE(?, 0)",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// List every account, newest first
    pub async fn list(&self) -> Result<Vec<User>, AuthError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC, id DESC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Update the profile columns that were supplied; `None` keeps the stored value
    ///
    /// Returns false when no row has the given id.
    pub async fn update_profile(
        &self,
        id: i32,
        name: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<bool, AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE(?, name),
                email = COALESCE(?, email),
                password_hash = COALESCE(?, password_hash)
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                return AuthError::EmailAlreadyExists;
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Change an account's display name and/or role
    ///
    /// A new role is only visible to the user after their next login.
    pub async fn update_account(
        &self,
        id: i32,
        name: Option<&str>,
        role: Option<Role>,
    ) -> Result<bool, AuthError> {
        let result = sqlx::query(
            "UPDATE users SET name = COALESCE(?, name), role = COALESCE(?, role) WHERE id = ?",
        )
        .bind(name)
        .bind(role.map(|r| r.as_str()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
