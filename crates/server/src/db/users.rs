//! User repository for database operations.
//!
//! Row types here are plain strings and integers; they are parsed into the
//! validated domain types on the way out. A row that fails to parse is
//! reported as `RepositoryError::DataCorruption` rather than silently passed
//! along.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use tradepost_core::{Role, UserId, Username};

use super::{RepositoryError, map_unique_violation};
use crate::models::user::{NewUser, User};

/// Raw user row as stored in `SQLite`.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    name: String,
    surname: String,
    role: String,
    address: Option<String>,
    birthdate: Option<NaiveDate>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let role: Role = row.role.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            username,
            name: row.name,
            surname: row.surname,
            role,
            address: row.address,
            birthdate: row.birthdate,
        })
    }
}

const SELECT_USER: &str =
    "SELECT id, username, name, surname, role, address, birthdate FROM users";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new account row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(&self, new_user: &NewUser) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO users (username, name, surname, role, password_hash) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(new_user.username.as_str())
        .bind(&new_user.name)
        .bind(&new_user.surname)
        .bind(new_user.role.as_str())
        .bind(&new_user.password_hash)
        .execute(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "username already exists"))?;

        Ok(())
    }

    /// Get a user by their username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE username = ?"))
            .bind(username.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user together with their password hash, for login verification.
    ///
    /// Returns `None` if no such account exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct UserWithHashRow {
            #[sqlx(flatten)]
            user: UserRow,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, UserWithHashRow>(
            "SELECT id, username, name, surname, role, address, birthdate, password_hash \
             FROM users WHERE username = ?",
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| Ok((User::try_from(r.user)?, r.password_hash)))
            .transpose()
    }

    /// Get all users, ordered by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any stored row is invalid.
    pub async fn get_all(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} ORDER BY username"))
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    /// Get all users with the given role, ordered by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any stored row is invalid.
    pub async fn get_by_role(&self, role: Role) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "{SELECT_USER} WHERE role = ? ORDER BY username"
        ))
        .bind(role.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    /// Delete an account row by username.
    ///
    /// # Returns
    ///
    /// Returns `true` if a row was deleted, `false` if no such account exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_by_username(&self, username: &Username) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every non-admin account.
    ///
    /// Admin rows are preserved by the SQL predicate itself, not by checking
    /// rows one at a time in the caller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_non_admins(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE role <> ?")
            .bind(Role::Admin.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Replace the personal info of an account.
    ///
    /// The username, role and password hash are never touched by this
    /// statement.
    ///
    /// # Returns
    ///
    /// Returns `true` if a row was updated, `false` if no such account exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_info(
        &self,
        username: &Username,
        name: &str,
        surname: &str,
        address: Option<&str>,
        birthdate: Option<NaiveDate>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET name = ?, surname = ?, address = ?, birthdate = ? \
             WHERE username = ?",
        )
        .bind(name)
        .bind(surname)
        .bind(address)
        .bind(birthdate)
        .bind(username.as_str())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
