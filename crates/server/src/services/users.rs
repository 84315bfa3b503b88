//! User coordination service.
//!
//! Enforces the role-based authorization rules over account records. The two
//! acting-on-another-user operations (delete, update) share one shape:
//! self path first, then the admin path guarded by an explicit
//! target-is-not-admin check, and everything else rejected before any
//! storage call.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use thiserror::Error;

use tradepost_core::{Role, Username};

use super::can_act_on;
use super::password::{self, PasswordError};
use crate::db::{RepositoryError, UserRepository};
use crate::models::{CurrentUser, User};
use crate::models::user::NewUser;

/// Errors surfaced by user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// The username is already taken.
    #[error("username already exists")]
    UserAlreadyExists,

    /// The target username has no row.
    #[error("user not found")]
    UserNotFound,

    /// The operation targeted an Admin account via the admin path.
    #[error("target user is an admin")]
    UserIsAdmin,

    /// The actor fails the authorization predicate for the target.
    #[error("not authorized to act on this user")]
    Unauthorized,

    /// The supplied birthdate is in the future.
    #[error("birthdate cannot be in the future")]
    InvalidDate,

    /// Login failed; wrong password and unknown user are indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("password hashing error")]
    PasswordHash,

    /// Any other storage failure, cause preserved for logging.
    #[error("storage failure: {0}")]
    Storage(#[from] RepositoryError),
}

/// User coordination service.
pub struct UserService<'a> {
    users: UserRepository<'a>,
}

impl<'a> UserService<'a> {
    /// Create a new user service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new account. Registration is open: no authorization gate.
    ///
    /// The password is hashed with a fresh per-user salt before it reaches
    /// storage; the plaintext is never persisted.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::UserAlreadyExists`] if the username is taken.
    pub async fn create_user(
        &self,
        username: Username,
        name: String,
        surname: String,
        password: &str,
        role: Role,
    ) -> Result<(), UserError> {
        let password_hash = password::hash_password(password).map_err(|_| UserError::PasswordHash)?;

        let new_user = NewUser {
            username,
            name,
            surname,
            role,
            password_hash,
        };

        self.users.insert(&new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => UserError::UserAlreadyExists,
            other => UserError::Storage(other),
        })
    }

    /// Verify a username/password pair and return the account on success.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::InvalidCredentials`] if the account does not
    /// exist or the password does not match; callers cannot tell which.
    pub async fn authenticate(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<User, UserError> {
        let (user, password_hash) = self
            .users
            .get_password_hash(username)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        password::verify_password(password, &password_hash).map_err(|e| match e {
            PasswordError::Mismatch => UserError::InvalidCredentials,
            PasswordError::Hash => UserError::PasswordHash,
        })?;

        Ok(user)
    }

    /// List all accounts.
    ///
    /// Unrestricted at this layer; the route layer gates this to admins.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Storage`] if the query fails.
    pub async fn users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.users.get_all().await?)
    }

    /// List all accounts with the given role.
    ///
    /// Unrestricted at this layer; the route layer gates this to admins.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Storage`] if the query fails.
    pub async fn users_by_role(&self, role: Role) -> Result<Vec<User>, UserError> {
        Ok(self.users.get_by_role(role).await?)
    }

    /// Get one account, subject to the authorization predicate.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Unauthorized`] if the actor may not read the
    /// target, else [`UserError::UserNotFound`] if there is no such account.
    pub async fn user_by_username(
        &self,
        actor: &CurrentUser,
        target: &Username,
    ) -> Result<User, UserError> {
        if !can_act_on(actor, target) {
            return Err(UserError::Unauthorized);
        }

        self.users
            .get_by_username(target)
            .await?
            .ok_or(UserError::UserNotFound)
    }

    /// Delete an account.
    ///
    /// Three-way dispatch:
    /// 1. self-delete: any role may remove their own account;
    /// 2. admin path: an admin may remove any non-admin account, but never
    ///    another admin;
    /// 3. everything else is rejected without touching storage.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::UserNotFound`], [`UserError::UserIsAdmin`] or
    /// [`UserError::Unauthorized`] per the dispatch above.
    pub async fn delete_user(
        &self,
        actor: &CurrentUser,
        target: &Username,
    ) -> Result<(), UserError> {
        if actor.username == *target {
            if self.users.delete_by_username(target).await? {
                return Ok(());
            }
            return Err(UserError::UserNotFound);
        }

        if !actor.role.is_admin() {
            return Err(UserError::Unauthorized);
        }

        let target_user = self
            .users
            .get_by_username(target)
            .await?
            .ok_or(UserError::UserNotFound)?;
        if target_user.role.is_admin() {
            return Err(UserError::UserIsAdmin);
        }

        if self.users.delete_by_username(target).await? {
            Ok(())
        } else {
            Err(UserError::UserNotFound)
        }
    }

    /// Delete all non-admin accounts. Admin rows survive via the SQL
    /// predicate, not by per-row checks here.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Storage`] if the bulk delete fails.
    pub async fn delete_non_admins(&self) -> Result<u64, UserError> {
        Ok(self.users.delete_non_admins().await?)
    }

    /// Replace the personal info of an account.
    ///
    /// The birthdate is validated against the server clock before anything
    /// else, authorization included. The update statement never writes the
    /// role; the admin path re-verifies the target is not an admin before
    /// touching the row, mirroring delete.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::InvalidDate`] for a future birthdate,
    /// [`UserError::Unauthorized`] if the predicate fails, and
    /// [`UserError::UserNotFound`] / [`UserError::UserIsAdmin`] per the
    /// admin-path checks.
    pub async fn update_user_info(
        &self,
        actor: &CurrentUser,
        name: &str,
        surname: &str,
        address: Option<&str>,
        birthdate: Option<NaiveDate>,
        target: &Username,
    ) -> Result<User, UserError> {
        if let Some(date) = birthdate
            && date > Utc::now().date_naive()
        {
            return Err(UserError::InvalidDate);
        }

        if !can_act_on(actor, target) {
            return Err(UserError::Unauthorized);
        }

        if actor.username != *target {
            // Admin acting on someone else: the target must exist and must
            // not be another admin.
            let target_user = self
                .users
                .get_by_username(target)
                .await?
                .ok_or(UserError::UserNotFound)?;
            if target_user.role.is_admin() {
                return Err(UserError::UserIsAdmin);
            }
        }

        let updated = self
            .users
            .update_info(target, name, surname, address, birthdate)
            .await?;
        if !updated {
            return Err(UserError::UserNotFound);
        }

        self.users
            .get_by_username(target)
            .await?
            .ok_or(UserError::UserNotFound)
    }
}
