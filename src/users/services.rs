use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::users::dto::{CreateUser, UpdateUserRequest};
use crate::users::error::{UserError, UserResult};
use crate::users::password::{hash_password, verify_password};
use crate::users::repo::UserRepository;
use crate::users::repo_types::{NewUser, User, UserFilter, UserStatus};

/// Business rules for user accounts: unique emails, password hashing,
/// status-gated login and partial profile updates.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, input), fields(email = %input.email, role = %input.role))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        // Fast path; the unique index still decides races between concurrent creates.
        let existing = self
            .repo
            .get_by_email(&input.email)
            .await
            .map_err(|e| UserError::internal(e, "check existing user"))?;
        if existing.is_some() {
            warn!("email already registered");
            return Err(UserError::AlreadyExists);
        }

        let password_hash = hash_blocking(input.password).await?;

        let user = self
            .repo
            .create(NewUser {
                email: input.email,
                password_hash,
                first_name: input.first_name,
                last_name: input.last_name,
                role: input.role,
                status: UserStatus::Active,
                phone: input.phone,
            })
            .await?;

        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_id(&self, id: Uuid) -> UserResult<User> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(|e| UserError::internal(e, "get user by id"))?
            .ok_or(UserError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_email(&self, email: &str) -> UserResult<User> {
        self.repo
            .get_by_email(email)
            .await
            .map_err(|e| UserError::internal(e, "get user by email"))?
            .ok_or(UserError::NotFound)
    }

    /// Names are always overwritten; phone and avatar only when non-empty.
    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: Uuid, input: UpdateUserRequest) -> UserResult<User> {
        let mut user = self.get_user_by_id(id).await?;

        user.first_name = input.first_name;
        user.last_name = input.last_name;
        if let Some(phone) = input.phone.filter(|p| !p.is_empty()) {
            user.phone = Some(phone);
        }
        if let Some(avatar_url) = input.avatar_url.filter(|u| !u.is_empty()) {
            user.avatar_url = Some(avatar_url);
        }

        let updated = self
            .repo
            .update(&user)
            .await
            .map_err(|e| UserError::internal(e, "update user"))?
            .ok_or(UserError::NotFound)?;

        info!(user_id = %updated.id, "user updated");
        Ok(updated)
    }

    /// Any status may move to any other.
    #[instrument(skip(self))]
    pub async fn update_user_status(&self, id: Uuid, status: UserStatus) -> UserResult<()> {
        let touched = self
            .repo
            .update_status(id, status)
            .await
            .map_err(|e| UserError::internal(e, "update user status"))?;
        if !touched {
            return Err(UserError::NotFound);
        }
        info!(user_id = %id, %status, "user status changed");
        Ok(())
    }

    /// `page` is 1-based. Clamping and defaults are the caller's job.
    #[instrument(skip(self))]
    pub async fn list_users(
        &self,
        filter: UserFilter,
        page: i64,
        limit: i64,
    ) -> UserResult<Vec<User>> {
        // A page past the addressable range is simply empty.
        let Some(offset) = (page.max(1) - 1).checked_mul(limit) else {
            debug!(page, limit, "page offset out of range");
            return Ok(Vec::new());
        };
        let users = self
            .repo
            .list(filter, limit, offset)
            .await
            .map_err(|e| UserError::internal(e, "list users"))?;
        debug!(count = users.len(), offset, "users listed");
        Ok(users)
    }

    #[instrument(skip(self))]
    pub async fn count_users(&self, filter: UserFilter) -> UserResult<i64> {
        self.repo
            .count(filter)
            .await
            .map_err(|e| UserError::internal(e, "count users"))
    }

    /// Unknown email and wrong password fail identically. Status is checked
    /// only once the password has matched.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> UserResult<User> {
        let Some(user) = self
            .repo
            .get_by_email(email)
            .await
            .map_err(|e| UserError::internal(e, "get user by email"))?
        else {
            warn!("login unknown email");
            return Err(UserError::InvalidCredentials);
        };

        if !verify_blocking(password.to_string(), user.password_hash.clone()).await? {
            warn!(user_id = %user.id, "login invalid password");
            return Err(UserError::InvalidCredentials);
        }

        if user.status != UserStatus::Active {
            warn!(user_id = %user.id, status = %user.status, "login on inactive account");
            return Err(UserError::AccountInactive);
        }

        info!(user_id = %user.id, "user logged in");
        Ok(user)
    }
}

// Argon2 is deliberately slow; keep it off the async workers.
async fn hash_blocking(password: String) -> UserResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| UserError::internal(e, "hash task"))?
        .map_err(|e| UserError::internal(e, "hash password"))
}

async fn verify_blocking(password: String, hash: String) -> UserResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| UserError::internal(e, "verify task"))?
        .map_err(|e| UserError::internal(e, "verify password"))
}
