use std::sync::Arc;

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::users::repo::{RepoError, RepoResult, UserRepository};
use crate::users::repo_types::{NewUser, User, UserFilter, UserStatus};

/// In-memory `UserRepository` used as a test double.
///
/// Rows live in insertion order; each insert gets a strictly later
/// `created_at` so newest-first ordering is deterministic.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn row_count(&self) -> usize {
        self.users.read().await.len()
    }
}

fn accepts(filter: UserFilter, user: &User) -> bool {
    filter.role.map_or(true, |r| user.role == r) && filter.status.map_or(true, |s| user.status == s)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> RepoResult<User> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::UniqueViolation);
        }

        let mut now = OffsetDateTime::now_utc();
        if let Some(last) = users.last() {
            if now <= last.created_at {
                now = last.created_at + Duration::microseconds(1);
            }
        }

        let row = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            status: user.status,
            avatar_url: None,
            phone: user.phone,
            created_at: now,
            updated_at: now,
        };
        users.push(row.clone());
        Ok(row)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn update(&self, user: &User) -> RepoResult<Option<User>> {
        let mut users = self.users.write().await;
        let Some(row) = users.iter_mut().find(|u| u.id == user.id) else {
            return Ok(None);
        };
        row.first_name = user.first_name.clone();
        row.last_name = user.last_name.clone();
        row.phone = user.phone.clone();
        row.avatar_url = user.avatar_url.clone();
        row.updated_at = OffsetDateTime::now_utc();
        Ok(Some(row.clone()))
    }

    async fn update_status(&self, id: Uuid, status: UserStatus) -> RepoResult<bool> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == id) {
            Some(row) => {
                row.status = status;
                row.updated_at = OffsetDateTime::now_utc();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, filter: UserFilter, limit: i64, offset: i64) -> RepoResult<Vec<User>> {
        let users = self.users.read().await;
        let rows = users
            .iter()
            .rev()
            .filter(|u| accepts(filter, u))
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok(rows)
    }

    async fn count(&self, filter: UserFilter) -> RepoResult<i64> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| accepts(filter, u)).count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo_types::UserRole;

    fn new_user(email: &str, role: UserRole) -> NewUser {
        NewUser {
            email: email.into(),
            password_hash: "hash".into(),
            first_name: "Test".into(),
            last_name: "User".into(),
            role,
            status: UserStatus::Active,
            phone: None,
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("dup@example.com", UserRole::Gamer)).await.unwrap();

        let err = repo
            .create(new_user("dup@example.com", UserRole::Admin))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::UniqueViolation));
        assert_eq!(repo.row_count().await, 1);
    }

    #[tokio::test]
    async fn email_lookup_is_exact() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("Case@Example.com", UserRole::Gamer)).await.unwrap();

        assert!(repo.get_by_email("Case@Example.com").await.unwrap().is_some());
        assert!(repo.get_by_email("case@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_newest_first_and_count_ignores_paging() {
        let repo = InMemoryUserRepository::new();
        for i in 0..5 {
            repo.create(new_user(&format!("u{i}@example.com"), UserRole::Gamer))
                .await
                .unwrap();
        }

        let page = repo.list(UserFilter::default(), 2, 1).await.unwrap();
        let emails: Vec<_> = page.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, ["u3@example.com", "u2@example.com"]);
        assert!(page[0].created_at > page[1].created_at);
        assert_eq!(repo.count(UserFilter::default()).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn filters_combine_role_and_status() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create(new_user("a@example.com", UserRole::Admin)).await.unwrap();
        repo.create(new_user("b@example.com", UserRole::Admin)).await.unwrap();
        repo.create(new_user("c@example.com", UserRole::Gamer)).await.unwrap();
        repo.update_status(a.id, UserStatus::Suspended).await.unwrap();

        let filter = UserFilter {
            role: Some(UserRole::Admin),
            status: Some(UserStatus::Active),
        };
        let rows = repo.list(filter, 10, 0).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].email, "b@example.com");
        assert_eq!(repo.count(filter).await.unwrap(), 1);

        let admins = UserFilter { role: Some(UserRole::Admin), ..Default::default() };
        assert_eq!(repo.count(admins).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn update_and_status_on_missing_row() {
        let repo = InMemoryUserRepository::new();
        let mut ghost = repo.create(new_user("g@example.com", UserRole::Gamer)).await.unwrap();
        ghost.id = Uuid::new_v4();

        assert!(repo.update(&ghost).await.unwrap().is_none());
        assert!(!repo.update_status(ghost.id, UserStatus::Inactive).await.unwrap());
    }
}
