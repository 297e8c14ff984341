use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::ValidationErrors;
use crate::users::repo_types::{UserFilter, UserRole, UserStatus};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn is_valid_url(url: &str) -> bool {
    lazy_static! {
        static ref URL_RE: Regex = Regex::new(r"^https?://[^\s/$.?#][^\s]*$").unwrap();
    }
    URL_RE.is_match(url)
}

fn check_name(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    let len = value.chars().count();
    if len == 0 {
        errors.add(field, format!("{field} is required"));
    } else if len < 2 {
        errors.add(field, format!("{field} must be at least 2 characters"));
    } else if len > 100 {
        errors.add(field, format!("{field} must be at most 100 characters"));
    }
}

fn check_phone(errors: &mut ValidationErrors, phone: Option<&str>) {
    if let Some(phone) = phone.filter(|p| !p.is_empty()) {
        if phone.chars().count() < 10 {
            errors.add("phone", "phone must be at least 10 characters");
        }
    }
}

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: String,
    pub phone: Option<String>,
}

/// A create request that passed validation.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub phone: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<CreateUser, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let email = self.email.trim().to_string();

        if email.is_empty() {
            errors.add("email", "email is required");
        } else if !is_valid_email(&email) {
            errors.add("email", "email must be a valid email");
        }

        if self.password.is_empty() {
            errors.add("password", "password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add("password", "password must be at least 8 characters");
        }

        check_name(&mut errors, "first_name", &self.first_name);
        check_name(&mut errors, "last_name", &self.last_name);
        check_phone(&mut errors, self.phone.as_deref());

        let role = match self.role.parse::<UserRole>() {
            Ok(role) => Some(role),
            Err(_) => {
                if self.role.is_empty() {
                    errors.add("role", "role is required");
                } else {
                    errors.add("role", "role must be one of: gamer admin super_admin");
                }
                None
            }
        };

        match role {
            Some(role) if errors.errors.is_empty() => Ok(CreateUser {
                email,
                password: self.password,
                first_name: self.first_name,
                last_name: self.last_name,
                role,
                phone: self.phone.filter(|p| !p.is_empty()),
            }),
            _ => Err(errors),
        }
    }
}

/// Request body for `PUT /users/:id`.
///
/// `phone` and `avatar_url` are only written when present and non-empty;
/// there is no way to clear them through this request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_name(&mut errors, "first_name", &self.first_name);
        check_name(&mut errors, "last_name", &self.last_name);
        check_phone(&mut errors, self.phone.as_deref());
        if let Some(url) = self.avatar_url.as_deref().filter(|u| !u.is_empty()) {
            if !is_valid_url(url) {
                errors.add("avatar_url", "avatar_url must be a valid URL");
            }
        }
        errors.into_result()
    }
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&mut self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        self.email = self.email.trim().to_string();
        if self.email.is_empty() {
            errors.add("email", "email is required");
        } else if !is_valid_email(&self.email) {
            errors.add("email", "email must be a valid email");
        }
        if self.password.is_empty() {
            errors.add("password", "password is required");
        }
        errors.into_result()
    }
}

/// Raw query of `GET /users`. Kept as strings so junk paging values fall back
/// to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub filter: UserFilter,
    pub page: i64,
    pub limit: i64,
}

impl ListUsersQuery {
    pub fn into_params(self) -> Result<ListParams, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let page = self
            .page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_PAGE);
        let limit = self
            .limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);

        let role = match self.role.as_deref().filter(|r| !r.is_empty()) {
            None => None,
            Some(r) => match r.parse::<UserRole>() {
                Ok(role) => Some(role),
                Err(_) => {
                    errors.add("role", "role must be one of: gamer admin super_admin");
                    None
                }
            },
        };
        let status = match self.status.as_deref().filter(|s| !s.is_empty()) {
            None => None,
            Some(s) => match s.parse::<UserStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.add("status", "status must be one of: active inactive suspended");
                    None
                }
            },
        };

        errors.into_result()?;
        Ok(ListParams {
            filter: UserFilter { role, status },
            page,
            limit,
        })
    }
}
