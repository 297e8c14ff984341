use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::ApiError,
    response::{ApiResponse, PaginatedResponse},
    state::AppState,
    users::{
        dto::{CreateUserRequest, ListUsersQuery, LoginRequest, UpdateUserRequest},
        repo_types::{User, UserStatus},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route("/users/by-email/:email", get(get_user_by_email))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

fn parse_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            warn!(error = %rejection, "invalid request body");
            Err(ApiError::BadRequest(format!(
                "invalid JSON: {}",
                rejection.body_text()
            )))
        }
    }
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("invalid user ID".into()))
}

/// POST /api/v1/users
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    let input = parse_json(payload)?.validate().map_err(|errors| {
        warn!(%errors, "create user validation failed");
        errors
    })?;

    let user = state.users.create_user(input).await?;
    info!(user_id = %user.id, "user created successfully");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            Some(user),
            "User created successfully",
        )),
    ))
}

/// GET /api/v1/users?page=&limit=&role=&status=
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<PaginatedResponse<User>>, ApiError> {
    let params = query.into_params()?;
    let users = state
        .users
        .list_users(params.filter, params.page, params.limit)
        .await?;
    let total = state.users.count_users(params.filter).await?;
    Ok(Json(PaginatedResponse::new(
        users,
        params.page,
        params.limit,
        total,
    )))
}

/// GET /api/v1/users/:id
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let id = parse_id(&id)?;
    let user = state.users.get_user_by_id(id).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// GET /api/v1/users/by-email/:email
#[instrument(skip(state))]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.users.get_user_by_email(email.trim()).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// PUT /api/v1/users/:id
#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let id = parse_id(&id)?;
    let input = parse_json(payload)?;
    input.validate()?;

    let user = state.users.update_user(id, input).await?;
    info!(user_id = %user.id, "user updated successfully");
    Ok(Json(ApiResponse::with_message(
        Some(user),
        "User updated successfully",
    )))
}

/// DELETE /api/v1/users/:id. Soft delete: the account becomes inactive.
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_id(&id)?;
    state
        .users
        .update_user_status(id, UserStatus::Inactive)
        .await?;
    info!(user_id = %id, "user deleted successfully");
    Ok(Json(ApiResponse::with_message(
        None,
        "User deleted successfully",
    )))
}

/// POST /api/v1/auth/login
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let mut input = parse_json(payload)?;
    input.validate()?;

    let user = state.users.login(&input.email, &input.password).await?;
    Ok(Json(ApiResponse::with_message(Some(user), "Login successful")))
}
