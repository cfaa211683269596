/// User endpoints
///
/// - `POST /register` - create an account
/// - `POST /login` - look up an account by email and password
/// - `GET /users/` - list accounts
/// - `GET /users/:user_id` - fetch one account
///
/// Login only proves the credentials match a stored user; it issues no
/// token or session. Task endpoints identify the caller by `?user_id=`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{AppJson, AppPath, AppQuery, Pagination},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use taskdesk_shared::{
    auth::password,
    models::user::{CreateUser, User},
};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Unique login name
    #[validate(length(min = 1, max = 64, message = "Username must be 1 to 64 characters"))]
    pub username: String,

    /// Unique email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 128, message = "Password must be 1 to 128 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /register
/// Content-Type: application/json
///
/// { "username": "ada", "email": "ada@example.com", "password": "hunter2" }
/// ```
///
/// # Response
///
/// `201 Created` with the stored user (without the password).
///
/// # Errors
///
/// - `409 Conflict`: email or username already registered
/// - `422 Unprocessable Entity`: malformed fields
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    req.validate()?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }
    if User::find_by_username(&state.db, &req.username).await?.is_some() {
        return Err(ApiError::Conflict("Username already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    // A concurrent registration can still trip the unique constraints;
    // From<sqlx::Error> reports that as the same 409.
    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in with email and password
///
/// # Errors
///
/// - `401 Unauthorized`: no user with this email, or wrong password
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| {
            tracing::debug!("Login for unknown email");
            invalid()
        })?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login with wrong password");
        return Err(invalid());
    }

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(user))
}

/// Fetch one user
///
/// # Errors
///
/// - `404 Not Found`: no such user
pub async fn get_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<Uuid>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// List users with `?skip=&limit=`
pub async fn list_users(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Pagination>,
) -> ApiResult<Json<Vec<User>>> {
    let page = page.validate()?;
    let users = User::list(&state.db, page.limit, page.skip).await?;

    Ok(Json(users))
}
