use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse},
        services::{generate_token, verify_password},
    },
    error::{ApiError, ApiResult},
    state::AppState,
    users::repo_types::User,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Decides a login attempt once the lookup is done. An unknown email and a
/// wrong password produce the same error.
pub(crate) fn check_credentials(found: Option<User>, password: &str) -> ApiResult<User> {
    let Some(user) = found else {
        warn!("login unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    let ok = verify_password(password, &user.password_hash).map_err(|e| {
        error!(error = %e, user_id = user.id, "verify_password failed");
        ApiError::Server(e.to_string())
    })?;

    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }
    Ok(user)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(payload) = payload?;

    if payload.email.trim().is_empty() || payload.password.is_empty() {
        warn!("login without credentials");
        return Err(ApiError::Validation("Email and password are required".into()));
    }

    let found = User::find_by_email(&state.db, &payload.email).await?;
    let user = check_credentials(found, &payload.password)?;

    let token = generate_token();
    info!(user_id = user.id, "user logged in");
    Ok(Json(LoginResponse {
        success: true,
        user,
        token,
    }))
}
