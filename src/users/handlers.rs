use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

use super::{dto::UserPayload, repo_types::User};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("User {id} not found"))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(User::list(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(payload) = payload?;
    let row = payload.into_new_row(state.config.password_scheme).map_err(|e| {
        warn!(error = %e, "invalid user payload");
        e
    })?;

    let user = User::create(&state.db, &row).await?;
    info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let Json(payload) = payload?;
    let row = payload.into_update_row(state.config.password_scheme)?;

    let user = User::update(&state.db, id, &row).await?.ok_or_else(|| not_found(id))?;
    info!(user_id = user.id, "user updated");
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    if !User::delete(&state.db, id).await? {
        return Err(not_found(id));
    }
    info!(user_id = id, "user deleted");
    Ok(Json(json!({ "success": true, "message": "User deleted" })))
}

#[cfg(test)]
mod tests {
    use crate::{app::build_app, state::AppState};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn create_user_with_missing_fields_is_rejected() {
        let app = build_app(AppState::fake());
        let req = Request::builder()
            .method("POST")
            .uri("/api/users")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"Ana"}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn non_numeric_id_is_rejected() {
        let app = build_app(AppState::fake());
        let req = Request::builder()
            .uri("/api/users/abc")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
