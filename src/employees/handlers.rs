use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    users::repo_types::User,
};

use super::{dto::EmployeePayload, repo_types::Employee};

pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Employee {id} not found"))
}

async fn ensure_user_exists(state: &AppState, id_user: i64) -> ApiResult<()> {
    if User::exists(&state.db, id_user).await? {
        Ok(())
    } else {
        warn!(id_user, "employee references unknown user");
        Err(ApiError::NotFound(format!("User {id_user} not found")))
    }
}

#[instrument(skip(state))]
pub async fn list_employees(State(state): State<AppState>) -> ApiResult<Json<Vec<Employee>>> {
    let employees = Employee::list(&state.db).await?;
    info!(count = employees.len(), "employees listed");
    Ok(Json(employees))
}

#[instrument(skip(state))]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Employee>> {
    let employee = Employee::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(employee))
}

#[instrument(skip(state, payload))]
pub async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<EmployeePayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let Json(payload) = payload?;
    let row = payload
        .into_row(OffsetDateTime::now_utc().date())
        .map_err(|e| {
            warn!(error = %e, "invalid employee payload");
            e
        })?;
    ensure_user_exists(&state, row.id_user).await?;

    let employee = Employee::create(&state.db, &row).await?;
    info!(employee_id = employee.id, id_user = employee.id_user, "employee created");
    Ok((StatusCode::CREATED, Json(employee)))
}

#[instrument(skip(state, payload))]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<EmployeePayload>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let Json(payload) = payload?;
    let row = payload.into_row(OffsetDateTime::now_utc().date())?;
    ensure_user_exists(&state, row.id_user).await?;

    let employee = Employee::update(&state.db, id, &row)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(employee_id = employee.id, "employee updated");
    Ok(Json(employee))
}

#[instrument(skip(state))]
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    if !Employee::delete(&state.db, id).await? {
        return Err(not_found(id));
    }
    info!(employee_id = id, "employee deleted");
    Ok(Json(json!({ "success": true, "message": "Employee deleted" })))
}

#[cfg(test)]
mod tests {
    use crate::{app::build_app, state::AppState};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn send(method: &str, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let app = build_app(AppState::fake());
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn create_with_missing_fields_is_400() {
        let (status, body) = send("POST", "/api/employees", r#"{"name":"Ana"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert!(body["message"].as_str().unwrap().contains("last_name"));
    }

    #[tokio::test]
    async fn update_with_invalid_status_is_400() {
        let body = r#"{
            "name": "Ana", "last_name": "Diaz", "agency": "CABORCA",
            "date_of_birth": "1990-01-01", "high_date": "2010-01-01",
            "status": "X", "id_user": 1
        }"#;
        let (status, _) = send("PUT", "/api/employees/5", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn wrong_id_type_in_body_is_400() {
        let (status, body) = send("POST", "/api/employees", r#"{"id_user":"seven"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}
