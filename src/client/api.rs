use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use super::{ClientError, ClientResult};
use crate::{
    auth::dto::LoginResponse,
    employees::{dto::EmployeePayload, repo_types::Employee},
    users::repo_types::User,
};

/// Successful login as seen by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSuccess {
    pub user: User,
    pub token: String,
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> ClientResult<LoginSuccess>;
}

#[async_trait]
pub trait EmployeeSource: Send + Sync {
    async fn list_employees(&self) -> ClientResult<Vec<Employee>>;
    async fn create_employee(&self, payload: &EmployeePayload) -> ClientResult<Employee>;
}

/// HTTP client for the `/api` endpoints. No timeout beyond reqwest's
/// defaults and no retries.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> ClientResult<T> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }
        let body: serde_json::Value = resp.json().await.unwrap_or_default();
        let message = body["message"]
            .as_str()
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"))
            .to_string();
        warn!(status = status.as_u16(), %message, "api request failed");
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> ClientResult<LoginSuccess> {
        let resp = self
            .http
            .post(self.url("auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let body: LoginResponse = Self::decode(resp).await?;
        debug!(user_id = body.user.id, "login accepted");
        Ok(LoginSuccess {
            user: body.user,
            token: body.token,
        })
    }
}

#[async_trait]
impl EmployeeSource for ApiClient {
    async fn list_employees(&self) -> ClientResult<Vec<Employee>> {
        let resp = self.http.get(self.url("employees")).send().await?;
        Self::decode(resp).await
    }

    async fn create_employee(&self, payload: &EmployeePayload) -> ClientResult<Employee> {
        let resp = self.http.post(self.url("employees")).json(payload).send().await?;
        Self::decode(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::build_app, state::AppState};

    async fn spawn(app: axum::Router) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        ApiClient::new(format!("http://{addr}"))
    }

    #[test]
    fn urls_are_rooted_under_api() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.url("auth/login"), "http://localhost:8080/api/auth/login");
        assert_eq!(client.url("/employees"), "http://localhost:8080/api/employees");
    }

    #[tokio::test]
    async fn server_message_becomes_status_error() {
        let client = spawn(build_app(AppState::fake())).await;
        match client.login("", "").await {
            Err(ClientError::Status { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Email and password are required");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_route_falls_back_to_reason_phrase() {
        let client = spawn(axum::Router::new()).await;
        match client.list_employees().await {
            Err(ClientError::Status { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
