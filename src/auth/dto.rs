use serde::{Deserialize, Serialize};

use crate::users::repo_types::User;

/// Request body for login. Missing fields deserialize as empty and are
/// rejected by the handler with a validation error.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: User,
    pub token: String,
}
