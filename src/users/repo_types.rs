use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub email: String, // unique, matched exactly on login
    #[serde(skip_serializing, default)]
    pub password_hash: String, // never leaves the server
    pub agency: String,
    pub is_superuser: i16, // 0 | 1
}

/// Columns written on insert. `password_hash` is already digested.
#[derive(Debug, Clone)]
pub struct NewUserRow {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub agency: String,
    pub is_superuser: i16,
}

/// Columns written on update; `None` keeps the stored value.
#[derive(Debug, Clone)]
pub struct UserUpdateRow {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub agency: String,
    pub is_superuser: Option<i16>,
}
