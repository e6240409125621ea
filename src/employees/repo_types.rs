use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

/// Employee record as stored and as served by `GET /api/employees`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub agency: String,
    pub date_of_birth: Date,
    pub high_date: Date,
    pub status: String, // "SI" | "NO"
    pub low_date: Option<Date>,
    pub photo: Option<String>,
    pub id_user: i64,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub last_modified: Option<OffsetDateTime>,
    #[serde(default)]
    pub modified_by: Option<i64>,
}

/// Validated columns for insert and update.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRow {
    pub name: String,
    pub last_name: String,
    pub agency: String,
    pub date_of_birth: Date,
    pub high_date: Date,
    pub status: String,
    pub low_date: Option<Date>,
    pub photo: Option<String>,
    pub id_user: i64,
    pub modified_by: Option<i64>,
}
