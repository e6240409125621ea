use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    error::{ApiError, ApiResult},
    validation::{parse_date, require, validate_agency},
};

use super::repo_types::EmployeeRow;

pub const STATUS_ACTIVE: &str = "SI";
pub const STATUS_INACTIVE: &str = "NO";

/// Body for `POST /api/employees` and `PUT /api/employees/:id`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EmployeePayload {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub agency: Option<String>,
    pub date_of_birth: Option<String>,
    pub high_date: Option<String>,
    pub status: Option<String>,
    pub low_date: Option<String>,
    pub photo: Option<String>,
    pub id_user: Option<i64>,
    pub modified_by: Option<i64>,
}

impl EmployeePayload {
    /// Validates the payload. Active employees never carry a low date;
    /// inactive ones without one get `today`.
    pub fn into_row(self, today: Date) -> ApiResult<EmployeeRow> {
        let name = require("name", &self.name)?;
        let last_name = require("last_name", &self.last_name)?;
        let agency = require("agency", &self.agency)?;
        let date_of_birth = require("date_of_birth", &self.date_of_birth)?;
        let date_of_birth = parse_date("date_of_birth", &date_of_birth)?;
        let high_date = parse_date("high_date", &require("high_date", &self.high_date)?)?;
        let status = require("status", &self.status)?;
        let id_user = self
            .id_user
            .ok_or_else(|| ApiError::Validation("Field 'id_user' is required".into()))?;

        validate_agency(&agency)?;

        let low_date = match status.as_str() {
            STATUS_ACTIVE => None,
            STATUS_INACTIVE => match self.low_date.as_deref().map(str::trim) {
                Some(raw) if !raw.is_empty() => Some(parse_date("low_date", raw)?),
                _ => Some(today),
            },
            other => {
                return Err(ApiError::Validation(format!(
                    "Field 'status' must be SI or NO, got '{other}'"
                )))
            }
        };

        let photo = self
            .photo
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Ok(EmployeeRow {
            name,
            last_name,
            agency,
            date_of_birth,
            high_date,
            status,
            low_date,
            photo,
            id_user,
            modified_by: self.modified_by.or(Some(id_user)),
        })
    }
}
