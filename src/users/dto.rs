use serde::Deserialize;

use crate::{
    auth::services::{hash_password, is_valid_email},
    config::PasswordScheme,
    error::{ApiError, ApiResult},
    validation::{require, validate_agency},
};

use super::repo_types::{NewUserRow, UserUpdateRow};

/// Body for `POST /api/users` and `PUT /api/users/:id`. On update an absent
/// password or superuser flag keeps the stored value; on create the flag
/// defaults to 0.
#[derive(Debug, Default, Deserialize)]
pub struct UserPayload {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub agency: Option<String>,
    pub is_superuser: Option<i16>,
}

struct CheckedFields {
    name: String,
    last_name: String,
    email: String,
    agency: String,
}

impl UserPayload {
    fn checked_fields(&self) -> ApiResult<CheckedFields> {
        let name = require("name", &self.name)?;
        let last_name = require("last_name", &self.last_name)?;
        let email = require("email", &self.email)?;
        let agency = require("agency", &self.agency)?;

        if !is_valid_email(&email) {
            return Err(ApiError::Validation("Invalid email".into()));
        }
        validate_agency(&agency)?;
        if !matches!(self.is_superuser, None | Some(0 | 1)) {
            return Err(ApiError::Validation("is_superuser must be 0 or 1".into()));
        }

        Ok(CheckedFields {
            name,
            last_name,
            email,
            agency,
        })
    }

    pub fn into_new_row(self, scheme: PasswordScheme) -> ApiResult<NewUserRow> {
        let fields = self.checked_fields()?;
        let password = require("password", &self.password)?;
        let password_hash = hash_password(scheme, &password)?;
        Ok(NewUserRow {
            name: fields.name,
            last_name: fields.last_name,
            email: fields.email,
            password_hash,
            agency: fields.agency,
            is_superuser: self.is_superuser.unwrap_or(0),
        })
    }

    pub fn into_update_row(self, scheme: PasswordScheme) -> ApiResult<UserUpdateRow> {
        let fields = self.checked_fields()?;
        let password_hash = match self.password.as_deref().filter(|p| !p.is_empty()) {
            Some(p) => Some(hash_password(scheme, p)?),
            None => None,
        };
        Ok(UserUpdateRow {
            name: fields.name,
            last_name: fields.last_name,
            email: fields.email,
            password_hash,
            agency: fields.agency,
            is_superuser: self.is_superuser,
        })
    }
}
