//! Field checks shared by the user and employee payloads.

use time::{macros::format_description, Date};

use crate::error::{ApiError, ApiResult};

/// Agencies an employee or user may belong to.
pub const AGENCIES: &[&str] = &[
    "HERMOSILLO",
    "CABORCA",
    "GUAYMAS",
    "NOGALES",
    "OBREGON",
    "NAVOJOA",
    "SAN LUIS RIO COLORADO",
    "PUERTO PENASCO",
    "AGUA PRIETA",
    "HUATABAMPO",
];

/// Returns the trimmed value of a required field.
pub(crate) fn require(field: &str, value: &Option<String>) -> ApiResult<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ApiError::Validation(format!("Field '{field}' is required"))),
    }
}

pub(crate) fn validate_agency(agency: &str) -> ApiResult<()> {
    if AGENCIES.contains(&agency) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!("Unknown agency '{agency}'")))
    }
}

/// Accepts `YYYY-MM-DD`, or a full ISO timestamp whose date part is used.
pub(crate) fn parse_date(field: &str, raw: &str) -> ApiResult<Date> {
    let date_part = match raw.split_once('T') {
        Some((d, _)) => d,
        None => raw,
    };
    Date::parse(date_part, format_description!("[year]-[month]-[day]")).map_err(|_| {
        ApiError::Validation(format!("Field '{field}' must be a date (YYYY-MM-DD)"))
    })
}
