//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.
//!
//! Request bodies are decoded into domain inputs by `*Request::decode`, which
//! accepts bare ids for references. Responses are encoded separately and
//! expand references into brief objects.

pub mod employees;
pub mod memberships;
pub mod salaries;
pub mod teams;
pub mod work_arrangements;

pub use employees::{create_employee, delete_employee, get_employee, list_employees, update_employee};
pub use memberships::{
    create_membership, delete_membership, get_membership, list_memberships, update_membership,
};
pub use salaries::get_salaries;
pub use teams::{create_team, delete_team, get_team, list_teams, update_team};
pub use work_arrangements::{
    create_work_arrangement, delete_work_arrangement, get_work_arrangement,
    list_work_arrangements, update_work_arrangement,
};

use axum::extract::rejection::JsonRejection;
use axum::Json;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AppError, DomainError};

/// Unwrap a JSON body, reporting malformed input as a 400
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Parse an id taken from the URL path. Anything unparseable cannot name a row.
pub(crate) fn path_id(raw: &str, kind: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("{} {} not found", kind, raw)))
}

/// Decode a reference field given as a bare id
pub(crate) fn decode_reference(
    field: &'static str,
    value: Option<Value>,
) -> Result<Uuid, DomainError> {
    match value {
        None | Some(Value::Null) => Err(DomainError::required(field)),
        Some(Value::String(s)) if s.is_empty() => Err(DomainError::required(field)),
        Some(Value::String(s)) => Uuid::parse_str(&s).map_err(|_| {
            DomainError::invalid_format(field, format!("\"{}\" is not a valid id.", s))
        }),
        Some(other) => Err(DomainError::invalid_format(
            field,
            format!("Expected an id, received {}.", other),
        )),
    }
}

/// Parse an optional id used as a list filter
pub(crate) fn filter_id(field: &'static str, raw: Option<&str>) -> Result<Option<Uuid>, AppError> {
    match raw {
        None | Some("") => Ok(None),
        Some(s) => Uuid::parse_str(s).map(Some).map_err(|_| {
            DomainError::invalid_format(field, format!("\"{}\" is not a valid id.", s)).into()
        }),
    }
}

/// Parse an optional timestamp used as a list filter.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DD[ T]HH:MM[:SS]` taken as UTC, or a
/// bare date meaning midnight UTC.
pub(crate) fn filter_datetime(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    let s = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(s) => s,
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Some(parsed.and_utc()));
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(Some(midnight.and_utc()));
    }

    Err(DomainError::invalid_format(field, "Enter a valid date/time.").into())
}
