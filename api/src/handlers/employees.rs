//! Employee handlers
//!
//! Endpoints for employee records.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{filter_datetime, json_body, path_id};
use crate::domain::entities::{Employee, EmployeeId, NewEmployee};
use crate::domain::ports::{EmployeeFilter, Page, SortKey, Store};
use crate::domain::rules::parse_hourly_rate;
use crate::error::{AppError, DomainError};
use crate::AppState;

/// Query parameters for listing employees
#[derive(Debug, Default, Deserialize)]
pub struct ListEmployeesQuery {
    /// Case-insensitive name search
    pub q: Option<String>,
    pub name: Option<String>,
    pub employee_id: Option<String>,
    pub create_date_after: Option<String>,
    pub create_date_before: Option<String>,
    /// Comma separated, e.g. `-update_date,create_date`
    pub ordering: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ListEmployeesQuery {
    pub fn filter(&self) -> Result<EmployeeFilter, AppError> {
        let present = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

        Ok(EmployeeFilter {
            q: present(&self.q),
            name: present(&self.name),
            employee_id: present(&self.employee_id),
            created_after: filter_datetime("create_date", self.create_date_after.as_deref())?,
            created_before: filter_datetime("create_date", self.create_date_before.as_deref())?,
            ordering: self
                .ordering
                .as_deref()
                .map(SortKey::parse_list)
                .unwrap_or_default(),
        })
    }
}

/// Body of a create or update request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmployeeRequest {
    pub name: Option<String>,
    pub employee_id: Option<String>,
    /// A JSON number or a numeric string
    pub hourly_rate: Option<Value>,
}

impl EmployeeRequest {
    pub fn decode(self) -> Result<NewEmployee, DomainError> {
        Ok(NewEmployee {
            name: self.name.unwrap_or_default(),
            employee_id: self.employee_id.unwrap_or_default(),
            hourly_rate: decode_hourly_rate(self.hourly_rate)?,
        })
    }
}

fn decode_hourly_rate(value: Option<Value>) -> Result<Decimal, DomainError> {
    const FIELD: &str = "hourly_rate";

    match value {
        None | Some(Value::Null) => Err(DomainError::required(FIELD)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(DomainError::required(FIELD)),
        Some(Value::String(s)) => parse_hourly_rate(&s),
        Some(Value::Number(n)) => parse_hourly_rate(&n.to_string()),
        Some(_) => Err(DomainError::invalid_format(
            FIELD,
            "A valid number is required.",
        )),
    }
}

#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub id: EmployeeId,
    pub name: String,
    pub employee_id: String,
    pub hourly_rate: Decimal,
    pub create_date: i64,
    pub update_date: i64,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            employee_id: employee.employee_id,
            hourly_rate: employee.hourly_rate,
            create_date: employee.created_at.timestamp(),
            update_date: employee.updated_at.timestamp(),
        }
    }
}

/// GET /employees
pub async fn list_employees<S: Store>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<Json<Vec<EmployeeResponse>>, AppError> {
    let filter = query.filter()?;
    let employees = state
        .employees
        .list(&filter, Page::new(query.limit, query.offset))
        .await?;

    Ok(Json(employees.into_iter().map(Into::into).collect()))
}

/// GET /employees/:id
pub async fn get_employee<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<EmployeeResponse>, AppError> {
    let id = EmployeeId(path_id(&id, "Employee")?);
    let employee = state.employees.get(&id).await?;

    Ok(Json(employee.into()))
}

/// POST /employees
pub async fn create_employee<S: Store>(
    State(state): State<AppState<S>>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EmployeeResponse>), AppError> {
    let employee = json_body(payload)?.decode()?;
    let created = state.employees.create(&employee).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// PUT /employees/:id
pub async fn update_employee<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<Json<EmployeeResponse>, AppError> {
    let id = EmployeeId(path_id(&id, "Employee")?);
    let employee = json_body(payload)?.decode()?;
    let updated = state.employees.update(&id, &employee).await?;

    Ok(Json(updated.into()))
}

/// DELETE /employees/:id
///
/// Fails while the employee leads a team.
pub async fn delete_employee<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = EmployeeId(path_id(&id, "Employee")?);
    state.employees.delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
