//! Salary handlers

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::domain::entities::EmployeeId;
use crate::domain::ports::Store;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SalaryQuery {
    /// Restrict the result to one employee
    pub employee: Option<String>,
}

/// GET /salaries[?employee=<id>]
///
/// Without `employee`, one salary per employee. With it, that employee's
/// salary as a single object, or 404.
pub async fn get_salaries<S: Store>(
    State(state): State<AppState<S>>,
    Query(query): Query<SalaryQuery>,
) -> Result<Response, AppError> {
    match query.employee.filter(|e| !e.is_empty()) {
        Some(raw) => {
            let id = uuid::Uuid::parse_str(&raw)
                .map_err(|_| AppError::NotFound(format!("Employee {} not found", raw)))?;
            let salary = state.salaries.salary_for(&EmployeeId(id)).await?;
            Ok(Json(salary).into_response())
        }
        None => {
            let salaries = state.salaries.list_salaries().await?;
            Ok(Json(salaries).into_response())
        }
    }
}
