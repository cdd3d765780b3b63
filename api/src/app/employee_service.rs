//! Employee service
//!
//! Validated CRUD over employee records.

use std::sync::Arc;

use crate::domain::entities::{Employee, EmployeeId, NewEmployee};
use crate::domain::ports::{EmployeeFilter, EmployeeRepository, Page};
use crate::domain::rules::validate_employee;
use crate::error::{AppError, DomainError};

/// Service for managing employees
pub struct EmployeeService<ER>
where
    ER: EmployeeRepository,
{
    employees: Arc<ER>,
}

impl<ER> EmployeeService<ER>
where
    ER: EmployeeRepository,
{
    pub fn new(employees: Arc<ER>) -> Self {
        Self { employees }
    }

    pub async fn list(
        &self,
        filter: &EmployeeFilter,
        page: Page,
    ) -> Result<Vec<Employee>, AppError> {
        Ok(self.employees.list(filter, page).await?)
    }

    pub async fn get(&self, id: &EmployeeId) -> Result<Employee, AppError> {
        self.employees
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Employee {} not found", id)).into())
    }

    pub async fn create(&self, employee: &NewEmployee) -> Result<Employee, AppError> {
        validate_employee(employee)?;

        let created = self.employees.create(employee).await?;
        tracing::info!(employee_id = %created.id, badge = %created.employee_id, "Created employee");
        Ok(created)
    }

    pub async fn update(
        &self,
        id: &EmployeeId,
        employee: &NewEmployee,
    ) -> Result<Employee, AppError> {
        self.get(id).await?;
        validate_employee(employee)?;

        let updated = self.employees.update(id, employee).await?;
        tracing::info!(employee_id = %id, "Updated employee");
        Ok(updated)
    }

    /// Delete an employee. Rejected while they lead a team.
    pub async fn delete(&self, id: &EmployeeId) -> Result<(), AppError> {
        self.employees.delete(id).await.map_err(|e| {
            if let DomainError::InvalidOperation(reason) = &e {
                tracing::debug!(employee_id = %id, %reason, "Employee delete rejected");
            }
            e
        })?;
        tracing::info!(employee_id = %id, "Deleted employee");
        Ok(())
    }
}
