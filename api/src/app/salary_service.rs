//! Salary service
//!
//! Read-only projection: nothing computed here is persisted.

use std::sync::Arc;

use crate::domain::entities::{Employee, EmployeeId, Salary, SalaryPolicy};
use crate::domain::ports::{EmployeeRepository, TeamRepository, WorkArrangementRepository};
use crate::error::{AppError, DomainError};

/// Service computing payable amounts
pub struct SalaryService<ER, TR, WR>
where
    ER: EmployeeRepository,
    TR: TeamRepository,
    WR: WorkArrangementRepository,
{
    employees: Arc<ER>,
    teams: Arc<TR>,
    arrangements: Arc<WR>,
    policy: SalaryPolicy,
}

impl<ER, TR, WR> SalaryService<ER, TR, WR>
where
    ER: EmployeeRepository,
    TR: TeamRepository,
    WR: WorkArrangementRepository,
{
    pub fn new(employees: Arc<ER>, teams: Arc<TR>, arrangements: Arc<WR>, policy: SalaryPolicy) -> Self {
        Self {
            employees,
            teams,
            arrangements,
            policy,
        }
    }

    /// Salary of one employee
    pub async fn salary_for(&self, id: &EmployeeId) -> Result<Salary, AppError> {
        let employee = self
            .employees
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Employee {} not found", id)))?;

        self.compute(&employee).await
    }

    /// Salaries of every employee, in employee list order
    pub async fn list_salaries(&self) -> Result<Vec<Salary>, AppError> {
        let employees = self.employees.find_all().await?;

        let mut salaries = Vec::with_capacity(employees.len());
        for employee in &employees {
            salaries.push(self.compute(employee).await?);
        }
        Ok(salaries)
    }

    async fn compute(&self, employee: &Employee) -> Result<Salary, AppError> {
        let is_leader = !self.teams.find_by_leader(&employee.id).await?.is_empty();
        let arrangements = self.arrangements.find_by_employee(&employee.id).await?;

        let payable = self
            .policy
            .payable(employee.hourly_rate, is_leader, &arrangements)
            .ok_or_else(|| {
                AppError::Internal(format!("Salary of employee {} overflows", employee.id))
            })?;
        tracing::debug!(
            employee_id = %employee.id,
            is_leader,
            arrangements = arrangements.len(),
            %payable,
            "Computed salary"
        );

        Ok(Salary {
            employee: employee.brief(),
            payable,
        })
    }
}
