//! Work arrangement service
//!
//! Full-time arrangements are stored without a percentage. The coexistence
//! and percentage-sum rules run inside the repository write, against the
//! employee's arrangements as locked by that write.

use std::sync::Arc;

use crate::domain::entities::{
    NewWorkArrangement, WorkArrangement, WorkArrangementId,
};
use crate::domain::ports::{
    EmployeeRepository, Page, WorkArrangementFilter, WorkArrangementRepository,
};
use crate::domain::rules::{check_work_arrangement, WriteMode};
use crate::error::{AppError, DomainError};

/// Service for managing work arrangements
pub struct WorkArrangementService<WR, ER>
where
    WR: WorkArrangementRepository,
    ER: EmployeeRepository,
{
    arrangements: Arc<WR>,
    employees: Arc<ER>,
}

impl<WR, ER> WorkArrangementService<WR, ER>
where
    WR: WorkArrangementRepository,
    ER: EmployeeRepository,
{
    pub fn new(arrangements: Arc<WR>, employees: Arc<ER>) -> Self {
        Self {
            arrangements,
            employees,
        }
    }

    pub async fn list(
        &self,
        filter: &WorkArrangementFilter,
        page: Page,
    ) -> Result<Vec<WorkArrangement>, AppError> {
        Ok(self.arrangements.list(filter, page).await?)
    }

    pub async fn get(&self, id: &WorkArrangementId) -> Result<WorkArrangement, AppError> {
        self.arrangements
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Work arrangement {} not found", id)).into())
    }

    pub async fn create(
        &self,
        arrangement: &NewWorkArrangement,
    ) -> Result<WorkArrangement, AppError> {
        let arrangement = arrangement.normalized();
        self.check_employee(&arrangement).await?;

        let created = self
            .arrangements
            .create(&arrangement, &|stored| {
                check_work_arrangement(&arrangement, stored, WriteMode::Create)
            })
            .await
            .inspect_err(|e| log_rejection(e, &arrangement))?;

        tracing::info!(
            arrangement_id = %created.id,
            employee_id = %created.employee_id,
            work_type = %created.work_type,
            "Created work arrangement"
        );
        Ok(created)
    }

    pub async fn update(
        &self,
        id: &WorkArrangementId,
        arrangement: &NewWorkArrangement,
    ) -> Result<WorkArrangement, AppError> {
        self.get(id).await?;
        let arrangement = arrangement.normalized();
        self.check_employee(&arrangement).await?;

        let updated = self
            .arrangements
            .update(id, &arrangement, &|stored| {
                check_work_arrangement(&arrangement, stored, WriteMode::Update(*id))
            })
            .await
            .inspect_err(|e| log_rejection(e, &arrangement))?;

        tracing::info!(arrangement_id = %id, work_type = %updated.work_type, "Updated work arrangement");
        Ok(updated)
    }

    pub async fn delete(&self, id: &WorkArrangementId) -> Result<(), AppError> {
        self.arrangements.delete(id).await?;
        tracing::info!(arrangement_id = %id, "Deleted work arrangement");
        Ok(())
    }

    async fn check_employee(&self, arrangement: &NewWorkArrangement) -> Result<(), AppError> {
        match self.employees.find_by_id(&arrangement.employee_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::invalid_reference(
                "employee",
                format!("Employee {} does not exist.", arrangement.employee_id),
            )
            .into()),
        }
    }
}

fn log_rejection(error: &DomainError, arrangement: &NewWorkArrangement) {
    if let DomainError::Conflict(reason) = error {
        tracing::debug!(
            employee_id = %arrangement.employee_id,
            work_type = %arrangement.work_type,
            %reason,
            "Work arrangement rejected"
        );
    }
}
