//! PostgreSQL adapter for WorkArrangementRepository
//!
//! Writes lock the owning employee row, which serializes concurrent changes to
//! one employee's arrangements.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    EmployeeId, NewWorkArrangement, WorkArrangement, WorkArrangementId, WorkType,
};
use crate::domain::ports::{Page, SiblingCheck, WorkArrangementFilter, WorkArrangementRepository};
use crate::entity::{employees, work_arrangements};
use crate::error::DomainError;

/// PostgreSQL implementation of WorkArrangementRepository
pub struct PostgresWorkArrangementRepository {
    db: DatabaseConnection,
}

impl PostgresWorkArrangementRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Lock the employee row, failing when it does not exist
async fn lock_employee(txn: &DatabaseTransaction, id: &EmployeeId) -> Result<(), DomainError> {
    employees::Entity::find_by_id(id.0)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?
        .map(|_| ())
        .ok_or_else(|| {
            DomainError::invalid_reference("employee", format!("Employee {} does not exist.", id))
        })
}

async fn arrangements_of<C: ConnectionTrait>(
    conn: &C,
    employee_id: &EmployeeId,
) -> Result<Vec<WorkArrangement>, DomainError> {
    let results = work_arrangements::Entity::find()
        .filter(work_arrangements::Column::EmployeeId.eq(employee_id.0))
        .order_by_asc(work_arrangements::Column::CreatedAt)
        .order_by_asc(work_arrangements::Column::Id)
        .all(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    Ok(results.into_iter().map(|m| m.into()).collect())
}

#[async_trait]
impl WorkArrangementRepository for PostgresWorkArrangementRepository {
    async fn find_by_id(
        &self,
        id: &WorkArrangementId,
    ) -> Result<Option<WorkArrangement>, DomainError> {
        let result = work_arrangements::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(
        &self,
        filter: &WorkArrangementFilter,
        page: Page,
    ) -> Result<Vec<WorkArrangement>, DomainError> {
        let mut query = work_arrangements::Entity::find();

        if let Some(employee_id) = filter.employee_id {
            query = query.filter(work_arrangements::Column::EmployeeId.eq(employee_id.0));
        }

        let results = query
            .order_by_desc(work_arrangements::Column::CreatedAt)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<WorkArrangement>, DomainError> {
        arrangements_of(&self.db, employee_id).await
    }

    async fn create(
        &self,
        arrangement: &NewWorkArrangement,
        check: SiblingCheck<'_, WorkArrangement>,
    ) -> Result<WorkArrangement, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        lock_employee(&txn, &arrangement.employee_id).await?;
        check(&arrangements_of(&txn, &arrangement.employee_id).await?)?;

        let now = Utc::now().fixed_offset();
        let result = work_arrangements::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(arrangement.employee_id.0),
            work_type: Set(arrangement.work_type.to_string()),
            percentage: Set(arrangement.percentage),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(
        &self,
        id: &WorkArrangementId,
        arrangement: &NewWorkArrangement,
        check: SiblingCheck<'_, WorkArrangement>,
    ) -> Result<WorkArrangement, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let current = work_arrangements::Entity::find_by_id(id.0)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| DomainError::NotFound(format!("Work arrangement {} not found", id)))?;

        lock_employee(&txn, &arrangement.employee_id).await?;
        check(&arrangements_of(&txn, &arrangement.employee_id).await?)?;

        let mut active_model = current.into_active_model();
        active_model.employee_id = Set(arrangement.employee_id.0);
        active_model.work_type = Set(arrangement.work_type.to_string());
        active_model.percentage = Set(arrangement.percentage);
        active_model.updated_at = Set(Utc::now().fixed_offset());

        let result = active_model
            .update(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete(&self, id: &WorkArrangementId) -> Result<(), DomainError> {
        let result = work_arrangements::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            Err(DomainError::NotFound(format!(
                "Work arrangement {} not found",
                id
            )))
        } else {
            Ok(())
        }
    }
}

/// Convert SeaORM model to domain entity
impl From<work_arrangements::Model> for WorkArrangement {
    fn from(model: work_arrangements::Model) -> Self {
        WorkArrangement {
            id: WorkArrangementId(model.id),
            employee_id: EmployeeId(model.employee_id),
            work_type: model.work_type.parse().unwrap_or(WorkType::FullTime),
            percentage: model.percentage,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
