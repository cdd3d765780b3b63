//! PostgreSQL adapter for EmployeeRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Order,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::contains_pattern;
use crate::domain::entities::{Employee, EmployeeId, NewEmployee};
use crate::domain::ports::{EmployeeFilter, EmployeeRepository, Page, SortField};
use crate::entity::{employees, teams};
use crate::error::DomainError;

/// PostgreSQL implementation of EmployeeRepository
pub struct PostgresEmployeeRepository {
    db: DatabaseConnection,
}

impl PostgresEmployeeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, DomainError> {
        let result = employees::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(
        &self,
        filter: &EmployeeFilter,
        page: Page,
    ) -> Result<Vec<Employee>, DomainError> {
        let mut query = employees::Entity::find();

        if let Some(q) = &filter.q {
            query = query.filter(Expr::col(employees::Column::Name).ilike(contains_pattern(q)));
        }
        if let Some(name) = &filter.name {
            query = query.filter(employees::Column::Name.eq(name.as_str()));
        }
        if let Some(employee_id) = &filter.employee_id {
            query = query.filter(employees::Column::EmployeeId.eq(employee_id.as_str()));
        }
        if let Some(after) = filter.created_after {
            query = query.filter(employees::Column::CreatedAt.gte(after.fixed_offset()));
        }
        if let Some(before) = filter.created_before {
            query = query.filter(employees::Column::CreatedAt.lte(before.fixed_offset()));
        }

        for key in filter.sort_keys() {
            let column = match key.field {
                SortField::CreateDate => employees::Column::CreatedAt,
                SortField::UpdateDate => employees::Column::UpdatedAt,
            };
            let order = if key.descending { Order::Desc } else { Order::Asc };
            query = query.order_by(column, order);
        }

        let results = query
            .order_by_asc(employees::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_all(&self) -> Result<Vec<Employee>, DomainError> {
        let results = employees::Entity::find()
            .order_by_desc(employees::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, employee: &NewEmployee) -> Result<Employee, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = employees::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(employee.name.clone()),
            employee_id: Set(employee.employee_id.clone()),
            hourly_rate: Set(employee.hourly_rate),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(
        &self,
        id: &EmployeeId,
        employee: &NewEmployee,
    ) -> Result<Employee, DomainError> {
        let current = employees::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| DomainError::NotFound(format!("Employee {} not found", id)))?;

        let mut active_model = current.into_active_model();
        active_model.name = Set(employee.name.clone());
        active_model.employee_id = Set(employee.employee_id.clone());
        active_model.hourly_rate = Set(employee.hourly_rate);
        active_model.updated_at = Set(Utc::now().fixed_offset());

        let result = active_model
            .update(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete(&self, id: &EmployeeId) -> Result<(), DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        employees::Entity::find_by_id(id.0)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| DomainError::NotFound(format!("Employee {} not found", id)))?;

        let led = teams::Entity::find()
            .filter(teams::Column::LeaderId.eq(id.0))
            .one(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if let Some(team) = led {
            return Err(DomainError::InvalidOperation(format!(
                "Employee {} leads team '{}' and cannot be deleted.",
                id, team.name
            )));
        }

        // Memberships and work arrangements go with the row (ON DELETE CASCADE)
        employees::Entity::delete_by_id(id.0)
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }
}

/// Convert SeaORM model to domain entity
impl From<employees::Model> for Employee {
    fn from(model: employees::Model) -> Self {
        Employee {
            id: EmployeeId(model.id),
            name: model.name,
            employee_id: model.employee_id,
            hourly_rate: model.hourly_rate,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
