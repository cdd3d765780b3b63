//! PostgreSQL adapter for TeamRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::contains_pattern;
use crate::domain::entities::{EmployeeId, NewTeam, Team, TeamId};
use crate::domain::ports::{Page, TeamFilter, TeamRepository};
use crate::entity::teams;
use crate::error::DomainError;

/// PostgreSQL implementation of TeamRepository
pub struct PostgresTeamRepository {
    db: DatabaseConnection,
}

impl PostgresTeamRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn find_by_id(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let result = teams::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self, filter: &TeamFilter, page: Page) -> Result<Vec<Team>, DomainError> {
        let mut query = teams::Entity::find();

        if let Some(q) = &filter.q {
            query = query.filter(Expr::col(teams::Column::Name).ilike(contains_pattern(q)));
        }
        if let Some(leader_id) = filter.leader_id {
            query = query.filter(teams::Column::LeaderId.eq(leader_id.0));
        }

        let results = query
            .order_by_desc(teams::Column::CreatedAt)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_leader(&self, leader_id: &EmployeeId) -> Result<Vec<Team>, DomainError> {
        let results = teams::Entity::find()
            .filter(teams::Column::LeaderId.eq(leader_id.0))
            .order_by_asc(teams::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, team: &NewTeam) -> Result<Team, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = teams::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(team.name.clone()),
            leader_id: Set(team.leader_id.0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(&self, id: &TeamId, team: &NewTeam) -> Result<Team, DomainError> {
        let current = teams::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| DomainError::NotFound(format!("Team {} not found", id)))?;

        let mut active_model = current.into_active_model();
        active_model.name = Set(team.name.clone());
        active_model.leader_id = Set(team.leader_id.0);
        active_model.updated_at = Set(Utc::now().fixed_offset());

        let result = active_model
            .update(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete(&self, id: &TeamId) -> Result<(), DomainError> {
        let result = teams::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            Err(DomainError::NotFound(format!("Team {} not found", id)))
        } else {
            Ok(())
        }
    }
}

/// Convert SeaORM model to domain entity
impl From<teams::Model> for Team {
    fn from(model: teams::Model) -> Self {
        Team {
            id: TeamId(model.id),
            name: model.name,
            leader_id: EmployeeId(model.leader_id),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
