//! PostgreSQL adapter for MembershipRepository
//!
//! Writes lock the affected team row first, so that membership checks and the
//! write itself see a stable set of sibling rows. Existing membership rows are
//! locked only after their team, the same order a cascading team delete takes.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    EmployeeId, MembershipId, NewTeamMembership, Team, TeamId, TeamMembership,
};
use crate::domain::ports::{
    MembershipFilter, MembershipGuard, MembershipRepository, Page, SiblingCheck,
};
use crate::entity::{team_memberships, teams};
use crate::error::DomainError;

/// PostgreSQL implementation of MembershipRepository
pub struct PostgresMembershipRepository {
    db: DatabaseConnection,
}

impl PostgresMembershipRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Lock a team row for the rest of the transaction
async fn lock_team(txn: &DatabaseTransaction, id: &TeamId) -> Result<Option<Team>, DomainError> {
    let result = teams::Entity::find_by_id(id.0)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    Ok(result.map(|m| m.into()))
}

async fn team_members(
    txn: &DatabaseTransaction,
    team_id: &TeamId,
) -> Result<Vec<TeamMembership>, DomainError> {
    let results = team_memberships::Entity::find()
        .filter(team_memberships::Column::TeamId.eq(team_id.0))
        .all(txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    Ok(results.into_iter().map(|m| m.into()).collect())
}

/// Lock a membership row together with its team, team first.
///
/// The team returned is `None` once the team row is gone.
async fn lock_membership(
    txn: &DatabaseTransaction,
    id: &MembershipId,
) -> Result<(team_memberships::Model, Option<Team>), DomainError> {
    loop {
        let seen = find_membership(txn, id, false).await?;
        let team = lock_team(txn, &TeamId(seen.team_id)).await?;
        let locked = find_membership(txn, id, true).await?;

        // Moved to another team while we waited for the old team's lock
        if locked.team_id == seen.team_id {
            return Ok((locked, team));
        }
    }
}

async fn find_membership(
    txn: &DatabaseTransaction,
    id: &MembershipId,
    lock: bool,
) -> Result<team_memberships::Model, DomainError> {
    let mut query = team_memberships::Entity::find_by_id(id.0);
    if lock {
        query = query.lock_exclusive();
    }

    query
        .one(txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?
        .ok_or_else(|| DomainError::NotFound(format!("Team membership {} not found", id)))
}

fn missing_team(id: &TeamId) -> DomainError {
    DomainError::invalid_reference("team", format!("Team {} does not exist.", id))
}

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
    async fn find_by_id(&self, id: &MembershipId) -> Result<Option<TeamMembership>, DomainError> {
        let result = team_memberships::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(
        &self,
        filter: &MembershipFilter,
        page: Page,
    ) -> Result<Vec<TeamMembership>, DomainError> {
        let mut query = team_memberships::Entity::find();

        if let Some(team_id) = filter.team_id {
            query = query.filter(team_memberships::Column::TeamId.eq(team_id.0));
        }
        if let Some(employee_id) = filter.employee_id {
            query = query.filter(team_memberships::Column::EmployeeId.eq(employee_id.0));
        }

        let results = query
            .order_by_desc(team_memberships::Column::CreatedAt)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(
        &self,
        membership: &NewTeamMembership,
        check: SiblingCheck<'_, TeamMembership>,
    ) -> Result<TeamMembership, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        lock_team(&txn, &membership.team_id)
            .await?
            .ok_or_else(|| missing_team(&membership.team_id))?;

        check(&team_members(&txn, &membership.team_id).await?)?;

        let now = Utc::now().fixed_offset();
        let result = team_memberships::ActiveModel {
            id: Set(Uuid::new_v4()),
            team_id: Set(membership.team_id.0),
            employee_id: Set(membership.employee_id.0),
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
        id: &MembershipId,
        membership: &NewTeamMembership,
        guard: MembershipGuard<'_>,
        check: SiblingCheck<'_, TeamMembership>,
    ) -> Result<TeamMembership, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let (current, team) = lock_membership(&txn, id).await?;
        let current_team = TeamId(current.team_id);
        let row: TeamMembership = current.clone().into();
        guard(&row, team.as_ref())?;

        if membership.team_id != current_team {
            lock_team(&txn, &membership.team_id)
                .await?
                .ok_or_else(|| missing_team(&membership.team_id))?;
        }
        check(&team_members(&txn, &membership.team_id).await?)?;

        let mut active_model = current.into_active_model();
        active_model.team_id = Set(membership.team_id.0);
        active_model.employee_id = Set(membership.employee_id.0);
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

    async fn delete(&self, id: &MembershipId, guard: MembershipGuard<'_>) -> Result<(), DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let (current, team) = lock_membership(&txn, id).await?;
        let current: TeamMembership = current.into();
        guard(&current, team.as_ref())?;

        team_memberships::Entity::delete_by_id(id.0)
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn ensure(
        &self,
        team_id: &TeamId,
        employee_id: &EmployeeId,
    ) -> Result<bool, DomainError> {
        let now = Utc::now().fixed_offset();
        let model = team_memberships::ActiveModel {
            id: Set(Uuid::new_v4()),
            team_id: Set(team_id.0),
            employee_id: Set(employee_id.0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = team_memberships::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    team_memberships::Column::EmployeeId,
                    team_memberships::Column::TeamId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(inserted > 0)
    }
}

/// Convert SeaORM model to domain entity
impl From<team_memberships::Model> for TeamMembership {
    fn from(model: team_memberships::Model) -> Self {
        TeamMembership {
            id: MembershipId(model.id),
            team_id: TeamId(model.team_id),
            employee_id: EmployeeId(model.employee_id),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
