//! Team service
//!
//! Team writes are followed by the leader-membership step: after every create
//! or update the team's leader is added to the team's members if missing.
//! The step heals rather than rejects, so renaming a team whose leader lost
//! their membership row silently restores it.

use std::sync::Arc;

use crate::domain::entities::{NewTeam, Team, TeamId};
use crate::domain::ports::{
    EmployeeRepository, MembershipRepository, Page, TeamFilter, TeamRepository,
};
use crate::domain::rules::validate_team;
use crate::error::{AppError, DomainError};

/// Service for managing teams
pub struct TeamService<TR, ER, MR>
where
    TR: TeamRepository,
    ER: EmployeeRepository,
    MR: MembershipRepository,
{
    teams: Arc<TR>,
    employees: Arc<ER>,
    memberships: Arc<MR>,
}

impl<TR, ER, MR> TeamService<TR, ER, MR>
where
    TR: TeamRepository,
    ER: EmployeeRepository,
    MR: MembershipRepository,
{
    pub fn new(teams: Arc<TR>, employees: Arc<ER>, memberships: Arc<MR>) -> Self {
        Self {
            teams,
            employees,
            memberships,
        }
    }

    pub async fn list(&self, filter: &TeamFilter, page: Page) -> Result<Vec<Team>, AppError> {
        Ok(self.teams.list(filter, page).await?)
    }

    pub async fn get(&self, id: &TeamId) -> Result<Team, AppError> {
        self.teams
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Team {} not found", id)).into())
    }

    pub async fn create(&self, team: &NewTeam) -> Result<Team, AppError> {
        self.validate(team).await?;

        let created = self.teams.create(team).await?;
        tracing::info!(team_id = %created.id, leader_id = %created.leader_id, "Created team");

        self.ensure_leader_membership(&created).await?;
        Ok(created)
    }

    pub async fn update(&self, id: &TeamId, team: &NewTeam) -> Result<Team, AppError> {
        self.get(id).await?;
        self.validate(team).await?;

        let updated = self.teams.update(id, team).await?;
        tracing::info!(team_id = %id, leader_id = %updated.leader_id, "Updated team");

        self.ensure_leader_membership(&updated).await?;
        Ok(updated)
    }

    /// Delete a team. Its memberships go with it, the leader's included.
    pub async fn delete(&self, id: &TeamId) -> Result<(), AppError> {
        self.teams.delete(id).await?;
        tracing::info!(team_id = %id, "Deleted team");
        Ok(())
    }

    /// Make sure the team's leader is one of its members.
    ///
    /// Idempotent. Returns true when a membership row had to be added.
    pub async fn ensure_leader_membership(&self, team: &Team) -> Result<bool, AppError> {
        let added = self.memberships.ensure(&team.id, &team.leader_id).await?;
        if added {
            tracing::info!(
                team_id = %team.id,
                leader_id = %team.leader_id,
                "Added missing leader membership"
            );
        }
        Ok(added)
    }

    async fn validate(&self, team: &NewTeam) -> Result<(), AppError> {
        validate_team(team)?;

        if self.employees.find_by_id(&team.leader_id).await?.is_none() {
            return Err(DomainError::invalid_reference(
                "leader",
                format!("Employee {} does not exist.", team.leader_id),
            )
            .into());
        }
        Ok(())
    }
}
