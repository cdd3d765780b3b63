//! Team membership service
//!
//! Links employees to teams. Uniqueness of the (team, employee) pair and the
//! leader guard are evaluated by the repository inside the write, against the
//! rows it has locked.

use std::sync::Arc;

use crate::domain::entities::{MembershipId, NewTeamMembership, TeamMembership};
use crate::domain::ports::{
    EmployeeRepository, MembershipFilter, MembershipRepository, Page, TeamRepository,
};
use crate::domain::rules::{
    check_membership_removal, check_membership_replacement, check_membership_unique, WriteMode,
};
use crate::error::{AppError, DomainError};

/// Service for managing team memberships
pub struct MembershipService<MR, TR, ER>
where
    MR: MembershipRepository,
    TR: TeamRepository,
    ER: EmployeeRepository,
{
    memberships: Arc<MR>,
    teams: Arc<TR>,
    employees: Arc<ER>,
}

impl<MR, TR, ER> MembershipService<MR, TR, ER>
where
    MR: MembershipRepository,
    TR: TeamRepository,
    ER: EmployeeRepository,
{
    pub fn new(memberships: Arc<MR>, teams: Arc<TR>, employees: Arc<ER>) -> Self {
        Self {
            memberships,
            teams,
            employees,
        }
    }

    pub async fn list(
        &self,
        filter: &MembershipFilter,
        page: Page,
    ) -> Result<Vec<TeamMembership>, AppError> {
        Ok(self.memberships.list(filter, page).await?)
    }

    pub async fn get(&self, id: &MembershipId) -> Result<TeamMembership, AppError> {
        self.memberships
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Team membership {} not found", id)).into())
    }

    pub async fn create(&self, membership: &NewTeamMembership) -> Result<TeamMembership, AppError> {
        self.check_references(membership).await?;

        let created = self
            .memberships
            .create(membership, &|stored| {
                check_membership_unique(membership, stored, WriteMode::Create)
            })
            .await
            .inspect_err(|e| log_rejection(e, "create"))?;

        tracing::info!(
            membership_id = %created.id,
            team_id = %created.team_id,
            employee_id = %created.employee_id,
            "Added team member"
        );
        Ok(created)
    }

    pub async fn update(
        &self,
        id: &MembershipId,
        membership: &NewTeamMembership,
    ) -> Result<TeamMembership, AppError> {
        self.get(id).await?;
        self.check_references(membership).await?;

        let updated = self
            .memberships
            .update(
                id,
                membership,
                &|current, team| check_membership_replacement(current, membership, team),
                &|stored| check_membership_unique(membership, stored, WriteMode::Update(*id)),
            )
            .await
            .inspect_err(|e| log_rejection(e, "update"))?;

        tracing::info!(membership_id = %id, "Updated team membership");
        Ok(updated)
    }

    /// Remove a membership. A team's leader cannot be removed from it.
    pub async fn delete(&self, id: &MembershipId) -> Result<(), AppError> {
        self.memberships
            .delete(id, &check_membership_removal)
            .await
            .inspect_err(|e| log_rejection(e, "delete"))?;

        tracing::info!(membership_id = %id, "Removed team member");
        Ok(())
    }

    async fn check_references(&self, membership: &NewTeamMembership) -> Result<(), AppError> {
        if self.teams.find_by_id(&membership.team_id).await?.is_none() {
            return Err(DomainError::invalid_reference(
                "team",
                format!("Team {} does not exist.", membership.team_id),
            )
            .into());
        }
        if self
            .employees
            .find_by_id(&membership.employee_id)
            .await?
            .is_none()
        {
            return Err(DomainError::invalid_reference(
                "employee",
                format!("Employee {} does not exist.", membership.employee_id),
            )
            .into());
        }
        Ok(())
    }
}

fn log_rejection(error: &DomainError, action: &str) {
    if matches!(
        error,
        DomainError::Conflict(_) | DomainError::InvalidOperation(_)
    ) {
        tracing::debug!(action, %error, "Team membership write rejected");
    }
}
