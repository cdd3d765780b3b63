//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//!
//! Writes that depend on sibling rows take the rule to enforce as a parameter.
//! Implementations must read the siblings, evaluate the rule and perform the
//! write as one atomic unit, so that two concurrent writers cannot both pass
//! the rule against the same snapshot.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{
    Employee, EmployeeId, MembershipId, NewEmployee, NewTeam, NewTeamMembership,
    NewWorkArrangement, Team, TeamId, TeamMembership, WorkArrangement, WorkArrangementId,
};
use crate::error::DomainError;

/// Rule evaluated against the stored siblings of a proposed row
pub type SiblingCheck<'a, T> = &'a (dyn Fn(&[T]) -> Result<(), DomainError> + Send + Sync);

/// Rule evaluated before a membership row is removed or replaced.
/// Receives the current row and its team, if the team still exists.
pub type MembershipGuard<'a> =
    &'a (dyn Fn(&TeamMembership, Option<&Team>) -> Result<(), DomainError> + Send + Sync);

/// Paging window for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    pub const DEFAULT_LIMIT: u64 = 20;
    pub const MAX_LIMIT: u64 = 100;

    pub fn new(limit: Option<u64>, offset: Option<u64>) -> Self {
        Self {
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            offset: offset.unwrap_or(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Timestamp an employee listing can be sorted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreateDate,
    UpdateDate,
}

/// One `ordering` term, e.g. `-create_date`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

impl SortKey {
    /// Newest first
    pub const DEFAULT: SortKey = SortKey {
        field: SortField::CreateDate,
        descending: true,
    };

    /// Parse a comma separated `ordering` value. Unknown terms are dropped.
    pub fn parse_list(value: &str) -> Vec<SortKey> {
        value
            .split(',')
            .filter_map(|term| {
                let term = term.trim();
                let (descending, name) = match term.strip_prefix('-') {
                    Some(name) => (true, name),
                    None => (false, term),
                };
                let field = match name {
                    "create_date" => SortField::CreateDate,
                    "update_date" => SortField::UpdateDate,
                    _ => return None,
                };
                Some(SortKey { field, descending })
            })
            .collect()
    }
}

/// Filters for listing employees
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Case-insensitive substring of the name
    pub q: Option<String>,
    /// Exact name
    pub name: Option<String>,
    /// Exact badge identifier
    pub employee_id: Option<String>,
    /// Inclusive lower bound on the creation time
    pub created_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the creation time
    pub created_before: Option<DateTime<Utc>>,
    /// Sort keys in priority order; empty means [`SortKey::DEFAULT`]
    pub ordering: Vec<SortKey>,
}

impl EmployeeFilter {
    pub fn sort_keys(&self) -> &[SortKey] {
        if self.ordering.is_empty() {
            std::slice::from_ref(&SortKey::DEFAULT)
        } else {
            &self.ordering
        }
    }
}

/// Filters for listing teams
#[derive(Debug, Clone, Default)]
pub struct TeamFilter {
    pub q: Option<String>,
    pub leader_id: Option<EmployeeId>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MembershipFilter {
    pub team_id: Option<TeamId>,
    pub employee_id: Option<EmployeeId>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WorkArrangementFilter {
    pub employee_id: Option<EmployeeId>,
}

/// Repository for Employee entities
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Find an employee by ID
    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, DomainError>;

    /// List employees ordered by `filter.sort_keys()`
    async fn list(&self, filter: &EmployeeFilter, page: Page)
        -> Result<Vec<Employee>, DomainError>;

    /// Every employee, newest first
    async fn find_all(&self) -> Result<Vec<Employee>, DomainError>;

    /// Create a new employee
    async fn create(&self, employee: &NewEmployee) -> Result<Employee, DomainError>;

    /// Replace an employee's fields
    async fn update(&self, id: &EmployeeId, employee: &NewEmployee)
        -> Result<Employee, DomainError>;

    /// Delete an employee together with their memberships and arrangements.
    /// Fails with `InvalidOperation` while the employee leads a team.
    async fn delete(&self, id: &EmployeeId) -> Result<(), DomainError>;
}

/// Repository for Team entities
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn find_by_id(&self, id: &TeamId) -> Result<Option<Team>, DomainError>;

    /// List teams, newest first
    async fn list(&self, filter: &TeamFilter, page: Page) -> Result<Vec<Team>, DomainError>;

    /// Teams led by an employee
    async fn find_by_leader(&self, leader_id: &EmployeeId) -> Result<Vec<Team>, DomainError>;

    async fn create(&self, team: &NewTeam) -> Result<Team, DomainError>;

    async fn update(&self, id: &TeamId, team: &NewTeam) -> Result<Team, DomainError>;

    /// Delete a team and, with it, all of its memberships
    async fn delete(&self, id: &TeamId) -> Result<(), DomainError>;
}

/// Repository for TeamMembership entities
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn find_by_id(&self, id: &MembershipId) -> Result<Option<TeamMembership>, DomainError>;

    /// List memberships, newest first
    async fn list(
        &self,
        filter: &MembershipFilter,
        page: Page,
    ) -> Result<Vec<TeamMembership>, DomainError>;

    /// Create a membership once `check` accepts the team's current memberships
    async fn create(
        &self,
        membership: &NewTeamMembership,
        check: SiblingCheck<'_, TeamMembership>,
    ) -> Result<TeamMembership, DomainError>;

    /// Replace a membership. `guard` sees the current row and its team,
    /// `check` sees the target team's memberships.
    async fn update(
        &self,
        id: &MembershipId,
        membership: &NewTeamMembership,
        guard: MembershipGuard<'_>,
        check: SiblingCheck<'_, TeamMembership>,
    ) -> Result<TeamMembership, DomainError>;

    /// Delete a membership once `guard` accepts it
    async fn delete(&self, id: &MembershipId, guard: MembershipGuard<'_>)
        -> Result<(), DomainError>;

    /// Insert the pair if it is missing. Returns true when a row was added.
    async fn ensure(&self, team_id: &TeamId, employee_id: &EmployeeId)
        -> Result<bool, DomainError>;
}

/// Repository for WorkArrangement entities
#[async_trait]
pub trait WorkArrangementRepository: Send + Sync {
    async fn find_by_id(
        &self,
        id: &WorkArrangementId,
    ) -> Result<Option<WorkArrangement>, DomainError>;

    /// List arrangements, newest first
    async fn list(
        &self,
        filter: &WorkArrangementFilter,
        page: Page,
    ) -> Result<Vec<WorkArrangement>, DomainError>;

    /// An employee's arrangements in creation order
    async fn find_by_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<WorkArrangement>, DomainError>;

    /// Create an arrangement once `check` accepts the employee's current ones
    async fn create(
        &self,
        arrangement: &NewWorkArrangement,
        check: SiblingCheck<'_, WorkArrangement>,
    ) -> Result<WorkArrangement, DomainError>;

    /// Replace an arrangement once `check` accepts the target employee's
    /// current ones (the row being replaced included)
    async fn update(
        &self,
        id: &WorkArrangementId,
        arrangement: &NewWorkArrangement,
        check: SiblingCheck<'_, WorkArrangement>,
    ) -> Result<WorkArrangement, DomainError>;

    async fn delete(&self, id: &WorkArrangementId) -> Result<(), DomainError>;
}

/// The set of repository implementations an application instance runs on
pub trait Store: Send + Sync + 'static {
    type Employees: EmployeeRepository + 'static;
    type Teams: TeamRepository + 'static;
    type Memberships: MembershipRepository + 'static;
    type WorkArrangements: WorkArrangementRepository + 'static;
}
