//! In-memory implementations of the repository ports
//!
//! All four repositories share one `InMemoryDb`, so deleting an employee or a
//! team cascades the same way the PostgreSQL foreign keys do. Rows are kept in
//! insertion order, which doubles as creation order.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    Employee, EmployeeId, MembershipId, NewEmployee, NewTeam, NewTeamMembership,
    NewWorkArrangement, Team, TeamId, TeamMembership, WorkArrangement, WorkArrangementId,
};
use crate::domain::ports::{
    EmployeeFilter, EmployeeRepository, MembershipFilter, MembershipGuard, MembershipRepository,
    Page, SiblingCheck, SortField, Store, TeamFilter, TeamRepository, WorkArrangementFilter,
    WorkArrangementRepository,
};
use crate::error::DomainError;

// ============================================================================
// Shared storage
// ============================================================================

#[derive(Default)]
pub struct InMemoryDb {
    pub employees: Vec<Employee>,
    pub teams: Vec<Team>,
    pub memberships: Vec<TeamMembership>,
    pub arrangements: Vec<WorkArrangement>,
    /// When set, every repository call fails with a database error
    pub should_fail: bool,
}

pub type SharedDb = Arc<RwLock<InMemoryDb>>;

fn check_available(db: &InMemoryDb) -> Result<(), DomainError> {
    if db.should_fail {
        Err(DomainError::Database("Mock failure".to_string()))
    } else {
        Ok(())
    }
}

/// Newest first, then the paging window
fn newest_first<T: Clone>(rows: Vec<&T>, page: Page) -> Vec<T> {
    rows.into_iter()
        .rev()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .cloned()
        .collect()
}

fn name_matches(name: &str, q: &Option<String>) -> bool {
    q.as_ref()
        .map_or(true, |q| name.to_lowercase().contains(&q.to_lowercase()))
}

// ============================================================================
// In-Memory Employee Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryEmployeeRepository {
    db: SharedDb,
}

impl InMemoryEmployeeRepository {
    pub fn new(db: SharedDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, DomainError> {
        let db = self.db.read().unwrap();
        check_available(&db)?;
        Ok(db.employees.iter().find(|e| e.id == *id).cloned())
    }

    async fn list(
        &self,
        filter: &EmployeeFilter,
        page: Page,
    ) -> Result<Vec<Employee>, DomainError> {
        let db = self.db.read().unwrap();
        check_available(&db)?;

        let mut rows: Vec<&Employee> = db
            .employees
            .iter()
            .filter(|e| name_matches(&e.name, &filter.q))
            .filter(|e| filter.name.as_ref().map_or(true, |name| e.name == *name))
            .filter(|e| {
                filter
                    .employee_id
                    .as_ref()
                    .map_or(true, |badge| e.employee_id == *badge)
            })
            .filter(|e| filter.created_after.map_or(true, |after| e.created_at >= after))
            .filter(|e| filter.created_before.map_or(true, |before| e.created_at <= before))
            .rev()
            .collect();

        // Stable, so ties stay newest first
        rows.sort_by(|a, b| {
            filter
                .sort_keys()
                .iter()
                .map(|key| {
                    let (a, b) = match key.field {
                        SortField::CreateDate => (a.created_at, b.created_at),
                        SortField::UpdateDate => (a.updated_at, b.updated_at),
                    };
                    if key.descending {
                        b.cmp(&a)
                    } else {
                        a.cmp(&b)
                    }
                })
                .find(|order| order.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(rows
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Employee>, DomainError> {
        let db = self.db.read().unwrap();
        check_available(&db)?;
        Ok(db.employees.iter().rev().cloned().collect())
    }

    async fn create(&self, employee: &NewEmployee) -> Result<Employee, DomainError> {
        let mut db = self.db.write().unwrap();
        check_available(&db)?;

        let now = Utc::now();
        let created = Employee {
            id: EmployeeId::new(),
            name: employee.name.clone(),
            employee_id: employee.employee_id.clone(),
            hourly_rate: employee.hourly_rate,
            created_at: now,
            updated_at: now,
        };
        db.employees.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &EmployeeId,
        employee: &NewEmployee,
    ) -> Result<Employee, DomainError> {
        let mut db = self.db.write().unwrap();
        check_available(&db)?;

        let current = db
            .employees
            .iter_mut()
            .find(|e| e.id == *id)
            .ok_or_else(|| DomainError::NotFound(format!("Employee {} not found", id)))?;
        current.name = employee.name.clone();
        current.employee_id = employee.employee_id.clone();
        current.hourly_rate = employee.hourly_rate;
        current.updated_at = Utc::now();
        Ok(current.clone())
    }

    async fn delete(&self, id: &EmployeeId) -> Result<(), DomainError> {
        let mut db = self.db.write().unwrap();
        check_available(&db)?;

        if !db.employees.iter().any(|e| e.id == *id) {
            return Err(DomainError::NotFound(format!("Employee {} not found", id)));
        }
        if let Some(team) = db.teams.iter().find(|t| t.is_led_by(id)) {
            return Err(DomainError::InvalidOperation(format!(
                "Employee {} leads team '{}' and cannot be deleted.",
                id, team.name
            )));
        }

        db.employees.retain(|e| e.id != *id);
        db.memberships.retain(|m| m.employee_id != *id);
        db.arrangements.retain(|a| a.employee_id != *id);
        Ok(())
    }
}

// ============================================================================
// In-Memory Team Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryTeamRepository {
    db: SharedDb,
}

impl InMemoryTeamRepository {
    pub fn new(db: SharedDb) -> Self {
        Self { db }
    }
}

fn leader_must_exist(db: &InMemoryDb, leader_id: &EmployeeId) -> Result<(), DomainError> {
    if db.employees.iter().any(|e| e.id == *leader_id) {
        Ok(())
    } else {
        Err(DomainError::Database(
            "violates foreign key constraint \"teams_leader_id_fkey\"".to_string(),
        ))
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn find_by_id(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let db = self.db.read().unwrap();
        check_available(&db)?;
        Ok(db.teams.iter().find(|t| t.id == *id).cloned())
    }

    async fn list(&self, filter: &TeamFilter, page: Page) -> Result<Vec<Team>, DomainError> {
        let db = self.db.read().unwrap();
        check_available(&db)?;

        let rows = db
            .teams
            .iter()
            .filter(|t| name_matches(&t.name, &filter.q))
            .filter(|t| filter.leader_id.map_or(true, |l| t.leader_id == l))
            .collect();
        Ok(newest_first(rows, page))
    }

    async fn find_by_leader(&self, leader_id: &EmployeeId) -> Result<Vec<Team>, DomainError> {
        let db = self.db.read().unwrap();
        check_available(&db)?;
        Ok(db
            .teams
            .iter()
            .filter(|t| t.is_led_by(leader_id))
            .cloned()
            .collect())
    }

    async fn create(&self, team: &NewTeam) -> Result<Team, DomainError> {
        let mut db = self.db.write().unwrap();
        check_available(&db)?;
        leader_must_exist(&db, &team.leader_id)?;

        let now = Utc::now();
        let created = Team {
            id: TeamId::new(),
            name: team.name.clone(),
            leader_id: team.leader_id,
            created_at: now,
            updated_at: now,
        };
        db.teams.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &TeamId, team: &NewTeam) -> Result<Team, DomainError> {
        let mut db = self.db.write().unwrap();
        check_available(&db)?;
        leader_must_exist(&db, &team.leader_id)?;

        let current = db
            .teams
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or_else(|| DomainError::NotFound(format!("Team {} not found", id)))?;
        current.name = team.name.clone();
        current.leader_id = team.leader_id;
        current.updated_at = Utc::now();
        Ok(current.clone())
    }

    async fn delete(&self, id: &TeamId) -> Result<(), DomainError> {
        let mut db = self.db.write().unwrap();
        check_available(&db)?;

        if !db.teams.iter().any(|t| t.id == *id) {
            return Err(DomainError::NotFound(format!("Team {} not found", id)));
        }
        db.teams.retain(|t| t.id != *id);
        db.memberships.retain(|m| m.team_id != *id);
        Ok(())
    }
}

// ============================================================================
// In-Memory Membership Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryMembershipRepository {
    db: SharedDb,
}

impl InMemoryMembershipRepository {
    pub fn new(db: SharedDb) -> Self {
        Self { db }
    }
}

fn team_must_exist(db: &InMemoryDb, team_id: &TeamId) -> Result<(), DomainError> {
    if db.teams.iter().any(|t| t.id == *team_id) {
        Ok(())
    } else {
        Err(DomainError::invalid_reference(
            "team",
            format!("Team {} does not exist.", team_id),
        ))
    }
}

fn members_of(db: &InMemoryDb, team_id: &TeamId) -> Vec<TeamMembership> {
    db.memberships
        .iter()
        .filter(|m| m.team_id == *team_id)
        .cloned()
        .collect()
}

/// Mirrors the (employee_id, team_id) unique constraint
fn pair_must_be_free(
    db: &InMemoryDb,
    membership: &NewTeamMembership,
    skip: Option<MembershipId>,
) -> Result<(), DomainError> {
    let taken = db.memberships.iter().any(|m| {
        Some(m.id) != skip && m.links(&membership.team_id, &membership.employee_id)
    });
    if taken {
        Err(DomainError::Database(
            "duplicate key value violates unique constraint".to_string(),
        ))
    } else {
        Ok(())
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn find_by_id(&self, id: &MembershipId) -> Result<Option<TeamMembership>, DomainError> {
        let db = self.db.read().unwrap();
        check_available(&db)?;
        Ok(db.memberships.iter().find(|m| m.id == *id).cloned())
    }

    async fn list(
        &self,
        filter: &MembershipFilter,
        page: Page,
    ) -> Result<Vec<TeamMembership>, DomainError> {
        let db = self.db.read().unwrap();
        check_available(&db)?;

        let rows = db
            .memberships
            .iter()
            .filter(|m| filter.team_id.map_or(true, |t| m.team_id == t))
            .filter(|m| filter.employee_id.map_or(true, |e| m.employee_id == e))
            .collect();
        Ok(newest_first(rows, page))
    }

    async fn create(
        &self,
        membership: &NewTeamMembership,
        check: SiblingCheck<'_, TeamMembership>,
    ) -> Result<TeamMembership, DomainError> {
        let mut db = self.db.write().unwrap();
        check_available(&db)?;
        team_must_exist(&db, &membership.team_id)?;

        check(&members_of(&db, &membership.team_id))?;
        pair_must_be_free(&db, membership, None)?;

        let now = Utc::now();
        let created = TeamMembership {
            id: MembershipId::new(),
            team_id: membership.team_id,
            employee_id: membership.employee_id,
            created_at: now,
            updated_at: now,
        };
        db.memberships.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &MembershipId,
        membership: &NewTeamMembership,
        guard: MembershipGuard<'_>,
        check: SiblingCheck<'_, TeamMembership>,
    ) -> Result<TeamMembership, DomainError> {
        let mut db = self.db.write().unwrap();
        check_available(&db)?;

        let current = db
            .memberships
            .iter()
            .find(|m| m.id == *id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("Team membership {} not found", id)))?;
        let team = db.teams.iter().find(|t| t.id == current.team_id).cloned();
        guard(&current, team.as_ref())?;

        team_must_exist(&db, &membership.team_id)?;
        check(&members_of(&db, &membership.team_id))?;
        pair_must_be_free(&db, membership, Some(*id))?;

        let row = db
            .memberships
            .iter_mut()
            .find(|m| m.id == *id)
            .ok_or_else(|| DomainError::NotFound(format!("Team membership {} not found", id)))?;
        row.team_id = membership.team_id;
        row.employee_id = membership.employee_id;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: &MembershipId, guard: MembershipGuard<'_>) -> Result<(), DomainError> {
        let mut db = self.db.write().unwrap();
        check_available(&db)?;

        let current = db
            .memberships
            .iter()
            .find(|m| m.id == *id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("Team membership {} not found", id)))?;
        let team = db.teams.iter().find(|t| t.id == current.team_id).cloned();
        guard(&current, team.as_ref())?;

        db.memberships.retain(|m| m.id != *id);
        Ok(())
    }

    async fn ensure(
        &self,
        team_id: &TeamId,
        employee_id: &EmployeeId,
    ) -> Result<bool, DomainError> {
        let mut db = self.db.write().unwrap();
        check_available(&db)?;

        if db.memberships.iter().any(|m| m.links(team_id, employee_id)) {
            return Ok(false);
        }
        let now = Utc::now();
        db.memberships.push(TeamMembership {
            id: MembershipId::new(),
            team_id: *team_id,
            employee_id: *employee_id,
            created_at: now,
            updated_at: now,
        });
        Ok(true)
    }
}

// ============================================================================
// In-Memory Work Arrangement Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryWorkArrangementRepository {
    db: SharedDb,
}

impl InMemoryWorkArrangementRepository {
    pub fn new(db: SharedDb) -> Self {
        Self { db }
    }
}

fn employee_must_exist(db: &InMemoryDb, employee_id: &EmployeeId) -> Result<(), DomainError> {
    if db.employees.iter().any(|e| e.id == *employee_id) {
        Ok(())
    } else {
        Err(DomainError::invalid_reference(
            "employee",
            format!("Employee {} does not exist.", employee_id),
        ))
    }
}

fn arrangements_of(db: &InMemoryDb, employee_id: &EmployeeId) -> Vec<WorkArrangement> {
    db.arrangements
        .iter()
        .filter(|a| a.employee_id == *employee_id)
        .cloned()
        .collect()
}

#[async_trait]
impl WorkArrangementRepository for InMemoryWorkArrangementRepository {
    async fn find_by_id(
        &self,
        id: &WorkArrangementId,
    ) -> Result<Option<WorkArrangement>, DomainError> {
        let db = self.db.read().unwrap();
        check_available(&db)?;
        Ok(db.arrangements.iter().find(|a| a.id == *id).cloned())
    }

    async fn list(
        &self,
        filter: &WorkArrangementFilter,
        page: Page,
    ) -> Result<Vec<WorkArrangement>, DomainError> {
        let db = self.db.read().unwrap();
        check_available(&db)?;

        let rows = db
            .arrangements
            .iter()
            .filter(|a| filter.employee_id.map_or(true, |e| a.employee_id == e))
            .collect();
        Ok(newest_first(rows, page))
    }

    async fn find_by_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<WorkArrangement>, DomainError> {
        let db = self.db.read().unwrap();
        check_available(&db)?;
        Ok(arrangements_of(&db, employee_id))
    }

    async fn create(
        &self,
        arrangement: &NewWorkArrangement,
        check: SiblingCheck<'_, WorkArrangement>,
    ) -> Result<WorkArrangement, DomainError> {
        let mut db = self.db.write().unwrap();
        check_available(&db)?;
        employee_must_exist(&db, &arrangement.employee_id)?;

        check(&arrangements_of(&db, &arrangement.employee_id))?;

        let now = Utc::now();
        let created = WorkArrangement {
            id: WorkArrangementId::new(),
            employee_id: arrangement.employee_id,
            work_type: arrangement.work_type,
            percentage: arrangement.percentage,
            created_at: now,
            updated_at: now,
        };
        db.arrangements.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &WorkArrangementId,
        arrangement: &NewWorkArrangement,
        check: SiblingCheck<'_, WorkArrangement>,
    ) -> Result<WorkArrangement, DomainError> {
        let mut db = self.db.write().unwrap();
        check_available(&db)?;

        if !db.arrangements.iter().any(|a| a.id == *id) {
            return Err(DomainError::NotFound(format!(
                "Work arrangement {} not found",
                id
            )));
        }
        employee_must_exist(&db, &arrangement.employee_id)?;
        check(&arrangements_of(&db, &arrangement.employee_id))?;

        let row = db
            .arrangements
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or_else(|| DomainError::NotFound(format!("Work arrangement {} not found", id)))?;
        row.employee_id = arrangement.employee_id;
        row.work_type = arrangement.work_type;
        row.percentage = arrangement.percentage;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: &WorkArrangementId) -> Result<(), DomainError> {
        let mut db = self.db.write().unwrap();
        check_available(&db)?;

        let before = db.arrangements.len();
        db.arrangements.retain(|a| a.id != *id);
        if db.arrangements.len() == before {
            Err(DomainError::NotFound(format!(
                "Work arrangement {} not found",
                id
            )))
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// In-Memory Store
// ============================================================================

/// Store backed by the in-memory repositories
pub struct InMemoryStore;

impl Store for InMemoryStore {
    type Employees = InMemoryEmployeeRepository;
    type Teams = InMemoryTeamRepository;
    type Memberships = InMemoryMembershipRepository;
    type WorkArrangements = InMemoryWorkArrangementRepository;
}

/// One set of repositories over a shared in-memory database
pub struct InMemoryRepositories {
    pub db: SharedDb,
    pub employees: Arc<InMemoryEmployeeRepository>,
    pub teams: Arc<InMemoryTeamRepository>,
    pub memberships: Arc<InMemoryMembershipRepository>,
    pub arrangements: Arc<InMemoryWorkArrangementRepository>,
}

impl InMemoryRepositories {
    pub fn new() -> Self {
        let db = SharedDb::default();
        Self {
            employees: Arc::new(InMemoryEmployeeRepository::new(db.clone())),
            teams: Arc::new(InMemoryTeamRepository::new(db.clone())),
            memberships: Arc::new(InMemoryMembershipRepository::new(db.clone())),
            arrangements: Arc::new(InMemoryWorkArrangementRepository::new(db.clone())),
            db,
        }
    }

    /// Pre-populate with an employee for testing
    pub fn with_employee(self, employee: Employee) -> Self {
        self.db.write().unwrap().employees.push(employee);
        self
    }

    /// Pre-populate with a team for testing. Does not add the leader's membership.
    pub fn with_team(self, team: Team) -> Self {
        self.db.write().unwrap().teams.push(team);
        self
    }

    /// Pre-populate with a work arrangement for testing
    pub fn with_arrangement(self, arrangement: WorkArrangement) -> Self {
        self.db.write().unwrap().arrangements.push(arrangement);
        self
    }

    /// Make every subsequent repository call fail
    pub fn fail(&self) {
        self.db.write().unwrap().should_fail = true;
    }
}

impl Default for InMemoryRepositories {
    fn default() -> Self {
        Self::new()
    }
}
