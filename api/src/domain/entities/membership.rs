//! Team membership domain entity
//!
//! Join record between one employee and one team. At most one row exists per
//! (employee, team) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::employee::EmployeeId;
use super::team::TeamId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MembershipId(pub Uuid);

impl MembershipId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MembershipId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for MembershipId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MembershipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMembership {
    pub id: MembershipId,
    pub team_id: TeamId,
    pub employee_id: EmployeeId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamMembership {
    /// Whether this row links `employee_id` to `team_id`
    pub fn links(&self, team_id: &TeamId, employee_id: &EmployeeId) -> bool {
        self.team_id == *team_id && self.employee_id == *employee_id
    }
}

/// Data needed to create or fully replace a membership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTeamMembership {
    pub team_id: TeamId,
    pub employee_id: EmployeeId,
}
