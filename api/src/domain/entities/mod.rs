//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod employee;
pub mod membership;
pub mod salary;
pub mod team;
pub mod work_arrangement;

pub use employee::{Employee, EmployeeBrief, EmployeeId, NewEmployee};
pub use membership::{MembershipId, NewTeamMembership, TeamMembership};
pub use salary::{Salary, SalaryPolicy};
pub use team::{NewTeam, Team, TeamBrief, TeamId};
pub use work_arrangement::{NewWorkArrangement, WorkArrangement, WorkArrangementId, WorkType};
