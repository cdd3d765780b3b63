//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain rules and repository ports.

pub mod employee_service;
pub mod membership_service;
pub mod salary_config;
pub mod salary_service;
pub mod team_service;
pub mod work_arrangement_service;

pub use employee_service::EmployeeService;
pub use membership_service::MembershipService;
pub use salary_config::{
    DEFAULT_FULL_TIME_HOURS, DEFAULT_LEADER_COEFFICIENT, MAX_FULL_TIME_HOURS,
    MAX_LEADER_COEFFICIENT,
};
pub use salary_service::SalaryService;
pub use team_service::TeamService;
pub use work_arrangement_service::WorkArrangementService;
