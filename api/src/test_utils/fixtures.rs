//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::Utc;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::domain::entities::{
    Employee, EmployeeId, NewEmployee, NewWorkArrangement, Team, TeamId, WorkArrangement,
    WorkArrangementId, WorkType,
};

/// Parse a decimal literal used in a test
pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

/// Create a test employee with default values
pub fn test_employee() -> Employee {
    test_employee_with_rate("Jane Doe", "17.30")
}

/// Create a test employee with a given name and hourly rate
pub fn test_employee_with_rate(name: &str, hourly_rate: &str) -> Employee {
    let now = Utc::now();
    let id = EmployeeId::new();
    Employee {
        id,
        name: name.to_string(),
        employee_id: format!("E{}", &id.0.simple().to_string()[..8]),
        hourly_rate: dec(hourly_rate),
        created_at: now,
        updated_at: now,
    }
}

/// Create a test team led by `leader_id`
pub fn test_team(name: &str, leader_id: EmployeeId) -> Team {
    let now = Utc::now();
    Team {
        id: TeamId::new(),
        name: name.to_string(),
        leader_id,
        created_at: now,
        updated_at: now,
    }
}

/// Create a stored work arrangement
pub fn test_arrangement(
    employee_id: EmployeeId,
    work_type: WorkType,
    percentage: Option<i16>,
) -> WorkArrangement {
    let now = Utc::now();
    WorkArrangement {
        id: WorkArrangementId::new(),
        employee_id,
        work_type,
        percentage,
        created_at: now,
        updated_at: now,
    }
}

pub fn new_employee(name: &str, employee_id: &str, hourly_rate: &str) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        employee_id: employee_id.to_string(),
        hourly_rate: dec(hourly_rate),
    }
}

pub fn full_time(employee_id: EmployeeId) -> NewWorkArrangement {
    NewWorkArrangement {
        employee_id,
        work_type: WorkType::FullTime,
        percentage: None,
    }
}

pub fn part_time(employee_id: EmployeeId, percentage: i16) -> NewWorkArrangement {
    NewWorkArrangement {
        employee_id,
        work_type: WorkType::PartTime,
        percentage: Some(percentage),
    }
}
