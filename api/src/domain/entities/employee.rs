//! Employee domain entity
//!
//! An employee is identified by a storage id and carries a separate company
//! badge identifier (`employee_id`) plus an hourly wage.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an employee record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub Uuid);

impl EmployeeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EmployeeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EmployeeId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person on the payroll
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// Company badge number, not to be confused with `id`
    pub employee_id: String,
    pub hourly_rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn brief(&self) -> EmployeeBrief {
        EmployeeBrief {
            id: self.id,
            name: self.name.clone(),
            employee_id: self.employee_id.clone(),
        }
    }
}

/// Data needed to create or fully replace an employee
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub name: String,
    pub employee_id: String,
    pub hourly_rate: Decimal,
}

/// Compact employee reference embedded in other records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeBrief {
    pub id: EmployeeId,
    pub name: String,
    pub employee_id: String,
}
