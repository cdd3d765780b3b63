//! Work arrangement domain entity
//!
//! Describes how much of their capacity an employee is contracted for: either a
//! single full-time arrangement, or one or more part-time arrangements whose
//! percentages add up to at most 100.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::employee::EmployeeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkArrangementId(pub Uuid);

impl WorkArrangementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WorkArrangementId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for WorkArrangementId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for WorkArrangementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of work arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    FullTime,
    PartTime,
}

impl std::fmt::Display for WorkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkType::FullTime => write!(f, "full_time"),
            WorkType::PartTime => write!(f, "part_time"),
        }
    }
}

impl std::str::FromStr for WorkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full_time" => Ok(WorkType::FullTime),
            "part_time" => Ok(WorkType::PartTime),
            _ => Err(format!("Unknown work type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkArrangement {
    pub id: WorkArrangementId,
    pub employee_id: EmployeeId,
    pub work_type: WorkType,
    /// Share of full time, only meaningful for part-time arrangements
    pub percentage: Option<i16>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkArrangement {
    pub fn is_full_time(&self) -> bool {
        self.work_type == WorkType::FullTime
    }

    pub fn is_part_time(&self) -> bool {
        self.work_type == WorkType::PartTime
    }
}

/// Data needed to create or fully replace a work arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewWorkArrangement {
    pub employee_id: EmployeeId,
    pub work_type: WorkType,
    pub percentage: Option<i16>,
}

impl NewWorkArrangement {
    /// Full-time arrangements never carry a percentage
    pub fn normalized(self) -> Self {
        match self.work_type {
            WorkType::FullTime => Self {
                percentage: None,
                ..self
            },
            WorkType::PartTime => self,
        }
    }
}
