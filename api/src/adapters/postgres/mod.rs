//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod employee_repo;
pub mod membership_repo;
pub mod team_repo;
pub mod work_arrangement_repo;


pub use employee_repo::PostgresEmployeeRepository;
pub use membership_repo::PostgresMembershipRepository;
pub use team_repo::PostgresTeamRepository;
pub use work_arrangement_repo::PostgresWorkArrangementRepository;

use crate::domain::ports::Store;

/// Store backed by PostgreSQL repositories
pub struct PostgresStore;

impl Store for PostgresStore {
    type Employees = PostgresEmployeeRepository;
    type Teams = PostgresTeamRepository;
    type Memberships = PostgresMembershipRepository;
    type WorkArrangements = PostgresWorkArrangementRepository;
}

/// `ILIKE` pattern matching `q` anywhere, with wildcards in `q` taken literally
pub(crate) fn contains_pattern(q: &str) -> String {
    let mut pattern = String::with_capacity(q.len() + 2);
    pattern.push('%');
    for c in q.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
