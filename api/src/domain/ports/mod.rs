//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod repositories;

pub use repositories::{
    EmployeeFilter, EmployeeRepository, MembershipFilter, MembershipGuard, MembershipRepository,
    Page, SiblingCheck, SortField, SortKey, Store, TeamFilter, TeamRepository, WorkArrangementFilter,
    WorkArrangementRepository,
};
