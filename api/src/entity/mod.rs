//! SeaORM entities
//!
//! Table models for the employment schema (see `migrations/0001_init.sql`).

pub mod employees;
pub mod team_memberships;
pub mod teams;
pub mod work_arrangements;
