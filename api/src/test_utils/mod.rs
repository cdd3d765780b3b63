//! Test utilities
//!
//! In-memory repository implementations and test fixtures.
//!
//! The in-memory repositories implement the same ports as the PostgreSQL
//! adapters, and `InMemoryStore` lets the full router run against them.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
