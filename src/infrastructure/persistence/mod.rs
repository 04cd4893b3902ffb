//! Store implementations of the domain repository traits.
//!
//! # Backends
//!
//! - [`PgLinkRepository`] / [`PgUserRepository`] - PostgreSQL via SQLx
//! - [`MemoryStore`] - in-memory tables for local development and tests

pub mod memory;
pub mod pg_link_repository;
pub mod pg_user_repository;

pub use memory::MemoryStore;
pub use pg_link_repository::PgLinkRepository;
pub use pg_user_repository::PgUserRepository;
