//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository
//! calls, validation and business rules. Services consume repository traits
//! and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link lifecycle management
//! - [`services::resolve_service::ResolveService`] - Public code resolution
//! - [`services::user_service::UserService`] - Account management
//! - [`services::auth_service::AuthService`] - Bearer token issue/verify

pub mod services;
