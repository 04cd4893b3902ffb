//! HTTP middleware for request processing and observability.

pub mod auth;
pub mod tracing;
