//! Utility functions shared across the application.
//!
//! - [`code_generator`] - Short code generation
//! - [`password`] - Argon2id hashing for accounts and protected links

pub mod code_generator;
pub mod password;
