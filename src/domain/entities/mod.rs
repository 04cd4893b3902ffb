//! Core domain entities representing the business data model.
//!
//! This module contains the fundamental data structures that represent the
//! core concepts of the link-shortening service. Entities are plain data
//! structures without business logic beyond small derived predicates.
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL mapping owned by a user
//! - [`Click`] - A resolution event on a shortened link
//! - [`User`] - A registered account
//!
//! Creation and partial-update inputs use separate structs (`NewLink`,
//! `LinkPatch`, `NewUser`, `UserPatch`) so repositories never receive
//! half-initialized entities.

pub mod click;
pub mod link;
pub mod user;

pub use click::Click;
pub use link::{Link, LinkFilter, LinkPatch, ListedLink, NewLink};
pub use user::{NewUser, User, UserPatch};
