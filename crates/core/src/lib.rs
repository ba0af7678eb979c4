//! Business logic for tasknote.
//!
//! One service per resource. Every service takes the [`Caller`] explicitly
//! and goes through the caller-scoped repository reads, so a record outside
//! the caller's scope is indistinguishable from a missing one.
//!
//! [`Caller`]: tasknote_db::Caller

pub mod services;
pub mod validation;

pub use services::*;
