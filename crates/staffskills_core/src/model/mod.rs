//! Domain model for persons and their skills.
//!
//! # Responsibility
//! - Define the person aggregate and its write-side input shapes.
//! - Own the skill-level range rule shared by service and repository writes.
//!
//! # Invariants
//! - A `Person` is the aggregate root; `Skill` rows never exist without one.
//! - Identities are assigned by the store, never by callers.

pub mod person;
