//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define aggregate-oriented data access contracts for persons.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `NewPerson::validate()` before persistence.
//! - A person and its skills are always written in one transaction.
//! - Absence is reported as `None`/`false` on reads and deletes, and as
//!   `RepoError::NotFound` only for updates.

pub mod person_repo;
