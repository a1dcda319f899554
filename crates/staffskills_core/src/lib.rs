//! Core domain logic for the StaffSkills backend.
//!
//! Owns the person/skill aggregate, its SQLite persistence, the DTO mapping
//! and the use-case service consumed by the HTTP layer.

pub mod db;
pub mod dto;
pub mod logging;
pub mod mapping;
pub mod model;
pub mod repo;
pub mod service;

pub use dto::{PersonRequestDto, PersonResponseDto, SkillDto};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::person::{
    is_valid_skill_level, NewPerson, NewSkill, Person, PersonId, PersonValidationError, Skill,
    SkillId, SKILL_LEVEL_MAX, SKILL_LEVEL_MIN,
};
pub use repo::person_repo::{PersonRepository, RepoError, RepoResult, SqlitePersonRepository};
pub use service::person_service::{
    validate_request, PersonService, PersonServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
