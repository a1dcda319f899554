//! Person aggregate use-case service.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete entry points over DTOs.
//! - Enforce the skill-level rule before any persistence call.
//!
//! # Invariants
//! - Not-found is a value (`None` / `false`), never an error.
//! - `update` replaces the full skill collection; no diffing is attempted.
//! - `update` and `delete` on a missing id never call a repository mutator.

use crate::dto::{PersonRequestDto, PersonResponseDto};
use crate::mapping::{to_new_person, to_response};
use crate::model::person::{PersonId, PersonValidationError};
use crate::repo::person_repo::{PersonRepository, RepoError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for person use-cases.
#[derive(Debug)]
pub enum PersonServiceError {
    /// Input rejected before persistence.
    Validation(PersonValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for PersonServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent person state: {details}"),
        }
    }
}

impl Error for PersonServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl From<PersonValidationError> for PersonServiceError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for PersonServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, PersonServiceError>;

/// Person service facade over repository implementations.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Read-only access to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Lists every stored person.
    pub fn list_all(&self) -> ServiceResult<Vec<PersonResponseDto>> {
        let persons = self.repo.list_persons()?;
        debug!(
            "event=person_list module=service status=ok count={}",
            persons.len()
        );
        Ok(persons.iter().map(to_response).collect())
    }

    /// Gets one person by id, `None` when it does not exist.
    pub fn get_by_id(&self, id: PersonId) -> ServiceResult<Option<PersonResponseDto>> {
        let person = self.repo.get_person(id)?;
        if person.is_none() {
            debug!("event=person_get module=service status=not_found person_id={id}");
        }
        Ok(person.as_ref().map(to_response))
    }

    /// Creates a person with its skills and returns it with the assigned id.
    ///
    /// # Errors
    /// - `Validation` when any skill level is outside 1..=10; nothing is written.
    pub fn create(&mut self, request: &PersonRequestDto) -> ServiceResult<PersonResponseDto> {
        validate_request(request)?;

        let person = self.repo.insert_person(&to_new_person(request))?;
        info!(
            "event=person_create module=service status=ok person_id={} skills={}",
            person.id,
            person.skills.len()
        );
        Ok(to_response(&person))
    }

    /// Overwrites names and replaces all skills of an existing person.
    ///
    /// Returns `Ok(None)` when `id` does not exist.
    ///
    /// # Errors
    /// - `Validation` when any skill level is outside 1..=10; nothing is written.
    pub fn update(
        &mut self,
        id: PersonId,
        request: &PersonRequestDto,
    ) -> ServiceResult<Option<PersonResponseDto>> {
        validate_request(request)?;

        if self.repo.get_person(id)?.is_none() {
            debug!("event=person_update module=service status=not_found person_id={id}");
            return Ok(None);
        }

        match self.repo.update_person(id, &to_new_person(request)) {
            Ok(()) => {}
            // Deleted between the existence check and the write.
            Err(RepoError::NotFound(_)) => return Ok(None),
            Err(err) => return Err(err.into()),
        }

        let updated = self
            .repo
            .get_person(id)?
            .ok_or(PersonServiceError::InconsistentState(
                "updated person not found in read-back",
            ))?;
        info!(
            "event=person_update module=service status=ok person_id={} skills={}",
            id,
            updated.skills.len()
        );
        Ok(Some(to_response(&updated)))
    }

    /// Deletes a person and its skills. Returns `false` when `id` does not exist.
    pub fn delete(&mut self, id: PersonId) -> ServiceResult<bool> {
        if self.repo.get_person(id)?.is_none() {
            debug!("event=person_delete module=service status=not_found person_id={id}");
            return Ok(false);
        }

        let deleted = self.repo.delete_person(id)?;
        info!("event=person_delete module=service status=ok person_id={id} deleted={deleted}");
        Ok(deleted)
    }
}

/// Rejects requests whose skills break the level rule.
///
/// Shared by create and update so the rule lives in one place.
pub fn validate_request(request: &PersonRequestDto) -> Result<(), PersonValidationError> {
    to_new_person(request).validate().inspect_err(|err| {
        warn!("event=person_validate module=service status=rejected reason=\"{err}\"");
    })
}
