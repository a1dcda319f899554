//! Person aggregate and skill entities.
//!
//! # Invariants
//! - `Person::id` is assigned on insert and never reused for another person.
//! - Every `Skill::person_id` equals the id of the person that owns it.
//! - Skill levels must stay within `SKILL_LEVEL_MIN..=SKILL_LEVEL_MAX`.
//! - Skill names are not unique within a person.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned person identity.
pub type PersonId = i64;

/// Store-assigned skill identity.
pub type SkillId = i64;

/// Lowest accepted skill level (inclusive).
pub const SKILL_LEVEL_MIN: i64 = 1;

/// Highest accepted skill level (inclusive).
pub const SKILL_LEVEL_MAX: i64 = 10;

/// Persisted skill owned by exactly one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    /// Foreign key to the owning person.
    pub person_id: PersonId,
    pub name: String,
    pub level: i64,
}

/// Persisted person with its eagerly loaded skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    /// Full name.
    pub name: String,
    pub display_name: String,
    /// Skills in insertion order.
    pub skills: Vec<Skill>,
}

/// Skill input without identity, used for insert and wholesale replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSkill {
    pub name: String,
    pub level: i64,
}

/// Person input without identity.
///
/// Used for both insert and update: an update overwrites names and replaces
/// the whole skill collection with `skills`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub display_name: String,
    pub skills: Vec<NewSkill>,
}

/// Rule violations detected before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    SkillLevelOutOfRange { skill: String, level: i64 },
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SkillLevelOutOfRange { skill, level } => write!(
                f,
                "skill `{skill}` has level {level}; level must be between {SKILL_LEVEL_MIN} and {SKILL_LEVEL_MAX}"
            ),
        }
    }
}

impl Error for PersonValidationError {}

/// Returns whether `level` lies in the accepted skill range.
pub fn is_valid_skill_level(level: i64) -> bool {
    (SKILL_LEVEL_MIN..=SKILL_LEVEL_MAX).contains(&level)
}

impl NewSkill {
    pub fn new(name: impl Into<String>, level: i64) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

impl NewPerson {
    /// Creates a person input with an empty skill list.
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            skills: Vec::new(),
        }
    }

    /// Appends one skill, keeping input order.
    pub fn with_skill(mut self, name: impl Into<String>, level: i64) -> Self {
        self.skills.push(NewSkill::new(name, level));
        self
    }

    /// Checks write-side rules.
    ///
    /// Reports the first out-of-range skill in input order.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        match self
            .skills
            .iter()
            .find(|skill| !is_valid_skill_level(skill.level))
        {
            Some(skill) => Err(PersonValidationError::SkillLevelOutOfRange {
                skill: skill.name.clone(),
                level: skill.level,
            }),
            None => Ok(()),
        }
    }
}
