//! Transfer objects exchanged with API callers.
//!
//! JSON field names are camelCase. Missing fields fall back to defaults so a
//! body without `skills` means "no skills" and a skill without `level` fails
//! range validation instead of deserialization.

use crate::model::person::PersonId;
use serde::{Deserialize, Serialize};

/// One skill entry without identity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillDto {
    pub name: String,
    pub level: i64,
}

/// Create/update input for one person.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonRequestDto {
    pub name: String,
    pub display_name: String,
    pub skills: Vec<SkillDto>,
}

/// Person as returned to callers, carrying the assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponseDto {
    pub id: PersonId,
    pub name: String,
    pub display_name: String,
    pub skills: Vec<SkillDto>,
}

impl SkillDto {
    pub fn new(name: impl Into<String>, level: i64) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

impl PersonRequestDto {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            skills: Vec::new(),
        }
    }

    pub fn with_skill(mut self, name: impl Into<String>, level: i64) -> Self {
        self.skills.push(SkillDto::new(name, level));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{PersonRequestDto, PersonResponseDto, SkillDto};

    #[test]
    fn request_uses_camel_case_and_defaults_missing_fields() {
        let parsed: PersonRequestDto =
            serde_json::from_str(r#"{"name":"John Doe","displayName":"John"}"#).unwrap();
        assert_eq!(parsed, PersonRequestDto::new("John Doe", "John"));

        let skill: SkillDto = serde_json::from_str(r#"{"name":"SQL"}"#).unwrap();
        assert_eq!(skill.level, 0);
    }

    #[test]
    fn response_serializes_id_and_skills() {
        let response = PersonResponseDto {
            id: 1,
            name: "John Doe".to_string(),
            display_name: "John".to_string(),
            skills: vec![SkillDto::new("SQL", 7)],
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1,
                "name": "John Doe",
                "displayName": "John",
                "skills": [{ "name": "SQL", "level": 7 }]
            })
        );
    }
}
