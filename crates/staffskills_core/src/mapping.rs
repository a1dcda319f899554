//! Pure conversions between persisted entities and transfer objects.
//!
//! No validation happens here; callers decide when rules are enforced.

use crate::dto::{PersonRequestDto, PersonResponseDto, SkillDto};
use crate::model::person::{NewPerson, NewSkill, Person, Skill};

/// Maps a stored aggregate to its response shape, dropping skill ids and
/// the person foreign key.
pub fn to_response(person: &Person) -> PersonResponseDto {
    PersonResponseDto {
        id: person.id,
        name: person.name.clone(),
        display_name: person.display_name.clone(),
        skills: person.skills.iter().map(to_skill_dto).collect(),
    }
}

/// Maps request input to a write model with fresh, identity-less skills.
pub fn to_new_person(request: &PersonRequestDto) -> NewPerson {
    NewPerson {
        name: request.name.clone(),
        display_name: request.display_name.clone(),
        skills: request
            .skills
            .iter()
            .map(|skill| NewSkill::new(skill.name.clone(), skill.level))
            .collect(),
    }
}

fn to_skill_dto(skill: &Skill) -> SkillDto {
    SkillDto::new(skill.name.clone(), skill.level)
}

#[cfg(test)]
mod tests {
    use super::{to_new_person, to_response};
    use crate::dto::{PersonRequestDto, SkillDto};
    use crate::model::person::{NewSkill, Person, Skill};

    #[test]
    fn to_response_drops_internal_skill_fields() {
        let person = Person {
            id: 42,
            name: "Jane Doe".to_string(),
            display_name: "Jane".to_string(),
            skills: vec![
                Skill {
                    id: 7,
                    person_id: 42,
                    name: "SQL".to_string(),
                    level: 5,
                },
                Skill {
                    id: 8,
                    person_id: 42,
                    name: "SQL".to_string(),
                    level: 9,
                },
            ],
        };

        let response = to_response(&person);
        assert_eq!(response.id, 42);
        assert_eq!(response.display_name, "Jane");
        assert_eq!(
            response.skills,
            vec![SkillDto::new("SQL", 5), SkillDto::new("SQL", 9)]
        );
    }

    #[test]
    fn to_new_person_keeps_order_and_does_not_validate() {
        let request = PersonRequestDto::new("John Doe", "John")
            .with_skill("Rust", 11)
            .with_skill("Go", 2);

        let person = to_new_person(&request);
        assert_eq!(person.name, "John Doe");
        assert_eq!(
            person.skills,
            vec![NewSkill::new("Rust", 11), NewSkill::new("Go", 2)]
        );
    }
}
