use rusqlite::Connection;
use staffskills_core::db::open_db_in_memory;
use staffskills_core::{
    PersonRepository, PersonRequestDto, PersonService, PersonServiceError, PersonValidationError,
    SkillDto, SqlitePersonRepository,
};

fn john_request() -> PersonRequestDto {
    PersonRequestDto::new("John Doe", "John").with_skill("SQL", 7)
}

fn row_counts(conn: &Connection) -> (i64, i64) {
    let persons = conn
        .query_row("SELECT COUNT(*) FROM persons;", [], |row| row.get(0))
        .unwrap();
    let skills = conn
        .query_row("SELECT COUNT(*) FROM skills;", [], |row| row.get(0))
        .unwrap();
    (persons, skills)
}

#[test]
fn create_get_delete_lifecycle() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&mut conn).unwrap();
    let mut service = PersonService::new(repo);

    let created = service.create(&john_request()).unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.name, "John Doe");
    assert_eq!(created.display_name, "John");
    assert_eq!(created.skills, vec![SkillDto::new("SQL", 7)]);

    assert_eq!(service.get_by_id(1).unwrap(), Some(created));
    assert!(service.delete(1).unwrap());
    assert_eq!(service.get_by_id(1).unwrap(), None);
}

#[test]
fn list_all_contains_each_created_person_once() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&mut conn).unwrap();
    let mut service = PersonService::new(repo);

    assert!(service.list_all().unwrap().is_empty());

    let john = service.create(&john_request()).unwrap();
    let jane = service
        .create(
            &PersonRequestDto::new("Jane Doe", "Jane")
                .with_skill("C#", 8)
                .with_skill("SQL", 7),
        )
        .unwrap();

    let listed = service.list_all().unwrap();
    assert_eq!(listed, vec![john, jane]);
    assert_eq!(
        listed
            .iter()
            .filter(|person| person.name == "Jane Doe")
            .count(),
        1
    );
}

#[test]
fn get_by_id_returns_none_for_ids_never_issued() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&mut conn).unwrap();
    let mut service = PersonService::new(repo);
    let created = service.create(&john_request()).unwrap();

    assert!(service.get_by_id(created.id + 1).unwrap().is_none());
    assert!(service.get_by_id(0).unwrap().is_none());
    assert!(service.get_by_id(i64::MAX).unwrap().is_none());
}

#[test]
fn update_overwrites_names_and_replaces_skills_entirely() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&mut conn).unwrap();
    let mut service = PersonService::new(repo);
    let created = service
        .create(
            &PersonRequestDto::new("John Doe", "John")
                .with_skill("C#", 8)
                .with_skill("SQL", 7),
        )
        .unwrap();

    let request = PersonRequestDto::new("John Smith", "Johnny")
        .with_skill("Rust", 3)
        .with_skill("Rust", 3);
    let updated = service.update(created.id, &request).unwrap().unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "John Smith");
    assert_eq!(updated.display_name, "Johnny");
    assert_eq!(updated.skills, request.skills);
    assert_eq!(service.get_by_id(created.id).unwrap(), Some(updated));
    assert_eq!(service.repo().count_skills().unwrap(), 2);
}

#[test]
fn update_with_empty_skills_clears_collection() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&mut conn).unwrap();
    let mut service = PersonService::new(repo);
    let created = service.create(&john_request()).unwrap();

    let updated = service
        .update(created.id, &PersonRequestDto::new("John Doe", "John"))
        .unwrap()
        .unwrap();
    assert!(updated.skills.is_empty());
    assert_eq!(service.repo().count_skills().unwrap(), 0);
}

#[test]
fn update_and_delete_on_missing_id_leave_store_untouched() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let repo = SqlitePersonRepository::try_new(&mut conn).unwrap();
        let mut service = PersonService::new(repo);
        service.create(&john_request()).unwrap();

        assert!(service.update(99, &john_request()).unwrap().is_none());
        assert!(!service.delete(99).unwrap());
    }

    assert_eq!(row_counts(&conn), (1, 1));
}

#[test]
fn create_with_out_of_range_level_fails_validation_and_writes_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let repo = SqlitePersonRepository::try_new(&mut conn).unwrap();
        let mut service = PersonService::new(repo);

        let err = service
            .create(&PersonRequestDto::new("John Doe", "John").with_skill("X", 11))
            .unwrap_err();
        match err {
            PersonServiceError::Validation(PersonValidationError::SkillLevelOutOfRange {
                skill,
                level,
            }) => {
                assert_eq!(skill, "X");
                assert_eq!(level, 11);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(row_counts(&conn), (0, 0));
}

#[test]
fn update_with_invalid_level_is_validation_even_for_missing_id() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let repo = SqlitePersonRepository::try_new(&mut conn).unwrap();
        let mut service = PersonService::new(repo);
        let created = service.create(&john_request()).unwrap();

        let bad = PersonRequestDto::new("Changed", "Changed").with_skill("SQL", 0);
        let err = service.update(created.id, &bad).unwrap_err();
        assert!(matches!(err, PersonServiceError::Validation(_)));

        let err = service.update(404, &bad).unwrap_err();
        assert!(matches!(err, PersonServiceError::Validation(_)));

        let unchanged = service.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(unchanged.name, "John Doe");
        assert_eq!(unchanged.skills, vec![SkillDto::new("SQL", 7)]);
    }

    assert_eq!(row_counts(&conn), (1, 1));
}
