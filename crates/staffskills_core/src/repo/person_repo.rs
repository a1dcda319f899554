//! Person aggregate repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide load/insert/update/delete over the `persons` + `skills` tables.
//! - Eagerly load the skill collection with every person read.
//!
//! # Invariants
//! - `update_person` replaces the whole skill set; old skill rows are deleted
//!   and new ones get fresh ids.
//! - `delete_person` relies on `ON DELETE CASCADE` to drop skill rows.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::person::{
    is_valid_skill_level, NewPerson, NewSkill, Person, PersonId, PersonValidationError, Skill,
};
use rusqlite::{params, Connection, Rows, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PERSON_SELECT_SQL: &str = "SELECT
    p.id AS person_id,
    p.name AS person_name,
    p.display_name AS display_name,
    s.id AS skill_id,
    s.name AS skill_name,
    s.level AS skill_level
FROM persons p
LEFT JOIN skills s ON s.person_id = p.id";

const PERSON_ORDER_SQL: &str = "ORDER BY p.id ASC, s.id ASC";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for person aggregate persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(PersonValidationError),
    Db(DbError),
    NotFound(PersonId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Connection was opened without `foreign_keys=ON`; cascades would not fire.
    ForeignKeysDisabled,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "person not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted person data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::ForeignKeysDisabled => write!(f, "connection has foreign key enforcement off"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PersonValidationError> for RepoError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the person aggregate.
pub trait PersonRepository {
    /// Lists every person with skills, ordered by person id.
    fn list_persons(&self) -> RepoResult<Vec<Person>>;
    /// Gets one person with skills; `None` when absent.
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    /// Inserts a person and its skills atomically and returns the stored aggregate.
    fn insert_person(&mut self, person: &NewPerson) -> RepoResult<Person>;
    /// Overwrites names and replaces all skills atomically.
    fn update_person(&mut self, id: PersonId, person: &NewPerson) -> RepoResult<()>;
    /// Deletes a person (skills cascade). Returns whether a row was removed.
    fn delete_person(&mut self, id: PersonId) -> RepoResult<bool>;
    fn count_persons(&self) -> RepoResult<u64>;
    fn count_skills(&self) -> RepoResult<u64>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn list_persons(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} {PERSON_ORDER_SQL};"))?;
        let rows = stmt.query([])?;
        collect_persons(rows)
    }

    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        load_person(self.conn, id)
    }

    fn insert_person(&mut self, person: &NewPerson) -> RepoResult<Person> {
        person.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO persons (name, display_name) VALUES (?1, ?2);",
            params![person.name.as_str(), person.display_name.as_str()],
        )?;
        let id = tx.last_insert_rowid();
        insert_skills(&tx, id, &person.skills)?;

        let stored = load_person(&tx, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("inserted person {id} is not readable"))
        })?;
        tx.commit()?;
        Ok(stored)
    }

    fn update_person(&mut self, id: PersonId, person: &NewPerson) -> RepoResult<()> {
        person.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE persons SET name = ?2, display_name = ?3 WHERE id = ?1;",
            params![id, person.name.as_str(), person.display_name.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        tx.execute("DELETE FROM skills WHERE person_id = ?1;", [id])?;
        insert_skills(&tx, id, &person.skills)?;

        tx.commit()?;
        Ok(())
    }

    fn delete_person(&mut self, id: PersonId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM persons WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn count_persons(&self) -> RepoResult<u64> {
        count_rows(self.conn, "persons")
    }

    fn count_skills(&self) -> RepoResult<u64> {
        count_rows(self.conn, "skills")
    }
}

fn load_person(conn: &Connection, id: PersonId) -> RepoResult<Option<Person>> {
    let mut stmt = conn.prepare(&format!(
        "{PERSON_SELECT_SQL} WHERE p.id = ?1 {PERSON_ORDER_SQL};"
    ))?;
    let rows = stmt.query([id])?;
    Ok(collect_persons(rows)?.into_iter().next())
}

fn insert_skills(tx: &Transaction<'_>, person_id: PersonId, skills: &[NewSkill]) -> RepoResult<()> {
    let mut stmt =
        tx.prepare("INSERT INTO skills (name, level, person_id) VALUES (?1, ?2, ?3);")?;
    for skill in skills {
        stmt.execute(params![skill.name.as_str(), skill.level, person_id])?;
    }
    Ok(())
}

/// Folds joined person/skill rows into aggregates.
///
/// Rows must be ordered by person id so that one person's rows are adjacent.
fn collect_persons(mut rows: Rows<'_>) -> RepoResult<Vec<Person>> {
    let mut persons: Vec<Person> = Vec::new();

    while let Some(row) = rows.next()? {
        let person_id: PersonId = row.get("person_id")?;
        if persons.last().map(|person| person.id) != Some(person_id) {
            persons.push(Person {
                id: person_id,
                name: row.get("person_name")?,
                display_name: row.get("display_name")?,
                skills: Vec::new(),
            });
        }

        let Some(skill_id) = row.get::<_, Option<i64>>("skill_id")? else {
            continue;
        };
        let level: i64 = row.get("skill_level")?;
        if !is_valid_skill_level(level) {
            return Err(RepoError::InvalidData(format!(
                "invalid level `{level}` in skills.level for skill {skill_id}"
            )));
        }

        if let Some(person) = persons.last_mut() {
            person.skills.push(Skill {
                id: skill_id,
                person_id,
                name: row.get("skill_name")?,
                level,
            });
        }
    }

    Ok(persons)
}

fn count_rows(conn: &Connection, table: &'static str) -> RepoResult<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })?;
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative row count for `{table}`")))
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let required: [(&'static str, &[&'static str]); 2] = [
        ("persons", &["id", "name", "display_name"]),
        ("skills", &["id", "name", "level", "person_id"]),
    ];

    for (table, columns) in required {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    let foreign_keys: i64 = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
    if foreign_keys != 1 {
        return Err(RepoError::ForeignKeysDisabled);
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
