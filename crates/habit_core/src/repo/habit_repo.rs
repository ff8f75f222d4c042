//! Habit registry contracts and SQLite implementation.
//!
//! # Responsibility
//! - Create, read, list and delete habit records.
//! - Enumerate `(name, periodicity)` pairs for the streak engine.
//!
//! # Invariants
//! - Names are unique; a second insert with the same name is `DuplicateHabit`.
//! - Deleting a habit removes its ledger rows through `ON DELETE CASCADE`.
//! - Listing order is `name ASC`.

use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::habit::{Habit, Periodicity, HABIT_TIMESTAMP_FORMAT};
use crate::streak::source::HabitEnumerator;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, ErrorCode, Row};

const HABIT_SELECT_SQL: &str = "SELECT
    name,
    description,
    periodicity,
    created_at
FROM habits";

/// Repository interface for the habit registry.
pub trait HabitRepository {
    fn create_habit(&self, habit: &Habit) -> RepoResult<()>;
    fn get_habit(&self, name: &str) -> RepoResult<Option<Habit>>;
    /// Lists habits, optionally restricted to one periodicity.
    fn list_habits(&self, periodicity: Option<Periodicity>) -> RepoResult<Vec<Habit>>;
    /// Deletes one habit together with its completion rows.
    fn delete_habit(&self, name: &str) -> RepoResult<()>;
}

/// SQLite-backed habit registry.
pub struct SqliteHabitRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn create_habit(&self, habit: &Habit) -> RepoResult<()> {
        habit.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO habits (
                name,
                description,
                periodicity,
                created_at
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                habit.name.as_str(),
                habit.description.as_str(),
                habit.periodicity.as_str(),
                habit.created_at_text(),
            ],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(RepoError::DuplicateHabit(habit.name.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_habit(&self, name: &str) -> RepoResult<Option<Habit>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{HABIT_SELECT_SQL} WHERE name = ?1;"))?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_habit_row(row)?));
        }
        Ok(None)
    }

    fn list_habits(&self, periodicity: Option<Periodicity>) -> RepoResult<Vec<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_SELECT_SQL}
             WHERE ?1 IS NULL OR periodicity = ?1
             ORDER BY name ASC;"
        ))?;
        let mut rows = stmt.query([periodicity.map(Periodicity::as_str)])?;

        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }
        Ok(habits)
    }

    fn delete_habit(&self, name: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM habits WHERE name = ?1;", [name])?;
        if changed == 0 {
            return Err(RepoError::HabitNotFound(name.to_string()));
        }
        Ok(())
    }
}

impl HabitEnumerator for SqliteHabitRepository<'_> {
    fn list_periodicities(&self) -> RepoResult<Vec<(String, Periodicity)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, periodicity FROM habits ORDER BY name ASC;")?;
        let mut rows = stmt.query([])?;

        let mut pairs = Vec::new();
        while let Some(row) = rows.next()? {
            let name: String = row.get("name")?;
            let periodicity = parse_periodicity(&row.get::<_, String>("periodicity")?)?;
            pairs.push((name, periodicity));
        }
        Ok(pairs)
    }
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let created_text: String = row.get("created_at")?;
    let created_at = NaiveDateTime::parse_from_str(&created_text, HABIT_TIMESTAMP_FORMAT)
        .map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid timestamp `{created_text}` in habits.created_at"
            ))
        })?;

    let habit = Habit {
        name: row.get("name")?,
        description: row.get("description")?,
        periodicity: parse_periodicity(&row.get::<_, String>("periodicity")?)?,
        created_at,
    };
    habit.validate()?;
    Ok(habit)
}

pub(crate) fn parse_periodicity(value: &str) -> RepoResult<Periodicity> {
    Periodicity::parse(value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid periodicity `{value}` in habits.periodicity"))
    })
}
