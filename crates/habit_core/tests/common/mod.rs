#![allow(dead_code)]

use chrono::NaiveDate;
use habit_core::{
    HabitService, Periodicity, SqliteCalendarRepository, SqliteCompletionRepository,
    SqliteHabitRepository,
};
use rusqlite::Connection;

pub type SqliteHabitService<'conn> = HabitService<
    SqliteHabitRepository<'conn>,
    SqliteCalendarRepository<'conn>,
    SqliteCompletionRepository<'conn>,
>;

pub fn service(conn: &Connection) -> SqliteHabitService<'_> {
    HabitService::new(
        SqliteHabitRepository::try_new(conn).unwrap(),
        SqliteCalendarRepository::try_new(conn).unwrap(),
        SqliteCompletionRepository::try_new(conn).unwrap(),
    )
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn ledger_rows(conn: &Connection, habit_name: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM completions WHERE habit_name = ?1;",
        [habit_name],
        |row| row.get(0),
    )
    .unwrap()
}

pub fn add_habit(service: &SqliteHabitService<'_>, name: &str, periodicity: Periodicity) {
    let created_at = date(2024, 5, 1).and_hms_opt(9, 0, 0).unwrap();
    service
        .add_habit(name, "tracked in tests", periodicity, created_at)
        .unwrap();
}
