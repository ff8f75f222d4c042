use habit_core::db::open_db_in_memory;
use habit_core::{
    calendar_epoch, CalendarRepository, CompletionReader, CompletionRecord, CompletionRepository,
    DayProgress, HabitServiceError, Periodicity, ReadOrder, RepoError, SqliteCalendarRepository,
    SqliteCompletionRepository,
};

mod common;

use common::date;

#[test]
fn calendar_materializes_from_epoch_and_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let calendar = SqliteCalendarRepository::try_new(&conn).unwrap();

    assert_eq!(calendar.latest_date().unwrap(), None);
    assert_eq!(calendar.materialize_through(date(2024, 5, 10)).unwrap(), 10);
    assert_eq!(calendar.materialize_through(date(2024, 5, 10)).unwrap(), 0);
    assert_eq!(calendar.latest_date().unwrap(), Some(date(2024, 5, 10)));

    assert_eq!(calendar.materialize_through(date(2024, 5, 12)).unwrap(), 2);
    assert_eq!(calendar.latest_date().unwrap(), Some(date(2024, 5, 12)));

    let first: String = conn
        .query_row("SELECT MIN(date) FROM calendar_dates;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(first, calendar_epoch().format("%Y-%m-%d").to_string());
}

#[test]
fn calendar_ignores_today_before_epoch() {
    let conn = open_db_in_memory().unwrap();
    let calendar = SqliteCalendarRepository::try_new(&conn).unwrap();

    assert_eq!(calendar.materialize_through(date(2024, 4, 1)).unwrap(), 0);
    assert_eq!(calendar.latest_date().unwrap(), None);
}

#[test]
fn ledger_sync_creates_one_uncompleted_row_per_habit_and_date() {
    let conn = open_db_in_memory().unwrap();
    let service = common::service(&conn);
    common::add_habit(&service, "meditate", Periodicity::Daily);
    common::add_habit(&service, "wash robes", Periodicity::Weekly);

    let refresh = service.refresh_ledger(date(2024, 5, 7)).unwrap();
    assert_eq!(refresh.dates_added, 7);
    assert_eq!(refresh.entries_added, 14);

    let again = service.refresh_ledger(date(2024, 5, 7)).unwrap();
    assert_eq!(again.dates_added, 0);
    assert_eq!(again.entries_added, 0);

    let completed: i64 = conn
        .query_row("SELECT SUM(completed) FROM completions;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(completed, 0);

    // A habit added later is backfilled from the epoch.
    common::add_habit(&service, "read", Periodicity::Daily);
    let refresh = service.refresh_ledger(date(2024, 5, 7)).unwrap();
    assert_eq!(refresh.entries_added, 7);
    assert_eq!(common::ledger_rows(&conn, "read"), 7);
}

#[test]
fn set_progress_flips_flags_and_day_view_reflects_them() {
    let conn = open_db_in_memory().unwrap();
    let service = common::service(&conn);
    common::add_habit(&service, "meditate", Periodicity::Daily);
    common::add_habit(&service, "attend senate", Periodicity::Weekly);
    let today = date(2024, 5, 5);

    service
        .set_progress("Meditate", date(2024, 5, 3), true, today)
        .unwrap();

    assert_eq!(
        service.day_progress(date(2024, 5, 3), today).unwrap(),
        vec![
            DayProgress {
                habit_name: "attend senate".to_string(),
                periodicity: Periodicity::Weekly,
                completed: false,
            },
            DayProgress {
                habit_name: "meditate".to_string(),
                periodicity: Periodicity::Daily,
                completed: true,
            },
        ]
    );

    service
        .set_progress("meditate", date(2024, 5, 3), false, today)
        .unwrap();
    let day = service.day_progress(date(2024, 5, 3), today).unwrap();
    assert!(day.iter().all(|item| !item.completed));
}

#[test]
fn set_progress_rejects_dates_outside_tracked_range() {
    let conn = open_db_in_memory().unwrap();
    let service = common::service(&conn);
    common::add_habit(&service, "meditate", Periodicity::Daily);
    let today = date(2024, 5, 5);

    let future = service
        .set_progress("meditate", date(2024, 5, 6), true, today)
        .unwrap_err();
    assert!(matches!(future, HabitServiceError::DateOutOfRange { latest, .. } if latest == today));

    let before_epoch = service
        .set_progress("meditate", date(2024, 4, 30), true, today)
        .unwrap_err();
    assert!(matches!(before_epoch, HabitServiceError::DateOutOfRange { .. }));

    let unknown = service
        .set_progress("levitate", date(2024, 5, 2), true, today)
        .unwrap_err();
    assert!(matches!(unknown, HabitServiceError::HabitNotFound(name) if name == "levitate"));
}

#[test]
fn set_completed_without_ledger_row_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = common::service(&conn);
    common::add_habit(&service, "meditate", Periodicity::Daily);
    let ledger = SqliteCompletionRepository::try_new(&conn).unwrap();

    let err = ledger
        .set_completed("meditate", date(2024, 5, 2), true)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::CompletionNotFound { ref habit_name, date: missing }
            if habit_name == "meditate" && missing == date(2024, 5, 2)
    ));
}

#[test]
fn reads_are_ordered_and_bounded() {
    let conn = open_db_in_memory().unwrap();
    let service = common::service(&conn);
    common::add_habit(&service, "meditate", Periodicity::Daily);
    let today = date(2024, 5, 4);
    service
        .set_progress("meditate", date(2024, 5, 2), true, today)
        .unwrap();
    let ledger = SqliteCompletionRepository::try_new(&conn).unwrap();

    let ascending = ledger
        .read_completions("meditate", ReadOrder::Ascending, None)
        .unwrap();
    assert_eq!(
        ascending,
        vec![
            CompletionRecord::new(date(2024, 5, 1), false),
            CompletionRecord::new(date(2024, 5, 2), true),
            CompletionRecord::new(date(2024, 5, 3), false),
            CompletionRecord::new(date(2024, 5, 4), false),
        ]
    );

    let descending = ledger
        .read_completions("meditate", ReadOrder::Descending, Some(date(2024, 5, 2)))
        .unwrap();
    assert_eq!(
        descending,
        vec![
            CompletionRecord::new(date(2024, 5, 2), true),
            CompletionRecord::new(date(2024, 5, 1), false),
        ]
    );

    assert!(ledger
        .read_completions("nobody", ReadOrder::Ascending, None)
        .unwrap()
        .is_empty());
}

#[test]
fn malformed_ledger_date_fails_the_read() {
    let conn = open_db_in_memory().unwrap();
    let service = common::service(&conn);
    common::add_habit(&service, "meditate", Periodicity::Daily);
    conn.execute_batch(
        "INSERT INTO calendar_dates (date) VALUES ('2024/05/03');
         INSERT INTO completions (habit_name, date, completed) VALUES ('meditate', '2024/05/03', 1);",
    )
    .unwrap();
    let ledger = SqliteCompletionRepository::try_new(&conn).unwrap();

    let err = ledger
        .read_completions("meditate", ReadOrder::Ascending, None)
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidDate(ref inner) if inner.value == "2024/05/03"));
}
