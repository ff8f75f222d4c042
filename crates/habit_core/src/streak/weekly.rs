//! Week-run strategies.
//!
//! Records are grouped into Monday-keyed week buckets in the order they
//! arrive. A bucket counts toward a run when at least one of its days is
//! completed. A bucket is only evaluated once the scan moves past it, so the
//! trailing bucket is settled separately by [`WeekFold::finish`].

use crate::model::completion::CompletionRecord;
use chrono::{Datelike, Days, NaiveDate};

/// Monday of the calendar week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Consecutive satisfied weeks ending at the most recent week with data.
///
/// Expects oldest-first records; anything after `reference_date` is ignored.
/// When the most recent bucket is the week containing `reference_date` and
/// has no completion yet, the current streak is 0 no matter how long the run
/// before it was. An empty most recent bucket from an earlier week is simply
/// not counted.
pub fn current_weekly_streak(records_ascending: &[CompletionRecord], reference_date: NaiveDate) -> u32 {
    let settled = records_ascending
        .iter()
        .take_while(|record| record.date <= reference_date)
        .fold(WeekFold::default(), WeekFold::step)
        .finish();

    let reference_week_empty =
        settled.bucket == Some(week_start(reference_date)) && !settled.bucket_has_completion;
    if reference_week_empty {
        0
    } else {
        settled.current_run
    }
}

/// Longest run of consecutive satisfied weeks anywhere in an oldest-first
/// sequence, including a trailing in-progress week.
pub fn longest_weekly_streak(records_ascending: &[CompletionRecord]) -> u32 {
    records_ascending
        .iter()
        .fold(WeekFold::default(), WeekFold::step)
        .finish()
        .best_run
}

/// Accumulator for week-bucket scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekFold {
    pub current_run: u32,
    pub best_run: u32,
    /// Monday key of the bucket currently being filled.
    pub bucket: Option<NaiveDate>,
    pub bucket_has_completion: bool,
}

impl WeekFold {
    /// Applies one record, closing the previous bucket on a week change.
    pub fn step(self, record: &CompletionRecord) -> Self {
        let key = week_start(record.date);
        let state = match self.bucket {
            Some(bucket) if bucket == key => self,
            Some(_) => Self {
                bucket: Some(key),
                bucket_has_completion: false,
                ..self.close_bucket()
            },
            None => Self {
                bucket: Some(key),
                ..self
            },
        };

        Self {
            bucket_has_completion: state.bucket_has_completion || record.completed,
            ..state
        }
    }

    /// Settles the trailing bucket, which no week change has evaluated.
    ///
    /// Only a satisfied trailing bucket changes the counters; an empty one
    /// leaves them as they were so callers can still inspect
    /// `bucket_has_completion`.
    pub fn finish(self) -> Self {
        if self.bucket_has_completion {
            self.close_bucket()
        } else {
            self
        }
    }

    fn close_bucket(self) -> Self {
        let current_run = if self.bucket_has_completion {
            self.current_run.saturating_add(1)
        } else {
            0
        };
        Self {
            current_run,
            best_run: self.best_run.max(current_run),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{current_weekly_streak, longest_weekly_streak, week_start, WeekFold};
    use crate::model::completion::CompletionRecord;
    use chrono::{Days, NaiveDate};

    // 2024-04-29 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 29).unwrap()
    }

    fn day(offset: u64) -> NaiveDate {
        monday() + Days::new(offset)
    }

    /// Builds a gapless daily history. `weeks[i]` lists the weekday offsets
    /// (0 = Monday) completed in week `i`; `last_week_days` truncates the
    /// final week to model the in-progress week.
    fn history(weeks: &[&[u64]], last_week_days: u64) -> Vec<CompletionRecord> {
        let mut records = Vec::new();
        for (index, completed_days) in weeks.iter().enumerate() {
            let days_in_week = if index + 1 == weeks.len() {
                last_week_days
            } else {
                7
            };
            for weekday in 0..days_in_week {
                let date = day(index as u64 * 7 + weekday);
                records.push(CompletionRecord::new(date, completed_days.contains(&weekday)));
            }
        }
        records
    }

    fn last_date(records: &[CompletionRecord]) -> NaiveDate {
        records.last().map(|record| record.date).unwrap()
    }

    #[test]
    fn week_start_maps_every_weekday_to_monday() {
        for offset in 0..7 {
            assert_eq!(week_start(day(offset)), monday());
        }
        assert_eq!(week_start(day(7)), day(7));
    }

    #[test]
    fn current_counts_all_satisfied_weeks_including_active_one() {
        let records = history(&[&[2], &[0, 4], &[1]], 3);
        assert_eq!(current_weekly_streak(&records, last_date(&records)), 3);
    }

    #[test]
    fn current_is_zero_when_active_week_has_no_completion() {
        let records = history(&[&[2], &[0, 4], &[]], 3);
        assert_eq!(current_weekly_streak(&records, last_date(&records)), 0);
    }

    #[test]
    fn current_restarts_after_an_empty_week() {
        let records = history(&[&[0], &[1], &[], &[3], &[5], &[0]], 1);
        assert_eq!(current_weekly_streak(&records, last_date(&records)), 3);
    }

    #[test]
    fn current_ignores_records_after_reference_date() {
        let records = history(&[&[1], &[2], &[]], 7);
        let reference = day(9);
        assert_eq!(current_weekly_streak(&records, reference), 2);
    }

    #[test]
    fn current_keeps_run_when_data_ends_before_reference_week() {
        // Weeks 0 and 1 satisfied, week 2 has three empty days, reference is
        // in week 4 with no data.
        let records = history(&[&[0], &[0], &[]], 3);
        assert_eq!(current_weekly_streak(&records, day(30)), 2);
        assert_eq!(current_weekly_streak(&records, last_date(&records)), 0);
    }

    #[test]
    fn current_counts_satisfied_last_week_before_reference_week() {
        let records = history(&[&[0], &[], &[2], &[4]], 7);
        assert_eq!(current_weekly_streak(&records, day(40)), 2);
    }

    #[test]
    fn current_of_empty_history_is_zero() {
        assert_eq!(current_weekly_streak(&[], monday()), 0);
    }

    #[test]
    fn longest_counts_trailing_partial_week() {
        let records = history(
            &[&[0], &[], &[], &[], &[3], &[1, 2], &[6], &[0], &[4], &[2]],
            3,
        );
        assert_eq!(longest_weekly_streak(&records), 6);
    }

    #[test]
    fn longest_keeps_earlier_run_when_later_run_is_shorter() {
        let records = history(&[&[0], &[0], &[0], &[0], &[], &[1], &[1]], 7);
        assert_eq!(longest_weekly_streak(&records), 4);
    }

    #[test]
    fn longest_does_not_zero_an_empty_trailing_week() {
        let records = history(&[&[0], &[0], &[]], 2);
        assert_eq!(longest_weekly_streak(&records), 2);
    }

    #[test]
    fn longest_of_empty_or_never_completed_history_is_zero() {
        assert_eq!(longest_weekly_streak(&[]), 0);
        assert_eq!(longest_weekly_streak(&history(&[&[], &[]], 7)), 0);
    }

    #[test]
    fn fold_step_closes_bucket_only_on_week_change() {
        let state = WeekFold::default().step(&CompletionRecord::new(day(0), true));
        assert_eq!(state.current_run, 0);
        assert_eq!(state.bucket, Some(monday()));
        assert!(state.bucket_has_completion);

        let state = state.step(&CompletionRecord::new(day(6), false));
        assert_eq!(state.current_run, 0);
        assert!(state.bucket_has_completion);

        let state = state.step(&CompletionRecord::new(day(7), false));
        assert_eq!(state.current_run, 1);
        assert_eq!(state.best_run, 1);
        assert_eq!(state.bucket, Some(day(7)));
        assert!(!state.bucket_has_completion);

        let state = state.step(&CompletionRecord::new(day(14), false));
        assert_eq!(state.current_run, 0);
        assert_eq!(state.best_run, 1);
    }

    #[test]
    fn both_strategies_are_idempotent() {
        let records = history(&[&[0], &[], &[2], &[3]], 4);
        let reference = last_date(&records);
        assert_eq!(
            current_weekly_streak(&records, reference),
            current_weekly_streak(&records, reference)
        );
        assert_eq!(longest_weekly_streak(&records), longest_weekly_streak(&records));
    }
}
