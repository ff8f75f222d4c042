//! Day-run strategies.

use crate::model::completion::CompletionRecord;
use chrono::NaiveDate;

/// Counts the completed days at the head of a newest-first sequence.
///
/// Records dated after `reference_date` are skipped. The scan stops at the
/// first not-completed record, so an unchecked "today" yields 0.
pub fn current_daily_streak(records_descending: &[CompletionRecord], reference_date: NaiveDate) -> u32 {
    let count = records_descending
        .iter()
        .skip_while(|record| record.date > reference_date)
        .take_while(|record| record.completed)
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Longest run of consecutive completed calendar days in an oldest-first
/// sequence.
pub fn longest_daily_streak(records_ascending: &[CompletionRecord]) -> u32 {
    records_ascending
        .iter()
        .fold(DailyFold::default(), DailyFold::step)
        .best_run
}

/// Accumulator for the longest day-run scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyFold {
    pub current_run: u32,
    pub best_run: u32,
    pub previous_date: Option<NaiveDate>,
}

impl DailyFold {
    /// Applies one record.
    ///
    /// A completed day extends the run only when it directly follows the
    /// previous record's date; otherwise it starts a new run of one.
    pub fn step(self, record: &CompletionRecord) -> Self {
        let current_run = if !record.completed {
            0
        } else if self.follows_previous(record.date) {
            self.current_run.saturating_add(1)
        } else {
            1
        };

        Self {
            current_run,
            best_run: self.best_run.max(current_run),
            previous_date: Some(record.date),
        }
    }

    fn follows_previous(&self, date: NaiveDate) -> bool {
        match self.previous_date {
            None => true,
            Some(previous) => previous.succ_opt() == Some(date),
        }
    }
}
