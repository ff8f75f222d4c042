//! Per-date completion observation.
//!
//! # Invariants
//! - Ledger dates are calendar dates without time, stored as `YYYY-MM-DD`.
//! - At most one record exists per (habit, date); the ledger owns that rule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage layout of ledger dates.
pub const LEDGER_DATE_FORMAT: &str = "%Y-%m-%d";

/// One (date, completed) observation for a single habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub date: NaiveDate,
    pub completed: bool,
}

impl CompletionRecord {
    pub fn new(date: NaiveDate, completed: bool) -> Self {
        Self { date, completed }
    }

    /// Builds a record from its stored text date.
    pub fn parse(date: &str, completed: bool) -> Result<Self, LedgerDateError> {
        Ok(Self::new(parse_ledger_date(date)?, completed))
    }
}

/// A ledger date string that is not a valid `YYYY-MM-DD` calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerDateError {
    pub value: String,
    source: chrono::ParseError,
}

impl Display for LedgerDateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid ledger date `{}`: {}", self.value, self.source)
    }
}

impl Error for LedgerDateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Parses a `YYYY-MM-DD` ledger date.
pub fn parse_ledger_date(value: &str) -> Result<NaiveDate, LedgerDateError> {
    NaiveDate::parse_from_str(value, LEDGER_DATE_FORMAT).map_err(|source| LedgerDateError {
        value: value.to_string(),
        source,
    })
}

/// Formats a date in ledger storage form.
pub fn format_ledger_date(date: NaiveDate) -> String {
    date.format(LEDGER_DATE_FORMAT).to_string()
}
