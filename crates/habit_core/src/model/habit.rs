//! Habit domain model.
//!
//! # Responsibility
//! - Define the habit record and its cadence.
//! - Normalize and validate user-supplied names and descriptions.
//!
//! # Invariants
//! - `name` is trimmed, lower-cased, 1..=30 chars of letters and digits
//!   (any script) in words separated by spaces.
//! - `description` follows the same character rules with 1..=45 chars.
//! - `created_at` carries minute precision only.

use chrono::{NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum habit name length in characters.
pub const HABIT_NAME_MAX_CHARS: usize = 30;
/// Maximum habit description length in characters.
pub const HABIT_DESCRIPTION_MAX_CHARS: usize = 45;
/// Persisted creation timestamp layout.
pub const HABIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

static HABIT_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N}]+(?: +[\p{L}\p{N}]+)*$").expect("valid habit text regex"));

/// Cadence at which a habit is expected to be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Periodicity {
    /// Every calendar day.
    Daily,
    /// Every calendar week, Monday through Sunday.
    Weekly,
}

impl Periodicity {
    /// Stable lowercase wire/storage form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    /// Parses the storage form; returns `None` for unknown cadences.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            _ => None,
        }
    }
}

impl Display for Periodicity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Validation failures for habit input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitValidationError {
    /// Name is empty or longer than [`HABIT_NAME_MAX_CHARS`].
    NameLength { length: usize },
    /// Name contains characters other than letters, digits and spaces.
    NameCharacters(String),
    /// Description is empty or longer than [`HABIT_DESCRIPTION_MAX_CHARS`].
    DescriptionLength { length: usize },
    /// Description contains characters other than letters, digits and spaces.
    DescriptionCharacters(String),
}

impl Display for HabitValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameLength { length } => write!(
                f,
                "habit name must be 1..={HABIT_NAME_MAX_CHARS} characters, got {length}"
            ),
            Self::NameCharacters(value) => write!(
                f,
                "habit name `{value}` may only contain letters, digits and spaces"
            ),
            Self::DescriptionLength { length } => write!(
                f,
                "habit description must be 1..={HABIT_DESCRIPTION_MAX_CHARS} characters, got {length}"
            ),
            Self::DescriptionCharacters(value) => write!(
                f,
                "habit description `{value}` may only contain letters, digits and spaces"
            ),
        }
    }
}

impl Error for HabitValidationError {}

/// A user-defined recurring action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique lookup key.
    pub name: String,
    pub description: String,
    pub periodicity: Periodicity,
    /// Local wall-clock creation time, truncated to the minute.
    pub created_at: NaiveDateTime,
}

impl Habit {
    /// Builds a validated habit from raw user input.
    ///
    /// Name and description are trimmed and lower-cased before validation.
    pub fn new(
        name: &str,
        description: &str,
        periodicity: Periodicity,
        created_at: NaiveDateTime,
    ) -> Result<Self, HabitValidationError> {
        let habit = Self {
            name: normalize_habit_name(name)?,
            description: normalize_text(description),
            periodicity,
            created_at: truncate_to_minute(created_at),
        };
        habit.validate()?;
        Ok(habit)
    }

    /// Re-checks field invariants, e.g. for rows read back from storage.
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        validate_name(&self.name)?;

        let length = self.description.chars().count();
        if length == 0 || length > HABIT_DESCRIPTION_MAX_CHARS {
            return Err(HabitValidationError::DescriptionLength { length });
        }
        if !HABIT_TEXT_RE.is_match(&self.description) {
            return Err(HabitValidationError::DescriptionCharacters(
                self.description.clone(),
            ));
        }
        Ok(())
    }

    /// Creation timestamp in its persisted `YYYY-MM-DD HH:MM` form.
    pub fn created_at_text(&self) -> String {
        self.created_at.format(HABIT_TIMESTAMP_FORMAT).to_string()
    }
}

/// Normalizes a habit name lookup key the same way [`Habit::new`] does.
pub fn normalize_habit_name(name: &str) -> Result<String, HabitValidationError> {
    let normalized = normalize_text(name);
    validate_name(&normalized)?;
    Ok(normalized)
}

fn validate_name(name: &str) -> Result<(), HabitValidationError> {
    let length = name.chars().count();
    if length == 0 || length > HABIT_NAME_MAX_CHARS {
        return Err(HabitValidationError::NameLength { length });
    }
    if !HABIT_TEXT_RE.is_match(name) {
        return Err(HabitValidationError::NameCharacters(name.to_string()));
    }
    Ok(())
}

fn normalize_text(value: &str) -> String {
    value.trim().to_lowercase()
}

fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|value| value.with_nanosecond(0))
        .unwrap_or(value)
}
