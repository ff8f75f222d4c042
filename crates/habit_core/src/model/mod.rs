//! Domain model for habits and their per-date completion records.
//!
//! # Responsibility
//! - Define the canonical habit shape shared by storage, services and CLI.
//! - Define the `(date, completed)` observation consumed by the streak engine.
//!
//! # Invariants
//! - Every habit is identified by its normalized, unique name.
//! - Periodicity is a closed enum; unknown cadences cannot be represented.

pub mod completion;
pub mod habit;
