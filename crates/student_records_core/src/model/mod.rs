//! Student domain model.
//!
//! # Responsibility
//! - Define the canonical student record and its validation errors.
//! - Turn raw string input into typed records through validated constructors.
//!
//! # Invariants
//! - A `Student` built through `try_new*` always has a non-blank,
//!   single-line id and name and a positive age. `Student::new` is the
//!   unvalidated escape hatch for already-typed values.

pub mod student;
