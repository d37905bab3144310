//! Student record model.
//!
//! # Responsibility
//! - Define the record persisted by the student store.
//! - Provide validated constructors from raw string input.
//!
//! # Invariants
//! - `id` is the primary key and never changes for a record's lifetime.
//! - Records built through `try_new*` have a positive age and single-line
//!   id and name. `Student::new` and the public fields do not validate.
//! - Validation order is stable: required fields, line breaks, id checksum
//!   (checked constructor only), numeric age, positive age.

use crate::national_id::is_valid_national_id;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// National id string used as the student primary key.
pub type StudentId = String;

/// Input validation and business-rule failures.
///
/// Every variant maps to one stable reason string (see [`Self::reason`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Id, name or age was empty or blank.
    MissingField,
    /// Id failed the national-id checksum or contains a line break.
    InvalidId,
    /// Name contains a line break.
    InvalidName,
    /// Age is not an integer.
    NonNumericAge,
    /// Age is zero or negative.
    NonPositiveAge,
    /// Another record already uses this id.
    DuplicateId(StudentId),
    /// No record exists for this id.
    NotFound(StudentId),
    /// Lookup was attempted with a blank id.
    IdRequired,
}

impl ValidationError {
    /// Stable, human-readable reason for this failure.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingField => "required field missing",
            Self::InvalidId => "invalid id",
            Self::InvalidName => "name must be a single line",
            Self::NonNumericAge => "age must be numeric",
            Self::NonPositiveAge => "age must be positive",
            Self::DuplicateId(_) => "duplicate id",
            Self::NotFound(_) => "not found",
            Self::IdRequired => "id required",
        }
    }

    /// Metadata-safe code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidId => "invalid_id",
            Self::InvalidName => "invalid_name",
            Self::NonNumericAge => "non_numeric_age",
            Self::NonPositiveAge => "non_positive_age",
            Self::DuplicateId(_) => "duplicate_id",
            Self::NotFound(_) => "not_found",
            Self::IdRequired => "id_required",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) | Self::NotFound(id) => write!(f, "{}: {id}", self.reason()),
            other => f.write_str(other.reason()),
        }
    }
}

impl Error for ValidationError {}

/// One persisted student: national id, name and age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// National id, 10 ASCII digits.
    pub id: StudentId,
    /// Free-text full name. A comma breaks the record on reload from the
    /// flat file.
    pub name: String,
    /// Age in years, > 0 for validated records.
    pub age: u32,
}

impl Student {
    /// Builds a record from already-typed values without validation.
    ///
    /// Used by the storage loader and tests; service paths go through
    /// [`Self::try_new`] or [`Self::try_new_checked`].
    pub fn new(id: impl Into<StudentId>, name: impl Into<String>, age: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
        }
    }

    /// Builds a record from raw input, without the id checksum.
    ///
    /// Used for edits, where the id is already owned by a stored record.
    ///
    /// # Errors
    /// - `MissingField` when any input is blank.
    /// - `InvalidId` / `InvalidName` when id or name spans several lines.
    /// - `NonNumericAge` / `NonPositiveAge` for a bad age.
    pub fn try_new(id: &str, name: &str, age: &str) -> Result<Self, ValidationError> {
        let (id, name, age) = require_fields(id, name, age)?;
        let age = parse_age(age)?;
        Ok(Self::new(id, name, age))
    }

    /// Builds a record from raw input, including the national-id checksum.
    ///
    /// # Errors
    /// - `MissingField` when any input is blank.
    /// - `InvalidName` when the name spans several lines.
    /// - `InvalidId` when the id fails the checksum.
    /// - `NonNumericAge` / `NonPositiveAge` for a bad age.
    pub fn try_new_checked(id: &str, name: &str, age: &str) -> Result<Self, ValidationError> {
        let (id, name, age) = require_fields(id, name, age)?;
        if !is_valid_national_id(id) {
            return Err(ValidationError::InvalidId);
        }
        let age = parse_age(age)?;
        Ok(Self::new(id, name, age))
    }
}

fn require_fields<'a>(
    id: &'a str,
    name: &'a str,
    age: &'a str,
) -> Result<(&'a str, &'a str, &'a str), ValidationError> {
    let (id, name, age) = (id.trim(), name.trim(), age.trim());
    if id.is_empty() || name.is_empty() || age.is_empty() {
        return Err(ValidationError::MissingField);
    }
    if contains_line_break(id) {
        return Err(ValidationError::InvalidId);
    }
    if contains_line_break(name) {
        return Err(ValidationError::InvalidName);
    }
    Ok((id, name, age))
}

/// Whether `value` would split into several lines in the flat file.
pub(crate) fn contains_line_break(value: &str) -> bool {
    value.contains(['\n', '\r'])
}

/// Parses a raw age value into a positive integer.
///
/// Values outside the `i32` range count as non-numeric.
pub(crate) fn parse_age(raw: &str) -> Result<u32, ValidationError> {
    let age: i32 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::NonNumericAge)?;
    if age <= 0 {
        return Err(ValidationError::NonPositiveAge);
    }
    u32::try_from(age).map_err(|_| ValidationError::NonPositiveAge)
}
