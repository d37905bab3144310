//! Student use-case service.
//!
//! # Responsibility
//! - Provide save/edit/delete/search/list entry points over raw string input.
//! - Delegate persistence to a `StudentRepository` implementation.
//!
//! # Invariants
//! - Invalid or duplicate input never reaches the repository.
//! - Mutating operations are serialized per service instance, so the
//!   lookup -> mutate -> rewrite sequence cannot interleave.
//! - Uniqueness is enforced by `create_if_absent`, which checks and inserts
//!   under the repository lock, so callers sharing the repository directly
//!   cannot slip a duplicate in either.
//! - Missing ids on edit/delete are reported as `NotFound`.

use crate::model::student::{Student, ValidationError};
use crate::repo::student_repo::{RepoError, StudentRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for student use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input or business-rule rejection.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Storage(RepoError),
}

impl ServiceError {
    /// Returns the validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(_) => None,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Validating facade over a student repository.
///
/// Pass an `Arc<R>` to share one repository between several owners.
pub struct StudentService<R: StudentRepository> {
    repo: R,
    write_lock: Mutex<()>,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            write_lock: Mutex::new(()),
        }
    }

    /// Validates and stores a new student.
    ///
    /// # Contract
    /// - Checks, in order: required fields, single-line id and name, id
    ///   checksum, numeric age, positive age, id uniqueness.
    /// - Returns the stored record.
    pub fn save_student(&self, id: &str, name: &str, age: &str) -> ServiceResult<Student> {
        let student = Student::try_new_checked(id, name, age).map_err(|err| reject("save", err))?;

        let _guard = self.write_guard();
        if !self.repo.create_if_absent(&student)? {
            return Err(reject("save", ValidationError::DuplicateId(student.id)));
        }

        info!("event=student_save module=service status=ok");
        Ok(student)
    }

    /// Validates and replaces an existing student's name and age.
    ///
    /// # Contract
    /// - Skips the id checksum and uniqueness checks; the id must already
    ///   belong to a stored record.
    /// - Returns the stored record.
    pub fn edit_student(&self, id: &str, name: &str, age: &str) -> ServiceResult<Student> {
        let student = Student::try_new(id, name, age).map_err(|err| reject("edit", err))?;

        let _guard = self.write_guard();
        if !self.repo.update(&student)? {
            return Err(reject("edit", ValidationError::NotFound(student.id)));
        }

        info!("event=student_edit module=service status=ok");
        Ok(student)
    }

    /// Removes the student with `id`.
    ///
    /// Deleting an id that is not stored fails with `NotFound` and leaves
    /// storage untouched, so repeated deletes are idempotent.
    pub fn delete_student(&self, id: &str) -> ServiceResult<()> {
        let id = id.trim();

        let _guard = self.write_guard();
        let removed = self.repo.delete(id)?;
        if removed == 0 {
            return Err(reject("delete", ValidationError::NotFound(id.to_string())));
        }

        info!(
            "event=student_delete module=service status=ok removed={}",
            removed
        );
        Ok(())
    }

    /// Looks up one student by id.
    ///
    /// An unknown id is `Ok(None)`, not an error.
    pub fn search_student(&self, id: &str) -> ServiceResult<Option<Student>> {
        let id = id.trim();
        if id.is_empty() {
            return Err(reject("search", ValidationError::IdRequired));
        }
        Ok(self.repo.find_by_id(id))
    }

    /// Snapshot of every stored student.
    pub fn list_students(&self) -> Vec<Student> {
        self.repo.list()
    }

    fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn reject(operation: &str, err: ValidationError) -> ServiceError {
    warn!(
        "event=student_{} module=service status=rejected error_code={}",
        operation,
        err.code()
    );
    ServiceError::Validation(err)
}
