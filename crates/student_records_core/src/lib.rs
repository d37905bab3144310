//! Core domain logic for student record management.
//! This crate is the single source of truth for record validation and storage.

pub mod config;
pub mod logging;
pub mod model;
pub mod national_id;
pub mod repo;
pub mod service;

pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::student::{Student, StudentId, ValidationError};
pub use national_id::{check_digit, is_valid_national_id};
pub use repo::student_repo::{FileStudentRepository, RepoError, RepoResult, StudentRepository};
pub use service::student_service::{ServiceError, ServiceResult, StudentService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
