//! Repository layer contracts and flat-file persistence.
//!
//! # Responsibility
//! - Define the student data access contract.
//! - Keep file format details out of service/business orchestration.
//!
//! # Invariants
//! - Repositories never check business rules (uniqueness, checksum).
//! - Write failures are returned to the caller, never swallowed.

pub mod student_repo;
