//! Core use-case services.
//!
//! # Responsibility
//! - Validate raw caller input before it becomes a typed record.
//! - Enforce rules spanning multiple records (id uniqueness, existence).
//! - Keep callers decoupled from storage details.

pub mod student_service;
