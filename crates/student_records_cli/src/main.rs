//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire config, logging, repository and service the way an embedding
//!   application would.
//! - Print the current roster to verify the backing file loads.
//!
//! Takes no arguments; see `StoreConfig::from_env` for overrides.

use std::process::ExitCode;
use std::sync::Arc;
use student_records_core::{
    core_version, init_logging, FileStudentRepository, StoreConfig, StudentService,
};

fn main() -> ExitCode {
    let config = StoreConfig::from_env();

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let repo = match FileStudentRepository::open(&config.data_file) {
        Ok(repo) => Arc::new(repo),
        Err(err) => {
            eprintln!("failed to open student store: {err}");
            return ExitCode::FAILURE;
        }
    };
    let service = StudentService::new(Arc::clone(&repo));

    let students = service.list_students();
    println!("student_records_core version={}", core_version());
    println!(
        "store={} records={}",
        repo.path().display(),
        students.len()
    );
    for student in students {
        println!("{}\t{}\t{}", student.id, student.name, student.age);
    }
    log::info!("event=cli_list module=cli status=ok");

    ExitCode::SUCCESS
}
