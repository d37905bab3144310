//! Student repository contract and flat-file implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the in-memory student collection.
//! - Mirror the full collection to a line-oriented text file after every
//!   mutation and reload it at startup.
//!
//! # Invariants
//! - File format is one `id,name,age` line per record, in collection order.
//! - Memory only changes after the file rewrite succeeded, so a failed write
//!   leaves memory equal to the last persisted state.
//! - `list` returns a snapshot; callers cannot mutate stored records.
//! - Malformed lines (wrong field count, bad age, invalid UTF-8) are
//!   skipped with a warning; loading continues.
//! - A record whose id or name contains a line break is never written.

use crate::model::student::{contains_line_break, parse_age, Student};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

const FIELD_SEPARATOR: char = ',';
const FIELD_COUNT: usize = 3;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage failure for student persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Backing file could not be read or written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Record cannot be encoded as a single line.
    UnencodableRecord { field: &'static str },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "student store I/O failed at `{}`: {source}", path.display())
            }
            Self::UnencodableRecord { field } => {
                write!(f, "student record field `{field}` contains a line break")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::UnencodableRecord { .. } => None,
        }
    }
}

/// Repository interface for student CRUD operations.
///
/// Implementations handle their own synchronization, so every method takes
/// `&self`.
pub trait StudentRepository {
    /// Appends a record. Does not check for duplicate ids.
    fn create(&self, student: &Student) -> RepoResult<()>;
    /// Appends a record unless its id is already stored.
    ///
    /// The lookup and the append happen under one lock. Returns `Ok(false)`
    /// and leaves storage untouched when the id exists.
    fn create_if_absent(&self, student: &Student) -> RepoResult<bool>;
    /// Returns the first record with `id`, or `None`.
    fn find_by_id(&self, id: &str) -> Option<Student>;
    /// Replaces the record with the same id.
    ///
    /// A missing id is a no-op that returns `Ok(false)` and leaves storage
    /// untouched.
    fn update(&self, student: &Student) -> RepoResult<bool>;
    /// Removes every record with `id` and returns how many were removed.
    fn delete(&self, id: &str) -> RepoResult<usize>;
    /// Snapshot of all records in insertion order.
    fn list(&self) -> Vec<Student>;
}

impl<R: StudentRepository + ?Sized> StudentRepository for Arc<R> {
    fn create(&self, student: &Student) -> RepoResult<()> {
        (**self).create(student)
    }

    fn create_if_absent(&self, student: &Student) -> RepoResult<bool> {
        (**self).create_if_absent(student)
    }

    fn find_by_id(&self, id: &str) -> Option<Student> {
        (**self).find_by_id(id)
    }

    fn update(&self, student: &Student) -> RepoResult<bool> {
        (**self).update(student)
    }

    fn delete(&self, id: &str) -> RepoResult<usize> {
        (**self).delete(id)
    }

    fn list(&self) -> Vec<Student> {
        (**self).list()
    }
}

/// Student repository backed by a single flat text file.
pub struct FileStudentRepository {
    path: PathBuf,
    students: Mutex<Vec<Student>>,
}

impl FileStudentRepository {
    /// Opens the store at `path`, loading any existing records.
    ///
    /// A missing file is an empty store; the file is created on first write.
    ///
    /// # Errors
    /// - `RepoError::Io` when the file exists but cannot be read. Starting
    ///   empty here would erase the file on the next write.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        let path = path.as_ref().to_path_buf();
        let students = load_students(&path)?;
        Ok(Self {
            path,
            students: Mutex::new(students),
        })
    }

    /// Backing file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the backing file, replacing the in-memory collection.
    ///
    /// Returns the number of records loaded.
    pub fn reload(&self) -> RepoResult<usize> {
        let mut guard = self.lock();
        let students = load_students(&self.path)?;
        *guard = students;
        Ok(guard.len())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Student>> {
        // Committed state is always a successfully written one.
        self.students.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn commit(
        &self,
        guard: &mut MutexGuard<'_, Vec<Student>>,
        next: Vec<Student>,
    ) -> RepoResult<()> {
        save_students(&self.path, &next)?;
        **guard = next;
        Ok(())
    }
}

impl StudentRepository for FileStudentRepository {
    fn create(&self, student: &Student) -> RepoResult<()> {
        let mut guard = self.lock();
        let mut next = guard.clone();
        next.push(student.clone());
        self.commit(&mut guard, next)
    }

    fn create_if_absent(&self, student: &Student) -> RepoResult<bool> {
        let mut guard = self.lock();
        if guard.iter().any(|item| item.id == student.id) {
            return Ok(false);
        }

        let mut next = guard.clone();
        next.push(student.clone());
        self.commit(&mut guard, next)?;
        Ok(true)
    }

    fn find_by_id(&self, id: &str) -> Option<Student> {
        self.lock()
            .iter()
            .find(|student| student.id == id)
            .cloned()
    }

    fn update(&self, student: &Student) -> RepoResult<bool> {
        let mut guard = self.lock();
        let Some(index) = guard.iter().position(|item| item.id == student.id) else {
            debug!("event=store_update module=repo status=skipped reason=not_found");
            return Ok(false);
        };

        let mut next = guard.clone();
        next[index] = student.clone();
        self.commit(&mut guard, next)?;
        Ok(true)
    }

    fn delete(&self, id: &str) -> RepoResult<usize> {
        let mut guard = self.lock();
        let next: Vec<Student> = guard
            .iter()
            .filter(|student| student.id != id)
            .cloned()
            .collect();
        let removed = guard.len() - next.len();
        if removed == 0 {
            return Ok(0);
        }

        self.commit(&mut guard, next)?;
        Ok(removed)
    }

    fn list(&self) -> Vec<Student> {
        self.lock().clone()
    }
}

fn load_students(path: &Path) -> RepoResult<Vec<Student>> {
    let started_at = Instant::now();
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!("event=store_load module=repo status=ok records=0 reason=file_missing");
            return Ok(Vec::new());
        }
        Err(err) => {
            error!(
                "event=store_load module=repo status=error error_code=read_failed error={}",
                err
            );
            return Err(RepoError::Io {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };

    let mut students = Vec::new();
    for (index, raw_line) in content.split(|byte| *byte == b'\n').enumerate() {
        let raw_line = raw_line.strip_suffix(b"\r").unwrap_or(raw_line);
        let decoded = std::str::from_utf8(raw_line)
            .map_err(|_| "invalid_utf8")
            .and_then(|line| {
                if line.trim().is_empty() {
                    Ok(None)
                } else {
                    decode_line(line).map(Some)
                }
            });
        match decoded {
            Ok(Some(student)) => students.push(student),
            Ok(None) => {}
            Err(reason) => warn!(
                "event=store_load module=repo status=skipped line={} reason={}",
                index + 1,
                reason
            ),
        }
    }

    info!(
        "event=store_load module=repo status=ok records={} duration_ms={}",
        students.len(),
        started_at.elapsed().as_millis()
    );
    Ok(students)
}

fn save_students(path: &Path, students: &[Student]) -> RepoResult<()> {
    for student in students {
        let field = if contains_line_break(&student.id) {
            "id"
        } else if contains_line_break(&student.name) {
            "name"
        } else {
            continue;
        };
        error!(
            "event=store_save module=repo status=error error_code=unencodable_record field={}",
            field
        );
        return Err(RepoError::UnencodableRecord { field });
    }

    let content: String = students.iter().map(encode_line).collect();
    fs::write(path, content).map_err(|err| {
        error!(
            "event=store_save module=repo status=error error_code=write_failed error={}",
            err
        );
        RepoError::Io {
            path: path.to_path_buf(),
            source: err,
        }
    })?;

    debug!(
        "event=store_save module=repo status=ok records={}",
        students.len()
    );
    Ok(())
}

fn encode_line(student: &Student) -> String {
    format!(
        "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}\n",
        student.id, student.name, student.age
    )
}

fn decode_line(line: &str) -> Result<Student, &'static str> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err("field_count");
    }

    let age = parse_age(fields[2]).map_err(|_| "invalid_age")?;
    Ok(Student::new(fields[0], fields[1], age))
}
