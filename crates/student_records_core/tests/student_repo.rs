use std::fs;
use std::path::Path;
use student_records_core::{FileStudentRepository, RepoError, Student, StudentRepository};
use tempfile::TempDir;

fn store_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("estudiantes.txt")
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn missing_file_opens_as_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileStudentRepository::open(store_path(&dir)).unwrap();

    assert!(repo.list().is_empty());
    assert!(!store_path(&dir).exists());
}

#[test]
fn create_persists_whole_collection_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    let repo = FileStudentRepository::open(&path).unwrap();

    repo.create(&Student::new("1710034065", "Ana Torres", 20)).unwrap();
    repo.create(&Student::new("0102030405", "Luis Paz", 31)).unwrap();

    assert_eq!(
        read_lines(&path),
        vec!["1710034065,Ana Torres,20", "0102030405,Luis Paz,31"]
    );
}

#[test]
fn reopen_roundtrips_saved_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    let students = vec![
        Student::new("1710034065", "Ana Torres", 20),
        Student::new("0102030405", "Luis Paz", 31),
        Student::new("0923456789", "María José Vera", 18),
    ];

    {
        let repo = FileStudentRepository::open(&path).unwrap();
        for student in &students {
            repo.create(student).unwrap();
        }
    }

    let reopened = FileStudentRepository::open(&path).unwrap();
    assert_eq!(reopened.list(), students);
}

#[test]
fn find_by_id_returns_none_for_unknown_id() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileStudentRepository::open(store_path(&dir)).unwrap();
    repo.create(&Student::new("1710034065", "Ana", 20)).unwrap();

    assert_eq!(
        repo.find_by_id("1710034065"),
        Some(Student::new("1710034065", "Ana", 20))
    );
    assert_eq!(repo.find_by_id("0102030405"), None);
}

#[test]
fn update_replaces_only_the_matching_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    let repo = FileStudentRepository::open(&path).unwrap();
    repo.create(&Student::new("1710034065", "Ana", 20)).unwrap();
    repo.create(&Student::new("0102030405", "Luis", 31)).unwrap();
    repo.create(&Student::new("0923456789", "Vera", 18)).unwrap();
    let before = read_lines(&path);

    let replaced = repo
        .update(&Student::new("0102030405", "Luis Alberto", 32))
        .unwrap();
    assert!(replaced);

    let after = read_lines(&path);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], "0102030405,Luis Alberto,32");
    assert_eq!(after[2], before[2]);
}

#[test]
fn update_of_missing_id_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    let repo = FileStudentRepository::open(&path).unwrap();
    repo.create(&Student::new("1710034065", "Ana", 20)).unwrap();

    let replaced = repo.update(&Student::new("0102030405", "Nadie", 40)).unwrap();

    assert!(!replaced);
    assert_eq!(repo.list(), vec![Student::new("1710034065", "Ana", 20)]);
    assert_eq!(read_lines(&path), vec!["1710034065,Ana,20"]);
}

#[test]
fn delete_removes_every_matching_record_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    fs::write(
        &path,
        "1710034065,Ana,20\n0102030405,Luis,31\n1710034065,Ana copia,21\n",
    )
    .unwrap();
    let repo = FileStudentRepository::open(&path).unwrap();

    assert_eq!(repo.delete("1710034065").unwrap(), 2);
    let after_first = repo.list();
    assert_eq!(repo.delete("1710034065").unwrap(), 0);

    assert_eq!(repo.list(), after_first);
    assert_eq!(read_lines(&path), vec!["0102030405,Luis,31"]);
}

#[test]
fn list_returns_a_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileStudentRepository::open(store_path(&dir)).unwrap();
    repo.create(&Student::new("1710034065", "Ana", 20)).unwrap();

    let mut snapshot = repo.list();
    snapshot[0].name = "Mutated".to_string();
    snapshot.clear();

    assert_eq!(repo.list(), vec![Student::new("1710034065", "Ana", 20)]);
}

#[test]
fn malformed_lines_are_skipped_and_loading_continues() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    fs::write(
        &path,
        "1710034065,Ana,20\n\
         0102030405,Luis,treinta\n\
         only,two\n\
         \n\
         0923456789,Torres, Vera,18\n\
         0240000016,Marta,45\n",
    )
    .unwrap();

    let repo = FileStudentRepository::open(&path).unwrap();

    assert_eq!(
        repo.list(),
        vec![
            Student::new("1710034065", "Ana", 20),
            Student::new("0240000016", "Marta", 45),
        ]
    );
}

#[test]
fn non_utf8_lines_are_skipped_and_loading_continues() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    fs::write(
        &path,
        b"1710034065,Ana,20\n0102030400,Mar\xEDa,31\r\n0240000016,Marta,45\r\n".as_slice(),
    )
    .unwrap();

    let repo = FileStudentRepository::open(&path).unwrap();

    assert_eq!(
        repo.list(),
        vec![
            Student::new("1710034065", "Ana", 20),
            Student::new("0240000016", "Marta", 45),
        ]
    );
}

#[test]
fn record_with_line_break_is_never_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    let repo = FileStudentRepository::open(&path).unwrap();
    repo.create(&Student::new("1710034065", "Ana", 20)).unwrap();

    let err = repo
        .create(&Student::new("0102030400", "Luis\n9999999999,Bogus", 31))
        .unwrap_err();
    assert!(matches!(err, RepoError::UnencodableRecord { field: "name" }));

    let err = repo
        .update(&Student::new("1710034065", "Ana\rOtra", 20))
        .unwrap_err();
    assert!(matches!(err, RepoError::UnencodableRecord { field: "name" }));

    assert_eq!(repo.list(), vec![Student::new("1710034065", "Ana", 20)]);
    assert_eq!(read_lines(&path), vec!["1710034065,Ana,20"]);
}

#[test]
fn create_if_absent_refuses_existing_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    let repo = FileStudentRepository::open(&path).unwrap();

    assert!(repo
        .create_if_absent(&Student::new("1710034065", "Ana", 20))
        .unwrap());
    assert!(!repo
        .create_if_absent(&Student::new("1710034065", "Otra", 30))
        .unwrap());

    assert_eq!(repo.list(), vec![Student::new("1710034065", "Ana", 20)]);
    assert_eq!(read_lines(&path), vec!["1710034065,Ana,20"]);
}

#[test]
fn reload_picks_up_external_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    let repo = FileStudentRepository::open(&path).unwrap();
    repo.create(&Student::new("1710034065", "Ana", 20)).unwrap();

    fs::write(&path, "0102030405,Luis,31\n0923456789,Vera,18\n").unwrap();

    assert_eq!(repo.reload().unwrap(), 2);
    assert_eq!(repo.find_by_id("1710034065"), None);
    assert!(repo.find_by_id("0923456789").is_some());
}

#[test]
fn unreadable_store_path_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();

    let result = FileStudentRepository::open(dir.path());

    assert!(matches!(result, Err(RepoError::Io { .. })));
}

#[test]
fn failed_write_is_reported_and_memory_is_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-subdir").join("estudiantes.txt");
    let repo = FileStudentRepository::open(&path).unwrap();

    let err = repo
        .create(&Student::new("1710034065", "Ana", 20))
        .unwrap_err();

    assert!(matches!(err, RepoError::Io { .. }));
    assert!(repo.list().is_empty());
}

#[test]
fn arc_handles_share_one_store() {
    let dir = tempfile::tempdir().unwrap();
    let repo = std::sync::Arc::new(FileStudentRepository::open(store_path(&dir)).unwrap());
    let other = std::sync::Arc::clone(&repo);

    StudentRepository::create(&repo, &Student::new("1710034065", "Ana", 20)).unwrap();

    assert_eq!(StudentRepository::list(&other).len(), 1);
}
