//! Tests for StudentService

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use students::application::services::StudentService;
use students::application::ApplicationError;
use students::domain::{DomainError, Student};
use students::infrastructure::traits::RealFileSystem;

fn service() -> StudentService {
    StudentService::new(Arc::new(RealFileSystem))
}

fn data_path(dir: &TempDir) -> PathBuf {
    dir.path().join("students.xml")
}

#[test]
fn given_missing_file_when_loading_then_returns_empty() {
    let temp = TempDir::new().unwrap();
    let students = service().load(&data_path(&temp)).unwrap();
    assert!(students.is_empty());
}

#[test]
fn given_missing_file_when_adding_then_creates_file_with_student() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = data_path(&temp);
    let student = Student::new("Иванов И.И.", 101, "5 4 5");

    // Act
    let result = service().add(&path, student.clone()).unwrap();

    // Assert
    assert_eq!(result, vec![student.clone()]);
    assert!(path.exists());
    assert_eq!(service().load(&path).unwrap(), vec![student]);
}

#[test]
fn given_existing_students_when_adding_then_last_loaded_equals_added() {
    let temp = TempDir::new().unwrap();
    let path = data_path(&temp);
    let svc = service();
    svc.add(&path, Student::new("First", 1, "3")).unwrap();
    svc.add(&path, Student::new("Second", 2, "4")).unwrap();

    let added = Student::new("Third", 3, "5 5");
    svc.add(&path, added.clone()).unwrap();

    let loaded = svc.load(&path).unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded.last(), Some(&added));
    assert_eq!(loaded[0].name, "First");
}

#[test]
fn given_saved_file_when_resaving_twice_then_bytes_identical() {
    let temp = TempDir::new().unwrap();
    let path = data_path(&temp);
    let svc = service();
    svc.add(&path, Student::new("A & B", 1, "5 5 3")).unwrap();
    svc.add(&path, Student::new("C", 2, "")).unwrap();

    svc.resave(&path).unwrap();
    let first = std::fs::read(&path).unwrap();
    let count = svc.resave(&path).unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(count, 2);
    assert_eq!(first, second);
}

#[test]
fn given_python_written_file_when_loading_then_reads_records() {
    // Layout produced by the original tool: no indentation, single-quoted declaration
    let temp = TempDir::new().unwrap();
    let path = data_path(&temp);
    std::fs::write(
        &path,
        "<?xml version='1.0' encoding='utf-8'?>\n<students><student><name>Петров</name><group>202</group><grade>4 4 5</grade></student></students>",
    )
    .unwrap();

    let students = service().load(&path).unwrap();

    assert_eq!(students, vec![Student::new("Петров", 202, "4 4 5")]);
}

#[test]
fn given_mixed_grades_when_selecting_then_returns_high_averages_only() {
    let temp = TempDir::new().unwrap();
    let path = data_path(&temp);
    let svc = service();
    svc.add(&path, Student::new("Good", 1, "5 5 3")).unwrap();
    svc.add(&path, Student::new("Weak", 1, "3 3 3")).unwrap();
    svc.add(&path, Student::new("Empty", 1, "")).unwrap();

    let selected = svc.select(&path, 4.0).unwrap();

    assert_eq!(selected, vec![Student::new("Good", 1, "5 5 3")]);
}

#[test]
fn given_bad_grade_token_when_selecting_then_invalid_integer() {
    let temp = TempDir::new().unwrap();
    let path = data_path(&temp);
    service().add(&path, Student::new("Bad", 1, "5 five")).unwrap();

    let err = service().select(&path, 4.0).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidInteger { field: "grade", .. })
    ));
}

#[test]
fn given_malformed_file_when_loading_then_malformed_document() {
    let temp = TempDir::new().unwrap();
    let path = data_path(&temp);
    std::fs::write(&path, "<students><student>").unwrap();

    let err = service().load(&path).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::MalformedDocument(_))
    ));
}

#[test]
fn given_parent_is_a_file_when_saving_then_operation_failed() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let path = blocker.join("students.xml");

    let err = service()
        .save(&path, &[Student::new("A", 1, "5")])
        .unwrap_err();

    match err {
        ApplicationError::OperationFailed { context, .. } => {
            assert!(context.contains("write student file"), "{context}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn given_grades_summing_past_i64_when_selecting_then_selects_without_error() {
    let temp = TempDir::new().unwrap();
    let path = data_path(&temp);
    let big = Student::new("Big", 1, "9223372036854775807 1");
    service().add(&path, big.clone()).unwrap();

    let selected = service().select(&path, 4.0).unwrap();

    assert_eq!(selected, vec![big]);
}

#[cfg(unix)]
#[test]
fn given_symlinked_data_file_when_adding_twice_then_target_holds_both() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("real.xml");
    let link = temp.path().join("link.xml");
    let svc = service();
    svc.save(&target, &[]).unwrap();
    std::os::unix::fs::symlink(&target, &link).unwrap();

    // Act
    svc.add(&link, Student::new("One", 1, "5")).unwrap();
    svc.add(&link, Student::new("Two", 2, "4")).unwrap();

    // Assert
    assert_eq!(svc.load(&target).unwrap().len(), 2);
    assert!(std::fs::symlink_metadata(&link)
        .unwrap()
        .file_type()
        .is_symlink());
}
