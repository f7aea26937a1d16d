//! Student store service
//!
//! Loads, mutates and persists the student list. Every operation reads the
//! whole file and, if it writes, rewrites the whole file.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{self, add_student, filter_by_average, Student};
use crate::infrastructure::traits::FileSystem;

/// Service for the file-backed student list.
pub struct StudentService {
    fs: Arc<dyn FileSystem>,
}

impl StudentService {
    /// Create a new student service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Whether a data file exists at `path`.
    pub fn exists(&self, path: &Path) -> bool {
        self.fs.exists(path)
    }

    /// Load all students. A missing file is an empty list.
    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<Student>> {
        if !self.fs.exists(path) {
            debug!("load: {} does not exist", path.display());
            return Ok(Vec::new());
        }
        let bytes = self.fs.read(path).with_path_context("read student file", path)?;
        let students = domain::deserialize(&bytes)?;
        debug!("load: {} students from {}", students.len(), path.display());
        Ok(students)
    }

    /// Replace the file contents with `students`.
    pub fn save(&self, path: &Path, students: &[Student]) -> ApplicationResult<()> {
        let bytes = domain::serialize(students)?;
        self.fs
            .write(path, &bytes)
            .with_path_context("write student file", path)?;
        debug!("save: {} students to {}", students.len(), path.display());
        Ok(())
    }

    /// Append a student, creating the file if needed. Returns the new list.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn add(&self, path: &Path, student: Student) -> ApplicationResult<Vec<Student>> {
        let students = add_student(self.load(path)?, student);
        self.save(path, &students)?;
        Ok(students)
    }

    /// Students whose average grade is at least `threshold`.
    pub fn select(&self, path: &Path, threshold: f64) -> ApplicationResult<Vec<Student>> {
        let students = self.load(path)?;
        let selected = filter_by_average(&students, threshold)?;
        debug!(
            "select: {} of {} students reach {}",
            selected.len(),
            students.len(),
            threshold
        );
        Ok(selected)
    }

    /// Load and write back unchanged. Returns the number of students written.
    pub fn resave(&self, path: &Path) -> ApplicationResult<usize> {
        let students = self.load(path)?;
        self.save(path, &students)?;
        Ok(students.len())
    }
}
