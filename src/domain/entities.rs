//! Domain entities: core data structures

use crate::domain::error::{DomainError, DomainResult};

/// Average a student needs to be picked by `select` unless configured otherwise.
pub const DEFAULT_MIN_AVERAGE: f64 = 4.0;

/// One student's record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    /// Full name, free text
    pub name: String,
    /// Group number
    pub group: i64,
    /// Space-separated integer scores, e.g. "5 4 5"
    pub grade: String,
}

impl Student {
    pub fn new(name: impl Into<String>, group: i64, grade: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group,
            grade: grade.into(),
        }
    }

    /// Parse the grade string into its integer scores.
    ///
    /// Whitespace of any kind separates tokens; an empty grade yields no scores.
    /// Scores are 128-bit so any value outside `i64` still parses.
    pub fn scores(&self) -> DomainResult<Vec<i128>> {
        self.grade
            .split_whitespace()
            .map(|token| {
                token.parse::<i128>().map_err(|_| DomainError::InvalidInteger {
                    field: "grade",
                    value: token.to_string(),
                })
            })
            .collect()
    }

    /// Arithmetic mean of the scores. An empty grade averages to 0.
    pub fn average(&self) -> DomainResult<f64> {
        let scores = self.scores()?;
        let sum = scores
            .iter()
            .try_fold(0i128, |acc, score| acc.checked_add(*score))
            .ok_or_else(|| DomainError::GradeOverflow(self.grade.clone()))?;
        Ok(sum as f64 / scores.len().max(1) as f64)
    }
}

/// Append a student to the sequence. Duplicates are allowed.
pub fn add_student(mut students: Vec<Student>, student: Student) -> Vec<Student> {
    students.push(student);
    students
}

/// Students whose average is at least `threshold`, in their original order.
///
/// One unparsable grade aborts the whole filter.
pub fn filter_by_average(students: &[Student], threshold: f64) -> DomainResult<Vec<Student>> {
    let mut selected = Vec::new();
    for student in students {
        if student.average()? >= threshold {
            selected.push(student.clone());
        }
    }
    Ok(selected)
}

/// Parse an integer field value, tolerating surrounding whitespace.
pub fn parse_integer(field: &'static str, value: &str) -> DomainResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| DomainError::InvalidInteger {
            field,
            value: value.to_string(),
        })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
/// Falls back to the input unchanged if expansion fails.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("5 5 3", true)]
    #[case("3 3 3", false)]
    #[case("4", true)]
    #[case("4 3", false)]
    #[case("", false)]
    fn given_grade_when_filtering_at_default_threshold_then_selects_expected(
        #[case] grade: &str,
        #[case] selected: bool,
    ) {
        let students = vec![Student::new("Ivanov", 101, grade)];
        let result = filter_by_average(&students, DEFAULT_MIN_AVERAGE).unwrap();
        assert_eq!(result.len() == 1, selected, "grade {:?}", grade);
    }

    #[test]
    fn given_empty_grade_when_averaging_then_returns_zero() {
        let student = Student::new("Petrov", 102, "");
        assert_eq!(student.average().unwrap(), 0.0);
    }

    #[test]
    fn given_mixed_grades_when_averaging_then_returns_mean() {
        let student = Student::new("Petrov", 102, "5 5 3");
        let avg = student.average().unwrap();
        assert!((avg - 13.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn given_non_numeric_token_when_filtering_then_fails() {
        let students = vec![
            Student::new("Ok", 1, "5 5"),
            Student::new("Broken", 1, "5 x"),
        ];
        let err = filter_by_average(&students, DEFAULT_MIN_AVERAGE).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidInteger {
                field: "grade",
                value: "x".to_string()
            }
        );
    }

    #[test]
    fn given_students_when_filtering_then_preserves_order() {
        let students = vec![
            Student::new("A", 1, "5"),
            Student::new("B", 1, "2"),
            Student::new("C", 1, "4 5"),
        ];
        let names: Vec<_> = filter_by_average(&students, 4.0)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn given_duplicate_student_when_adding_then_appends_both() {
        let first = Student::new("Same", 7, "5");
        let students = add_student(vec![first.clone()], first.clone());
        assert_eq!(students, vec![first.clone(), first]);
    }

    #[test]
    fn given_grades_summing_past_i64_when_averaging_then_returns_mean() {
        let student = Student::new("Big", 1, "9223372036854775807 1");
        let avg = student.average().unwrap();
        assert!((avg - 4_611_686_018_427_387_904.0).abs() < 1e3, "{avg}");
    }

    #[test]
    fn given_score_beyond_i64_when_filtering_then_selected() {
        let students = vec![Student::new("Huge", 1, "99999999999999999999")];
        let selected = filter_by_average(&students, DEFAULT_MIN_AVERAGE).unwrap();
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn given_grades_summing_past_i128_when_averaging_then_overflow_error() {
        let max = i128::MAX.to_string();
        let student = Student::new("Huger", 1, format!("{max} {max}"));
        assert!(matches!(
            student.average().unwrap_err(),
            DomainError::GradeOverflow(_)
        ));
    }

    #[test]
    fn given_padded_integer_when_parsing_then_trims() {
        assert_eq!(parse_integer("group", " 42 ").unwrap(), 42);
        assert_eq!(parse_integer("group", "-3").unwrap(), -3);
        assert!(parse_integer("group", "4.5").is_err());
    }
}
