//! Terminal output formatting
//!
//! Diagnostics are colored (respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE);
//! the student table is plain text.

use colored::Colorize;

use crate::domain::Student;

/// Printed instead of a table when there is nothing to show.
pub const EMPTY_LIST_MESSAGE: &str = "Список студентов пуст.";

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print indented cause line (red) to stderr
pub fn cause(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("  {} {}", "caused by:".red(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Render students as a numbered table, or the empty-list message.
///
/// Column widths are 4/30/20/15 characters; longer values widen their row.
pub fn render_table(students: &[Student]) -> String {
    if students.is_empty() {
        return EMPTY_LIST_MESSAGE.to_string();
    }

    let line = format!(
        "+-{}-+-{}-+-{}-+-{}-+",
        "-".repeat(4),
        "-".repeat(30),
        "-".repeat(20),
        "-".repeat(15)
    );
    let mut rows = vec![
        line.clone(),
        format!(
            "| {:^4} | {:^30} | {:^20} | {:^15} |",
            "№", "Ф.И.О.", "Группа", "Успеваемость"
        ),
        line.clone(),
    ];
    for (idx, student) in students.iter().enumerate() {
        rows.push(format!(
            "| {:>4} | {:<30} | {:<20} | {:>15} |",
            idx + 1,
            student.name,
            student.group,
            student.grade
        ));
    }
    rows.push(line);
    rows.join("\n")
}
