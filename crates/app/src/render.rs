//! Plain-text views of the course for the terminal.

use std::fmt::Write as _;

use course_core::model::{Lesson, LessonId, Level, ProgressSummary};
use course_core::{Curriculum, NavigationCursor};
use services::ProgressStore;

const BAR_WIDTH: usize = 20;

pub fn progress_line(summary: &ProgressSummary) -> String {
    let filled = (summary.percentage.min(100) as usize * BAR_WIDTH) / 100;
    format!(
        "[{}{}] {:>3}%  {}/{} lessons completed",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        summary.percentage,
        summary.completed,
        summary.total
    )
}

/// Level and lesson tree with completion marks and the current lesson highlighted.
pub fn outline(
    curriculum: &Curriculum,
    progress: &ProgressStore,
    current: Option<&LessonId>,
) -> String {
    let mut out = String::new();
    for level in curriculum.levels() {
        let _ = writeln!(out, "{}  ({})", level.title(), level.id());
        if !level.description().is_empty() {
            let _ = writeln!(out, "  {}", level.description());
        }
        for lesson in level.lessons() {
            let mark = if progress.is_complete(lesson.id()) { "x" } else { " " };
            let pointer = if current == Some(lesson.id()) { ">" } else { " " };
            let _ = writeln!(
                out,
                "{pointer} [{mark}] {:<28} {}",
                lesson.id(),
                lesson.title()
            );
        }
        out.push('\n');
    }
    out.push_str(&progress_line(&progress.get_progress()));
    out.push('\n');
    out
}

pub fn lesson(lesson: &Lesson, level: Option<&Level>, complete: bool) -> String {
    let mut out = String::new();
    if let Some(level) = level {
        let _ = writeln!(out, "{}", level.title());
    }
    let status = if complete { "completed" } else { "not completed" };
    let _ = writeln!(out, "# {}  [{status}]", lesson.title());
    let _ = writeln!(out, "{}", lesson.description());
    out.push('\n');
    let _ = writeln!(out, "{}", lesson.content());
    if !lesson.concepts().is_empty() {
        out.push('\n');
        for concept in lesson.concepts() {
            let _ = writeln!(out, "  * {concept}");
        }
    }
    if let Some(code) = lesson.code_example() {
        out.push('\n');
        for line in code.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }
    out
}

/// The lesson under the cursor plus its position and stepping hints.
pub fn current(cursor: &NavigationCursor, progress: &ProgressStore) -> String {
    let Some(current) = cursor.current_lesson() else {
        return format!("lesson `{}` not found\n", cursor.current_id());
    };
    let mut out = lesson(
        current,
        cursor.current_level(),
        progress.is_complete(current.id()),
    );
    out.push('\n');
    if let Some(idx) = cursor.position() {
        let _ = write!(out, "lesson {} of {}", idx + 1, cursor.len());
    }
    if cursor.has_previous() {
        out.push_str("  |  prev");
    }
    if cursor.has_next() {
        out.push_str("  |  next");
    }
    out.push('\n');
    out
}
