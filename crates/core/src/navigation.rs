use std::sync::Arc;

use crate::curriculum::Curriculum;
use crate::model::{Lesson, LessonId, Level};

/// Pointer to the lesson currently on screen.
///
/// Position and the next/previous affordances are derived from the flattened
/// curriculum on every query; the only state is the current lesson id.
#[derive(Debug, Clone)]
pub struct NavigationCursor {
    curriculum: Arc<Curriculum>,
    current: LessonId,
}

impl NavigationCursor {
    /// Creates a cursor on the first lesson of the curriculum.
    #[must_use]
    pub fn new(curriculum: Arc<Curriculum>) -> Self {
        // `Curriculum::new` rejects curricula without lessons.
        let current = curriculum
            .first_lesson()
            .map(|lesson| lesson.id().clone())
            .unwrap_or_else(|| LessonId::new(""));
        Self {
            curriculum,
            current,
        }
    }

    #[must_use]
    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    #[must_use]
    pub fn current_id(&self) -> &LessonId {
        &self.current
    }

    /// The selected lesson, or `None` if the cursor points at an unknown id.
    #[must_use]
    pub fn current_lesson(&self) -> Option<&Lesson> {
        self.curriculum.find_lesson(&self.current)
    }

    #[must_use]
    pub fn current_level(&self) -> Option<&Level> {
        self.curriculum.level_of(&self.current)
    }

    /// Index of the current lesson in the flattened curriculum.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.curriculum
            .lessons()
            .position(|lesson| lesson.id() == &self.current)
    }

    /// Number of lessons the cursor can walk through.
    #[must_use]
    pub fn len(&self) -> usize {
        self.curriculum.lesson_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.position().is_some_and(|idx| idx + 1 < self.len())
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.position().is_some_and(|idx| idx > 0)
    }

    /// Advance to the next lesson. Returns `false` and leaves the cursor
    /// unchanged when there is none.
    pub fn step_next(&mut self) -> bool {
        let Some(idx) = self.position() else {
            return false;
        };
        self.move_to(idx + 1)
    }

    /// Step back to the previous lesson. Returns `false` and leaves the cursor
    /// unchanged when there is none.
    pub fn step_previous(&mut self) -> bool {
        match self.position() {
            Some(idx) if idx > 0 => self.move_to(idx - 1),
            _ => false,
        }
    }

    /// Point the cursor at `id` without checking that it exists.
    pub fn select(&mut self, id: LessonId) {
        self.current = id;
    }

    fn move_to(&mut self, idx: usize) -> bool {
        let Some(lesson) = self.curriculum.lessons().nth(idx) else {
            return false;
        };
        self.current = lesson.id().clone();
        true
    }
}
