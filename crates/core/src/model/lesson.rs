use crate::model::ids::{LessonId, LevelId};

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A single unit of course content.
///
/// Lessons are built once when the curriculum is loaded and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    description: String,
    content: String,
    code_example: Option<String>,
    concepts: Vec<String>,
}

impl Lesson {
    /// Creates a lesson without a code example or concept bullets.
    #[must_use]
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            content: content.into(),
            code_example: None,
            concepts: Vec::new(),
        }
    }

    /// Attaches a code example. Blank examples are dropped.
    #[must_use]
    pub fn with_code_example(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        self.code_example = if code.trim().is_empty() {
            None
        } else {
            Some(code)
        };
        self
    }

    #[must_use]
    pub fn with_concepts<I, S>(mut self, concepts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.concepts = concepts
            .into_iter()
            .map(Into::into)
            .filter(|item: &String| !item.trim().is_empty())
            .collect();
        self
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn code_example(&self) -> Option<&str> {
        self.code_example.as_deref()
    }

    #[must_use]
    pub fn concepts(&self) -> &[String] {
        &self.concepts
    }
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// An ordered group of lessons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    id: LevelId,
    title: String,
    description: String,
    lessons: Vec<Lesson>,
}

impl Level {
    #[must_use]
    pub fn new(
        id: LevelId,
        title: impl Into<String>,
        description: impl Into<String>,
        lessons: Vec<Lesson>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            lessons,
        }
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &LevelId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Lessons in declared order.
    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn contains(&self, id: &LessonId) -> bool {
        self.lessons.iter().any(|lesson| lesson.id() == id)
    }
}
