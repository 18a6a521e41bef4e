use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::model::{Lesson, LessonId, Level, LevelId};

const BUILTIN_CURRICULUM: &str = include_str!("../data/curriculum.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CurriculumError {
    #[error("curriculum has no lessons")]
    Empty,

    #[error("lesson id `{0}` appears more than once")]
    DuplicateLessonId(LessonId),

    #[error("level id `{0}` appears more than once")]
    DuplicateLevelId(LevelId),

    #[error("level `{level}` has a lesson with a blank id")]
    BlankLessonId { level: LevelId },

    #[error("a level has a blank id")]
    BlankLevelId,

    #[error("curriculum document is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The ordered Level → Lesson tree.
///
/// Lesson ids are unique across the whole tree and the flattened lesson order is the
/// one used for navigation. Both are checked in [`Curriculum::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curriculum {
    levels: Vec<Level>,
}

impl Curriculum {
    /// Build a curriculum from levels in declared order.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError::BlankLessonId` / `BlankLevelId` for empty or
    /// whitespace-only ids, `CurriculumError::DuplicateLessonId` / `DuplicateLevelId`
    /// when ids collide, or `CurriculumError::Empty` when there is no lesson at all.
    pub fn new(levels: Vec<Level>) -> Result<Self, CurriculumError> {
        let mut level_ids = HashSet::new();
        let mut lesson_ids = HashSet::new();
        for level in &levels {
            if level.id().is_blank() {
                return Err(CurriculumError::BlankLevelId);
            }
            if !level_ids.insert(level.id().as_str()) {
                return Err(CurriculumError::DuplicateLevelId(level.id().clone()));
            }
            for lesson in level.lessons() {
                if lesson.id().is_blank() {
                    return Err(CurriculumError::BlankLessonId {
                        level: level.id().clone(),
                    });
                }
                if !lesson_ids.insert(lesson.id().as_str()) {
                    return Err(CurriculumError::DuplicateLessonId(lesson.id().clone()));
                }
            }
        }
        if lesson_ids.is_empty() {
            return Err(CurriculumError::Empty);
        }
        Ok(Self { levels })
    }

    /// Parse a curriculum from its JSON document form.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError::Parse` for malformed documents and the
    /// validation errors of [`Curriculum::new`].
    pub fn from_json(raw: &str) -> Result<Self, CurriculumError> {
        let document: CurriculumDocument = serde_json::from_str(raw)?;
        Self::new(document.levels.into_iter().map(LevelDocument::into_level).collect())
    }

    /// The course shipped with the application.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError` if the embedded document is invalid.
    pub fn builtin() -> Result<Self, CurriculumError> {
        Self::from_json(BUILTIN_CURRICULUM)
    }

    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// First lesson matching `id`, scanning levels then lessons in order.
    #[must_use]
    pub fn find_lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons().find(|lesson| lesson.id() == id)
    }

    /// Level that contains the lesson `id`.
    #[must_use]
    pub fn level_of(&self, id: &LessonId) -> Option<&Level> {
        self.levels.iter().find(|level| level.contains(id))
    }

    /// All lessons in canonical navigation order.
    #[must_use]
    pub fn flatten(&self) -> Vec<&Lesson> {
        self.lessons().collect()
    }

    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.levels.iter().flat_map(Level::lessons)
    }

    /// Total number of lessons; the denominator for progress percentages.
    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.levels.iter().map(|level| level.lessons().len()).sum()
    }

    #[must_use]
    pub fn first_lesson(&self) -> Option<&Lesson> {
        self.lessons().next()
    }
}

//
// ─── DOCUMENT FORMAT ───────────────────────────────────────────────────────────
//

#[derive(Deserialize)]
struct CurriculumDocument {
    levels: Vec<LevelDocument>,
}

#[derive(Deserialize)]
struct LevelDocument {
    #[serde(deserialize_with = "parse_id")]
    id: LevelId,
    title: String,
    #[serde(default)]
    description: String,
    lessons: Vec<LessonDocument>,
}

#[derive(Deserialize)]
struct LessonDocument {
    #[serde(deserialize_with = "parse_id")]
    id: LessonId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    code_example: Option<String>,
    #[serde(default)]
    concepts: Vec<String>,
}

/// Ids in documents go through `FromStr`, so they are trimmed and never blank.
fn parse_id<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

impl LevelDocument {
    fn into_level(self) -> Level {
        let lessons = self
            .lessons
            .into_iter()
            .map(LessonDocument::into_lesson)
            .collect();
        Level::new(self.id, self.title, self.description, lessons)
    }
}

impl LessonDocument {
    fn into_lesson(self) -> Lesson {
        let lesson = Lesson::new(self.id, self.title, self.description, self.content)
            .with_concepts(self.concepts);
        match self.code_example {
            Some(code) => lesson.with_code_example(code),
            None => lesson,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: &str) -> Lesson {
        Lesson::new(LessonId::new(id), id.to_uppercase(), "", "")
    }

    fn sample() -> Curriculum {
        Curriculum::new(vec![
            Level::new(LevelId::new("A"), "A", "", vec![lesson("a1"), lesson("a2")]),
            Level::new(LevelId::new("B"), "B", "", vec![lesson("b1")]),
        ])
        .unwrap()
    }

    #[test]
    fn flatten_concatenates_levels_in_order() {
        let curriculum = sample();
        let ids: Vec<&str> = curriculum
            .flatten()
            .into_iter()
            .map(|l| l.id().as_str())
            .collect();
        assert_eq!(ids, ["a1", "a2", "b1"]);
        assert_eq!(curriculum.lesson_count(), 3);
    }

    #[test]
    fn find_lesson_returns_match_or_none() {
        let curriculum = sample();
        for lesson in curriculum.flatten() {
            let found = curriculum.find_lesson(lesson.id()).unwrap();
            assert_eq!(found.id(), lesson.id());
        }
        assert!(curriculum.find_lesson(&LessonId::new("zz")).is_none());
    }

    #[test]
    fn level_of_locates_parent() {
        let curriculum = sample();
        let level = curriculum.level_of(&LessonId::new("b1")).unwrap();
        assert_eq!(level.id().as_str(), "B");
        assert!(curriculum.level_of(&LessonId::new("zz")).is_none());
    }

    #[test]
    fn rejects_duplicate_lesson_ids_across_levels() {
        let result = Curriculum::new(vec![
            Level::new(LevelId::new("A"), "A", "", vec![lesson("x")]),
            Level::new(LevelId::new("B"), "B", "", vec![lesson("x")]),
        ]);
        assert!(matches!(result, Err(CurriculumError::DuplicateLessonId(id)) if id.as_str() == "x"));
    }

    #[test]
    fn rejects_duplicate_level_ids() {
        let result = Curriculum::new(vec![
            Level::new(LevelId::new("A"), "A", "", vec![lesson("a1")]),
            Level::new(LevelId::new("A"), "A again", "", vec![lesson("a2")]),
        ]);
        assert!(matches!(result, Err(CurriculumError::DuplicateLevelId(_))));
    }

    #[test]
    fn rejects_curriculum_without_lessons() {
        let result = Curriculum::new(vec![Level::new(LevelId::new("A"), "A", "", vec![])]);
        assert!(matches!(result, Err(CurriculumError::Empty)));
        assert!(matches!(Curriculum::new(vec![]), Err(CurriculumError::Empty)));
    }

    #[test]
    fn from_json_reads_optional_fields() {
        let curriculum = Curriculum::from_json(
            r#"{"levels":[{"id":"A","title":"A","lessons":[
                {"id":"a1","title":"A1","code_example":"cy.get('h1')","concepts":["get"]},
                {"id":"a2","title":"A2"}
            ]}]}"#,
        )
        .unwrap();
        let a1 = curriculum.find_lesson(&LessonId::new("a1")).unwrap();
        assert_eq!(a1.code_example(), Some("cy.get('h1')"));
        assert_eq!(a1.concepts(), ["get"]);
        let a2 = curriculum.find_lesson(&LessonId::new("a2")).unwrap();
        assert_eq!(a2.code_example(), None);
        assert!(a2.concepts().is_empty());
    }

    #[test]
    fn rejects_blank_lesson_ids() {
        for blank in ["", "  "] {
            let result = Curriculum::new(vec![Level::new(
                LevelId::new("A"),
                "A",
                "",
                vec![lesson("a1"), lesson(blank)],
            )]);
            assert!(matches!(
                result,
                Err(CurriculumError::BlankLessonId { level }) if level.as_str() == "A"
            ));
        }
    }

    #[test]
    fn rejects_blank_level_ids() {
        let result = Curriculum::new(vec![Level::new(LevelId::new(" "), "A", "", vec![lesson("a1")])]);
        assert!(matches!(result, Err(CurriculumError::BlankLevelId)));
    }

    #[test]
    fn from_json_rejects_blank_ids_and_trims_padding() {
        let blank = Curriculum::from_json(
            r#"{"levels":[{"id":"A","title":"A","lessons":[
                {"id":"a2","title":"A2"},{"id":"","title":"Blank"}
            ]}]}"#,
        );
        assert!(matches!(blank, Err(CurriculumError::Parse(_))));

        let padded = Curriculum::from_json(
            r#"{"levels":[{"id":" A ","title":"A","lessons":[{"id":" a1 ","title":"A1"}]}]}"#,
        )
        .unwrap();
        assert!(padded.find_lesson(&LessonId::new("a1")).is_some());
        assert_eq!(padded.levels()[0].id().as_str(), "A");
    }

    #[test]
    fn from_json_rejects_malformed_document() {
        assert!(matches!(
            Curriculum::from_json("{\"levels\": 3}"),
            Err(CurriculumError::Parse(_))
        ));
    }

    #[test]
    fn builtin_curriculum_is_valid() {
        let curriculum = Curriculum::builtin().unwrap();
        assert_eq!(curriculum.levels().len(), 5);
        assert_eq!(curriculum.lesson_count(), 16);
        assert_eq!(curriculum.flatten().len(), curriculum.lesson_count());
        assert_eq!(
            curriculum.first_lesson().map(|l| l.id().as_str()),
            Some("intro_what_is_cypress")
        );
        let last = curriculum.flatten().last().map(|l| l.id().as_str());
        assert_eq!(last, Some("advanced_custom_commands"));
    }
}
