mod ids;
mod language;
mod lesson;
mod progress;

pub use ids::{LessonId, LevelId, ParseIdError};
pub use language::{Language, LanguageError};
pub use lesson::{Lesson, Level};
pub use progress::{Progress, ProgressDecodeError, ProgressSummary};
