//! Names of the values kept in local storage.

/// JSON array of completed lesson ids.
pub const COMPLETED_LESSONS: &str = "completedLessons";

/// Two-letter interface language tag.
pub const LANGUAGE: &str = "language";
