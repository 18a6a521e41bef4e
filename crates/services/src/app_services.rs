use std::sync::Arc;

use course_core::{Curriculum, NavigationCursor};
use storage::repository::Storage;

use crate::error::AppServicesError;
use crate::language_service::LanguageService;
use crate::progress_store::ProgressStore;

/// Application root: owns the single progress store and cursor and hands them
/// to whichever front end drives the session.
pub struct AppServices {
    curriculum: Arc<Curriculum>,
    progress: ProgressStore,
    cursor: NavigationCursor,
    language: LanguageService,
}

impl AppServices {
    /// Assemble services over an already opened storage backend.
    ///
    /// The progress total is derived from the curriculum so it cannot drift
    /// from the actual lesson count.
    pub async fn new(curriculum: Arc<Curriculum>, storage: &Storage) -> Self {
        let total = curriculum.lesson_count();
        let progress = ProgressStore::load(Arc::clone(&storage.local), total).await;
        let cursor = NavigationCursor::new(Arc::clone(&curriculum));
        let language = LanguageService::new(Arc::clone(&storage.local));
        Self {
            curriculum,
            progress,
            cursor,
            language,
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        db_url: &str,
        curriculum: Arc<Curriculum>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(curriculum, &storage).await)
    }

    #[must_use]
    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressStore {
        &mut self.progress
    }

    #[must_use]
    pub fn cursor(&self) -> &NavigationCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut NavigationCursor {
        &mut self.cursor
    }

    #[must_use]
    pub fn language(&self) -> &LanguageService {
        &self.language
    }

    /// Toggle completion of the lesson under the cursor.
    ///
    /// Returns the new state, or `None` when the cursor points at an unknown lesson.
    pub async fn toggle_current(&mut self) -> Option<bool> {
        let id = self.cursor.current_lesson()?.id().clone();
        Some(self.progress.toggle_complete(&id).await)
    }
}
