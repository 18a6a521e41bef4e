use std::sync::Arc;

use course_core::model::{LessonId, Progress, ProgressSummary};
use storage::keys;
use storage::repository::LocalStorage;

/// Durable record of which lessons the learner has completed.
///
/// Loaded once at construction and written through to storage after every
/// mutation. Storage problems never surface to callers: unreadable state loads
/// as empty progress and failed writes keep the in-memory state for the session.
pub struct ProgressStore {
    storage: Arc<dyn LocalStorage>,
    progress: Progress,
    total: usize,
}

impl ProgressStore {
    /// Load persisted progress, falling back to empty progress when the stored
    /// value is missing, unreadable, or malformed.
    ///
    /// `total` is the number of lessons in the curriculum.
    pub async fn load(storage: Arc<dyn LocalStorage>, total: usize) -> Self {
        let progress = match storage.get_item(keys::COMPLETED_LESSONS).await {
            Ok(Some(raw)) => Progress::decode(&raw).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "discarding malformed persisted progress");
                Progress::new()
            }),
            Ok(None) => Progress::new(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read persisted progress");
                Progress::new()
            }
        };
        tracing::debug!(completed = progress.len(), total, "loaded progress");
        Self {
            storage,
            progress,
            total,
        }
    }

    #[must_use]
    pub fn is_complete(&self, id: &LessonId) -> bool {
        self.progress.contains(id)
    }

    /// Flip the completion state of `id`, persist it, and return the new state.
    pub async fn toggle_complete(&mut self, id: &LessonId) -> bool {
        let complete = self.progress.toggle(id);
        tracing::debug!(lesson = %id, complete, "toggled lesson completion");
        self.flush().await;
        complete
    }

    #[must_use]
    pub fn get_progress(&self) -> ProgressSummary {
        self.progress.summary(self.total)
    }

    /// Forget every completed lesson. Callers confirm with the learner first.
    pub async fn reset(&mut self) {
        self.progress.clear();
        tracing::debug!("reset progress");
        self.flush().await;
    }

    #[must_use]
    pub fn completed(&self) -> &Progress {
        &self.progress
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    async fn flush(&self) {
        let encoded = self.progress.encode();
        if let Err(err) = self
            .storage
            .set_item(keys::COMPLETED_LESSONS, &encoded)
            .await
        {
            tracing::warn!(error = %err, "failed to persist progress; keeping in-memory state");
        }
    }
}
