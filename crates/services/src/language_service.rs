use std::sync::Arc;

use course_core::model::Language;
use storage::keys;
use storage::repository::LocalStorage;

/// Reads and writes the learner's interface language.
#[derive(Clone)]
pub struct LanguageService {
    storage: Arc<dyn LocalStorage>,
}

impl LanguageService {
    #[must_use]
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    /// Stored language, or the default language when nothing usable is stored.
    pub async fn load(&self) -> Language {
        match self.storage.get_item(keys::LANGUAGE).await {
            Ok(Some(tag)) => tag.parse::<Language>().unwrap_or_else(|err| {
                tracing::warn!(error = %err, "ignoring stored language");
                Language::default()
            }),
            Ok(None) => Language::default(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored language");
                Language::default()
            }
        }
    }

    /// Persist `language`. Failures are logged and otherwise ignored.
    pub async fn save(&self, language: Language) {
        if let Err(err) = self.storage.set_item(keys::LANGUAGE, language.tag()).await {
            tracing::warn!(error = %err, %language, "failed to persist language");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryStorage;

    #[tokio::test]
    async fn defaults_to_english_when_missing() {
        let service = LanguageService::new(Arc::new(InMemoryStorage::new()));
        assert_eq!(service.load().await, Language::En);
    }

    #[tokio::test]
    async fn round_trips_saved_language() {
        let storage = Arc::new(InMemoryStorage::new());
        let service = LanguageService::new(storage.clone());
        service.save(Language::Tr).await;

        let raw = storage.get_item(keys::LANGUAGE).await.unwrap();
        assert_eq!(raw.as_deref(), Some("tr"));
        assert_eq!(service.load().await, Language::Tr);
    }

    #[tokio::test]
    async fn unknown_tag_falls_back_to_default() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.set_item(keys::LANGUAGE, "klingon").await.unwrap();
        let service = LanguageService::new(storage);
        assert_eq!(service.load().await, Language::En);
    }
}
