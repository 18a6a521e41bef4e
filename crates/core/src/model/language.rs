use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Interface language chosen by the learner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    En,
    Tr,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LanguageError {
    #[error("unsupported language tag: {0}")]
    Unsupported(String),
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Tr];

    /// Two-letter tag used in persisted settings.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Tr => "Türkçe",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.tag() == tag)
            .ok_or_else(|| LanguageError::Unsupported(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags_case_insensitively() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!(" TR ".parse::<Language>().unwrap(), Language::Tr);
    }

    #[test]
    fn rejects_unknown_tags() {
        assert!(matches!(
            "de".parse::<Language>(),
            Err(LanguageError::Unsupported(tag)) if tag == "de"
        ));
    }

    #[test]
    fn defaults_to_english() {
        assert_eq!(Language::default(), Language::En);
        assert_eq!(Language::default().to_string(), "en");
    }
}
