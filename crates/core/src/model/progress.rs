use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::ids::LessonId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressDecodeError {
    #[error("persisted progress is not a JSON array of strings: {0}")]
    Json(#[from] serde_json::Error),
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Set of lessons the learner has marked complete.
///
/// Ordering carries no meaning; a `BTreeSet` keeps the persisted encoding stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    completed: BTreeSet<LessonId>,
}

impl Progress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the persisted JSON array of lesson ids.
    ///
    /// Duplicate entries collapse and blank entries are skipped, since no lesson
    /// can carry a blank id.
    ///
    /// # Errors
    ///
    /// Returns `ProgressDecodeError` if the value is not an array of strings.
    pub fn decode(raw: &str) -> Result<Self, ProgressDecodeError> {
        let ids: Vec<String> = serde_json::from_str(raw)?;
        Ok(ids
            .into_iter()
            .map(LessonId::new)
            .filter(|id| !id.is_blank())
            .collect())
    }

    /// Encode as a JSON array of lesson id strings.
    #[must_use]
    pub fn encode(&self) -> String {
        let ids: Vec<&str> = self.completed.iter().map(LessonId::as_str).collect();
        // Serializing a slice of &str cannot fail.
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_owned())
    }

    #[must_use]
    pub fn contains(&self, id: &LessonId) -> bool {
        self.completed.contains(id)
    }

    /// Flip completion for `id` and return the new state.
    ///
    /// Blank ids never name a lesson and are left out of the set.
    pub fn toggle(&mut self, id: &LessonId) -> bool {
        if id.is_blank() {
            return false;
        }
        if self.completed.remove(id) {
            false
        } else {
            self.completed.insert(id.clone());
            true
        }
    }

    pub fn clear(&mut self) {
        self.completed.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LessonId> {
        self.completed.iter()
    }

    /// Summarize against the total number of lessons in the curriculum.
    #[must_use]
    pub fn summary(&self, total: usize) -> ProgressSummary {
        ProgressSummary::new(self.len(), total)
    }
}

impl FromIterator<LessonId> for Progress {
    fn from_iter<T: IntoIterator<Item = LessonId>>(iter: T) -> Self {
        Self {
            completed: iter.into_iter().collect(),
        }
    }
}

//
// ─── SUMMARY ───────────────────────────────────────────────────────────────────
//

/// Aggregated view of course progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSummary {
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

impl ProgressSummary {
    /// Computes the rounded completion percentage.
    ///
    /// Rounds half up (`12.5` becomes `13`) and yields `0` when `total` is zero.
    /// The value is not clamped, so ids that no longer exist in the curriculum
    /// can push it past 100.
    #[must_use]
    pub fn new(completed: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            let completed = completed as u128;
            let total = total as u128;
            let rounded = (completed * 200 + total) / (total * 2);
            u32::try_from(rounded).unwrap_or(u32::MAX)
        };
        Self {
            completed,
            total,
            percentage,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> LessonId {
        LessonId::new(raw)
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut progress = Progress::new();
        assert!(progress.toggle(&id("a1")));
        assert!(progress.contains(&id("a1")));
        assert!(!progress.toggle(&id("a1")));
        assert!(progress.is_empty());
    }

    #[test]
    fn decode_collapses_duplicates() {
        let progress = Progress::decode(r#"["a1","a2","a1"]"#).unwrap();
        assert_eq!(progress.len(), 2);
        assert!(progress.contains(&id("a2")));
    }

    #[test]
    fn decode_rejects_malformed_values() {
        assert!(Progress::decode("not json").is_err());
        assert!(Progress::decode(r#"{"a1":true}"#).is_err());
        assert!(Progress::decode("[1,2,3]").is_err());
        assert!(Progress::decode("null").is_err());
    }

    #[test]
    fn decode_skips_blank_entries_and_keeps_the_rest() {
        let progress = Progress::decode(r#"["a1",""," ","b1"]"#).unwrap();
        assert_eq!(progress.len(), 2);
        assert!(progress.contains(&id("a1")));
        assert!(progress.contains(&id("b1")));
    }

    #[test]
    fn toggle_ignores_blank_ids() {
        let mut progress = Progress::new();
        progress.toggle(&id("a1"));
        assert!(!progress.toggle(&id(" ")));
        assert!(!progress.toggle(&id("")));
        assert_eq!(progress.len(), 1);
        assert_eq!(Progress::decode(&progress.encode()).unwrap(), progress);
    }

    #[test]
    fn encode_is_sorted_json_array() {
        let progress: Progress = [id("b1"), id("a1")].into_iter().collect();
        assert_eq!(progress.encode(), r#"["a1","b1"]"#);
        assert_eq!(Progress::new().encode(), "[]");
    }

    #[test]
    fn summary_rounds_to_nearest() {
        assert_eq!(ProgressSummary::new(1, 3).percentage, 33);
        assert_eq!(ProgressSummary::new(2, 3).percentage, 67);
        assert_eq!(ProgressSummary::new(3, 3).percentage, 100);
    }

    #[test]
    fn summary_rounds_half_up() {
        assert_eq!(ProgressSummary::new(1, 8).percentage, 13);
        assert_eq!(ProgressSummary::new(1, 200).percentage, 1);
        assert_eq!(ProgressSummary::new(1, 16).percentage, 6);
    }

    #[test]
    fn summary_with_zero_total_is_zero() {
        let summary = ProgressSummary::new(0, 0);
        assert_eq!(summary.percentage, 0);
        assert!(!summary.is_complete());
        assert_eq!(ProgressSummary::new(4, 0).percentage, 0);
    }

    #[test]
    fn summary_is_not_clamped() {
        assert_eq!(ProgressSummary::new(5, 4).percentage, 125);
    }
}
