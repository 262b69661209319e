// ============================================
// src/save_data.rs
// Stored custom questions: format, migration and cleanup
// ============================================

use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SaveDataError;
use crate::language::Language;
use crate::questions::validate_question;

/// Storage key of the custom questions.
pub const QUESTIONS_STORAGE_KEY: &str = "dutch-word-game-questions";

/// User-added questions per language, in insertion order.
///
/// Every language always has an entry, so the persisted form is
/// `{"dutch": [...], "english": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CustomQuestions(BTreeMap<Language, Vec<String>>);

impl Default for CustomQuestions {
    fn default() -> Self {
        Self(Language::ALL.iter().map(|&l| (l, Vec::new())).collect())
    }
}

impl CustomQuestions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, language: Language) -> &[String] {
        self.0.get(&language).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_mut(&mut self, language: Language) -> &mut Vec<String> {
        self.0.entry(language).or_default()
    }

    pub fn clear(&mut self, language: Language) {
        self.get_mut(language).clear();
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// Custom questions across all languages.
    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// What `load` found in a stored payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadOutcome {
    pub questions: CustomQuestions,
    /// The payload used the old flat-list format.
    pub migrated: bool,
    /// Entries removed because they failed validation or repeated an earlier entry.
    pub dropped: usize,
    /// The cleaned data differs from what is stored and should be written back.
    pub needs_save: bool,
}

/// Both layouts ever written under `QUESTIONS_STORAGE_KEY`.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredQuestions {
    /// First version: a flat list of Dutch questions.
    Legacy(Vec<Value>),
    Current(BTreeMap<String, Value>),
}

/// MARK: Parse a stored payload
///
/// Accepts the legacy flat list and the per-language map. Entries are
/// trimmed and re-validated; invalid ones are dropped.
pub fn load(raw: &str, max_len: usize) -> Result<LoadOutcome, SaveDataError> {
    let stored: StoredQuestions = serde_json::from_str(raw).map_err(SaveDataError::Corrupt)?;
    let mut outcome = LoadOutcome::default();

    match stored {
        StoredQuestions::Legacy(entries) => {
            info!("migrating {} stored questions to the per-language format", entries.len());
            let (kept, _) = clean_entries(&entries, max_len);
            outcome.dropped += entries.len() - kept.len();
            *outcome.questions.get_mut(Language::Dutch) = kept;
            outcome.migrated = true;
            outcome.needs_save = true;
        }
        StoredQuestions::Current(map) => {
            for (key, value) in map {
                let Some(language) = Language::ALL.into_iter().find(|l| l.code() == key) else {
                    warn!("dropping stored questions for unknown language '{}'", key);
                    outcome.needs_save = true;
                    continue;
                };
                let Value::Array(entries) = value else {
                    warn!("stored {} questions are not a list, ignoring", language);
                    outcome.needs_save = true;
                    continue;
                };
                let (kept, changed) = clean_entries(&entries, max_len);
                let dropped = entries.len() - kept.len();
                if dropped > 0 {
                    warn!("removed {} invalid or repeated {} questions", dropped, language);
                }
                outcome.dropped += dropped;
                outcome.needs_save |= changed;
                outcome.questions.get_mut(language).extend(kept);
            }
        }
    }

    Ok(outcome)
}

/// Valid, trimmed, first-seen entries plus whether anything differed from the input.
fn clean_entries(entries: &[Value], max_len: usize) -> (Vec<String>, bool) {
    let mut changed = false;
    let mut kept: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.as_str().map(|text| (text, validate_question(text, max_len))) {
            Some((_, Ok(clean))) if kept.iter().any(|q| q == clean) => changed = true,
            Some((text, Ok(clean))) => {
                changed |= clean != text;
                kept.push(clean.to_string());
            }
            _ => changed = true,
        }
    }
    (kept, changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::MAX_QUESTION_LEN;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_set_serializes_both_languages() {
        assert_eq!(
            CustomQuestions::new().to_json().unwrap(),
            r#"{"dutch":[],"english":[]}"#
        );
    }

    #[test]
    fn legacy_flat_list_becomes_dutch() {
        let outcome = load(r#"["Q1","Q2"]"#, MAX_QUESTION_LEN).unwrap();
        assert!(outcome.migrated);
        assert!(outcome.needs_save);
        assert_eq!(outcome.questions.get(Language::Dutch), strings(&["Q1", "Q2"]));
        assert!(outcome.questions.get(Language::English).is_empty());
    }

    #[test]
    fn current_format_round_trips() {
        let mut questions = CustomQuestions::new();
        questions.get_mut(Language::Dutch).push("Noem een vis".into());
        questions.get_mut(Language::English).extend(strings(&["Name a fish", "Name a bird"]));

        let outcome = load(&questions.to_json().unwrap(), MAX_QUESTION_LEN).unwrap();
        assert_eq!(outcome.questions, questions);
        assert!(!outcome.migrated);
        assert!(!outcome.needs_save);
        assert_eq!(outcome.dropped, 0);
    }

    #[test]
    fn invalid_entries_are_dropped_and_flagged() {
        let raw = format!(
            r#"{{"dutch":["  ok  ","", 5, "{}"],"english":["fine"],"klingon":["x"]}}"#,
            "a".repeat(101)
        );
        let outcome = load(&raw, MAX_QUESTION_LEN).unwrap();
        assert_eq!(outcome.questions.get(Language::Dutch), strings(&["ok"]));
        assert_eq!(outcome.questions.get(Language::English), strings(&["fine"]));
        assert_eq!(outcome.dropped, 3);
        assert!(outcome.needs_save);
    }

    #[test]
    fn only_exact_language_keys_are_read() {
        let raw =
            r#"{"dutch":["Noem een vis","Noem een vis"],"nl":["Noem een vis"],"English":["x"]}"#;
        let outcome = load(raw, MAX_QUESTION_LEN).unwrap();
        assert_eq!(outcome.questions.get(Language::Dutch), strings(&["Noem een vis"]));
        assert!(outcome.questions.get(Language::English).is_empty());
        assert_eq!(outcome.dropped, 1);
        assert!(outcome.needs_save);
    }

    #[test]
    fn missing_language_defaults_to_empty() {
        let outcome = load(r#"{"english":["Name a fish"]}"#, MAX_QUESTION_LEN).unwrap();
        assert!(outcome.questions.get(Language::Dutch).is_empty());
        assert_eq!(outcome.questions.total(), 1);
    }

    #[test]
    fn corrupt_payload_is_an_error() {
        assert!(matches!(
            load("{not json", MAX_QUESTION_LEN),
            Err(SaveDataError::Corrupt(_))
        ));
        assert!(load("42", MAX_QUESTION_LEN).is_err());
    }
}
