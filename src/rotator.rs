// ============================================
// src/rotator.rs
// Serving questions without short-term repeats, and editing custom ones
// ============================================

use std::collections::VecDeque;

use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{QuestionError, Rejection, StoreError};
use crate::language::{DefaultQuestionSource, Language};
use crate::questions::{MAX_QUESTION_LEN, validate_question};
use crate::save_data::{self, CustomQuestions, QUESTIONS_STORAGE_KEY};
use crate::store::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotatorConfig {
    /// How many recent questions are kept out of the draw.
    pub recent_capacity: usize,
    /// Smallest allowed default + custom total per language.
    pub min_questions: usize,
    pub max_question_len: usize,
    pub storage_key: String,
}

impl Default for RotatorConfig {
    fn default() -> Self {
        Self {
            recent_capacity: 3,
            min_questions: 5,
            max_question_len: MAX_QUESTION_LEN,
            storage_key: QUESTIONS_STORAGE_KEY.to_string(),
        }
    }
}

/// Question counts for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionStats {
    pub default: usize,
    pub custom: usize,
    pub total: usize,
    /// Questions not in the recency window.
    pub available: usize,
}

/// Result of `QuestionRotator::validate_and_repair`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepairReport {
    /// Languages whose custom questions had invalid entries removed.
    pub repaired: Vec<Language>,
    /// Languages below the minimum question count.
    pub insufficient: Vec<Language>,
    pub total_questions: usize,
}

impl RepairReport {
    pub fn is_valid(&self) -> bool {
        self.repaired.is_empty() && self.insufficient.is_empty()
    }
}

pub struct QuestionRotator<S, K> {
    source: S,
    store: K,
    config: RotatorConfig,
    custom: CustomQuestions,
    recent: VecDeque<String>,
    language: Language,
    current: Option<String>,
    persist_error: Option<StoreError>,
    rng: StdRng,
}

impl<S, K> QuestionRotator<S, K>
where
    S: DefaultQuestionSource,
    K: KeyValueStore,
{
    /// Loads stored custom questions once and starts in the source's current language.
    pub fn new(source: S, store: K, config: RotatorConfig) -> Self {
        Self::with_rng(source, store, config, StdRng::from_os_rng())
    }

    pub fn with_seed(source: S, store: K, config: RotatorConfig, seed: u64) -> Self {
        Self::with_rng(source, store, config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(source: S, store: K, config: RotatorConfig, rng: StdRng) -> Self {
        let language = source.current_language();
        let mut rotator = Self {
            source,
            store,
            config,
            custom: CustomQuestions::new(),
            recent: VecDeque::new(),
            language,
            current: None,
            persist_error: None,
            rng,
        };
        rotator.load();
        rotator
    }

    // MARK: Persistence

    fn load(&mut self) {
        let key = self.config.storage_key.clone();
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                warn!("could not read stored questions: {}", e);
                self.persist_error = Some(e);
                return;
            }
        };

        match save_data::load(&raw, self.config.max_question_len) {
            Ok(mut outcome) => {
                self.custom = outcome.questions;
                for language in Language::ALL {
                    let defaults = self.source.questions_for(language);
                    let custom = self.custom.get_mut(language);
                    let before = custom.len();
                    custom.retain(|q| !defaults.contains(q));
                    let repeated = before - custom.len();
                    if repeated > 0 {
                        warn!("removed {} stored {} repeats of defaults", repeated, language);
                        outcome.dropped += repeated;
                        outcome.needs_save = true;
                    }
                }
                info!(
                    "loaded {} custom questions ({} dropped)",
                    self.custom.total(),
                    outcome.dropped
                );
                if outcome.needs_save {
                    self.persist();
                }
            }
            Err(e) => {
                error!("{}; discarding stored questions", e);
                if let Err(e) = self.store.remove(&key) {
                    warn!("could not clear corrupt questions: {}", e);
                }
                self.custom = CustomQuestions::new();
            }
        }
    }

    /// Writes the custom questions. Failures are kept for the caller, never raised.
    fn persist(&mut self) {
        let result = self
            .custom
            .to_json()
            .map_err(StoreError::from)
            .and_then(|json| self.store.set(&self.config.storage_key, &json));

        if let Err(e) = result {
            warn!("questions were not saved: {}", e);
            self.persist_error = Some(e);
        }
    }

    /// The last persistence failure, cleared on read.
    pub fn take_persist_error(&mut self) -> Option<StoreError> {
        self.persist_error.take()
    }

    // MARK: Language

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switches language and forgets the recency window.
    pub fn set_language(&mut self, language: Language) -> Result<(), Rejection> {
        if !self.source.is_supported(language) {
            return Err(Rejection::UnsupportedLanguage(language));
        }
        if language != self.language {
            info!("question language {} -> {}", self.language, language);
        }
        self.language = language;
        self.recent.clear();
        self.current = None;
        Ok(())
    }

    // MARK: Serving

    /// Picks a question outside the recency window.
    ///
    /// When every question is recent, only the last one stays blocked; a
    /// pool of one question serves that question every time.
    pub fn next_question(&mut self) -> Result<String, QuestionError> {
        let pool = self.all_questions(None);
        if pool.is_empty() {
            error!("no questions for {}", self.language);
            return Err(QuestionError::EmptyPool(self.language));
        }

        let mut available: Vec<&String> =
            pool.iter().filter(|q| !self.recent.contains(*q)).collect();
        if available.is_empty() {
            let last = self.recent.pop_back();
            self.recent.clear();
            self.recent.extend(last);
            available = pool.iter().filter(|q| !self.recent.contains(*q)).collect();
        }
        if available.is_empty() {
            available = pool.iter().collect();
        }

        let chosen = available[self.rng.random_range(0..available.len())].clone();
        self.remember(chosen.clone());
        self.current = Some(chosen.clone());
        debug!("next question: {}", chosen);
        Ok(chosen)
    }

    fn remember(&mut self, question: String) {
        self.recent.push_back(question);
        while self.recent.len() > self.config.recent_capacity {
            self.recent.pop_front();
        }
    }

    /// The question most recently served in this language.
    pub fn current_question(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Oldest first.
    pub fn recently_used(&self) -> impl Iterator<Item = &str> {
        self.recent.iter().map(String::as_str)
    }

    /// Forgets recent and current questions that are no longer in the pool.
    pub fn refresh(&mut self) {
        let pool = self.all_questions(None);
        self.recent.retain(|q| pool.contains(q));
        if self.current.as_ref().is_some_and(|q| !pool.contains(q)) {
            self.current = None;
        }
    }

    // MARK: Custom questions

    fn target(&self, language: Option<Language>) -> Language {
        language.unwrap_or(self.language)
    }

    /// Appends a custom question after trimming it.
    pub fn add_custom_question(
        &mut self,
        text: &str,
        language: Option<Language>,
    ) -> Result<(), Rejection> {
        let language = self.target(language);
        if !self.source.is_supported(language) {
            return Err(Rejection::UnsupportedLanguage(language));
        }
        let trimmed = validate_question(text, self.config.max_question_len)?;
        if self.all_questions(Some(language)).iter().any(|q| q == trimmed) {
            return Err(Rejection::Duplicate);
        }

        self.custom.get_mut(language).push(trimmed.to_string());
        self.persist();
        Ok(())
    }

    /// Replaces the custom question at `index` in place.
    pub fn edit_custom_question(
        &mut self,
        index: usize,
        new_text: &str,
        language: Option<Language>,
    ) -> Result<(), Rejection> {
        let language = self.target(language);
        if index >= self.custom.get(language).len() {
            return Err(Rejection::IndexOutOfRange(index));
        }
        let trimmed = validate_question(new_text, self.config.max_question_len)?;

        let clashes_with_default = self
            .source
            .questions_for(language)
            .iter()
            .any(|q| q == trimmed);
        let clashes_with_custom = self
            .custom
            .get(language)
            .iter()
            .enumerate()
            .any(|(i, q)| i != index && q == trimmed);
        if clashes_with_default || clashes_with_custom {
            return Err(Rejection::Duplicate);
        }

        self.custom.get_mut(language)[index] = trimmed.to_string();
        self.persist();
        self.refresh();
        Ok(())
    }

    /// Removes the custom question at `index`, keeping the minimum total.
    pub fn delete_custom_question(
        &mut self,
        index: usize,
        language: Option<Language>,
    ) -> Result<(), Rejection> {
        let language = self.target(language);
        if index >= self.custom.get(language).len() {
            return Err(Rejection::IndexOutOfRange(index));
        }
        if self.count(Some(language)) - 1 < self.config.min_questions {
            return Err(Rejection::BelowMinimum {
                min: self.config.min_questions,
            });
        }

        self.custom.get_mut(language).remove(index);
        self.persist();
        self.refresh();
        Ok(())
    }

    /// Clears custom questions of one language, or of all when `None`.
    pub fn reset_custom(&mut self, language: Option<Language>) {
        match language {
            Some(language) => self.custom.clear(language),
            None => self.custom.clear_all(),
        }
        self.persist();
        self.refresh();
    }

    // MARK: Reads

    /// Defaults followed by custom questions.
    pub fn all_questions(&self, language: Option<Language>) -> Vec<String> {
        let language = self.target(language);
        self.source
            .questions_for(language)
            .iter()
            .chain(self.custom.get(language))
            .cloned()
            .collect()
    }

    pub fn custom_questions(&self, language: Option<Language>) -> &[String] {
        self.custom.get(self.target(language))
    }

    pub fn default_questions(&self, language: Option<Language>) -> &[String] {
        self.source.questions_for(self.target(language))
    }

    pub fn count(&self, language: Option<Language>) -> usize {
        let language = self.target(language);
        self.source.questions_for(language).len() + self.custom.get(language).len()
    }

    pub fn stats(&self, language: Option<Language>) -> QuestionStats {
        let language = self.target(language);
        let default = self.source.questions_for(language).len();
        let custom = self.custom.get(language).len();
        let available = if language == self.language {
            self.all_questions(Some(language))
                .iter()
                .filter(|q| !self.recent.contains(*q))
                .count()
        } else {
            default + custom
        };
        QuestionStats {
            default,
            custom,
            total: default + custom,
            available,
        }
    }

    /// Re-validates every custom question and checks the minimum per language.
    pub fn validate_and_repair(&mut self) -> RepairReport {
        let mut report = RepairReport::default();
        let max_len = self.config.max_question_len;

        for language in Language::ALL {
            let questions = self.custom.get_mut(language);
            let before = questions.len();
            questions.retain(|q| validate_question(q, max_len) == Ok(q.as_str()));
            if questions.len() != before {
                warn!("dropped {} invalid {} questions", before - questions.len(), language);
                report.repaired.push(language);
            }

            let total = self.count(Some(language));
            if total < self.config.min_questions {
                warn!(
                    "only {} {} questions, need {}",
                    total, language, self.config.min_questions
                );
                report.insufficient.push(language);
            }
            report.total_questions += total;
        }

        if !report.repaired.is_empty() {
            self.persist();
            self.refresh();
        }
        report
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut K {
        &mut self.store
    }
}
