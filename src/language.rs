// ============================================
// src/language.rs
// Supported languages and the built-in question source
// ============================================

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::questions::{DUTCH_QUESTIONS, ENGLISH_QUESTIONS};

/// Storage key of the language preference.
pub const LANGUAGE_STORAGE_KEY: &str = "pim-pam-pet-language";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Dutch,
    English,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Dutch, Language::English];

    /// Key used in persisted data and config files.
    pub fn code(self) -> &'static str {
        match self {
            Language::Dutch => "dutch",
            Language::English => "english",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Language::Dutch => Language::English,
            Language::English => Language::Dutch,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language '{0}' (expected dutch or english)")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dutch" | "nl" | "nederlands" => Ok(Language::Dutch),
            "english" | "en" => Ok(Language::English),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

/// Read-only provider of the default question banks.
pub trait DefaultQuestionSource {
    /// Default questions for `language`, empty if it has none.
    fn questions_for(&self, language: Language) -> &[String];

    fn current_language(&self) -> Language;

    fn is_supported(&self, language: Language) -> bool;
}

/// The question banks shipped with the game.
#[derive(Debug, Clone)]
pub struct BuiltinQuestions {
    banks: BTreeMap<Language, Vec<String>>,
    current: Language,
}

impl BuiltinQuestions {
    pub fn new() -> Self {
        let mut banks = BTreeMap::new();
        banks.insert(Language::Dutch, to_owned(DUTCH_QUESTIONS));
        banks.insert(Language::English, to_owned(ENGLISH_QUESTIONS));
        Self {
            banks,
            current: Language::default(),
        }
    }

    /// A source with custom banks. Languages left out are unsupported.
    pub fn with_banks(banks: BTreeMap<Language, Vec<String>>) -> Self {
        let current = banks.keys().next().copied().unwrap_or_default();
        Self { banks, current }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.set_current_language(language);
        self
    }

    /// Switches the preferred language; unsupported languages are ignored.
    pub fn set_current_language(&mut self, language: Language) -> bool {
        if !self.is_supported(language) {
            return false;
        }
        self.current = language;
        true
    }
}

impl Default for BuiltinQuestions {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultQuestionSource for BuiltinQuestions {
    fn questions_for(&self, language: Language) -> &[String] {
        self.banks.get(&language).map(Vec::as_slice).unwrap_or(&[])
    }

    fn current_language(&self) -> Language {
        self.current
    }

    fn is_supported(&self, language: Language) -> bool {
        self.banks.contains_key(&language)
    }
}

fn to_owned(bank: &[&str]) -> Vec<String> {
    bank.iter().map(|q| q.to_string()).collect()
}
