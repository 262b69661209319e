// Integration tests for the question rotator, using the built-in question
// banks and an in-memory store.

use std::collections::HashSet;

use pimpampet::language::BuiltinQuestions;
use pimpampet::questions::{DUTCH_QUESTIONS, ENGLISH_QUESTIONS};
use pimpampet::save_data::QUESTIONS_STORAGE_KEY;
use pimpampet::{Language, MemoryStore, QuestionRotator, Rejection, RotatorConfig};

type Rotator = QuestionRotator<BuiltinQuestions, MemoryStore>;

fn rotator_with(store: MemoryStore, language: Language, seed: u64) -> Rotator {
    let source = BuiltinQuestions::new().with_language(language);
    QuestionRotator::with_seed(source, store, RotatorConfig::default(), seed)
}

fn fresh(language: Language) -> Rotator {
    rotator_with(MemoryStore::new(), language, 7)
}

// 20 Dutch defaults, nothing custom: answers come from the defaults and the
// first three never repeat.
#[test]
fn fresh_dutch_rotator_serves_defaults() {
    let mut rotator = fresh(Language::Dutch);
    let served: Vec<String> = (0..3).map(|_| rotator.next_question().unwrap()).collect();

    for question in &served {
        assert!(DUTCH_QUESTIONS.contains(&question.as_str()));
    }
    let unique: HashSet<&String> = served.iter().collect();
    assert_eq!(unique.len(), 3);
}

// With four or more questions, any three consecutive draws are distinct.
#[test]
fn no_repeats_within_three_consecutive_draws() {
    for seed in 0..10 {
        let mut rotator = rotator_with(MemoryStore::new(), Language::English, seed);
        let served: Vec<String> = (0..300).map(|_| rotator.next_question().unwrap()).collect();
        for window in served.windows(3) {
            assert_ne!(window[0], window[1]);
            assert_ne!(window[0], window[2]);
            assert_ne!(window[1], window[2]);
        }
    }
}

#[test]
fn small_pool_of_four_still_avoids_repeats() {
    let source = BuiltinQuestions::with_banks(
        [(
            Language::Dutch,
            vec!["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string()],
        )]
        .into_iter()
        .collect(),
    );
    let mut rotator =
        QuestionRotator::with_seed(source, MemoryStore::new(), RotatorConfig::default(), 3);
    let served: Vec<String> = (0..200).map(|_| rotator.next_question().unwrap()).collect();
    for window in served.windows(4) {
        let unique: HashSet<&String> = window.iter().collect();
        assert_eq!(unique.len(), 4);
    }
}

#[test]
fn duplicate_of_a_default_is_rejected() {
    let mut rotator = fresh(Language::English);
    assert_eq!(
        rotator.add_custom_question("Name a fruit", None),
        Err(Rejection::Duplicate)
    );
    assert_eq!(rotator.add_custom_question("name a fruit", None), Ok(()));
    // Dutch has no such default.
    assert_eq!(
        rotator.add_custom_question("Name a fruit", Some(Language::Dutch)),
        Ok(())
    );
}

// Deletion fails at a total of five and succeeds at six.
#[test]
fn minimum_count_is_enforced() {
    let source = BuiltinQuestions::with_banks(
        [(
            Language::English,
            ENGLISH_QUESTIONS[..4].iter().map(|q| q.to_string()).collect(),
        )]
        .into_iter()
        .collect(),
    );
    let mut rotator =
        QuestionRotator::with_seed(source, MemoryStore::new(), RotatorConfig::default(), 1);
    rotator.add_custom_question("Name a bird", None).unwrap();
    assert_eq!(rotator.count(None), 5);
    assert_eq!(
        rotator.delete_custom_question(0, None),
        Err(Rejection::BelowMinimum { min: 5 })
    );

    rotator.add_custom_question("Name a fish", None).unwrap();
    assert_eq!(rotator.count(None), 6);
    assert_eq!(rotator.delete_custom_question(0, None), Ok(()));
    assert_eq!(rotator.custom_questions(None), ["Name a fish".to_string()]);
}

// What one rotator saves, the next one loads.
#[test]
fn custom_questions_survive_a_restart() {
    let mut first = fresh(Language::Dutch);
    first.add_custom_question("Noem een vis", None).unwrap();
    first.add_custom_question("Noem een land", None).unwrap();
    first
        .add_custom_question("Name a country", Some(Language::English))
        .unwrap();

    let raw = first.store().raw(QUESTIONS_STORAGE_KEY).unwrap().to_string();
    let second = rotator_with(
        MemoryStore::new().with_entry(QUESTIONS_STORAGE_KEY, &raw),
        Language::Dutch,
        2,
    );

    for language in Language::ALL {
        assert_eq!(
            second.custom_questions(Some(language)),
            first.custom_questions(Some(language))
        );
    }
    // Clean data is not rewritten.
    assert_eq!(second.store().writes(), 0);
}

#[test]
fn legacy_payload_is_migrated_and_rewritten() {
    let store = MemoryStore::new().with_entry(QUESTIONS_STORAGE_KEY, r#"["Q1","Q2"]"#);
    let rotator = rotator_with(store, Language::Dutch, 4);

    assert_eq!(
        rotator.custom_questions(Some(Language::Dutch)),
        ["Q1".to_string(), "Q2".to_string()]
    );
    assert!(rotator.custom_questions(Some(Language::English)).is_empty());
    assert_eq!(
        rotator.store().raw(QUESTIONS_STORAGE_KEY),
        Some(r#"{"dutch":["Q1","Q2"],"english":[]}"#)
    );
}

#[test]
fn invalid_stored_entries_are_cleaned_on_load() {
    let store = MemoryStore::new().with_entry(
        QUESTIONS_STORAGE_KEY,
        r#"{"dutch":["  Noem een vis ", "   "],"english":[]}"#,
    );
    let rotator = rotator_with(store, Language::Dutch, 4);
    assert_eq!(rotator.custom_questions(None), ["Noem een vis".to_string()]);
    assert_eq!(
        rotator.store().raw(QUESTIONS_STORAGE_KEY),
        Some(r#"{"dutch":["Noem een vis"],"english":[]}"#)
    );
}

#[test]
fn custom_questions_join_the_pool() {
    let mut rotator = fresh(Language::English);
    rotator.add_custom_question("Name a planet", None).unwrap();
    assert_eq!(rotator.count(None), 21);
    assert_eq!(rotator.all_questions(None).last().map(String::as_str), Some("Name a planet"));

    let mut seen = HashSet::new();
    for _ in 0..500 {
        seen.insert(rotator.next_question().unwrap());
    }
    assert!(seen.contains("Name a planet"));
    assert_eq!(seen.len(), 21);
}

#[test]
fn questions_stay_in_the_active_language() {
    let mut rotator = fresh(Language::Dutch);
    rotator.next_question().unwrap();
    rotator.set_language(Language::English).unwrap();
    for _ in 0..30 {
        let question = rotator.next_question().unwrap();
        assert!(ENGLISH_QUESTIONS.contains(&question.as_str()));
    }
    assert!(rotator
        .recently_used()
        .all(|q| ENGLISH_QUESTIONS.contains(&q)));
}
