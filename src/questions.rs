/*
 * src/questions.rs
 * Built-in category questions, one list per language
 */

use crate::error::Rejection;

/// Longest accepted question, in characters
pub const MAX_QUESTION_LEN: usize = 100;

/// Dutch default questions
pub const DUTCH_QUESTIONS: &[&str] = &[
    "Noem een fruit",
    "Noem iets wat je meeneemt in de auto",
    "Noem een dier",
    "Noem iets wat je op school gebruikt",
    "Noem een kleur",
    "Noem iets wat je kunt eten",
    "Noem een speelgoed",
    "Noem iets in de keuken",
    "Noem een kledingstuk",
    "Noem iets wat kan vliegen",
    "Noem een bloem",
    "Noem iets wat je in de badkamer vindt",
    "Noem een voertuig",
    "Noem iets wat groot is",
    "Noem iets wat klein is",
    "Noem een beroep",
    "Noem iets wat je kunt drinken",
    "Noem een muziekinstrument",
    "Noem iets wat je in de tuin vindt",
    "Noem een lichaamsdeel",
];

/// English default questions (same order as the Dutch list)
pub const ENGLISH_QUESTIONS: &[&str] = &[
    "Name a fruit",
    "Name something you take in the car",
    "Name an animal",
    "Name something you use at school",
    "Name a color",
    "Name something you can eat",
    "Name a toy",
    "Name something in the kitchen",
    "Name a piece of clothing",
    "Name something that can fly",
    "Name a flower",
    "Name something you find in the bathroom",
    "Name a vehicle",
    "Name something that is big",
    "Name something that is small",
    "Name a profession",
    "Name something you can drink",
    "Name a musical instrument",
    "Name something you find in the garden",
    "Name a body part",
];

/// Shown by the front-end when no question can be served at all
pub const FALLBACK_QUESTIONS: &[&str] = &[
    "Noem een dier",
    "Noem een kleur",
    "Noem iets wat je kunt eten",
];

/// Trims `text` and checks it is non-empty and at most `max_len` characters.
pub fn validate_question(text: &str, max_len: usize) -> Result<&str, Rejection> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Rejection::Empty);
    }
    if trimmed.chars().count() > max_len {
        return Err(Rejection::TooLong { max: max_len });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn banks_have_twenty_unique_entries() {
        for bank in [DUTCH_QUESTIONS, ENGLISH_QUESTIONS] {
            assert_eq!(bank.len(), 20);
            let unique: HashSet<&str> = bank.iter().copied().collect();
            assert_eq!(unique.len(), bank.len());
            for q in bank {
                assert_eq!(q.trim(), *q);
                assert_eq!(validate_question(q, MAX_QUESTION_LEN), Ok(*q));
            }
        }
    }

    #[test]
    fn validation_trims_and_bounds_length() {
        assert_eq!(validate_question("  Noem een vis \n", 100), Ok("Noem een vis"));
        assert_eq!(validate_question("   ", 100), Err(Rejection::Empty));
        let long = "é".repeat(101);
        assert_eq!(
            validate_question(&long, 100),
            Err(Rejection::TooLong { max: 100 })
        );
        assert!(validate_question(&"é".repeat(100), 100).is_ok());
    }

    #[test]
    fn fallbacks_come_from_the_dutch_bank() {
        for q in FALLBACK_QUESTIONS {
            assert!(DUTCH_QUESTIONS.contains(q), "'{}' missing", q);
        }
    }
}
