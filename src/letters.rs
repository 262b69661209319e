// ============================================
// src/letters.rs
// Letters that can appear on the wheel
// ============================================

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::WheelError;

/// Source alphabet the wheel is cut from.
pub const ALPHABET: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Letters that are too hard to start a word with.
pub const DEFAULT_EXCLUDED: [char; 4] = ['c', 'q', 'x', 'y'];

/// A single lowercase ASCII letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Letter(char);

impl Letter {
    pub fn new(c: char) -> Result<Self, WheelError> {
        if c.is_ascii_lowercase() {
            Ok(Self(c))
        } else {
            Err(WheelError::InvalidLetter(c))
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }

    /// Uppercase form shown in the viewing window.
    pub fn display_upper(self) -> char {
        self.0.to_ascii_uppercase()
    }
}

impl TryFrom<char> for Letter {
    type Error = WheelError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Letter::new(c)
    }
}

impl From<Letter> for char {
    fn from(letter: Letter) -> Self {
        letter.0
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered, duplicate-free letters. Position defines the segment angle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterSet {
    letters: Vec<Letter>,
    excluded: Vec<char>,
}

impl LetterSet {
    /// Validates an explicit letter order.
    pub fn new(letters: &[char]) -> Result<Self, WheelError> {
        if letters.is_empty() {
            return Err(WheelError::EmptyLetterSet);
        }

        let mut parsed: Vec<Letter> = Vec::with_capacity(letters.len());
        for &c in letters {
            let letter = Letter::new(c)?;
            if parsed.contains(&letter) {
                return Err(WheelError::DuplicateLetter(c));
            }
            parsed.push(letter);
        }

        let excluded = ALPHABET
            .iter()
            .copied()
            .filter(|c| !letters.contains(c))
            .collect();

        Ok(Self {
            letters: parsed,
            excluded,
        })
    }

    /// The alphabet in order, minus `excluded`.
    pub fn from_exclusions(excluded: &[char]) -> Result<Self, WheelError> {
        let kept: Vec<char> = ALPHABET
            .iter()
            .copied()
            .filter(|c| !excluded.contains(c))
            .collect();
        Self::new(&kept)
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Letter> {
        self.letters.get(index).copied()
    }

    pub fn position(&self, letter: Letter) -> Option<usize> {
        self.letters.iter().position(|&l| l == letter)
    }

    pub fn contains(&self, letter: Letter) -> bool {
        self.letters.contains(&letter)
    }

    pub fn iter(&self) -> impl Iterator<Item = Letter> + '_ {
        self.letters.iter().copied()
    }

    /// Alphabet letters that did not make it onto the wheel.
    pub fn excluded(&self) -> &[char] {
        &self.excluded
    }
}

impl Default for LetterSet {
    fn default() -> Self {
        let letters = ALPHABET
            .iter()
            .copied()
            .filter(|c| !DEFAULT_EXCLUDED.contains(c))
            .map(Letter)
            .collect();
        Self {
            letters,
            excluded: DEFAULT_EXCLUDED.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_has_22_letters_in_alphabet_order() {
        let set = LetterSet::default();
        let text: String = set.iter().map(Letter::as_char).collect();
        assert_eq!(text, "abdefghijklmnoprstuvwz");
        assert_eq!(set.len(), 22);
        assert_eq!(set.excluded(), &['c', 'q', 'x', 'y']);
    }

    #[test]
    fn from_exclusions_matches_default() {
        let set = LetterSet::from_exclusions(&DEFAULT_EXCLUDED).unwrap();
        assert_eq!(set, LetterSet::default());
    }

    #[test]
    fn rejects_bad_letter_sets() {
        assert_eq!(LetterSet::new(&[]), Err(WheelError::EmptyLetterSet));
        assert_eq!(
            LetterSet::new(&['a', 'b', 'a']),
            Err(WheelError::DuplicateLetter('a'))
        );
        assert_eq!(LetterSet::new(&['a', 'B']), Err(WheelError::InvalidLetter('B')));
        assert_eq!(
            LetterSet::from_exclusions(&ALPHABET),
            Err(WheelError::EmptyLetterSet)
        );
    }

    #[test]
    fn letter_serializes_as_char() {
        let letter = Letter::new('k').unwrap();
        assert_eq!(serde_json::to_string(&letter).unwrap(), "\"k\"");
        assert!(serde_json::from_str::<Letter>("\"K\"").is_err());
        assert_eq!(letter.display_upper(), 'K');
    }
}
