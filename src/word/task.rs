//! Fill-in-the-blank word task
//!
//! Progress is tracked per letter, not per position: once a letter is
//! supplied it satisfies every blank holding that letter.

use std::collections::BTreeSet;

use rand::Rng;

use crate::consts::BLANK_GLYPH;
use crate::{Error, Result};

/// One word with some positions blanked out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTask {
    word: String,
    letters: Vec<char>,
    blank_positions: BTreeSet<usize>,
    filled: BTreeSet<char>,
}

impl WordTask {
    /// Create a task from an A-Z word; every blank position must index into it
    pub fn new(word: &str, blanks: impl IntoIterator<Item = usize>) -> Result<Self> {
        let word = word.trim().to_ascii_uppercase();
        let letters: Vec<char> = word.chars().collect();
        if letters.is_empty() {
            return Err(Error::EmptyWord);
        }
        if !letters.iter().all(char::is_ascii_alphabetic) {
            return Err(Error::NonAlphabetic(word));
        }

        let mut blank_positions = BTreeSet::new();
        for position in blanks {
            if position >= letters.len() {
                return Err(Error::BlankOutOfRange {
                    position,
                    len: letters.len(),
                });
            }
            blank_positions.insert(position);
        }

        Ok(Self {
            word,
            letters,
            blank_positions,
            filled: BTreeSet::new(),
        })
    }

    /// Create a task with between `min_blanks` and `max_blanks` random blanks
    /// (clamped to the word length)
    pub fn random<R: Rng + ?Sized>(
        word: &str,
        rng: &mut R,
        min_blanks: usize,
        max_blanks: usize,
    ) -> Result<Self> {
        let len = word.trim().chars().count();
        if len == 0 {
            return Err(Error::EmptyWord);
        }
        let upper = max_blanks.max(min_blanks).max(1);
        let count = rng.random_range(min_blanks.max(1)..=upper).min(len);
        let blanks = rand::seq::index::sample(rng, len, count).into_vec();
        Self::new(word, blanks)
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn blank_positions(&self) -> &BTreeSet<usize> {
        &self.blank_positions
    }

    /// Supply a letter. Filling a letter twice is a no-op.
    pub fn fill(&mut self, letter: char) {
        self.filled.insert(letter.to_ascii_uppercase());
    }

    /// Distinct blank letters not yet supplied
    pub fn remaining_letters(&self) -> Vec<char> {
        self.blank_positions
            .iter()
            .map(|&i| self.letters[i])
            .filter(|c| !self.filled.contains(c))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Whether `letter` is still needed
    pub fn needs(&self, letter: char) -> bool {
        let letter = letter.to_ascii_uppercase();
        !self.filled.contains(&letter)
            && self
                .blank_positions
                .iter()
                .any(|&i| self.letters[i] == letter)
    }

    pub fn is_complete(&self) -> bool {
        self.blank_positions
            .iter()
            .all(|&i| self.filled.contains(&self.letters[i]))
    }

    /// The word with uncovered blanks replaced by the placeholder glyph
    pub fn display(&self) -> String {
        self.letters
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                if self.blank_positions.contains(&i) && !self.filled.contains(&c) {
                    BLANK_GLYPH
                } else {
                    c
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_rejects_out_of_range_blank() {
        let err = WordTask::new("CAT", [1, 3]).unwrap_err();
        assert!(matches!(err, Error::BlankOutOfRange { position: 3, len: 3 }));
        assert!(matches!(WordTask::new("", [0]), Err(Error::EmptyWord)));
    }

    #[test]
    fn test_rejects_non_ascii_word() {
        assert!(matches!(
            WordTask::new("éclair", [0]),
            Err(Error::NonAlphabetic(_))
        ));
        assert!(matches!(
            WordTask::new("ice cream", [0]),
            Err(Error::NonAlphabetic(_))
        ));
    }

    #[test]
    fn test_single_blank_completes() {
        let mut task = WordTask::new("CAT", [1]).unwrap();
        assert_eq!(task.display(), "C_T");
        assert_eq!(task.remaining_letters(), vec!['A']);
        task.fill('A');
        assert!(task.is_complete());
        assert_eq!(task.display(), "CAT");
    }

    #[test]
    fn test_duplicate_letter_collapses() {
        let mut task = WordTask::new("APPLE", [1, 2]).unwrap();
        assert_eq!(task.remaining_letters(), vec!['P']);
        task.fill('P');
        assert!(task.remaining_letters().is_empty());
        assert!(task.is_complete());
        assert_eq!(task.display(), "APPLE");
    }

    #[test]
    fn test_fill_is_idempotent_and_case_insensitive() {
        let mut task = WordTask::new("zebra", [0, 4]).unwrap();
        assert_eq!(task.word(), "ZEBRA");
        task.fill('z');
        task.fill('Z');
        assert_eq!(task.remaining_letters(), vec!['A']);
        assert!(task.needs('a'));
        assert!(!task.needs('Z'));
        assert_eq!(task.display(), "ZEBR_");
    }

    #[test]
    fn test_unrelated_fill_changes_nothing() {
        let mut task = WordTask::new("DOG", [2]).unwrap();
        task.fill('X');
        assert!(!task.is_complete());
        assert_eq!(task.display(), "DO_");
    }

    #[test]
    fn test_random_blank_count_within_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let task = WordTask::random("YAK", &mut rng, 1, 2).unwrap();
            let n = task.blank_positions().len();
            assert!((1..=2).contains(&n));
        }
        let task = WordTask::random("I", &mut rng, 1, 2).unwrap();
        assert_eq!(task.blank_positions().len(), 1);
    }

    proptest! {
        #[test]
        fn prop_filling_blank_letters_completes(
            word in "[A-Z]{1,12}",
            picks in proptest::collection::vec(any::<prop::sample::Index>(), 0..6),
        ) {
            let len = word.len();
            let blanks: Vec<usize> = picks.iter().map(|p| p.index(len)).collect();
            let mut task = WordTask::new(&word, blanks.iter().copied()).unwrap();
            let letters: Vec<char> = word.chars().collect();
            for &i in &blanks {
                task.fill(letters[i]);
            }
            prop_assert!(task.is_complete());
            prop_assert!(task.remaining_letters().is_empty());
            prop_assert_eq!(task.display(), word);
        }
    }
}
