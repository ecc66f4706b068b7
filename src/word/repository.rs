//! Word supply
//!
//! The game only needs "a word I haven't used yet", "mark this one used" and
//! "start over". Where the words come from is the repository's business.

use std::collections::BTreeSet;
use std::path::Path;

use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use crate::{Error, Result};

/// Built-in word list (animal names)
pub const DEFAULT_WORDS: &[&str] = &[
    "ayam", "bebek", "cicak", "domba", "elang", "flamingo", "gajah", "harimau", "iguana",
    "jerapah", "kucing", "lumba", "monyet", "naga", "orang", "panda", "quokka", "rusa", "singa",
    "tupai", "ular", "viper", "walrus", "xenops", "yak", "zebra", "badak", "cumi", "duyung",
    "echidna", "ferret", "gecko", "hiu", "ikan", "jaguar", "kura", "lemur", "macan", "nuri",
    "onta", "paus", "quail", "rajawali", "sapi", "tikus", "udang", "vole", "wombat", "xerus",
    "yeti", "anjing", "babi", "cacing", "dodo", "gorila", "hamster", "jalak",
];

/// Supplier of words for new tasks
pub trait WordRepository {
    /// A random word not yet marked used, uppercased
    fn next_word(&mut self) -> Option<String>;

    /// Exclude `word` from future draws until the next reset
    fn mark_used(&mut self, word: &str);

    /// Make every word available again
    fn reset_usage(&mut self);
}

/// Word repository backed by an in-memory list
#[derive(Debug, Clone)]
pub struct InMemoryWordRepository {
    words: Vec<String>,
    used: BTreeSet<String>,
    /// Only draw words of this length when set
    length_filter: Option<usize>,
    rng: Pcg32,
}

impl InMemoryWordRepository {
    /// Build from any word list; words are uppercased and deduplicated
    pub fn new<I, S>(words: I, seed: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: BTreeSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_ascii_uppercase())
            .filter(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_alphabetic()))
            .collect();
        Self {
            words: words.into_iter().collect(),
            used: BTreeSet::new(),
            length_filter: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Repository over the built-in word list
    pub fn with_defaults(seed: u64) -> Self {
        Self::new(DEFAULT_WORDS.iter(), seed)
    }

    /// Parse a newline-separated word list
    pub fn from_text(text: &str, seed: u64) -> Result<Self> {
        let repo = Self::new(text.lines(), seed);
        if repo.words.is_empty() {
            return Err(Error::EmptyWordList);
        }
        Ok(repo)
    }

    /// Load a newline-separated word list from disk
    pub fn load(path: impl AsRef<Path>, seed: u64) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let repo = Self::from_text(&text, seed)?;
        log::info!(
            "Loaded {} words from {}",
            repo.words.len(),
            path.as_ref().display()
        );
        Ok(repo)
    }

    /// Restrict draws to words of exactly `len` letters (`None` lifts the filter)
    pub fn set_length_filter(&mut self, len: Option<usize>) {
        self.length_filter = len;
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words still available for drawing
    pub fn available(&self) -> usize {
        self.candidates().len()
    }

    fn candidates(&self) -> Vec<&String> {
        candidates(&self.words, &self.used, self.length_filter)
    }
}

fn candidates<'a>(
    words: &'a [String],
    used: &BTreeSet<String>,
    length_filter: Option<usize>,
) -> Vec<&'a String> {
    words
        .iter()
        .filter(|w| !used.contains(*w))
        .filter(|w| length_filter.is_none_or(|len| w.chars().count() == len))
        .collect()
}

impl WordRepository for InMemoryWordRepository {
    fn next_word(&mut self) -> Option<String> {
        let candidates = candidates(&self.words, &self.used, self.length_filter);
        candidates.choose(&mut self.rng).map(|w| (*w).clone())
    }

    fn mark_used(&mut self, word: &str) {
        self.used.insert(word.trim().to_ascii_uppercase());
    }

    fn reset_usage(&mut self) {
        log::debug!("Word usage reset ({} used)", self.used.len());
        self.used.clear();
    }
}
