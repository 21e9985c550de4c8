//! Exact n-gram lookup over the loaded dictionary.

use std::collections::HashMap;

/// Maps every 2- and 3-letter substring to the words containing it.
///
/// Words are stored once; the gram tables hold indices in insertion order.
/// A gram occurring twice in one word lists that word twice.
#[derive(Clone, Debug, Default)]
pub struct NgramIndex {
    words: Vec<String>,
    bigrams: HashMap<String, Vec<usize>>,
    trigrams: HashMap<String, Vec<usize>>,
}

impl NgramIndex {
    /// Builds a fresh index. Words should already be normalized.
    pub fn build(words: Vec<String>) -> Self {
        let mut index = Self {
            words,
            ..Default::default()
        };
        for (id, word) in index.words.iter().enumerate() {
            let bytes = word.as_bytes();
            for window in bytes.windows(2) {
                index
                    .bigrams
                    .entry(String::from_utf8_lossy(window).into_owned())
                    .or_default()
                    .push(id);
            }
            for window in bytes.windows(3) {
                index
                    .trigrams
                    .entry(String::from_utf8_lossy(window).into_owned())
                    .or_default()
                    .push(id);
            }
        }
        index
    }

    /// Words containing `gram`; empty for unknown grams or lengths other than 2 and 3.
    pub fn lookup(&self, gram: &str) -> Vec<&str> {
        let table = match gram.len() {
            2 => &self.bigrams,
            3 => &self.trigrams,
            _ => return Vec::new(),
        };
        table
            .get(gram)
            .map(|ids| ids.iter().map(|&id| self.words[id].as_str()).collect())
            .unwrap_or_default()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of distinct keys per gram length, for status display.
    pub fn gram_counts(&self) -> (usize, usize) {
        (self.bigrams.len(), self.trigrams.len())
    }
}
