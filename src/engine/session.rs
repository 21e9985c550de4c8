use std::collections::{BTreeSet, HashSet};

/// Letters and words used during one game.
#[derive(Clone, Debug, Default)]
pub struct Session {
    typed_letters: BTreeSet<char>,
    used_words: HashSet<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a submitted word. The only way `used_words` grows.
    pub fn accept(&mut self, word: &str) {
        let word = word.to_ascii_uppercase();
        self.typed_letters
            .extend(word.chars().filter(|c| c.is_ascii_uppercase()));
        self.used_words.insert(word);
    }

    pub fn typed_letters(&self) -> &BTreeSet<char> {
        &self.typed_letters
    }

    pub fn used_words(&self) -> &HashSet<String> {
        &self.used_words
    }

    pub fn reset_used_words(&mut self) {
        self.used_words.clear();
    }

    pub fn reset_typed_letters(&mut self) {
        self.typed_letters.clear();
    }

    /// Typed letters in alphabetical order, for display.
    pub fn typed_letters_string(&self) -> String {
        self.typed_letters.iter().collect()
    }
}
