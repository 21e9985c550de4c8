//! Word dictionary: loading, n-gram index and candidate ranking.

pub mod index;
pub mod ranking;
pub mod wordlist;

pub use index::NgramIndex;
pub use ranking::rank_candidates;
pub use wordlist::{normalize_words, read_word_file};
