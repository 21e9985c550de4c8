//! Orders dictionary hits for the "don't repeat letters" game.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};

use super::index::NgramIndex;

/// English letters from most to least frequent.
const FREQUENCY_ORDER: &str = "ETAOINSHRDLCUMWFGYPBVKJXQZ";

/// Frequency weight of a letter: 26 for `E` down to 1 for `Z`, 0 for anything else.
pub fn letter_weight(ch: char) -> u32 {
    FREQUENCY_ORDER
        .find(ch)
        .map(|pos| (FREQUENCY_ORDER.len() - pos) as u32)
        .unwrap_or(0)
}

/// Sort key: new letters, then frequency of the unique letters, then shorter words.
pub fn score_word(word: &str, typed_letters: &BTreeSet<char>) -> (usize, u32, Reverse<usize>) {
    let unique: BTreeSet<char> = word.chars().collect();
    let fresh = unique.difference(typed_letters).count();
    let weight = unique.iter().map(|&c| letter_weight(c)).sum();
    (fresh, weight, Reverse(word.len()))
}

/// Filters and orders the words containing `gram`.
///
/// Words shorter than `min_length` or already used are dropped, duplicates
/// from the index are collapsed, and the rest is sorted best-first. Equal
/// scores keep index order.
pub fn rank_candidates(
    index: &NgramIndex,
    gram: &str,
    min_length: usize,
    typed_letters: &BTreeSet<char>,
    used_words: &HashSet<String>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut matches: Vec<&str> = index
        .lookup(gram)
        .into_iter()
        .filter(|w| w.len() >= min_length && !used_words.contains(*w))
        .filter(|w| seen.insert(*w))
        .collect();

    // sort_by_cached_key is stable
    matches.sort_by_cached_key(|w| Reverse(score_word(w, typed_letters)));
    matches.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(list: &[&str]) -> NgramIndex {
        NgramIndex::build(list.iter().map(|w| w.to_string()).collect())
    }

    #[test]
    fn test_letter_weight_order() {
        assert_eq!(letter_weight('E'), 26);
        assert_eq!(letter_weight('Z'), 1);
        assert!(letter_weight('T') > letter_weight('A'));
        assert!(letter_weight('C') > letter_weight('U'));
        assert_eq!(letter_weight('?'), 0);
    }

    #[test]
    fn test_ranking_excludes_non_matching_words() {
        let idx = index(&["CAT", "CAR", "DOG"]);
        let ranked = rank_candidates(&idx, "CA", 1, &BTreeSet::new(), &HashSet::new());
        assert_eq!(ranked.len(), 2);
        assert!(ranked.contains(&"CAT".to_string()));
        assert!(ranked.contains(&"CAR".to_string()));
    }

    #[test]
    fn test_ranking_prefers_new_letters() {
        let idx = index(&["TENT", "TEN", "STEAK"]);
        let typed: BTreeSet<char> = "SK".chars().collect();
        // Three fresh letters each; STEAK's letters weigh more and TEN beats TENT on length
        let ranked = rank_candidates(&idx, "TE", 1, &typed, &HashSet::new());
        assert_eq!(ranked, vec!["STEAK", "TEN", "TENT"]);
    }

    #[test]
    fn test_ranking_filters_min_length_and_used() {
        let idx = index(&["CAT", "CATS", "SCATTER"]);
        let used: HashSet<String> = ["CATS".to_string()].into_iter().collect();
        let ranked = rank_candidates(&idx, "CAT", 4, &BTreeSet::new(), &used);
        assert_eq!(ranked, vec!["SCATTER"]);
    }

    #[test]
    fn test_ranking_collapses_index_duplicates() {
        let idx = index(&["BANANA"]);
        let ranked = rank_candidates(&idx, "AN", 1, &BTreeSet::new(), &HashSet::new());
        assert_eq!(ranked, vec!["BANANA"]);
    }

    #[test]
    fn test_equal_scores_keep_index_order() {
        // Anagrams score identically
        let idx = index(&["STOP", "POTS", "TOPS"]);
        let ranked = rank_candidates(&idx, "OP", 1, &BTreeSet::new(), &HashSet::new());
        assert_eq!(ranked, vec!["STOP", "TOPS"]);
        let ranked = rank_candidates(&idx, "TO", 1, &BTreeSet::new(), &HashSet::new());
        assert_eq!(ranked, vec!["STOP", "TOPS"]);
    }
}
