//! Multi-profile recognition fusion.
//!
//! Every profile reads the same image; each reading is cleaned into a short
//! letters-only candidate and scored, and the best candidate wins. A profile
//! that errors or yields no letters is skipped without affecting the others.

use tracing::debug;

use super::engine::Recognizer;
use super::preprocess::NormalizedImage;
use super::profile::RecognitionProfile;

// Precise scoring works in half-points so the 0.5 tier stays integral.
const PRECISE_LENGTH_WEIGHT: i32 = 20;
const PRECISE_TIER_WEIGHTS: [i32; 3] = [4, 2, 1];
const LONE_L_PENALTY: i32 = 6;
const CONTAINS_U_PENALTY: i32 = 4;

const ROBUST_LENGTH_WEIGHT: i32 = 10;
const ROBUST_TIER_WEIGHTS: [i32; 3] = [3, 2, 1];

/// Outcome of one profile invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attempt {
    Candidate(String),
    Skip(SkipReason),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The recognizer returned an error
    Failed(String),
    /// The output contained no usable letters
    NoLetters,
}

/// How candidates are ranked against each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scoring {
    /// Length and letter frequency, penalizing readings that are usually misreads
    Precise,
    /// Length and letter frequency only
    Robust,
}

impl Scoring {
    pub fn score(self, candidate: &str) -> i32 {
        match self {
            Scoring::Precise => {
                let mut score = PRECISE_LENGTH_WEIGHT * candidate.len() as i32
                    + tier_bonus(candidate, &PRECISE_TIER_WEIGHTS);
                if candidate == "L" {
                    score -= LONE_L_PENALTY;
                }
                if candidate.contains('U') {
                    score -= CONTAINS_U_PENALTY;
                }
                score
            }
            Scoring::Robust => {
                ROBUST_LENGTH_WEIGHT * candidate.len() as i32
                    + tier_bonus(candidate, &ROBUST_TIER_WEIGHTS)
            }
        }
    }
}

fn tier_bonus(candidate: &str, weights: &[i32; 3]) -> i32 {
    candidate
        .chars()
        .map(|ch| match ch {
            'E' | 'T' | 'A' | 'O' | 'I' | 'N' => weights[0],
            'S' | 'H' | 'R' | 'D' | 'L' | 'U' => weights[1],
            'C' | 'M' | 'F' | 'W' | 'Y' => weights[2],
            _ => 0,
        })
        .sum()
}

/// Per-call fusion settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FusionOptions {
    pub max_len: usize,
    /// Apply the L/U correction pass
    pub char_correction: bool,
    pub scoring: Scoring,
}

impl FusionOptions {
    pub fn precise(max_len: usize, char_correction: bool) -> Self {
        Self {
            max_len,
            char_correction,
            scoring: Scoring::Precise,
        }
    }

    pub fn robust(max_len: usize) -> Self {
        Self {
            max_len,
            char_correction: false,
            scoring: Scoring::Robust,
        }
    }
}

/// Maps characters the recognizer commonly confuses with letters.
pub fn confusion(ch: char) -> char {
    match ch {
        '0' => 'O',
        '1' | '|' | 'l' | '!' => 'I',
        '5' => 'S',
        '6' => 'G',
        '8' => 'B',
        other => other,
    }
}

/// Reduces raw recognizer output to uppercase A–Z letters.
///
/// The confusion table is applied to the raw characters so lowercase `l`
/// is still distinguishable from `L`.
pub fn letters_only(raw: &str) -> Vec<char> {
    raw.chars()
        .map(confusion)
        .flat_map(char::to_uppercase)
        .filter(|ch| ch.is_ascii_uppercase())
        .collect()
}

/// A lone `L` is almost always an `I`; `U` is read for `O` often enough to always swap.
pub fn correct_letters(letters: &mut [char]) {
    let single = letters.len() == 1;
    for ch in letters.iter_mut() {
        match *ch {
            'L' if single => *ch = 'I',
            'U' => *ch = 'O',
            _ => {}
        }
    }
}

/// Turns one raw reading into a candidate.
pub fn clean_candidate(raw: &str, options: &FusionOptions) -> Option<String> {
    let mut letters = letters_only(raw);
    if letters.is_empty() {
        return None;
    }
    if options.char_correction {
        correct_letters(&mut letters);
    }
    Some(letters.into_iter().take(options.max_len.max(1)).collect())
}

/// Invokes one profile, converting errors into a skip.
pub fn attempt(
    recognizer: &dyn Recognizer,
    image: &NormalizedImage,
    profile: &RecognitionProfile,
    options: &FusionOptions,
) -> Attempt {
    match recognizer.recognize(image, profile) {
        Ok(raw) => match clean_candidate(&raw, options) {
            Some(candidate) => Attempt::Candidate(candidate),
            None => Attempt::Skip(SkipReason::NoLetters),
        },
        Err(e) => Attempt::Skip(SkipReason::Failed(e.to_string())),
    }
}

/// Runs every profile and returns the highest-scoring candidate.
///
/// Ties go to the earliest profile. Returns an empty string when no profile
/// produced letters.
pub fn fuse(
    recognizer: &dyn Recognizer,
    image: &NormalizedImage,
    profiles: &[RecognitionProfile],
    options: &FusionOptions,
) -> String {
    let mut best: Option<(i32, String)> = None;

    for profile in profiles {
        match attempt(recognizer, image, profile, options) {
            Attempt::Candidate(candidate) => {
                let score = options.scoring.score(&candidate);
                if best.as_ref().is_none_or(|(top, _)| score > *top) {
                    best = Some((score, candidate));
                }
            }
            Attempt::Skip(reason) => {
                debug!(
                    "profile oem={} psm={} skipped: {:?}",
                    profile.engine_mode, profile.segmentation_mode, reason
                );
            }
        }
    }

    best.map(|(_, candidate)| candidate).unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ocr::preprocess::{normalize, NormalizeParams};
    use anyhow::{anyhow, Result};
    use image::{Rgba, RgbaImage};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Answers per page segmentation mode; missing modes fail.
    pub struct ScriptedRecognizer {
        pub answers: Mutex<HashMap<(u8, u8), String>>,
        pub calls: AtomicUsize,
    }

    impl ScriptedRecognizer {
        pub fn new(answers: &[((u8, u8), &str)]) -> Self {
            Self {
                answers: Mutex::new(
                    answers
                        .iter()
                        .map(|(k, v)| (*k, v.to_string()))
                        .collect(),
                ),
                calls: AtomicUsize::new(0),
            }
        }

        /// Replaces every scripted answer.
        pub fn rescript(&self, answers: &[((u8, u8), &str)]) {
            *self.answers.lock().unwrap() = answers
                .iter()
                .map(|(k, v)| (*k, v.to_string()))
                .collect();
        }
    }

    impl Recognizer for ScriptedRecognizer {
        fn recognize(&self, _image: &NormalizedImage, profile: &RecognitionProfile) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answers
                .lock()
                .unwrap()
                .get(&(profile.engine_mode, profile.segmentation_mode))
                .cloned()
                .ok_or_else(|| anyhow!("engine crashed"))
        }
    }

    pub fn blank_image() -> NormalizedImage {
        normalize(
            &RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255])),
            &NormalizeParams::default(),
        )
        .unwrap()
    }

    fn profiles() -> Vec<RecognitionProfile> {
        vec![
            RecognitionProfile::new(3, 8),
            RecognitionProfile::new(3, 7),
            RecognitionProfile::new(3, 6),
        ]
    }

    #[test]
    fn test_letters_only_maps_confusions() {
        assert_eq!(letters_only("c0 1!\n"), vec!['C', 'O', 'I', 'I']);
        assert_eq!(letters_only("5|6-8l"), vec!['S', 'I', 'G', 'B', 'I']);
        assert_eq!(letters_only("ab é?"), vec!['A', 'B']);
    }

    #[test]
    fn test_correct_letters() {
        let mut lone = vec!['L'];
        correct_letters(&mut lone);
        assert_eq!(lone, vec!['I']);

        let mut pair = vec!['L', 'U'];
        correct_letters(&mut pair);
        assert_eq!(pair, vec!['L', 'O']);
    }

    #[test]
    fn test_clean_candidate_truncates() {
        let opts = FusionOptions::precise(2, true);
        assert_eq!(clean_candidate("abcd", &opts), Some("AB".to_string()));
        assert_eq!(clean_candidate(" 42 ", &FusionOptions::precise(3, true)), None);
    }

    #[test]
    fn test_clean_candidate_without_correction_keeps_u() {
        let opts = FusionOptions::precise(3, false);
        assert_eq!(clean_candidate("qu", &opts), Some("QU".to_string()));
    }

    #[test]
    fn test_precise_score_penalties() {
        // Lone L scores below a plain unranked letter
        assert!(Scoring::Precise.score("L") < Scoring::Precise.score("K") + 2);
        assert!(Scoring::Precise.score("UN") < Scoring::Precise.score("ON"));
        assert!(Scoring::Precise.score("EA") > Scoring::Precise.score("CM"));
        assert!(Scoring::Precise.score("ZZZ") > Scoring::Precise.score("EA"));
    }

    #[test]
    fn test_robust_score_ignores_penalties() {
        assert_eq!(Scoring::Robust.score("L"), 12);
        assert_eq!(Scoring::Robust.score("QU"), 22);
        assert_eq!(Scoring::Robust.score("ETC"), 37);
    }

    #[test]
    fn test_fuse_picks_highest_score() {
        let rec = ScriptedRecognizer::new(&[((3, 8), "A"), ((3, 7), "ING"), ((3, 6), "IN")]);
        let best = fuse(&rec, &blank_image(), &profiles(), &FusionOptions::precise(3, true));
        assert_eq!(best, "ING");
        assert_eq!(rec.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_fuse_ties_go_to_first_profile() {
        let rec = ScriptedRecognizer::new(&[((3, 8), "TA"), ((3, 7), "AT"), ((3, 6), "OE")]);
        let best = fuse(&rec, &blank_image(), &profiles(), &FusionOptions::precise(3, true));
        assert_eq!(best, "TA");
    }

    #[test]
    fn test_fuse_skips_failures_and_empty_output() {
        // (3, 8) is missing and fails, (3, 7) yields only digits-as-noise
        let rec = ScriptedRecognizer::new(&[((3, 7), "  \n"), ((3, 6), "qz")]);
        let best = fuse(&rec, &blank_image(), &profiles(), &FusionOptions::precise(3, true));
        assert_eq!(best, "QZ");
    }

    #[test]
    fn test_fuse_returns_empty_when_nothing_qualifies() {
        let rec = ScriptedRecognizer::new(&[]);
        let best = fuse(&rec, &blank_image(), &profiles(), &FusionOptions::precise(3, true));
        assert_eq!(best, "");
    }

    #[test]
    fn test_attempt_reports_skip_reason() {
        let rec = ScriptedRecognizer::new(&[((3, 8), "##")]);
        let opts = FusionOptions::precise(3, true);
        assert_eq!(
            attempt(&rec, &blank_image(), &RecognitionProfile::new(3, 8), &opts),
            Attempt::Skip(SkipReason::NoLetters)
        );
        assert!(matches!(
            attempt(&rec, &blank_image(), &RecognitionProfile::new(3, 7), &opts),
            Attempt::Skip(SkipReason::Failed(_))
        ));
    }
}
