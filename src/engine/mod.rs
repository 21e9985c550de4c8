//! The word-suggestion engine.
//!
//! One `Engine` owns every piece of mutable state: the dictionary index, the
//! session, the change-detector cache and the stuck-prompt corrector. The
//! polling loop and action threads share it through an `Arc`.
//!
//! Locks:
//! - `index` is a read-mostly guard holding an `Arc`; readers clone the `Arc`
//!   and release it immediately, loads build a new index aside and swap it in.
//! - `cache` is held for a whole cycle, which also serializes cycles.
//! - `state` is only held for short, non-blocking updates.
//!
//! When both `cache` and `state` are needed, `cache` is taken first.

pub mod session;

use anyhow::Result;
use chrono::Local;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::automation::correction::PromptCorrector;
use crate::automation::input::KeystrokeInjector;
use crate::capture::{ImageSink, RegionCorners, RegionSlot, ScreenCapture};
use crate::config::AppConfig;
use crate::dictionary::{normalize_words, rank_candidates, read_word_file, NgramIndex};
use crate::error::EngineError;
use crate::ocr::{
    escalation_profiles, fuse, normalize, primary_profiles, ChangeDetector, FusionOptions,
    NormalizeParams, NormalizedImage, RecognitionProfile, Recognizer, Token,
};

use session::Session;

/// External systems the engine talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub capture: Arc<dyn ScreenCapture>,
    pub recognizer: Arc<dyn Recognizer>,
    pub injector: Arc<dyn KeystrokeInjector>,
    pub archive: Arc<dyn ImageSink>,
}

/// What a cycle found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleStatus {
    /// Region A has no coordinates
    RegionUnset,
    /// No usable prompt was read
    NoPrompt,
    /// A prompt was read but no dictionary word fits
    NoMatches,
    Matched,
}

/// Result of one polling cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleReport {
    pub token: Token,
    /// Top suggestions, best first
    pub suggestions: Vec<String>,
    pub status: CycleStatus,
    /// A stuck prompt is being re-read
    pub correcting: bool,
    /// The retry ceiling was reached; the user has to intervene
    pub correction_exhausted: bool,
}

impl CycleReport {
    fn empty(status: CycleStatus) -> Self {
        Self {
            token: Token::empty(),
            suggestions: Vec::new(),
            status,
            correcting: false,
            correction_exhausted: false,
        }
    }

    pub fn best(&self) -> Option<&str> {
        self.suggestions.first().map(String::as_str)
    }
}

/// Read-only view for the presentation layer.
#[derive(Clone, Debug)]
pub struct EngineSnapshot {
    pub regions: [Option<RegionCorners>; 2],
    pub word_count: usize,
    pub typed_letters: String,
    pub used_word_count: usize,
    pub save_images: bool,
    pub char_correction: bool,
    pub min_length: usize,
    pub best_word: String,
    pub last_report: Option<CycleReport>,
}

struct EngineState {
    regions: [Option<RegionCorners>; 2],
    session: Session,
    corrector: PromptCorrector,
    current_token: Token,
    best_word: String,
    min_length: usize,
    save_images: bool,
    char_correction: bool,
    last_report: Option<CycleReport>,
}

pub struct Engine {
    collaborators: Collaborators,
    normalize_params: NormalizeParams,
    top_k: usize,
    type_delay: Duration,
    primary: Vec<RecognitionProfile>,
    escalation: Vec<RecognitionProfile>,
    index: RwLock<Arc<NgramIndex>>,
    cache: Mutex<ChangeDetector>,
    state: Mutex<EngineState>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Engine {
    pub fn new(config: &AppConfig, collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            normalize_params: config.normalize_params(),
            top_k: config.top_k.max(1),
            type_delay: Duration::from_millis(config.type_delay_ms),
            primary: primary_profiles(),
            escalation: escalation_profiles(),
            index: RwLock::new(Arc::new(NgramIndex::default())),
            cache: Mutex::new(ChangeDetector::new()),
            state: Mutex::new(EngineState {
                regions: [config.region_a, config.region_b],
                session: Session::new(),
                corrector: PromptCorrector::new(config.max_prompt_retries),
                current_token: Token::empty(),
                best_word: String::new(),
                min_length: config.min_length.max(1),
                save_images: config.save_images,
                char_correction: config.char_correction,
                last_report: None,
            }),
        }
    }

    fn index_snapshot(&self) -> Arc<NgramIndex> {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ---------------------
    // Dictionary
    // ---------------------

    /// Replaces the dictionary. On failure the previous index stays active.
    pub fn load_dictionary<I, S>(&self, words: I) -> Result<usize, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = normalize_words(words);
        if words.is_empty() {
            warn!("Dictionary load rejected: no usable words");
            return Err(EngineError::DictionaryEmpty);
        }
        Ok(self.install_index(words))
    }

    pub fn load_dictionary_file(&self, path: &Path) -> Result<usize, EngineError> {
        let words = read_word_file(path).inspect_err(|e| warn!("{}", e))?;
        let count = self.install_index(words);
        info!("Loaded {} words from {}", count, path.display());
        Ok(count)
    }

    fn install_index(&self, words: Vec<String>) -> usize {
        let index = NgramIndex::build(words);
        let count = index.word_count();
        let (bigrams, trigrams) = index.gram_counts();
        *self.index.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(index);
        info!(
            "Loaded {} words (2/3-gram indexed: {} + {} keys)",
            count, bigrams, trigrams
        );
        count
    }

    pub fn word_count(&self) -> usize {
        self.index_snapshot().word_count()
    }

    // ---------------------
    // Recognition cycle
    // ---------------------

    fn capture_normalized(&self, corners: &RegionCorners) -> Option<NormalizedImage> {
        let rect = corners.to_rect()?;
        match self.collaborators.capture.capture(&rect) {
            Ok(raw) => normalize(&raw, &self.normalize_params),
            Err(e) => {
                debug!("Capture failed for {:?}: {}", rect, e);
                None
            }
        }
    }

    fn persist(&self, image: &NormalizedImage, slot: RegionSlot) {
        if let Err(e) = self
            .collaborators
            .archive
            .persist(image.as_image(), slot, Local::now())
        {
            debug!("Image archival failed: {}", e);
        }
    }

    /// Captures, recognizes and ranks once.
    ///
    /// Never fails: capture and recognizer problems degrade to an empty token.
    pub fn run_cycle(&self, min_length: usize) -> CycleReport {
        let mut cache = lock(&self.cache);
        let (regions, save_images, char_correction) = {
            let state = lock(&self.state);
            (state.regions, state.save_images, state.char_correction)
        };

        if regions[RegionSlot::A.index()].is_none() {
            return self.publish(Token::empty(), CycleReport::empty(CycleStatus::RegionUnset));
        }

        let recognizer = self.collaborators.recognizer.as_ref();
        let options = FusionOptions::precise(Token::MAX_LEN, char_correction);
        let mut slot_a_image = None;
        let mut tokens = Vec::with_capacity(2);

        for slot in RegionSlot::ALL {
            let Some(corners) = &regions[slot.index()] else {
                continue;
            };
            let Some(image) = self.capture_normalized(corners) else {
                tokens.push(Token::empty());
                continue;
            };
            let candidate = cache.get_or_recognize(slot, &image, |img| {
                debug!("Region {} changed, recognizing", slot);
                fuse(recognizer, img, &self.primary, &options)
            });
            if save_images && !candidate.is_empty() {
                self.persist(&image, slot);
            }
            tokens.push(Token::from_candidate(&candidate));
            if slot == RegionSlot::A {
                slot_a_image = Some(image);
            }
        }

        let mut token = Token::select(&tokens);

        let escalation = lock(&self.state).corrector.begin_cycle(&token);
        if let Some(attempt) = escalation {
            info!("Prompt {} unchanged after typing, re-reading (attempt {})", token, attempt);
            let alternate = slot_a_image
                .as_ref()
                .map(|img| {
                    Token::from_candidate(&fuse(
                        recognizer,
                        img,
                        &self.escalation,
                        &FusionOptions::robust(Token::MAX_LEN),
                    ))
                })
                .unwrap_or_default();
            let mut state = lock(&self.state);
            let corrected = state.corrector.finish_escalation(&token, &alternate);
            if corrected != token {
                info!("Prompt corrected: {} -> {}", token, corrected);
            } else if state.corrector.is_exhausted_for(&token) {
                warn!("Prompt {} still unchanged after {} re-reads", token, attempt);
            }
            token = corrected;
        }
        drop(cache);

        if token.is_empty() {
            return self.publish(token, CycleReport::empty(CycleStatus::NoPrompt));
        }

        let index = self.index_snapshot();
        let ranked = {
            let state = lock(&self.state);
            rank_candidates(
                &index,
                token.as_str(),
                min_length,
                state.session.typed_letters(),
                state.session.used_words(),
            )
        };
        let status = if ranked.is_empty() {
            CycleStatus::NoMatches
        } else {
            CycleStatus::Matched
        };
        let report = CycleReport {
            token: token.clone(),
            suggestions: ranked.into_iter().take(self.top_k).collect(),
            status,
            correcting: false,
            correction_exhausted: false,
        };
        self.publish(token, report)
    }

    fn publish(&self, token: Token, mut report: CycleReport) -> CycleReport {
        let mut state = lock(&self.state);
        report.correcting = state.corrector.is_correcting_for(&token);
        report.correction_exhausted = state.corrector.is_exhausted_for(&token);
        state.best_word = report.best().unwrap_or_default().to_string();
        state.current_token = token;
        state.last_report = Some(report.clone());
        report
    }

    // ---------------------
    // Actions
    // ---------------------

    /// Submits a word: records it in the session, arms the stuck-prompt
    /// check with the current prompt, then types it.
    pub fn accept_action(&self, word: &str) -> Result<()> {
        let word = word.trim().to_ascii_uppercase();
        if word.is_empty() {
            return Ok(());
        }
        {
            let mut state = lock(&self.state);
            let current = state.current_token.clone();
            state.corrector.on_action_accepted(&current);
            state.session.accept(&word);
            info!(
                "Typing {} (prompt {}, used letters: {})",
                word,
                current,
                state.session.typed_letters_string()
            );
        }
        std::thread::sleep(self.type_delay);
        self.collaborators.injector.type_text(&word)
    }

    /// Types the current best suggestion. Returns false when there is none.
    pub fn type_best_word(&self) -> Result<bool> {
        let best = lock(&self.state).best_word.clone();
        if best.is_empty() {
            return Ok(false);
        }
        self.accept_action(&best)?;
        Ok(true)
    }

    /// Treats the current prompt as stuck so the next matching reading escalates.
    pub fn force_correction(&self) -> bool {
        let mut state = lock(&self.state);
        if state.current_token.is_empty() {
            return false;
        }
        let current = state.current_token.clone();
        state.corrector.on_action_accepted(&current);
        info!("Will auto-correct {} on next detection if it persists", current);
        true
    }

    pub fn reset_used_words(&self) {
        lock(&self.state).session.reset_used_words();
        info!("Used word history cleared");
    }

    pub fn reset_typed_letters(&self) {
        lock(&self.state).session.reset_typed_letters();
        info!("Used letters cleared");
    }

    // ---------------------
    // Settings
    // ---------------------

    pub fn set_region(&self, slot: RegionSlot, top_left: (i32, i32), bottom_right: (i32, i32)) {
        let corners = RegionCorners::new(top_left, bottom_right);
        let mut cache = lock(&self.cache);
        cache.invalidate(slot);
        lock(&self.state).regions[slot.index()] = Some(corners);
        info!("Region {} set to {}", slot, corners);
    }

    pub fn clear_region(&self, slot: RegionSlot) {
        let mut cache = lock(&self.cache);
        cache.invalidate(slot);
        lock(&self.state).regions[slot.index()] = None;
        info!("Region {} cleared", slot);
    }

    pub fn region(&self, slot: RegionSlot) -> Option<RegionCorners> {
        lock(&self.state).regions[slot.index()]
    }

    /// Fails when region A is unset; the polling loop cannot start without it.
    pub fn ensure_ready(&self) -> Result<(), EngineError> {
        match self.region(RegionSlot::A) {
            Some(_) => Ok(()),
            None => Err(EngineError::RegionUnset(RegionSlot::A)),
        }
    }

    pub fn toggle_image_saving(&self) -> bool {
        let mut state = lock(&self.state);
        state.save_images = !state.save_images;
        info!("Save images: {}", if state.save_images { "ON" } else { "OFF" });
        state.save_images
    }

    /// Flips the L/U correction pass. Cached tokens were read with the old
    /// setting, so both slots are re-recognized on the next cycle.
    pub fn toggle_char_correction(&self) -> bool {
        let mut cache = lock(&self.cache);
        for slot in RegionSlot::ALL {
            cache.invalidate(slot);
        }
        let mut state = lock(&self.state);
        state.char_correction = !state.char_correction;
        info!(
            "Char correction: {}",
            if state.char_correction { "ON" } else { "OFF" }
        );
        state.char_correction
    }

    pub fn set_min_length(&self, min_length: usize) {
        lock(&self.state).min_length = min_length.max(1);
    }

    pub fn min_length(&self) -> usize {
        lock(&self.state).min_length
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let word_count = self.word_count();
        let state = lock(&self.state);
        EngineSnapshot {
            regions: state.regions,
            word_count,
            typed_letters: state.session.typed_letters_string(),
            used_word_count: state.session.used_words().len(),
            save_images: state.save_images,
            char_correction: state.char_correction,
            min_length: state.min_length,
            best_word: state.best_word.clone(),
            last_report: state.last_report.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::automation::input::tests::RecordingKeyboard;
    use crate::capture::region::ScreenRect;
    use crate::ocr::fusion::tests::ScriptedRecognizer;
    use chrono::DateTime;
    use image::{GrayImage, Rgba, RgbaImage};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;

    /// Serves one shared frame for every rectangle.
    pub struct FakeScreen {
        frame: Mutex<RgbaImage>,
    }

    impl FakeScreen {
        fn new(dark_columns: u32) -> Self {
            Self {
                frame: Mutex::new(frame(dark_columns)),
            }
        }

        pub fn show(&self, dark_columns: u32) {
            *self.frame.lock().unwrap() = frame(dark_columns);
        }
    }

    /// White frame with a black band on the left.
    fn frame(dark_columns: u32) -> RgbaImage {
        RgbaImage::from_fn(8, 4, |x, _| {
            if x < dark_columns {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    impl ScreenCapture for FakeScreen {
        fn capture(&self, _rect: &ScreenRect) -> Result<RgbaImage> {
            Ok(self.frame.lock().unwrap().clone())
        }
    }

    /// Counts archival attempts; fails every one while `failing` is set.
    #[derive(Default)]
    pub struct CountingSink {
        pub saved: AtomicUsize,
        pub failing: AtomicBool,
    }

    impl ImageSink for CountingSink {
        fn persist(&self, _image: &GrayImage, _slot: RegionSlot, _at: DateTime<Local>) -> Result<()> {
            self.saved.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(anyhow::anyhow!("disk full"));
            }
            Ok(())
        }
    }

    pub struct Harness {
        pub engine: Arc<Engine>,
        pub screen: Arc<FakeScreen>,
        pub recognizer: Arc<ScriptedRecognizer>,
        pub keyboard: Arc<RecordingKeyboard>,
        pub sink: Arc<CountingSink>,
    }

    /// Engine with region A set, no typing delay and scripted readings.
    pub fn harness(answers: &[((u8, u8), &str)]) -> Harness {
        let screen = Arc::new(FakeScreen::new(2));
        let recognizer = Arc::new(ScriptedRecognizer::new(answers));
        let keyboard = Arc::new(RecordingKeyboard::default());
        let sink = Arc::new(CountingSink::default());
        let config = AppConfig {
            type_delay_ms: 0,
            region_a: Some(RegionCorners::new((0, 0), (8, 4))),
            ..Default::default()
        };
        let engine = Arc::new(Engine::new(
            &config,
            Collaborators {
                capture: screen.clone(),
                recognizer: recognizer.clone(),
                injector: keyboard.clone(),
                archive: sink.clone(),
            },
        ));
        Harness {
            engine,
            screen,
            recognizer,
            keyboard,
            sink,
        }
    }

    fn calls(h: &Harness) -> usize {
        h.recognizer.calls.load(Ordering::SeqCst)
    }

    #[test]
    fn test_suggestions_for_prompt() {
        let h = harness(&[((3, 8), "ca")]);
        h.engine.load_dictionary(["cat", "car", "dog"]).unwrap();

        let report = h.engine.run_cycle(1);

        assert_eq!(report.status, CycleStatus::Matched);
        assert_eq!(report.token.as_str(), "CA");
        assert_eq!(report.suggestions, vec!["CAT", "CAR"]);
        assert_eq!(h.engine.snapshot().best_word, "CAT");
    }

    #[test]
    fn test_unchanged_image_reuses_cached_token() {
        let h = harness(&[((3, 8), "CA")]);
        h.engine.load_dictionary(["CAT"]).unwrap();

        h.engine.run_cycle(1);
        let first = calls(&h);
        assert_eq!(first, primary_profiles().len());

        h.engine.run_cycle(1);
        assert_eq!(calls(&h), first);

        h.screen.show(5);
        h.engine.run_cycle(1);
        assert_eq!(calls(&h), first * 2);
    }

    #[test]
    fn test_region_change_forces_recognition() {
        let h = harness(&[((3, 8), "CA")]);
        h.engine.run_cycle(1);
        let first = calls(&h);

        h.engine.set_region(RegionSlot::A, (0, 0), (8, 4));
        h.engine.run_cycle(1);
        assert_eq!(calls(&h), first * 2);

        h.engine.toggle_char_correction();
        h.engine.run_cycle(1);
        assert_eq!(calls(&h), first * 3);
    }

    #[test]
    fn test_unset_region_reports_without_recognizing() {
        let h = harness(&[((3, 8), "CA")]);
        h.engine.clear_region(RegionSlot::A);

        let report = h.engine.run_cycle(1);

        assert_eq!(report.status, CycleStatus::RegionUnset);
        assert!(report.token.is_empty());
        assert_eq!(calls(&h), 0);
        assert!(matches!(
            h.engine.ensure_ready(),
            Err(EngineError::RegionUnset(RegionSlot::A))
        ));
    }

    #[test]
    fn test_no_letters_means_no_prompt() {
        let h = harness(&[((3, 8), "42?")]);
        h.engine.load_dictionary(["CAT"]).unwrap();

        let report = h.engine.run_cycle(1);

        assert_eq!(report.status, CycleStatus::NoPrompt);
        assert!(report.suggestions.is_empty());
        assert_eq!(h.sink.saved.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_recognized_images_are_archived_when_enabled() {
        let h = harness(&[((3, 8), "CA")]);
        h.engine.run_cycle(1);
        assert_eq!(h.sink.saved.load(Ordering::SeqCst), 1);

        assert!(!h.engine.toggle_image_saving());
        h.engine.run_cycle(1);
        assert_eq!(h.sink.saved.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_accepted_word_is_excluded_and_typed() {
        let h = harness(&[((3, 8), "CA")]);
        h.engine.load_dictionary(["CAT", "CAR"]).unwrap();
        h.engine.run_cycle(1);

        h.engine.accept_action("cat").unwrap();
        let report = h.engine.run_cycle(1);

        assert_eq!(*h.keyboard.typed.lock().unwrap(), vec!["CAT".to_string()]);
        assert!(!report.suggestions.contains(&"CAT".to_string()));
        assert_eq!(report.suggestions, vec!["CAR"]);

        h.engine.reset_used_words();
        let report = h.engine.run_cycle(1);
        assert!(report.suggestions.contains(&"CAT".to_string()));
        assert_eq!(h.engine.snapshot().typed_letters, "ACT");
    }

    #[test]
    fn test_type_best_word_without_suggestion() {
        let h = harness(&[]);
        assert!(!h.engine.type_best_word().unwrap());
        assert!(h.keyboard.typed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_dictionary_load_keeps_index() {
        let h = harness(&[((3, 8), "CA")]);
        assert_eq!(h.engine.load_dictionary(["cat", "car"]).unwrap(), 2);

        assert!(matches!(
            h.engine.load_dictionary(["", "123", "  "]),
            Err(EngineError::DictionaryEmpty)
        ));
        assert_eq!(h.engine.word_count(), 2);
        assert_eq!(h.engine.run_cycle(1).suggestions, vec!["CAT", "CAR"]);
    }

    #[test]
    fn test_min_length_filters_suggestions() {
        let h = harness(&[((3, 8), "CA")]);
        h.engine.load_dictionary(["CAT", "CATALOG"]).unwrap();
        assert_eq!(h.engine.run_cycle(4).suggestions, vec!["CATALOG"]);
    }

    #[test]
    fn test_stuck_prompt_retries_up_to_ceiling() {
        let h = harness(&[((3, 8), "ING")]);
        h.engine.load_dictionary(["SING", "RING"]).unwrap();
        h.engine.run_cycle(1);
        h.engine.accept_action("SING").unwrap();

        for attempt in 1..=3 {
            let before = calls(&h);
            let report = h.engine.run_cycle(1);
            assert_eq!(calls(&h) - before, escalation_profiles().len());
            assert_eq!(report.token.as_str(), "ING");
            assert!(report.correcting);
            assert_eq!(lock(&h.engine.state).corrector.retry_count(), attempt);
        }

        let before = calls(&h);
        let report = h.engine.run_cycle(1);
        assert_eq!(calls(&h), before);
        assert!(report.correction_exhausted);
        assert_eq!(report.suggestions, vec!["RING"]);
    }

    #[test]
    fn test_new_prompt_after_exhaustion_is_not_flagged() {
        let h = harness(&[((3, 8), "ING")]);
        h.engine
            .load_dictionary(["SING", "RING", "ERA", "HER"])
            .unwrap();
        h.engine.run_cycle(1);
        h.engine.accept_action("SING").unwrap();
        for _ in 0..3 {
            h.engine.run_cycle(1);
        }
        assert!(h.engine.run_cycle(1).correction_exhausted);

        h.screen.show(5);
        h.recognizer.rescript(&[((3, 8), "ER")]);
        let report = h.engine.run_cycle(1);

        assert_eq!(report.token.as_str(), "ER");
        assert!(!report.correcting);
        assert!(!report.correction_exhausted);
        let mut suggestions = report.suggestions;
        suggestions.sort();
        assert_eq!(suggestions, vec!["ERA", "HER"]);
    }

    #[test]
    fn test_archival_failure_is_ignored() {
        let h = harness(&[((3, 8), "CA")]);
        h.engine.load_dictionary(["CAT"]).unwrap();
        h.sink.failing.store(true, Ordering::SeqCst);

        let report = h.engine.run_cycle(1);

        assert_eq!(h.sink.saved.load(Ordering::SeqCst), 1);
        assert_eq!(report.status, CycleStatus::Matched);
        assert_eq!(report.suggestions, vec!["CAT"]);
    }

    #[test]
    fn test_lookups_never_see_partial_dictionary() {
        let h = harness(&[((3, 8), "CA")]);
        let small = ["CAT", "CAR"];
        let large = ["CAMP", "CASK", "SCAB"];
        h.engine.load_dictionary(small).unwrap();

        let loader = {
            let engine = h.engine.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    if i % 2 == 0 {
                        engine.load_dictionary(large).unwrap();
                    } else {
                        engine.load_dictionary(small).unwrap();
                    }
                }
            })
        };

        for _ in 0..200 {
            let mut seen = h.engine.run_cycle(1).suggestions;
            seen.sort();
            assert!(
                seen == ["CAR", "CAT"] || seen == ["CAMP", "CASK", "SCAB"],
                "mixed dictionary: {:?}",
                seen
            );
        }
        loader.join().unwrap();
    }

    #[test]
    fn test_stuck_prompt_corrected_by_broader_reading() {
        let h = harness(&[((3, 8), "ING"), ((1, 6), "ONG")]);
        h.engine.load_dictionary(["SING", "LONG"]).unwrap();
        h.engine.run_cycle(1);
        h.engine.accept_action("SING").unwrap();

        let report = h.engine.run_cycle(1);

        assert_eq!(report.token.as_str(), "ONG");
        assert_eq!(report.suggestions, vec!["LONG"]);
        assert!(!report.correcting);
    }

    #[test]
    fn test_force_correction_needs_a_prompt() {
        let h = harness(&[((3, 8), "ING")]);
        assert!(!h.engine.force_correction());

        h.engine.run_cycle(1);
        assert!(h.engine.force_correction());
        assert!(h.engine.run_cycle(1).correcting);
        assert!(h.keyboard.typed.lock().unwrap().is_empty());
    }
}
