//! Recognizer configuration profiles.

/// Letters the recognizer may emit.
pub const LETTER_WHITELIST: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Characters the recognizer must never emit.
pub const DIGIT_BLACKLIST: &str = "0123456789";

/// One configuration of the external recognizer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecognitionProfile {
    /// OCR engine mode (`--oem`)
    pub engine_mode: u8,
    /// Page segmentation mode (`--psm`)
    pub segmentation_mode: u8,
    pub whitelist: &'static str,
    pub blacklist: &'static str,
    /// Additional engine variables passed as `-c key=value`
    pub variables: Vec<(&'static str, &'static str)>,
}

impl RecognitionProfile {
    pub fn new(engine_mode: u8, segmentation_mode: u8) -> Self {
        Self {
            engine_mode,
            segmentation_mode,
            whitelist: LETTER_WHITELIST,
            blacklist: DIGIT_BLACKLIST,
            variables: Vec::new(),
        }
    }

    pub fn with_variable(mut self, key: &'static str, value: &'static str) -> Self {
        self.variables.push((key, value));
        self
    }

    /// All `-c key=value` settings, character filters first.
    pub fn config_variables(&self) -> Vec<(String, String)> {
        let mut vars = vec![
            ("tessedit_char_whitelist".to_string(), self.whitelist.to_string()),
            ("tessedit_char_blacklist".to_string(), self.blacklist.to_string()),
        ];
        vars.extend(
            self.variables
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        vars
    }
}

/// Profiles tried on every recognition, in tie-break order.
///
/// Single word first, then single line, the legacy engine, a uniform block
/// and finally raw line.
pub fn primary_profiles() -> Vec<RecognitionProfile> {
    vec![
        RecognitionProfile::new(3, 8),
        RecognitionProfile::new(3, 7),
        RecognitionProfile::new(1, 8),
        RecognitionProfile::new(3, 6),
        RecognitionProfile::new(3, 13),
    ]
}

/// Broader profiles used when a prompt appears stuck.
///
/// These vary segmentation and noise removal aggressiveness to get a
/// different reading rather than the most precise one.
pub fn escalation_profiles() -> Vec<RecognitionProfile> {
    vec![
        RecognitionProfile::new(3, 6)
            .with_variable("textord_heavy_nr", "2")
            .with_variable("textord_min_linesize", "1"),
        RecognitionProfile::new(1, 6),
        RecognitionProfile::new(3, 13).with_variable("textord_heavy_nr", "1"),
        RecognitionProfile::new(3, 8).with_variable("textord_heavy_nr", "0"),
    ]
}
