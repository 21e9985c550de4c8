use thiserror::Error;

use crate::capture::RegionSlot;

/// Recoverable engine conditions the presentation layer reports to the user.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Region {0} is not set")]
    RegionUnset(RegionSlot),

    #[error("Failed to read dictionary {path}: {reason}")]
    DictionaryLoad { path: String, reason: String },

    #[error("Dictionary contains no usable words")]
    DictionaryEmpty,

    #[error("Live OCR is already running")]
    AlreadyRunning,
}
