//! Application configuration.
//!
//! Loads settings from config.json next to the executable. Every field has a
//! default, so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::capture::RegionCorners;
use crate::ocr::NormalizeParams;

/// Complete application configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Delay between polling cycles (milliseconds)
    #[serde(default = "default_loop_interval_ms")]
    pub loop_interval_ms: u64,
    /// Number of suggestions shown
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Binarization threshold
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    /// Integer upscale factor before recognition
    #[serde(default = "default_upscale")]
    pub upscale: u32,
    /// Percent of pixels clipped from each histogram tail by autocontrast
    #[serde(default = "default_autocontrast_cutoff")]
    pub autocontrast_cutoff: f32,
    /// Initial state of the L/U correction pass
    #[serde(default = "default_true")]
    pub char_correction: bool,
    /// Initial state of image archival
    #[serde(default = "default_true")]
    pub save_images: bool,
    /// How many times a stuck prompt is re-read before giving up
    #[serde(default = "default_max_prompt_retries")]
    pub max_prompt_retries: u32,
    /// Initial minimum suggested word length
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// Pause before typing a word, lets the hotkey be released (milliseconds)
    #[serde(default = "default_type_delay_ms")]
    pub type_delay_ms: u64,
    /// Pause between typed characters (milliseconds)
    #[serde(default = "default_key_interval_ms")]
    pub key_interval_ms: u64,
    /// Word list loaded at startup
    #[serde(default)]
    pub dictionary_path: Option<PathBuf>,
    #[serde(default)]
    pub region_a: Option<RegionCorners>,
    #[serde(default)]
    pub region_b: Option<RegionCorners>,
    /// Explicit tesseract executable
    #[serde(default)]
    pub tesseract_path: Option<PathBuf>,
    /// Explicit tessdata directory
    #[serde(default)]
    pub tessdata_dir: Option<PathBuf>,
    /// Debug-level logging
    #[serde(default)]
    pub debug: bool,
}

fn default_loop_interval_ms() -> u64 {
    180
}

fn default_top_k() -> usize {
    5
}

fn default_threshold() -> u8 {
    170
}

fn default_upscale() -> u32 {
    2
}

fn default_autocontrast_cutoff() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_max_prompt_retries() -> u32 {
    3
}

fn default_min_length() -> usize {
    1
}

fn default_type_delay_ms() -> u64 {
    80
}

fn default_key_interval_ms() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            loop_interval_ms: default_loop_interval_ms(),
            top_k: default_top_k(),
            threshold: default_threshold(),
            upscale: default_upscale(),
            autocontrast_cutoff: default_autocontrast_cutoff(),
            char_correction: true,
            save_images: true,
            max_prompt_retries: default_max_prompt_retries(),
            min_length: default_min_length(),
            type_delay_ms: default_type_delay_ms(),
            key_interval_ms: default_key_interval_ms(),
            dictionary_path: None,
            region_a: None,
            region_b: None,
            tesseract_path: None,
            tessdata_dir: None,
            debug: false,
        }
    }
}

impl AppConfig {
    pub fn loop_interval(&self) -> Duration {
        Duration::from_millis(self.loop_interval_ms.max(1))
    }

    pub fn key_interval(&self) -> Duration {
        Duration::from_millis(self.key_interval_ms)
    }

    pub fn normalize_params(&self) -> NormalizeParams {
        NormalizeParams {
            upscale: self.upscale.max(1),
            cutoff_percent: self.autocontrast_cutoff,
            threshold: self.threshold,
        }
    }
}

/// Loads configuration from `path`, falling back to defaults on any problem.
pub fn load_config(path: &Path) -> AppConfig {
    info!("Looking for config at: {}", path.display());

    if !path.exists() {
        info!("config.json not found. Using default config.");
        return AppConfig::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => {
                info!("Config loaded from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to parse config.json: {}. Using defaults.", e);
                AppConfig::default()
            }
        },
        Err(e) => {
            warn!("Failed to read config.json: {}. Using defaults.", e);
            AppConfig::default()
        }
    }
}
