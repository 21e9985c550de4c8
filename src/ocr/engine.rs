use anyhow::{anyhow, Context, Result};
use std::process::Command;
use tempfile::NamedTempFile;

use super::preprocess::NormalizedImage;
use super::profile::RecognitionProfile;
use super::setup::TesseractPaths;

/// Black-box text recognizer: one image, one profile, raw text out.
pub trait Recognizer: Send + Sync {
    fn recognize(&self, image: &NormalizedImage, profile: &RecognitionProfile) -> Result<String>;
}

/// Runs the tesseract command-line tool once per call.
#[derive(Clone, Debug)]
pub struct TesseractCli {
    paths: TesseractPaths,
}

impl TesseractCli {
    pub fn new(paths: TesseractPaths) -> Self {
        Self { paths }
    }

    /// Builds the argument list that follows the input image path.
    pub fn build_args(&self, profile: &RecognitionProfile) -> Vec<String> {
        let mut args = vec![
            "stdout".to_string(),
            "--oem".to_string(),
            profile.engine_mode.to_string(),
            "--psm".to_string(),
            profile.segmentation_mode.to_string(),
        ];
        if let Some(tessdata) = &self.paths.tessdata {
            args.push("--tessdata-dir".to_string());
            args.push(tessdata.to_string_lossy().replace('\\', "/"));
        }
        for (key, value) in profile.config_variables() {
            args.push("-c".to_string());
            args.push(format!("{}={}", key, value));
        }
        args
    }
}

impl Recognizer for TesseractCli {
    fn recognize(&self, image: &NormalizedImage, profile: &RecognitionProfile) -> Result<String> {
        // Save image to temporary file
        let temp_input = NamedTempFile::with_suffix(".png")?;
        image
            .as_image()
            .save(temp_input.path())
            .context("failed to write recognizer input")?;

        let output = Command::new(&self.paths.executable)
            .arg(temp_input.path())
            .args(self.build_args(profile))
            .output()
            .with_context(|| format!("failed to run {}", self.paths.executable.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
