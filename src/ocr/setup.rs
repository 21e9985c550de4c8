use anyhow::{anyhow, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::paths;

#[cfg(windows)]
const EXECUTABLE_NAME: &str = "tesseract.exe";
#[cfg(not(windows))]
const EXECUTABLE_NAME: &str = "tesseract";

const INSTALL_DIRS: [&str; 2] = [
    r"C:\Program Files\Tesseract-OCR",
    r"C:\Program Files (x86)\Tesseract-OCR",
];

/// Where the recognizer binary and its models live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TesseractPaths {
    pub executable: PathBuf,
    /// `None` lets tesseract use its compiled-in default
    pub tessdata: Option<PathBuf>,
}

/// Result of probing the installed recognizer.
#[derive(Clone, Debug, Default)]
pub struct TesseractStatus {
    pub found: bool,
    pub version: Option<String>,
    pub languages: Option<Vec<String>>,
}

/// Returns the per-user directory for a locally installed tesseract.
pub fn get_tesseract_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordbomb-ocr")
        .join("tesseract")
}

/// Resolves the executable and tessdata directory.
///
/// Explicit overrides win; then the vendored copy next to the executable,
/// the per-user install, `PATH` and finally the well-known install paths.
pub fn locate_tesseract(
    executable_override: Option<&Path>,
    tessdata_override: Option<&Path>,
) -> Result<TesseractPaths> {
    let executable = match executable_override {
        Some(path) if path.exists() => path.to_path_buf(),
        Some(path) => {
            return Err(anyhow!(
                "Configured tesseract not found: {}",
                path.display()
            ))
        }
        None => find_tesseract_executable()?,
    };
    let tessdata = tessdata_override
        .map(Path::to_path_buf)
        .or_else(find_tessdata_dir);
    Ok(TesseractPaths {
        executable,
        tessdata,
    })
}

/// Finds the tesseract executable, checking local dirs first, then system.
pub fn find_tesseract_executable() -> Result<PathBuf> {
    let local_candidates = [
        paths::get_vendored_tesseract_dir().join(EXECUTABLE_NAME),
        get_tesseract_dir().join(EXECUTABLE_NAME),
    ];
    if let Some(found) = local_candidates.into_iter().find(|p| p.exists()) {
        return Ok(found);
    }

    // Check PATH
    if let Ok(output) = Command::new("tesseract").arg("--version").output() {
        if output.status.success() {
            return Ok(PathBuf::from("tesseract"));
        }
    }

    INSTALL_DIRS
        .iter()
        .map(|dir| PathBuf::from(dir).join("tesseract.exe"))
        .find(|p| p.exists())
        .ok_or_else(|| anyhow!("Tesseract not found. Please install Tesseract-OCR."))
}

/// Finds a tessdata directory containing `eng.traineddata`.
pub fn find_tessdata_dir() -> Option<PathBuf> {
    let mut candidates = vec![
        paths::get_vendored_tesseract_dir().join("tessdata"),
        get_tesseract_dir().join("tessdata"),
    ];
    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        let prefix = PathBuf::from(prefix);
        candidates.push(prefix.join("tessdata"));
        candidates.push(prefix);
    }
    candidates.extend(
        INSTALL_DIRS
            .iter()
            .map(|dir| PathBuf::from(dir).join("tessdata")),
    );

    candidates
        .into_iter()
        .find(|p| p.join("eng.traineddata").exists())
}

/// Probes the recognizer without failing.
pub fn tesseract_status(paths: &TesseractPaths) -> TesseractStatus {
    let version_output = match Command::new(&paths.executable).arg("--version").output() {
        Ok(output) => output,
        Err(_) => return TesseractStatus::default(),
    };
    // Older builds print the banner on stderr
    let banner = format!(
        "{}{}",
        String::from_utf8_lossy(&version_output.stdout),
        String::from_utf8_lossy(&version_output.stderr)
    );

    let mut list_cmd = Command::new(&paths.executable);
    if let Some(tessdata) = &paths.tessdata {
        list_cmd.arg("--tessdata-dir").arg(tessdata);
    }
    let languages = list_cmd
        .arg("--list-langs")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| parse_language_list(&String::from_utf8_lossy(&o.stdout)));

    TesseractStatus {
        found: true,
        version: parse_version(&banner),
        languages,
    }
}

/// Extracts the version number from `tesseract --version` output.
pub fn parse_version(banner: &str) -> Option<String> {
    let re = Regex::new(r"(?m)^tesseract\s+v?(\d+\.\d+(?:\.\d+)?\S*)").ok()?;
    re.captures(banner).map(|c| c[1].to_string())
}

/// Parses `tesseract --list-langs` output, skipping the header line.
pub fn parse_language_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.to_lowercase().starts_with("list of "))
        .map(str::to_string)
        .collect()
}
