//! Newline-delimited word list input.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::EngineError;

/// Normalizes raw lines into the dictionary word set.
///
/// Lines are trimmed and uppercased; empty lines and lines with anything
/// other than ASCII letters are dropped. The result is deduplicated and sorted.
pub fn normalize_words<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| line.as_ref().trim().to_ascii_uppercase())
        .filter(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_uppercase()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Reads and normalizes a word list file.
///
/// Fails when the file cannot be read or contains no usable words.
pub fn read_word_file(path: &Path) -> Result<Vec<String>, EngineError> {
    let bytes = fs::read(path).map_err(|e| EngineError::DictionaryLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let words = normalize_words(text.lines());
    if words.is_empty() {
        return Err(EngineError::DictionaryEmpty);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_normalize_words() {
        let words = normalize_words(["cat", " Dog ", "CAT", "", "x-ray", "b4", "Apple\r"]);
        assert_eq!(words, vec!["APPLE", "CAT", "DOG"]);
    }

    #[test]
    fn test_read_word_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.txt");
        fs::write(&path, "zebra\nant\n\nant\n").unwrap();

        assert_eq!(read_word_file(&path).unwrap(), vec!["ANT", "ZEBRA"]);
    }

    #[test]
    fn test_read_word_file_all_invalid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.txt");
        fs::write(&path, "123\n--\n\n").unwrap();

        assert!(matches!(read_word_file(&path), Err(EngineError::DictionaryEmpty)));
    }

    #[test]
    fn test_read_word_file_missing() {
        let dir = tempdir().unwrap();
        let err = read_word_file(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, EngineError::DictionaryLoad { .. }));
    }
}
