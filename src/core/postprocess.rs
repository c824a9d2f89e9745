// src/core/postprocess.rs
use crate::error::ConfigurationError;
use log::{debug, error};
use std::fs;
use std::path::Path;

/// Remove every exact-substring occurrence of each noise token from `text`,
/// in token order. Tokens may match inside larger words.
pub fn strip_noise_tokens(text: &str, tokens: &[String]) -> String {
    let mut cleaned = text.to_string();
    for token in tokens {
        if token.is_empty() {
            continue;
        }
        cleaned = cleaned.replace(token.as_str(), "");
    }
    cleaned
}

/// Load the noise-word list (UTF-8, one literal token per line) and strip
/// every entry from `text`. A missing or unreadable list is an error, never
/// silently skipped.
pub fn strip_noise_words<P: AsRef<Path>>(text: &str, noise_file: P) -> Result<String, ConfigurationError> {
    let path = noise_file.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| {
        error!("Noise word file not available: {}", path.display());
        ConfigurationError::from_io(path, e)
    })?;

    let tokens: Vec<String> = raw.lines().map(str::to_string).collect();
    debug!("Stripping {} noise tokens from OCR text", tokens.len());
    Ok(strip_noise_tokens(text, &tokens))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn strips_substring_occurrences_not_whole_words() {
        let out = strip_noise_tokens("foobar baz", &tokens(&["foo"]));
        assert_eq!(out, "bar baz");
    }

    #[test]
    fn removal_follows_list_order() {
        // "ab" goes first and breaks up the "abc" occurrence, so the later
        // "abc" token no longer matches anything.
        let out = strip_noise_tokens("abc abc", &tokens(&["ab", "abc"]));
        assert_eq!(out, "c c");
    }

    #[test]
    fn empty_tokens_are_ignored() {
        let out = strip_noise_tokens("unchanged", &tokens(&["", ""]));
        assert_eq!(out, "unchanged");
    }

    #[test]
    fn missing_noise_file_is_a_configuration_error() {
        let err = strip_noise_words("text", "/nonexistent/noise_words.txt").unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingFile { .. }));
    }

    #[test]
    fn reads_tokens_from_file() {
        let path = std::env::temp_dir().join("noise_words_test.txt");
        std::fs::write(&path, "foo\n☐\n").unwrap();
        let out = strip_noise_words("foobar ☐ baz", &path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(out, "bar  baz");
    }
}
